use nalgebra::{DMatrix, DVector};

pub type Real = f64;

/// Dimension-agnostic vector; the spatial dimension is fixed by the mesh at runtime.
pub type Vector = DVector<Real>;
/// Square `dim x dim` tensor (velocity gradient, strain rate, stress).
pub type Matrix = DMatrix<Real>;

#[inline(always)]
pub fn zero_vector(dim: usize) -> Vector {
    Vector::zeros(dim)
}

#[inline(always)]
pub fn zero_matrix(dim: usize) -> Matrix {
    Matrix::zeros(dim, dim)
}

#[inline(always)]
pub fn identity_matrix(dim: usize) -> Matrix {
    Matrix::identity(dim, dim)
}

#[inline(always)]
pub fn matrix_trace(m: &Matrix) -> Real {
    m.trace()
}

/// `a ⊗ b`
#[inline(always)]
pub fn outer_product(a: &Vector, b: &Vector) -> Matrix {
    a * b.transpose()
}

/// Vector with every component zero except the last, set to `value`.
pub fn last_axis_vector(dim: usize, value: Real) -> Vector {
    let mut v = zero_vector(dim);
    if dim > 0 {
        v[dim - 1] = value;
    }
    v
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecomposedTensor {
    pub deviatoric_part: Matrix,
    pub spherical_part: Real,
}

impl DecomposedTensor {
    pub fn decompose(tensor: &Matrix) -> Self {
        let dim = tensor.nrows();
        let spherical_part = matrix_trace(tensor) / (dim as Real);
        let deviatoric_part = tensor - identity_matrix(dim) * spherical_part;
        Self {
            deviatoric_part,
            spherical_part,
        }
    }

    pub fn recompose(&self) -> Matrix {
        let dim = self.deviatoric_part.nrows();
        &self.deviatoric_part + identity_matrix(dim) * self.spherical_part
    }
}
