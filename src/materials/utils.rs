//! Helper functions for materials
//!
//! Tensor helpers and parameter checks shared by constitutive models.

pub mod physics {
    use crate::math::{DecomposedTensor, Matrix};

    /// Symmetric part of the velocity gradient
    #[inline]
    pub fn strain_rate(velocity_gradient: &Matrix) -> Matrix {
        (velocity_gradient + velocity_gradient.transpose()) * 0.5
    }

    /// Removes the spherical part of a tensor
    #[inline]
    pub fn deviatoric_part(tensor: &Matrix) -> Matrix {
        DecomposedTensor::decompose(tensor).deviatoric_part
    }
}

/// Check if material properties make sense
pub mod check {
    use crate::math::Real;

    #[inline]
    pub fn viscosity_ok(viscosity: Real) -> bool {
        viscosity >= 0.0 && viscosity < 1e6 && viscosity.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::physics::*;
    use super::check;
    use crate::math::{Matrix, Real};

    #[test]
    fn strain_rate_is_symmetric() {
        let l = Matrix::from_row_slice(2, 2, &[0.0, 2.0, 0.0, 0.0]);
        let d = strain_rate(&l);
        assert_eq!(d[(0, 1)], 1.0);
        assert_eq!(d[(1, 0)], 1.0);
    }

    #[test]
    fn deviatoric_part_is_traceless() {
        let t = Matrix::from_row_slice(3, 3, &[1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 6.0]);
        assert!(deviatoric_part(&t).trace().abs() < 1e-12);
    }

    #[test]
    fn viscosity_bounds() {
        assert!(check::viscosity_ok(1e-3));
        assert!(!check::viscosity_ok(-1.0));
        assert!(!check::viscosity_ok(Real::NAN));
    }
}
