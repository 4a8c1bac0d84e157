//! Particle x node interpolation operator.
//!
//! One row per particle, one column per mesh vertex. Row `p` holds exactly the
//! nodes the mesh reported for particle `p` together with their shape weights
//! and weight gradients. Scatter (particle to grid) and gather (grid to
//! particle) both go through this matrix so the two directions always use the
//! same weights.

use crate::core::sparse::{CsrMatrix, TripletBuilder};
use crate::math::{Matrix, Real, Vector, outer_product, zero_matrix, zero_vector};

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeMatrix {
    dimension: usize,
    weights: CsrMatrix,
    /// Parallel to the CSR values.
    gradients: Vec<Vector>,
}

/// One populated entry of a shape-matrix row.
#[derive(Clone, Copy, Debug)]
pub struct ShapeEntry<'a> {
    pub node: usize,
    pub weight: Real,
    pub gradient: &'a Vector,
}

impl ShapeMatrix {
    pub fn empty(dimension: usize) -> Self {
        Self {
            dimension,
            weights: CsrMatrix::zeros(0, 0),
            gradients: Vec::new(),
        }
    }

    pub fn builder(n_particles: usize, n_nodes: usize, dimension: usize) -> ShapeMatrixBuilder {
        ShapeMatrixBuilder {
            dimension,
            triplets: TripletBuilder::new(n_particles, n_nodes),
        }
    }

    #[inline]
    pub fn n_particles(&self) -> usize {
        self.weights.n_rows()
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.weights.n_cols()
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.weights.nnz()
    }

    pub fn weights(&self) -> &CsrMatrix {
        &self.weights
    }

    pub fn weight(&self, particle: usize, node: usize) -> Real {
        self.weights.get(particle, node).unwrap_or(0.0)
    }

    pub fn row(&self, particle: usize) -> impl Iterator<Item = ShapeEntry<'_>> + '_ {
        let range = self.weights.row_range(particle);
        let cols = &self.weights.col_idx()[range.clone()];
        let values = &self.weights.values()[range.clone()];
        let gradients = &self.gradients[range];
        cols.iter()
            .zip(values)
            .zip(gradients)
            .map(|((&node, &weight), gradient)| ShapeEntry {
                node,
                weight,
                gradient,
            })
    }

    /// Sum of the weights of one particle (1 for a partition of unity).
    pub fn row_weight_sum(&self, particle: usize) -> Real {
        self.weights.row_sum(particle)
    }

    /// `Σ_I N_Ip · values[I]`
    pub fn gather(&self, particle: usize, values: &[Vector]) -> Vector {
        self.row(particle)
            .fold(zero_vector(self.dimension), |acc, entry| {
                acc + &values[entry.node] * entry.weight
            })
    }

    /// `Σ_I values[I] ⊗ ∇N_Ip`, e.g. the velocity gradient at a particle.
    pub fn gather_gradient(&self, particle: usize, values: &[Vector]) -> Matrix {
        self.row(particle)
            .fold(zero_matrix(self.dimension), |acc, entry| {
                acc + outer_product(&values[entry.node], entry.gradient)
            })
    }
}

pub struct ShapeMatrixBuilder {
    dimension: usize,
    triplets: TripletBuilder<Vector>,
}

impl ShapeMatrixBuilder {
    /// Record the weight of `node` on `particle`. A missing gradient is
    /// stored as zero.
    pub fn add(&mut self, particle: usize, node: usize, weight: Real, gradient: Option<Vector>) {
        let gradient = gradient.unwrap_or_else(|| zero_vector(self.dimension));
        self.triplets.push(particle, node, weight, gradient);
    }

    /// Sort each row by node and merge repeated nodes.
    pub fn build(self) -> ShapeMatrix {
        let (weights, gradients) = self
            .triplets
            .build_with(|kept, extra| *kept += extra);
        ShapeMatrix {
            dimension: self.dimension,
            weights,
            gradients,
        }
    }
}
