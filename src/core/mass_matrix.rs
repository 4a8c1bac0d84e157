//! Consistent and lumped nodal mass.

use indexmap::IndexSet;

use crate::core::shape_matrix::ShapeMatrix;
use crate::core::sparse::{CsrMatrix, TripletBuilder};
use crate::math::Real;

/// Consistent mass matrix `M = Sᵀ · diag(m) · S` restricted to active nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MassMatrix {
    consistent: CsrMatrix,
}

impl MassMatrix {
    /// Assemble from the shape matrix and per-particle masses. Entries only
    /// ever couple nodes in `active_nodes`.
    pub fn assemble(shape: &ShapeMatrix, masses: &[Real], active_nodes: &IndexSet<usize>) -> Self {
        debug_assert_eq!(masses.len(), shape.n_particles());
        let n_nodes = shape.n_nodes();
        let capacity = (0..shape.n_particles())
            .map(|particle| shape.row(particle).count().pow(2))
            .sum();
        let mut triplets = TripletBuilder::<()>::with_capacity(n_nodes, n_nodes, capacity);

        for (particle, &mass) in masses.iter().enumerate() {
            for a in shape.row(particle) {
                debug_assert!(active_nodes.contains(&a.node));
                for b in shape.row(particle) {
                    triplets.add(a.node, b.node, mass * a.weight * b.weight);
                }
            }
        }

        Self {
            consistent: triplets.build(),
        }
    }

    pub fn consistent(&self) -> &CsrMatrix {
        &self.consistent
    }

    /// Row-sum lumping. One entry per mesh vertex, zero for untouched nodes.
    pub fn lump(&self) -> Vec<Real> {
        (0..self.consistent.n_rows())
            .map(|node| self.consistent.row_sum(node))
            .collect()
    }

    pub fn total_mass(&self) -> Real {
        self.consistent.values().iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lumping_conserves_particle_mass() {
        // Two particles on a three-node line.
        let mut builder = ShapeMatrix::builder(2, 3, 1);
        builder.add(0, 0, 0.6, None);
        builder.add(0, 1, 0.4, None);
        builder.add(1, 1, 0.5, None);
        builder.add(1, 2, 0.5, None);
        let shape = builder.build();
        let active: IndexSet<usize> = [0, 1, 2].into_iter().collect();

        let mass = MassMatrix::assemble(&shape, &[2.0, 1.0], &active);
        let lumped = mass.lump();

        assert!((lumped[0] - 1.2).abs() < 1e-12);
        assert!((lumped[1] - (0.8 + 0.5)).abs() < 1e-12);
        assert!((lumped[2] - 0.5).abs() < 1e-12);
        assert!((lumped.iter().sum::<Real>() - 3.0).abs() < 1e-12);
        assert!((mass.total_mass() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn consistent_matrix_is_symmetric() {
        let mut builder = ShapeMatrix::builder(1, 2, 1);
        builder.add(0, 0, 0.3, None);
        builder.add(0, 1, 0.7, None);
        let shape = builder.build();
        let active: IndexSet<usize> = [0, 1].into_iter().collect();
        let mass = MassMatrix::assemble(&shape, &[1.0], &active);
        assert_eq!(mass.consistent().get(0, 1), mass.consistent().get(1, 0));
        assert!((mass.consistent().get(0, 1).unwrap() - 0.21).abs() < 1e-12);
    }
}
