//! Particle-to-Grid (P2G) transfer operations
//!
//! Scatters body force, internal force and momentum from particles onto the
//! active nodes of an assembled grid.

use crate::core::{Grid, Particle};

/// Nodal accelerations first, then nodal velocities from momenta.
pub fn particle_to_grid(grid: &mut Grid, particles: &[Particle]) {
    grid.update_nodal_accelerations(particles);
    grid.update_nodal_velocities_from_momenta(particles);
}
