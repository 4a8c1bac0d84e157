//! Grid-to-Particle (G2P) transfer operations
//!
//! Gathers nodal accelerations and velocities back onto particles through the
//! grid's shape matrix. Weights are never recomputed here, so gather uses
//! exactly the weights the scatter used.

use crate::core::{Grid, Particle};
use crate::error::{MpmError, MpmResult};
use crate::math::Real;

#[derive(Clone, Copy, Debug, Default)]
pub struct GridMapper;

impl GridMapper {
    pub fn new() -> Self {
        Self
    }

    /// `a_p = Σ_I N_Ip a_I`, written onto each particle.
    pub fn update_particle_accelerations(&self, grid: &Grid, particles: &mut [Particle]) {
        let shape = grid.shape_matrix();
        debug_assert_eq!(shape.n_particles(), particles.len());
        for (index, particle) in particles.iter_mut().enumerate() {
            particle.acceleration = shape.gather(index, grid.accelerations());
        }
    }

    /// `Σ_I N_Ip v_I` into `velocity_update[p * dim + c]`.
    ///
    /// The particles' own velocities are left alone: the integrator still
    /// needs them for the explicit update.
    pub fn update_particle_velocities(
        &self,
        grid: &Grid,
        particles: &[Particle],
        velocity_update: &mut [Real],
    ) -> MpmResult<()> {
        let dim = grid.dimension();
        let expected = particles.len() * dim;
        if velocity_update.len() != expected {
            return Err(MpmError::BufferSize {
                expected,
                found: velocity_update.len(),
            });
        }

        let shape = grid.shape_matrix();
        for (index, chunk) in velocity_update.chunks_exact_mut(dim).enumerate() {
            let velocity = shape.gather(index, grid.velocities());
            chunk.copy_from_slice(velocity.as_slice());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector;
    use crate::mesh::StructuredMesh;

    fn moving_particles() -> Vec<Particle> {
        vec![
            Particle::from_slice(&[1.5, 1.5], 0)
                .with_velocity(Vector::from_column_slice(&[2.0, -1.0])),
            Particle::from_slice(&[2.25, 1.75], 0)
                .with_velocity(Vector::from_column_slice(&[2.0, -1.0])),
        ]
    }

    #[test]
    fn uniform_grid_velocity_is_gathered_exactly() {
        let mesh = StructuredMesh::uniform(&[0.0, 0.0], 1.0, 4).unwrap();
        let particles = moving_particles();
        let mut grid = Grid::new(2);
        grid.assemble(&mesh, &particles).unwrap();
        grid.update_nodal_velocities_from_momenta(&particles);

        let mut buffer = vec![0.0; particles.len() * 2];
        GridMapper::new()
            .update_particle_velocities(&grid, &particles, &mut buffer)
            .unwrap();
        for chunk in buffer.chunks(2) {
            assert!((chunk[0] - 2.0).abs() < 1e-12);
            assert!((chunk[1] + 1.0).abs() < 1e-12);
        }
        // Particle state untouched.
        assert_eq!(particles[0].velocity.as_slice(), &[2.0, -1.0]);
    }

    #[test]
    fn accelerations_are_written_onto_particles() {
        let mesh = StructuredMesh::uniform(&[0.0, 0.0], 1.0, 4).unwrap();
        let mut particles: Vec<Particle> = moving_particles()
            .into_iter()
            .map(|p| p.with_body_force(Vector::from_column_slice(&[0.0, -9.8])))
            .collect();
        let mut grid = Grid::new(2);
        grid.assemble(&mesh, &particles).unwrap();
        grid.update_nodal_accelerations(&particles);

        GridMapper::new().update_particle_accelerations(&grid, &mut particles);
        for particle in &particles {
            assert!(particle.acceleration[0].abs() < 1e-12);
            assert!((particle.acceleration[1] + 9.8).abs() < 1e-12);
        }
    }

    #[test]
    fn wrong_buffer_size_is_rejected() {
        let mesh = StructuredMesh::uniform(&[0.0, 0.0], 1.0, 4).unwrap();
        let particles = moving_particles();
        let mut grid = Grid::new(2);
        grid.assemble(&mesh, &particles).unwrap();
        let mut buffer = vec![0.0; 3];
        assert!(matches!(
            GridMapper::new().update_particle_velocities(&grid, &particles, &mut buffer),
            Err(MpmError::BufferSize { expected: 4, found: 3 })
        ));
    }
}
