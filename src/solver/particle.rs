//! Per-particle constitutive update and explicit advance.

use bevy::log::trace;

use crate::core::{Grid, Particle};
use crate::error::{MpmError, MpmResult};
use crate::materials::{MaterialContext, MaterialRegistry};
use crate::math::{Real, Vector};

/// For each particle: strain rate, stress, then
/// `x += dt * v_gathered` and `v += dt * a_p`.
///
/// `velocity_update` is the flat gather buffer filled by
/// [`GridMapper::update_particle_velocities`](crate::solver::GridMapper::update_particle_velocities).
pub fn update_particles(
    grid: &Grid,
    registry: &MaterialRegistry,
    particles: &mut [Particle],
    velocity_update: &[Real],
    dt: Real,
) -> MpmResult<()> {
    let dim = grid.dimension();
    if velocity_update.len() != particles.len() * dim {
        return Err(MpmError::BufferSize {
            expected: particles.len() * dim,
            found: velocity_update.len(),
        });
    }

    // Resolve every model up front so an unknown id leaves all particles untouched.
    let models = particles
        .iter()
        .map(|particle| registry.get(particle.material_id))
        .collect::<MpmResult<Vec<_>>>()?;

    for (((index, particle), gathered), model) in particles
        .iter_mut()
        .enumerate()
        .zip(velocity_update.chunks_exact(dim))
        .zip(models)
    {
        let ctx = MaterialContext {
            grid,
            particle: index,
            mass: particle.mass,
            volume: particle.volume,
        };
        model.update_strain_rate(&ctx, &mut particle.constitutive);
        model.update_stress(&ctx, &mut particle.constitutive);

        particle
            .position
            .axpy(dt, &Vector::from_column_slice(gathered), 1.0);
        particle.velocity.axpy(dt, &particle.acceleration, 1.0);

        if !particle.is_finite() {
            trace!("particle {} left finite range with {}", index, model.name());
        }
    }
    Ok(())
}
