//! Materials for MPM simulation
//!
//! The solver only ever talks to materials through [`ConstitutiveModel`] and
//! the [`MaterialRegistry`] injected into the integrator. Built-in models:
//!
//! * `passive` - stress-free material
//! * `fluid` - Newtonian viscous fluid

pub mod fluid;
pub mod passive;
pub mod registry;
pub mod utils;

pub use fluid::ViscousFluid;
pub use passive::Passive;
pub use registry::MaterialRegistry;

use crate::core::{ConstitutiveState, Grid};
use crate::math::Real;

pub type MaterialId = u32;

/// Read-only view of the particle being updated.
#[derive(Clone, Copy)]
pub struct MaterialContext<'a> {
    pub grid: &'a Grid,
    /// Particle index, i.e. its row in the grid's shape matrix.
    pub particle: usize,
    pub mass: Real,
    pub volume: Real,
}

/// Material law evaluated once per particle per step.
///
/// `update_strain_rate` is always called before `update_stress` for the same
/// particle within a step. Models only see the constitutive state mutably;
/// particle kinematics belong to the integrator.
pub trait ConstitutiveModel: Send + Sync {
    fn name(&self) -> &str;

    fn update_strain_rate(&self, ctx: &MaterialContext<'_>, state: &mut ConstitutiveState);

    fn update_stress(&self, ctx: &MaterialContext<'_>, state: &mut ConstitutiveState);
}
