//! Stress-free material.
//!
//! Particles follow the grid velocity field without resisting deformation;
//! the strain rate is still tracked so output and diagnostics can read it.

use crate::core::ConstitutiveState;
use crate::materials::utils::physics;
use crate::materials::{ConstitutiveModel, MaterialContext};

#[derive(Clone, Copy, Debug, Default)]
pub struct Passive;

impl ConstitutiveModel for Passive {
    fn name(&self) -> &str {
        "passive"
    }

    fn update_strain_rate(&self, ctx: &MaterialContext<'_>, state: &mut ConstitutiveState) {
        state.strain_rate = physics::strain_rate(&ctx.grid.velocity_gradient(ctx.particle));
    }

    fn update_stress(&self, _ctx: &MaterialContext<'_>, state: &mut ConstitutiveState) {
        state.stress.fill(0.0);
    }
}
