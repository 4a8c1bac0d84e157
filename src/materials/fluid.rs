//! Newtonian viscous fluid
//!
//! Deviatoric stress proportional to the strain rate, `σ = 2μ dev(D)`. No
//! equation of state: the fluid carries no pressure of its own.

use crate::core::ConstitutiveState;
use crate::materials::utils::{check, physics};
use crate::materials::{ConstitutiveModel, MaterialContext};
use crate::math::Real;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViscousFluid {
    pub dynamic_viscosity: Real,
}

impl ViscousFluid {
    /// Returns `None` for a negative or non-finite viscosity.
    pub fn new(dynamic_viscosity: Real) -> Option<Self> {
        check::viscosity_ok(dynamic_viscosity).then_some(Self { dynamic_viscosity })
    }
}

impl ConstitutiveModel for ViscousFluid {
    fn name(&self) -> &str {
        "viscous_fluid"
    }

    fn update_strain_rate(&self, ctx: &MaterialContext<'_>, state: &mut ConstitutiveState) {
        state.strain_rate = physics::strain_rate(&ctx.grid.velocity_gradient(ctx.particle));
    }

    fn update_stress(&self, _ctx: &MaterialContext<'_>, state: &mut ConstitutiveState) {
        state.stress = physics::deviatoric_part(&state.strain_rate) * (2.0 * self.dynamic_viscosity);
    }
}
