// Defaults used when the solver block leaves optional properties out.
use crate::math::Real;

/// Name of the property block holding the solver settings.
pub const SOLVER_BLOCK: &str = "solver";

/// Gravity along the last coordinate axis.
pub const DEFAULT_GRAVITY: Real = -9.8;

pub const DEFAULT_OUTPUT_PREFIX: &str = "mpm_output_";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = ".";
