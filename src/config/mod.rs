//! Configuration and parameters
//!
//! Property blocks, solver settings and default constants.

pub mod constants;
pub mod properties;
pub mod solver_params;

pub use constants::*;
pub use properties::{Properties, PropertyBlock};
pub use solver_params::*;
