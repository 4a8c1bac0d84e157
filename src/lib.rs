use bevy::prelude::*;

pub mod config;
pub mod core;
pub mod error;
pub mod materials;
pub mod math;
pub mod mesh;
pub mod scene;
pub mod solver;

// Public re-exports for clean API
pub use crate::config::{Properties, PropertyBlock, SolverParams};
pub use crate::core::{Grid, Particle, ParticleSet};
pub use crate::error::{ConfigError, MpmError, MpmResult};
pub use crate::materials::{ConstitutiveModel, MaterialId, MaterialRegistry};
pub use crate::mesh::{MeshService, StructuredMesh};
pub use crate::solver::{CsvSnapshotWriter, SnapshotSink, SolverStatus, TimeIntegrator};

/// Advances a [`TimeIntegrator`] resource by one step per app update.
///
/// Insert the integrator as a resource; the plugin does nothing while it is
/// absent and stops stepping once the run has finished or failed.
pub struct MpmPlugin;

impl Plugin for MpmPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, advance_simulation);
    }
}

fn advance_simulation(integrator: Option<ResMut<TimeIntegrator>>) {
    let Some(mut integrator) = integrator else {
        return;
    };
    if integrator.is_done() {
        return;
    }
    if let Err(e) = integrator.step() {
        bevy::log::error!("step {} failed: {}", integrator.steps_taken(), e);
    }
}
