//! Per-step transfer stages and the time loop that orders them.

pub mod g2p;
pub mod grid_update;
pub mod integrator;
pub mod output;
pub mod p2g;
pub mod particle;

pub use g2p::GridMapper;
pub use grid_update::grid_update;
pub use integrator::{SolverStatus, TimeIntegrator};
pub use output::{CsvSnapshotWriter, NullSink, SnapshotSink};
pub use p2g::particle_to_grid;
pub use particle::update_particles;
