pub mod grid;
pub mod mass_matrix;
pub mod particle;
pub mod particle_set;
pub mod shape_matrix;
pub mod sparse;

pub use grid::Grid;
pub use mass_matrix::MassMatrix;
pub use particle::{ConstitutiveState, Particle};
pub use particle_set::ParticleSet;
pub use shape_matrix::{ShapeEntry, ShapeMatrix, ShapeMatrixBuilder};
pub use sparse::{CsrMatrix, TripletBuilder};
