//! Error types for the MPM kernel.
//!
//! Every failure is fatal for a run: there are no retries and no partial
//! results, errors simply propagate to the caller of the solve entry point.

use thiserror::Error;

use crate::materials::MaterialId;

pub type MpmResult<T> = Result<T, MpmError>;

/// Configuration layer errors, raised before the time loop starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read properties: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse properties: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing property block '{0}'")]
    MissingBlock(String),

    #[error("missing required property '{0}'")]
    Missing(String),

    #[error("invalid value for '{key}': '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum MpmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("particle {particle} lies outside the mesh domain")]
    ParticleOutsideMesh { particle: usize },

    #[error(
        "mesh returned {nodes} node ids but {weights} shape weights for particle {particle}"
    )]
    MeshQueryMismatch {
        particle: usize,
        nodes: usize,
        weights: usize,
    },

    #[error(
        "mesh returned {nodes} node ids but {gradients} shape gradients for particle {particle}"
    )]
    GradientCountMismatch {
        particle: usize,
        nodes: usize,
        gradients: usize,
    },

    #[error("node id {node} out of range for a mesh with {vertex_count} vertices")]
    NodeOutOfRange { node: usize, vertex_count: usize },

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("material {0} not found")]
    MaterialNotFound(MaterialId),

    #[error("buffer holds {found} values, {expected} required")]
    BufferSize { expected: usize, found: usize },

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}
