//! Mesh service boundary.
//!
//! The kernel never walks mesh topology itself: it asks the mesh for vertex
//! geometry, for the nodes supporting a point and for their shape weights.

pub mod structured;

pub use structured::StructuredMesh;

use crate::math::{Real, Vector};

/// Read-only geometry and interpolation queries consumed by the grid.
///
/// Node ids returned by the point queries index `0..vertex_count()`, and the
/// weight (and gradient) lists are parallel to the id list.
pub trait MeshService: Send + Sync {
    fn dimension(&self) -> usize;

    fn vertex_count(&self) -> usize;

    fn vertex(&self, index: usize) -> Vector;

    /// Nodes whose shape functions are non-zero-supported at `point`. Empty
    /// when the point lies outside the mesh.
    fn surrounding_node_ids(&self, point: &Vector) -> Vec<usize>;

    fn nodal_shapes(&self, point: &Vector) -> Vec<Real>;

    /// Spatial gradients of the shape functions at `point`, when the mesh can
    /// provide them. Without gradients the grid carries no internal force.
    fn nodal_shape_gradients(&self, _point: &Vector) -> Option<Vec<Vector>> {
        None
    }

    fn is_boundary_node(&self, index: usize) -> bool;
}
