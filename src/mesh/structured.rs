//! Axis-aligned structured mesh with multilinear shape functions.
//!
//! Vertices are numbered lexicographically with axis 0 varying fastest. A
//! point inside cell `c` is supported by the `2^dim` corners of that cell.

use crate::error::{MpmError, MpmResult};
use crate::math::{Real, Vector, zero_vector};
use crate::mesh::MeshService;

/// Points this far outside the box (in cell widths) still count as inside.
const DOMAIN_TOLERANCE: Real = 1e-9;

#[derive(Clone, Debug)]
pub struct StructuredMesh {
    origin: Vector,
    spacing: Vec<Real>,
    cells: Vec<usize>,
    strides: Vec<usize>,
    vertex_count: usize,
}

/// Corners of the cell containing a point, with weights and gradients.
struct Support {
    ids: Vec<usize>,
    weights: Vec<Real>,
    gradients: Vec<Vector>,
}

impl StructuredMesh {
    pub fn new(origin: Vector, spacing: Vec<Real>, cells: Vec<usize>) -> MpmResult<Self> {
        let dim = origin.len();
        if dim == 0 {
            return Err(MpmError::InvalidMesh("mesh needs at least one axis".into()));
        }
        for found in [spacing.len(), cells.len()] {
            if found != dim {
                return Err(MpmError::DimensionMismatch {
                    expected: dim,
                    found,
                });
            }
        }
        if let Some(h) = spacing.iter().find(|h| !(h.is_finite() && **h > 0.0)) {
            return Err(MpmError::InvalidMesh(format!("cell spacing {h} is not positive")));
        }
        if cells.contains(&0) {
            return Err(MpmError::InvalidMesh("every axis needs at least one cell".into()));
        }

        let mut strides = Vec::with_capacity(dim);
        let mut vertex_count = 1;
        for &n in &cells {
            strides.push(vertex_count);
            vertex_count *= n + 1;
        }

        Ok(Self {
            origin,
            spacing,
            cells,
            strides,
            vertex_count,
        })
    }

    /// Same spacing and cell count along every axis.
    pub fn uniform(origin: &[Real], spacing: Real, cells_per_axis: usize) -> MpmResult<Self> {
        let dim = origin.len();
        Self::new(
            Vector::from_column_slice(origin),
            vec![spacing; dim],
            vec![cells_per_axis; dim],
        )
    }

    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn spacing(&self) -> &[Real] {
        &self.spacing
    }

    /// Per-axis lattice coordinates of a vertex.
    pub fn lattice_coords(&self, index: usize) -> Vec<usize> {
        self.cells
            .iter()
            .zip(&self.strides)
            .map(|(&n, &stride)| (index / stride) % (n + 1))
            .collect()
    }

    pub fn vertex_index(&self, coords: &[usize]) -> usize {
        coords
            .iter()
            .zip(&self.strides)
            .map(|(&c, &stride)| c * stride)
            .sum()
    }

    fn support(&self, point: &Vector) -> Option<Support> {
        let dim = self.dimension();
        if point.len() != dim {
            return None;
        }

        // Base cell and local coordinate in [0, 1] per axis.
        let mut base = Vec::with_capacity(dim);
        let mut local = Vec::with_capacity(dim);
        for axis in 0..dim {
            let n = self.cells[axis];
            let s = (point[axis] - self.origin[axis]) / self.spacing[axis];
            if !s.is_finite() || s < -DOMAIN_TOLERANCE || s > n as Real + DOMAIN_TOLERANCE {
                return None;
            }
            let cell = (s.floor().max(0.0) as usize).min(n - 1);
            base.push(cell);
            local.push((s - cell as Real).clamp(0.0, 1.0));
        }

        let corners = 1usize << dim;
        let mut support = Support {
            ids: Vec::with_capacity(corners),
            weights: Vec::with_capacity(corners),
            gradients: Vec::with_capacity(corners),
        };

        for corner in 0..corners {
            let mut id = 0;
            let mut factors = Vec::with_capacity(dim);
            for axis in 0..dim {
                let upper = (corner >> axis) & 1 == 1;
                id += (base[axis] + upper as usize) * self.strides[axis];
                factors.push(if upper { local[axis] } else { 1.0 - local[axis] });
            }

            let mut gradient = zero_vector(dim);
            for axis in 0..dim {
                let sign = if (corner >> axis) & 1 == 1 { 1.0 } else { -1.0 };
                let others: Real = factors
                    .iter()
                    .enumerate()
                    .filter(|(b, _)| *b != axis)
                    .map(|(_, f)| f)
                    .product();
                gradient[axis] = sign / self.spacing[axis] * others;
            }

            support.ids.push(id);
            support.weights.push(factors.iter().product());
            support.gradients.push(gradient);
        }

        Some(support)
    }
}

impl MeshService for StructuredMesh {
    fn dimension(&self) -> usize {
        self.origin.len()
    }

    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn vertex(&self, index: usize) -> Vector {
        let coords = self.lattice_coords(index);
        Vector::from_iterator(
            self.dimension(),
            coords
                .iter()
                .enumerate()
                .map(|(axis, &c)| self.origin[axis] + c as Real * self.spacing[axis]),
        )
    }

    fn surrounding_node_ids(&self, point: &Vector) -> Vec<usize> {
        self.support(point).map(|s| s.ids).unwrap_or_default()
    }

    fn nodal_shapes(&self, point: &Vector) -> Vec<Real> {
        self.support(point).map(|s| s.weights).unwrap_or_default()
    }

    fn nodal_shape_gradients(&self, point: &Vector) -> Option<Vec<Vector>> {
        self.support(point).map(|s| s.gradients)
    }

    fn is_boundary_node(&self, index: usize) -> bool {
        self.lattice_coords(index)
            .iter()
            .zip(&self.cells)
            .any(|(&c, &n)| c == 0 || c == n)
    }
}
