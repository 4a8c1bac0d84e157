//! Background grid for MPM simulation
//!
//! Nodes are the vertices of the mesh service. The grid snapshots their
//! coordinates and boundary flags on assembly, builds the particle x node
//! shape matrix and the lumped nodal mass, and runs the per-step node
//! updates. Every update touches the active node set only.

use bevy::log::debug;
use indexmap::IndexSet;

use crate::core::Particle;
use crate::core::mass_matrix::MassMatrix;
use crate::core::shape_matrix::ShapeMatrix;
use crate::error::{MpmError, MpmResult};
use crate::math::{Matrix, Real, Vector, zero_vector};
use crate::mesh::MeshService;

#[derive(Clone, Debug)]
pub struct Grid {
    dimension: usize,
    positions: Vec<Vector>,
    velocities: Vec<Vector>,
    accelerations: Vec<Vector>,
    masses: Vec<Real>,
    boundary: Vec<bool>,
    shape: ShapeMatrix,
    mass_matrix: MassMatrix,
    active_nodes: IndexSet<usize>,
    assembled: bool,
}

impl Grid {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            positions: Vec::new(),
            velocities: Vec::new(),
            accelerations: Vec::new(),
            masses: Vec::new(),
            boundary: Vec::new(),
            shape: ShapeMatrix::empty(dimension),
            mass_matrix: MassMatrix::default(),
            active_nodes: IndexSet::new(),
            assembled: false,
        }
    }

    /// Rebuild node geometry, shape matrix and lumped mass from scratch for
    /// the current particle positions.
    ///
    /// Nothing is committed unless every particle finds support in the mesh,
    /// so a failed assembly leaves the previous state untouched.
    pub fn assemble(&mut self, mesh: &dyn MeshService, particles: &[Particle]) -> MpmResult<()> {
        let dim = self.dimension;
        if mesh.dimension() != dim {
            return Err(MpmError::DimensionMismatch {
                expected: dim,
                found: mesh.dimension(),
            });
        }

        let vertex_count = mesh.vertex_count();
        let positions: Vec<Vector> = (0..vertex_count).map(|i| mesh.vertex(i)).collect();
        let boundary: Vec<bool> = (0..vertex_count).map(|i| mesh.is_boundary_node(i)).collect();

        let mut builder = ShapeMatrix::builder(particles.len(), vertex_count, dim);
        let mut active_nodes = IndexSet::new();

        for (index, particle) in particles.iter().enumerate() {
            if particle.dimension() != dim {
                return Err(MpmError::DimensionMismatch {
                    expected: dim,
                    found: particle.dimension(),
                });
            }

            let node_ids = mesh.surrounding_node_ids(&particle.position);
            if node_ids.is_empty() {
                return Err(MpmError::ParticleOutsideMesh { particle: index });
            }
            let shapes = mesh.nodal_shapes(&particle.position);
            let gradients = mesh.nodal_shape_gradients(&particle.position);
            if shapes.len() != node_ids.len() {
                return Err(MpmError::MeshQueryMismatch {
                    particle: index,
                    nodes: node_ids.len(),
                    weights: shapes.len(),
                });
            }
            if let Some(found) = gradients.as_ref().map(Vec::len).filter(|&n| n != node_ids.len()) {
                return Err(MpmError::GradientCountMismatch {
                    particle: index,
                    nodes: node_ids.len(),
                    gradients: found,
                });
            }

            let mut gradients = gradients.map(Vec::into_iter);
            for (&node, &weight) in node_ids.iter().zip(&shapes) {
                if node >= vertex_count {
                    return Err(MpmError::NodeOutOfRange { node, vertex_count });
                }
                let gradient = gradients.as_mut().and_then(Iterator::next);
                builder.add(index, node, weight, gradient);
                active_nodes.insert(node);
            }
        }

        active_nodes.sort();
        let shape = builder.build();
        let masses: Vec<Real> = particles.iter().map(|p| p.mass).collect();
        let mass_matrix = MassMatrix::assemble(&shape, &masses, &active_nodes);

        self.masses = mass_matrix.lump();
        self.positions = positions;
        self.boundary = boundary;
        self.velocities = vec![zero_vector(dim); vertex_count];
        self.accelerations = vec![zero_vector(dim); vertex_count];
        self.shape = shape;
        self.mass_matrix = mass_matrix;
        self.active_nodes = active_nodes;
        self.assembled = true;

        debug!(
            "assembled grid: {} particles, {} nodes ({} active), {} shape entries",
            particles.len(),
            vertex_count,
            self.active_nodes.len(),
            self.shape.nnz()
        );
        Ok(())
    }

    /// Nodal acceleration from body force and particle stress:
    /// `a_I = (Σ_p N_Ip m_p b_p - Σ_p V_p σ_p ∇N_Ip) / m_I`.
    pub fn update_nodal_accelerations(&mut self, particles: &[Particle]) {
        debug_assert!(self.is_assembled(), "grid used before assembly");
        for &node in &self.active_nodes {
            self.accelerations[node].fill(0.0);
        }

        for (index, particle) in particles.iter().enumerate() {
            for entry in self.shape.row(index) {
                let mut force = &particle.body_force * (particle.mass * entry.weight);
                force -= (&particle.constitutive.stress * entry.gradient) * particle.volume;
                self.accelerations[entry.node] += force;
            }
        }

        for &node in &self.active_nodes {
            let mass = self.masses[node];
            if mass > 0.0 {
                self.accelerations[node] /= mass;
            }
        }
    }

    /// `v_I = Σ_p N_Ip m_p v_p / m_I`
    pub fn update_nodal_velocities_from_momenta(&mut self, particles: &[Particle]) {
        debug_assert!(self.is_assembled(), "grid used before assembly");
        for &node in &self.active_nodes {
            self.velocities[node].fill(0.0);
        }

        for (index, particle) in particles.iter().enumerate() {
            for entry in self.shape.row(index) {
                self.velocities[entry.node] += &particle.velocity * (particle.mass * entry.weight);
            }
        }

        for &node in &self.active_nodes {
            let mass = self.masses[node];
            if mass > 0.0 {
                self.velocities[node] /= mass;
            }
        }
    }

    /// Clamp velocity and acceleration to zero on every boundary node.
    pub fn apply_no_slip_boundary_conditions(&mut self) {
        for &node in &self.active_nodes {
            if self.boundary[node] {
                self.velocities[node].fill(0.0);
                self.accelerations[node].fill(0.0);
            }
        }
    }

    /// Forward Euler on the grid: `v_I += a_I dt`.
    pub fn update_nodal_velocities(&mut self, dt: Real) {
        for &node in &self.active_nodes {
            if self.masses[node] > 0.0 {
                self.velocities[node].axpy(dt, &self.accelerations[node], 1.0);
            }
        }
    }

    /// Velocity gradient `Σ_I v_I ⊗ ∇N_Ip` at a particle.
    pub fn velocity_gradient(&self, particle: usize) -> Matrix {
        self.shape.gather_gradient(particle, &self.velocities)
    }

    /// `Σ_I m_I v_I` over active nodes.
    pub fn total_momentum(&self) -> Vector {
        self.active_nodes
            .iter()
            .fold(zero_vector(self.dimension), |acc, &node| {
                acc + &self.velocities[node] * self.masses[node]
            })
    }

    /// True once an assembly has succeeded, even for an empty particle set.
    pub fn is_assembled(&self) -> bool {
        self.assembled
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vector] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vector] {
        &self.velocities
    }

    pub fn accelerations(&self) -> &[Vector] {
        &self.accelerations
    }

    /// Lumped nodal masses, one per mesh vertex.
    pub fn masses(&self) -> &[Real] {
        &self.masses
    }

    pub fn is_boundary(&self, node: usize) -> bool {
        self.boundary[node]
    }

    pub fn active_nodes(&self) -> &IndexSet<usize> {
        &self.active_nodes
    }

    pub fn shape_matrix(&self) -> &ShapeMatrix {
        &self.shape
    }

    pub fn mass_matrix(&self) -> &MassMatrix {
        &self.mass_matrix
    }
}
