//! Material points for MPM simulation
//!
//! Particles carry position, velocity, mass and the constitutive state their
//! material model evolves.

use crate::materials::MaterialId;
use crate::math::{Matrix, Real, Vector, zero_matrix, zero_vector};

/// Strain rate and stress carried per particle. Written only by the
/// particle's constitutive model; the grid reads `stress` for internal force.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstitutiveState {
    pub strain_rate: Matrix,
    pub stress: Matrix,
    /// Extra history variables (plastic strain, damage, ...) a model may keep.
    pub history: Vec<Real>,
}

impl ConstitutiveState {
    pub fn zeroed(dim: usize) -> Self {
        Self {
            strain_rate: zero_matrix(dim),
            stress: zero_matrix(dim),
            history: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vector,
    pub velocity: Vector,
    pub acceleration: Vector,
    /// Force per unit mass.
    pub body_force: Vector,
    pub mass: Real,
    pub volume: Real,
    pub material_id: MaterialId,
    pub constitutive: ConstitutiveState,
}

impl Particle {
    /// Particle at rest at `position`, unit mass and volume.
    pub fn new(position: Vector, material_id: MaterialId) -> Self {
        let dim = position.len();
        Self {
            position,
            velocity: zero_vector(dim),
            acceleration: zero_vector(dim),
            body_force: zero_vector(dim),
            mass: 1.0,
            volume: 1.0,
            material_id,
            constitutive: ConstitutiveState::zeroed(dim),
        }
    }

    pub fn from_slice(position: &[Real], material_id: MaterialId) -> Self {
        Self::new(Vector::from_column_slice(position), material_id)
    }

    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_mass(mut self, mass: Real) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_volume(mut self, volume: Real) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_body_force(mut self, body_force: Vector) -> Self {
        self.body_force = body_force;
        self
    }

    #[inline(always)]
    pub fn dimension(&self) -> usize {
        self.position.len()
    }

    #[inline(always)]
    pub fn momentum(&self) -> Vector {
        &self.velocity * self.mass
    }

    /// Every per-particle vector and tensor has the particle's dimension.
    pub fn is_consistent(&self) -> bool {
        let dim = self.dimension();
        self.velocity.len() == dim
            && self.acceleration.len() == dim
            && self.body_force.len() == dim
            && self.constitutive.strain_rate.shape() == (dim, dim)
            && self.constitutive.stress.shape() == (dim, dim)
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|x| x.is_finite())
            && self.velocity.iter().all(|v| v.is_finite())
            && self.mass.is_finite()
    }
}
