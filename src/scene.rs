//! Ready-made setups on a [`StructuredMesh`].

use rand::Rng;

use crate::config::{Properties, PropertyBlock, SolverParams};
use crate::core::{Particle, ParticleSet};
use crate::error::{ConfigError, MpmResult};
use crate::materials::{MaterialRegistry, Passive, ViscousFluid};
use crate::math::{Real, Vector};
use crate::mesh::StructuredMesh;
use crate::solver::TimeIntegrator;

pub const COLUMN_BLOCK: &str = "column";

/// A block of particles released above the floor of a square (cube) box.
///
/// The box spans `[0, cells * spacing]` on every axis. The column is centred
/// on the non-vertical axes and occupies the upper half along the last one.
#[derive(Clone, Debug, PartialEq)]
pub struct FallingColumn {
    pub dimension: usize,
    pub cells_per_axis: usize,
    pub spacing: Real,
    pub particles_per_axis: usize,
    pub density: Real,
    /// Random offset applied to each lattice position, in units of spacing.
    pub jitter: Real,
    /// Dynamic viscosity. `None` gives a stress-free column.
    pub viscosity: Option<Real>,
}

impl Default for FallingColumn {
    fn default() -> Self {
        Self {
            dimension: 2,
            cells_per_axis: 16,
            spacing: 1.0 / 16.0,
            particles_per_axis: 12,
            density: 1000.0,
            jitter: 0.0,
            viscosity: None,
        }
    }
}

impl FallingColumn {
    /// Read the optional `column` block; every key falls back to the default.
    pub fn from_properties(properties: &Properties) -> Result<Self, ConfigError> {
        match properties.block(COLUMN_BLOCK) {
            Ok(block) => Self::from_block(block),
            Err(ConfigError::MissingBlock(_)) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn from_block(block: &PropertyBlock) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            dimension: block.parse_optional("dimension")?.unwrap_or(defaults.dimension),
            cells_per_axis: block
                .parse_optional("cellsPerAxis")?
                .unwrap_or(defaults.cells_per_axis),
            spacing: block.parse_optional("spacing")?.unwrap_or(defaults.spacing),
            particles_per_axis: block
                .parse_optional("particlesPerAxis")?
                .unwrap_or(defaults.particles_per_axis),
            density: block.parse_optional("density")?.unwrap_or(defaults.density),
            jitter: block.parse_optional("jitter")?.unwrap_or(defaults.jitter),
            viscosity: block.parse_optional("viscosity")?,
        })
    }

    pub fn mesh(&self) -> MpmResult<StructuredMesh> {
        StructuredMesh::uniform(&vec![0.0; self.dimension], self.spacing, self.cells_per_axis)
    }

    /// Column bounds `(lo, hi)` on one axis.
    fn extent(&self, axis: usize) -> (Real, Real) {
        let length = self.cells_per_axis as Real * self.spacing;
        if axis + 1 == self.dimension {
            (0.5 * length, 0.875 * length)
        } else {
            (0.375 * length, 0.625 * length)
        }
    }

    pub fn particles(&self) -> MpmResult<ParticleSet> {
        let dim = self.dimension;
        let n = self.particles_per_axis.max(1);
        let count = n.pow(dim as u32);

        let extents: Vec<(Real, Real)> = (0..dim).map(|axis| self.extent(axis)).collect();
        let block_volume: Real = extents.iter().map(|(lo, hi)| hi - lo).product();
        let volume = block_volume / count as Real;
        let mass = self.density * volume;

        let mut rand = rand::rng();
        let jitter = self.jitter.abs() * self.spacing;
        let mut particles = Vec::with_capacity(count);
        for linear in 0..count {
            let mut rest = linear;
            let mut position = Vector::zeros(dim);
            for (axis, &(lo, hi)) in extents.iter().enumerate() {
                let i = rest % n;
                rest /= n;
                let offset = rand.random_range(-jitter..=jitter);
                position[axis] = lo + (i as Real + 0.5) * (hi - lo) / n as Real + offset;
            }
            particles.push(
                Particle::new(position, 0)
                    .with_mass(mass)
                    .with_volume(volume),
            );
        }
        ParticleSet::from_particles(dim, particles)
    }

    pub fn registry(&self) -> Result<MaterialRegistry, ConfigError> {
        let registry = MaterialRegistry::new();
        match self.viscosity {
            None => Ok(registry.with(0, Passive)),
            Some(mu) => ViscousFluid::new(mu)
                .map(|fluid| registry.with(0, fluid))
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "viscosity".to_string(),
                    value: mu.to_string(),
                    reason: "must be finite and non-negative".to_string(),
                }),
        }
    }

    pub fn build(&self, params: SolverParams) -> MpmResult<TimeIntegrator> {
        TimeIntegrator::new(
            params,
            Box::new(self.mesh()?),
            self.registry()?,
            self.particles()?,
        )
    }
}
