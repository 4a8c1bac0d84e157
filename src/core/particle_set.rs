use crate::core::Particle;
use crate::error::{MpmError, MpmResult};
use crate::math::{Real, Vector, zero_vector};

/// Fixed-dimension particle container. Particles are only ever added during
/// setup; indices stay stable for the whole run and double as shape-matrix
/// rows.
#[derive(Clone, Debug)]
pub struct ParticleSet {
    dimension: usize,
    particles: Vec<Particle>,
}

impl ParticleSet {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            particles: Vec::new(),
        }
    }

    pub fn from_particles(dimension: usize, particles: Vec<Particle>) -> MpmResult<Self> {
        let mut set = Self::new(dimension);
        set.insert_batch(particles)?;
        Ok(set)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn insert(&mut self, particle: Particle) -> MpmResult<usize> {
        self.check(&particle)?;
        let index = self.particles.len();
        self.particles.push(particle);
        Ok(index)
    }

    pub fn insert_batch(&mut self, batch: Vec<Particle>) -> MpmResult<()> {
        for particle in &batch {
            self.check(particle)?;
        }
        self.particles.extend(batch);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    pub fn masses(&self) -> Vec<Real> {
        self.particles.iter().map(|p| p.mass).collect()
    }

    pub fn total_mass(&self) -> Real {
        self.particles.iter().map(|p| p.mass).sum()
    }

    pub fn total_momentum(&self) -> Vector {
        self.particles
            .iter()
            .fold(zero_vector(self.dimension), |acc, p| acc + p.momentum())
    }

    /// Apply the same body force to every particle.
    pub fn set_body_force(&mut self, body_force: &Vector) {
        for particle in &mut self.particles {
            particle.body_force.copy_from(body_force);
        }
    }

    fn check(&self, particle: &Particle) -> MpmResult<()> {
        if particle.dimension() != self.dimension || !particle.is_consistent() {
            return Err(MpmError::DimensionMismatch {
                expected: self.dimension,
                found: particle.dimension(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_particles_of_another_dimension() {
        let mut set = ParticleSet::new(2);
        assert_eq!(set.insert(Particle::from_slice(&[0.5, 0.5], 0)).unwrap(), 0);
        assert!(matches!(
            set.insert(Particle::from_slice(&[0.5, 0.5, 0.5], 0)),
            Err(MpmError::DimensionMismatch { expected: 2, found: 3 })
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn aggregates_mass_and_momentum() {
        let particles = vec![
            Particle::from_slice(&[0.0, 0.0], 0)
                .with_mass(2.0)
                .with_velocity(Vector::from_column_slice(&[1.0, 0.0])),
            Particle::from_slice(&[1.0, 0.0], 0)
                .with_mass(0.5)
                .with_velocity(Vector::from_column_slice(&[0.0, -4.0])),
        ];
        let set = ParticleSet::from_particles(2, particles).unwrap();
        assert_eq!(set.total_mass(), 2.5);
        assert_eq!(set.total_momentum().as_slice(), &[2.0, -2.0]);
    }
}
