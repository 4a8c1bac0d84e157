//! Explicit MPM time loop.

use bevy::log::{debug, info};
use bevy::prelude::Resource;

use crate::config::SolverParams;
use crate::core::{Grid, ParticleSet};
use crate::error::{MpmError, MpmResult};
use crate::materials::MaterialRegistry;
use crate::math::Real;
use crate::mesh::MeshService;
use crate::solver::g2p::GridMapper;
use crate::solver::grid_update::grid_update;
use crate::solver::output::{CsvSnapshotWriter, SnapshotSink};
use crate::solver::p2g::particle_to_grid;
use crate::solver::particle::update_particles;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverStatus {
    /// Constructed, grid not yet assembled.
    Pending,
    Running,
    Finished,
    /// A step returned an error; no further steps run.
    Failed,
}

/// Owns everything one run needs and advances it step by step.
///
/// The mesh and the material registry are injected at construction. The
/// snapshot sink defaults to a [`CsvSnapshotWriter`] built from the output
/// settings in [`SolverParams`].
#[derive(Resource)]
pub struct TimeIntegrator {
    params: SolverParams,
    mesh: Box<dyn MeshService>,
    registry: MaterialRegistry,
    grid: Grid,
    particles: ParticleSet,
    mapper: GridMapper,
    velocity_update: Vec<Real>,
    sink: Box<dyn SnapshotSink>,
    step: usize,
    status: SolverStatus,
}

impl TimeIntegrator {
    pub fn new(
        params: SolverParams,
        mesh: Box<dyn MeshService>,
        registry: MaterialRegistry,
        particles: ParticleSet,
    ) -> MpmResult<Self> {
        params.validate()?;
        let dim = mesh.dimension();
        if particles.dimension() != dim {
            return Err(MpmError::DimensionMismatch {
                expected: dim,
                found: particles.dimension(),
            });
        }
        // Fail on a malformed body force before anything runs.
        params.body_force_vector(dim)?;

        let sink = CsvSnapshotWriter::new(&params.output_directory, params.output_prefix.clone());
        Ok(Self {
            params,
            mesh,
            registry,
            grid: Grid::new(dim),
            particles,
            mapper: GridMapper::new(),
            velocity_update: Vec::new(),
            sink: Box::new(sink),
            step: 0,
            status: SolverStatus::Pending,
        })
    }

    pub fn with_sink(mut self, sink: impl SnapshotSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Apply the body force to every particle and assemble the grid.
    /// Called by the first [`step`](Self::step) if not called explicitly.
    pub fn initialize(&mut self) -> MpmResult<()> {
        // Every particle must resolve to a model before anything moves.
        if let Err(e) = self.check_materials() {
            self.status = SolverStatus::Failed;
            return Err(e);
        }

        let dim = self.grid.dimension();
        let body_force = self.params.body_force_vector(dim)?;
        self.particles.set_body_force(&body_force);
        self.velocity_update = vec![0.0; self.particles.len() * dim];

        if let Err(e) = self.grid.assemble(self.mesh.as_ref(), self.particles.particles()) {
            self.status = SolverStatus::Failed;
            return Err(e);
        }

        info!(
            "initialized: {} particles, {} steps of dt = {}",
            self.particles.len(),
            self.params.num_time_steps(),
            self.params.initial_time_step
        );
        self.status = SolverStatus::Running;
        Ok(())
    }

    fn check_materials(&self) -> MpmResult<()> {
        for particle in self.particles.iter() {
            self.registry.get(particle.material_id)?;
        }
        Ok(())
    }

    /// Run one time step. Does nothing once the run has finished or failed.
    pub fn step(&mut self) -> MpmResult<()> {
        match self.status {
            SolverStatus::Finished | SolverStatus::Failed => return Ok(()),
            SolverStatus::Pending => self.initialize()?,
            SolverStatus::Running => {}
        }

        match self.advance() {
            Ok(()) => {
                self.step += 1;
                if self.step >= self.params.num_time_steps() {
                    debug!("finished after {} steps", self.step);
                    self.status = SolverStatus::Finished;
                }
                Ok(())
            }
            Err(e) => {
                self.status = SolverStatus::Failed;
                Err(e)
            }
        }
    }

    /// Run every remaining step.
    pub fn solve(&mut self) -> MpmResult<()> {
        while !self.is_done() {
            self.step()?;
        }
        Ok(())
    }

    fn advance(&mut self) -> MpmResult<()> {
        let ts = self.step;
        let dt = self.params.initial_time_step;

        if self.params.reassemble_each_step && ts > 0 {
            self.grid.assemble(self.mesh.as_ref(), self.particles.particles())?;
        }

        particle_to_grid(&mut self.grid, self.particles.particles());
        grid_update(&mut self.grid, dt);

        self.mapper
            .update_particle_accelerations(&self.grid, self.particles.particles_mut());
        self.mapper.update_particle_velocities(
            &self.grid,
            self.particles.particles(),
            &mut self.velocity_update,
        )?;

        update_particles(
            &self.grid,
            &self.registry,
            self.particles.particles_mut(),
            &self.velocity_update,
            dt,
        )?;

        if self.params.is_output_step(ts) {
            info!("dt = {}, ts = {}, t = {}", dt, ts, self.params.time_at(ts));
            self.sink.write_snapshot(ts, self.particles.particles())?;
        }
        Ok(())
    }

    pub fn status(&self) -> SolverStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == SolverStatus::Finished
    }

    /// Finished or failed.
    pub fn is_done(&self) -> bool {
        matches!(self.status, SolverStatus::Finished | SolverStatus::Failed)
    }

    pub fn steps_taken(&self) -> usize {
        self.step
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    /// Current simulated time.
    pub fn time(&self) -> Real {
        self.params.time_at(self.step)
    }
}
