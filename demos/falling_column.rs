// Viscous column dropped in a box, driven through the bevy app with a sink
// that logs the column's centre of mass instead of writing files.
use bevy::log::{LogPlugin, info};
use bevy::prelude::*;

use mpmnd::core::Particle;
use mpmnd::math::zero_vector;
use mpmnd::scene::FallingColumn;
use mpmnd::{MpmPlugin, MpmResult, SnapshotSink, SolverParams, TimeIntegrator};

struct CentreOfMassLog;

impl SnapshotSink for CentreOfMassLog {
    fn write_snapshot(&mut self, step: usize, particles: &[Particle]) -> MpmResult<()> {
        let Some(first) = particles.first() else {
            return Ok(());
        };
        let total_mass: f64 = particles.iter().map(|p| p.mass).sum();
        let centre = particles
            .iter()
            .fold(zero_vector(first.dimension()), |acc, p| acc + &p.position * p.mass)
            / total_mass;
        info!("step {:>4}: centre of mass {:?}", step, centre.as_slice());
        Ok(())
    }
}

fn main() {
    let column = FallingColumn {
        particles_per_axis: 16,
        jitter: 0.25,
        viscosity: Some(1e-3),
        ..FallingColumn::default()
    };
    let params = SolverParams::new(0.0, 0.25, 5e-4, 50);

    let integrator = match column.build(params) {
        Ok(integrator) => integrator.with_sink(CentreOfMassLog),
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), MpmPlugin))
        .insert_resource(integrator);
    app.finish();
    app.cleanup();

    while !app.world().resource::<TimeIntegrator>().is_done() {
        app.update();
    }
}
