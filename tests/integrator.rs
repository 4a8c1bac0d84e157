use std::fs;
use std::sync::{Arc, Mutex};

use mpmnd::core::Particle;
use mpmnd::materials::{MaterialRegistry, Passive};
use mpmnd::scene::FallingColumn;
use mpmnd::solver::NullSink;
use mpmnd::{
    MpmError, MpmResult, ParticleSet, SnapshotSink, SolverParams, SolverStatus, StructuredMesh,
    TimeIntegrator,
};

/// Remembers which steps produced a snapshot.
#[derive(Clone, Default)]
struct RecordingSink {
    steps: Arc<Mutex<Vec<usize>>>,
}

impl SnapshotSink for RecordingSink {
    fn write_snapshot(&mut self, step: usize, _particles: &[Particle]) -> MpmResult<()> {
        self.steps.lock().unwrap().push(step);
        Ok(())
    }
}

/// 2 x 2 unit cells; vertex 4 at (1, 1) is the only interior node.
fn small_mesh() -> Box<StructuredMesh> {
    Box::new(StructuredMesh::uniform(&[0.0, 0.0], 1.0, 2).unwrap())
}

fn single_particle(position: &[f64], material: u32) -> ParticleSet {
    ParticleSet::from_particles(2, vec![Particle::from_slice(position, material)]).unwrap()
}

fn passive() -> MaterialRegistry {
    MaterialRegistry::new().with(0, Passive)
}

#[test]
fn particle_on_a_node_falls_under_gravity() {
    let params = SolverParams::new(0.0, 0.0, 0.01, 1);
    let mut solver = TimeIntegrator::new(params, small_mesh(), passive(), single_particle(&[1.0, 1.0], 0))
        .unwrap()
        .with_sink(NullSink);

    solver.step().unwrap();

    let particle = &solver.particles().particles()[0];
    assert!((particle.velocity[1] + 0.098).abs() < 1e-12);
    assert!(particle.velocity[0].abs() < 1e-12);
    assert!((particle.position[1] - (1.0 - 0.098 * 0.01)).abs() < 1e-12);
    assert!((particle.position[0] - 1.0).abs() < 1e-12);
    assert!(solver.is_finished());
}

#[test]
fn unit_final_time_runs_eleven_steps_and_snapshots_on_the_cadence() {
    let sink = RecordingSink::default();
    let steps = sink.steps.clone();
    let params = SolverParams::new(0.0, 1.0, 0.1, 5).with_body_force(vec![0.0, 0.0]);
    let mut solver = TimeIntegrator::new(params, small_mesh(), passive(), single_particle(&[1.0, 1.0], 0))
        .unwrap()
        .with_sink(sink);

    solver.solve().unwrap();

    assert_eq!(solver.steps_taken(), 11);
    assert_eq!(*steps.lock().unwrap(), vec![0, 5, 10]);
}

#[test]
fn csv_snapshots_land_in_the_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let params = SolverParams::new(0.0, 1.0, 0.25, 2)
        .with_body_force(vec![0.0, 0.0])
        .with_output(dir.path(), "frame_");
    let particles = ParticleSet::from_particles(
        2,
        vec![
            Particle::from_slice(&[0.75, 1.0], 0),
            Particle::from_slice(&[1.25, 1.5], 0),
        ],
    )
    .unwrap();
    let mut solver = TimeIntegrator::new(params, small_mesh(), passive(), particles).unwrap();
    solver.solve().unwrap();

    for step in [0, 2, 4] {
        let text = fs::read_to_string(dir.path().join(format!("frame_{}.csv", step))).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let fields: Vec<&str> = line.split(", ").collect();
            assert_eq!(fields.len(), 3);
            assert_eq!(fields[2], step.to_string());
            assert_eq!(fields[0].split('.').nth(1).map(str::len), Some(15));
        }
    }
    assert!(!dir.path().join("frame_1.csv").exists());
}

#[test]
fn unknown_material_fails_the_run() {
    let params = SolverParams::new(0.0, 1.0, 0.1, 1);
    let mut solver = TimeIntegrator::new(params, small_mesh(), passive(), single_particle(&[1.0, 1.0], 3))
        .unwrap()
        .with_sink(NullSink);

    assert!(matches!(solver.solve(), Err(MpmError::MaterialNotFound(3))));
    assert_eq!(solver.status(), SolverStatus::Failed);
    assert_eq!(solver.steps_taken(), 0);
}

#[test]
fn unknown_material_is_caught_before_any_particle_moves() {
    let params = SolverParams::new(0.0, 1.0, 0.1, 1);
    let particles = ParticleSet::from_particles(
        2,
        vec![
            Particle::from_slice(&[1.0, 1.0], 0),
            Particle::from_slice(&[0.5, 0.5], 9),
        ],
    )
    .unwrap();
    let mut solver = TimeIntegrator::new(params, small_mesh(), passive(), particles)
        .unwrap()
        .with_sink(NullSink);

    assert!(matches!(solver.solve(), Err(MpmError::MaterialNotFound(9))));
    assert_eq!(solver.status(), SolverStatus::Failed);
    let first = &solver.particles().particles()[0];
    assert_eq!(first.position.as_slice(), &[1.0, 1.0]);
    assert_eq!(first.velocity.as_slice(), &[0.0, 0.0]);
    assert!(!solver.grid().is_assembled());
}

#[test]
fn particle_outside_the_mesh_fails_before_the_first_step() {
    let params = SolverParams::new(0.0, 1.0, 0.1, 1);
    let mut solver = TimeIntegrator::new(params, small_mesh(), passive(), single_particle(&[3.0, 1.0], 0))
        .unwrap()
        .with_sink(NullSink);

    assert!(matches!(
        solver.solve(),
        Err(MpmError::ParticleOutsideMesh { particle: 0 })
    ));
    assert!(solver.is_done());
    assert!(!solver.is_finished());
}

#[test]
fn invalid_parameters_are_rejected_at_construction() {
    let params = SolverParams::new(0.0, 1.0, 0.0, 1);
    let result = TimeIntegrator::new(params, small_mesh(), passive(), single_particle(&[1.0, 1.0], 0));
    assert!(matches!(result, Err(MpmError::Config(_))));
}

#[test]
fn reassembly_follows_the_particle_into_a_new_cell() {
    let mesh = Box::new(StructuredMesh::uniform(&[0.0, 0.0], 1.0, 4).unwrap());
    let params = SolverParams::new(0.0, 0.2, 0.01, 100).with_reassembly(true);
    let mut solver = TimeIntegrator::new(params, mesh, passive(), single_particle(&[1.5, 1.05], 0))
        .unwrap()
        .with_sink(NullSink);

    solver.solve().unwrap();

    let particle = &solver.particles().particles()[0];
    assert!(particle.position[1] < 1.0);
    // The bottom row of vertices (indices 0..5) now supports the particle.
    assert!(solver.grid().active_nodes().iter().any(|&node| node < 5));
}

#[test]
fn viscous_column_conserves_mass_and_stays_finite() {
    let column = FallingColumn {
        particles_per_axis: 6,
        jitter: 0.1,
        viscosity: Some(1e-3),
        ..FallingColumn::default()
    };
    let mut solver = column
        .build(SolverParams::new(0.0, 0.02, 1e-3, 10))
        .unwrap()
        .with_sink(NullSink);
    let initial_mass = solver.particles().total_mass();

    solver.solve().unwrap();

    assert_eq!(solver.steps_taken(), solver.params().num_time_steps());
    assert!(solver.particles().iter().all(Particle::is_finite));
    let lumped: f64 = solver.grid().masses().iter().sum();
    assert!((lumped - initial_mass).abs() < 1e-9 * initial_mass);
    // Everything has started moving down.
    assert!(solver.particles().iter().all(|p| p.velocity[1] < 0.0));
}
