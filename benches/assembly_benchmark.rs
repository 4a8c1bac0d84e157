/// Simple custom benchmarking without criterion
use std::time::Instant;

use mpmnd::core::{Grid, ParticleSet};
use mpmnd::materials::{MaterialRegistry, Passive};
use mpmnd::scene::FallingColumn;
use mpmnd::solver::{GridMapper, grid_update, particle_to_grid, update_particles};

fn time_it<F: FnMut()>(name: &str, iterations: usize, mut f: F) {
    // Warmup
    for _ in 0..5 {
        f();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    let elapsed = start.elapsed();

    let avg_ms = elapsed.as_secs_f64() * 1000.0 / iterations as f64;
    println!("{}: {:.3}ms avg ({} iterations)", name, avg_ms, iterations);
}

fn column(dimension: usize, particles_per_axis: usize) -> (FallingColumn, ParticleSet) {
    let column = FallingColumn {
        dimension,
        cells_per_axis: 32,
        spacing: 1.0 / 32.0,
        particles_per_axis,
        jitter: 0.3,
        ..FallingColumn::default()
    };
    let particles = match column.particles() {
        Ok(particles) => particles,
        Err(e) => panic!("bad benchmark setup: {}", e),
    };
    (column, particles)
}

fn main() {
    println!("\n=== mpmnd Benchmarks ===\n");

    println!("--- Assembly ---");
    for &(dim, n) in &[(2, 32), (2, 100), (2, 200), (3, 20), (3, 40)] {
        let (column, particles) = column(dim, n);
        let Ok(mesh) = column.mesh() else { continue };
        let mut grid = Grid::new(dim);

        time_it(
            &format!("assemble (dim={}, n={})", dim, particles.len()),
            20,
            || {
                if let Err(e) = grid.assemble(&mesh, particles.particles()) {
                    panic!("assembly failed: {}", e);
                }
            },
        );
    }

    println!("\n--- Step stages ---");
    for &(dim, n) in &[(2, 100), (3, 20)] {
        let (column, mut particles) = column(dim, n);
        let Ok(mesh) = column.mesh() else { continue };
        let registry = MaterialRegistry::new().with(0, Passive);
        let mut grid = Grid::new(dim);
        if let Err(e) = grid.assemble(&mesh, particles.particles()) {
            panic!("assembly failed: {}", e);
        }
        let count = particles.len();
        let mut velocity_update = vec![0.0; count * dim];

        time_it(&format!("p2g (dim={}, n={})", dim, count), 50, || {
            particle_to_grid(&mut grid, particles.particles());
        });

        time_it(&format!("grid_update (dim={}, n={})", dim, count), 50, || {
            grid_update(&mut grid, 1e-4);
        });

        time_it(&format!("g2p (dim={}, n={})", dim, count), 50, || {
            let mapper = GridMapper::new();
            mapper.update_particle_accelerations(&grid, particles.particles_mut());
            if let Err(e) =
                mapper.update_particle_velocities(&grid, particles.particles(), &mut velocity_update)
            {
                panic!("gather failed: {}", e);
            }
        });

        time_it(&format!("particle update (dim={}, n={})", dim, count), 50, || {
            // Zero step size keeps particles on their assembled positions.
            if let Err(e) = update_particles(
                &grid,
                &registry,
                particles.particles_mut(),
                &velocity_update,
                0.0,
            ) {
                panic!("particle update failed: {}", e);
            }
        });
    }
}
