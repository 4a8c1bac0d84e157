use std::path::PathBuf;
use std::process::ExitCode;

use bevy::log::{LogPlugin, info};
use bevy::prelude::*;
use clap::Parser;

use mpmnd::scene::FallingColumn;
use mpmnd::{MpmPlugin, MpmResult, Properties, SolverParams, SolverStatus, TimeIntegrator};

#[derive(Parser)]
#[command(name = "mpmnd")]
#[command(about = "Explicit material point method: falling column on a structured grid", long_about = None)]
struct Cli {
    /// JSON property file with a `solver` block and an optional `column` block
    properties: Option<PathBuf>,

    /// Override `outputDirectory`
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Override the column's particle jitter
    #[arg(long)]
    jitter: Option<f64>,
}

fn default_params() -> SolverParams {
    SolverParams::new(0.0, 0.5, 1e-3, 50)
}

fn build_integrator(cli: &Cli) -> MpmResult<TimeIntegrator> {
    let (mut params, mut column) = match &cli.properties {
        Some(path) => {
            let properties = Properties::from_path(path)?;
            (
                SolverParams::from_properties(&properties)?,
                FallingColumn::from_properties(&properties)?,
            )
        }
        None => (default_params(), FallingColumn::default()),
    };
    if let Some(dir) = &cli.output_dir {
        params.output_directory = dir.clone();
    }
    if let Some(jitter) = cli.jitter {
        column.jitter = jitter;
    }
    column.build(params)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), MpmPlugin));

    let integrator = match build_integrator(&cli) {
        Ok(integrator) => integrator,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    app.insert_resource(integrator);
    app.finish();
    app.cleanup();

    loop {
        app.update();
        let integrator = app.world().resource::<TimeIntegrator>();
        match integrator.status() {
            SolverStatus::Finished => {
                info!("done after {} steps, t = {}", integrator.steps_taken(), integrator.time());
                return ExitCode::SUCCESS;
            }
            SolverStatus::Failed => return ExitCode::FAILURE,
            SolverStatus::Pending | SolverStatus::Running => {}
        }
    }
}
