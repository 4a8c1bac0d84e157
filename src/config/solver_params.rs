use std::path::PathBuf;

use crate::config::constants::{
    DEFAULT_GRAVITY, DEFAULT_OUTPUT_DIRECTORY, DEFAULT_OUTPUT_PREFIX, SOLVER_BLOCK,
};
use crate::config::properties::{Properties, PropertyBlock};
use crate::error::{ConfigError, MpmError, MpmResult};
use crate::math::{Real, Vector, last_axis_vector};

/// Solver parameters controlling the explicit time loop and its output.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverParams {
    pub start_time: Real,
    pub final_time: Real,
    /// Fixed step size; the loop never adapts it.
    pub initial_time_step: Real,
    /// Snapshot every `output_step_frequency` steps, starting at step 0.
    pub output_step_frequency: usize,

    /// Body force per unit mass applied to every particle. `None` means
    /// gravity along the last axis.
    pub body_force: Option<Vec<Real>>,

    /// Rebuild the shape matrix from current positions before every step
    /// instead of assembling once before the loop.
    pub reassemble_each_step: bool,

    pub output_prefix: String,
    pub output_directory: PathBuf,
}

impl SolverParams {
    pub fn new(
        start_time: Real,
        final_time: Real,
        initial_time_step: Real,
        output_step_frequency: usize,
    ) -> Self {
        Self {
            start_time,
            final_time,
            initial_time_step,
            output_step_frequency,
            body_force: None,
            reassemble_each_step: false,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
        }
    }

    /// Read the `solver` block.
    pub fn from_properties(properties: &Properties) -> Result<Self, ConfigError> {
        Self::from_block(properties.block(SOLVER_BLOCK)?)
    }

    pub fn from_block(block: &PropertyBlock) -> Result<Self, ConfigError> {
        let mut params = Self::new(
            block.parse("startTime")?,
            block.parse("finalTime")?,
            block.parse("initialTimeStep")?,
            block.parse("outputStepFrequency")?,
        );

        if let Some(raw) = block.get("bodyForce") {
            params.body_force = Some(parse_components("bodyForce", raw)?);
        }
        if let Some(reassemble) = block.parse_optional("reassembleEachStep")? {
            params.reassemble_each_step = reassemble;
        }
        if let Some(prefix) = block.get("outputPrefix") {
            params.output_prefix = prefix.to_string();
        }
        if let Some(directory) = block.get("outputDirectory") {
            params.output_directory = PathBuf::from(directory);
        }

        params.validate()?;
        Ok(params)
    }

    pub fn with_body_force(mut self, body_force: Vec<Real>) -> Self {
        self.body_force = Some(body_force);
        self
    }

    pub fn with_reassembly(mut self, reassemble_each_step: bool) -> Self {
        self.reassemble_each_step = reassemble_each_step;
        self
    }

    pub fn with_output(mut self, directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        self.output_directory = directory.into();
        self.output_prefix = prefix.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dt = self.initial_time_step;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(invalid("initialTimeStep", dt, "must be positive and finite"));
        }
        if !self.start_time.is_finite() {
            return Err(invalid("startTime", self.start_time, "must be finite"));
        }
        if !self.final_time.is_finite() || self.final_time < self.start_time {
            return Err(invalid(
                "finalTime",
                self.final_time,
                "must be finite and not before startTime",
            ));
        }
        if self.output_step_frequency == 0 {
            return Err(invalid("outputStepFrequency", 0, "must be at least 1"));
        }
        Ok(())
    }

    /// `floor(final_time / initial_time_step) + 1`. The last step may run
    /// past `final_time`.
    pub fn num_time_steps(&self) -> usize {
        (self.final_time / self.initial_time_step).floor() as usize + 1
    }

    pub fn time_at(&self, step: usize) -> Real {
        self.start_time + self.initial_time_step * step as Real
    }

    pub fn is_output_step(&self, step: usize) -> bool {
        step % self.output_step_frequency == 0
    }

    /// Body force for a `dim`-dimensional run.
    pub fn body_force_vector(&self, dim: usize) -> MpmResult<Vector> {
        match &self.body_force {
            Some(components) if components.len() != dim => Err(MpmError::DimensionMismatch {
                expected: dim,
                found: components.len(),
            }),
            Some(components) => Ok(Vector::from_column_slice(components)),
            None => Ok(last_axis_vector(dim, DEFAULT_GRAVITY)),
        }
    }
}

fn invalid(key: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_components(key: &str, raw: &str) -> Result<Vec<Real>, ConfigError> {
    raw.split(',')
        .map(|component| {
            component
                .trim()
                .parse::<Real>()
                .map_err(|err| invalid(key, raw, &err.to_string()))
        })
        .collect()
}
