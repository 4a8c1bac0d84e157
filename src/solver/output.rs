//! Particle position snapshots.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::Particle;
use crate::error::MpmResult;

/// Receives the particle set on every output step.
pub trait SnapshotSink: Send + Sync {
    fn write_snapshot(&mut self, step: usize, particles: &[Particle]) -> MpmResult<()>;
}

/// Writes `<directory>/<prefix><step>.csv`, one line per particle: every
/// coordinate as `{:.15}, ` then the step index.
#[derive(Clone, Debug)]
pub struct CsvSnapshotWriter {
    directory: PathBuf,
    prefix: String,
}

impl CsvSnapshotWriter {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, step: usize) -> PathBuf {
        self.directory.join(format!("{}{}.csv", self.prefix, step))
    }
}

impl SnapshotSink for CsvSnapshotWriter {
    fn write_snapshot(&mut self, step: usize, particles: &[Particle]) -> MpmResult<()> {
        fs::create_dir_all(&self.directory)?;
        let mut out = BufWriter::new(File::create(self.path_for(step))?);
        for particle in particles {
            for x in particle.position.iter() {
                write!(out, "{:.15}, ", x)?;
            }
            writeln!(out, "{}", step)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Discards every snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn write_snapshot(&mut self, _step: usize, _particles: &[Particle]) -> MpmResult<()> {
        Ok(())
    }
}
