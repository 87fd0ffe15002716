//! Worker count and tile size for the parallel transposes.

use tracing::warn;

use crate::error::{Result, TransposeError};
use crate::matrix::is_power_of_two;
use crate::partition::DEFAULT_TILE_SIZE;

/// Environment variable the harness reads for the default worker count.
pub const THREADS_ENV_VAR: &str = "TRANSPOSE_NUM_THREADS";

/// Worker count used when the environment doesn't give a usable one.
pub const DEFAULT_WORKERS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransposeConfig {
    pub workers: usize,
    pub tile_size: usize,
}

impl Default for TransposeConfig {
    /// One worker per logical CPU, 32-wide tiles.
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl TransposeConfig {
    pub fn new(workers: usize, tile_size: usize) -> Self {
        Self { workers, tile_size }
    }

    /// Reads the worker count from `TRANSPOSE_NUM_THREADS`.
    ///
    /// Only meant for the outermost layer (the benchmark binary); the
    /// library never looks at the environment on its own.
    pub fn from_env() -> Self {
        let raw = std::env::var(THREADS_ENV_VAR).ok();
        Self {
            workers: parse_worker_count(raw.as_deref()),
            tile_size: DEFAULT_TILE_SIZE,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(TransposeError::InvalidWorkerCount);
        }
        if !is_power_of_two(self.tile_size) {
            return Err(TransposeError::InvalidTileSize {
                tile: self.tile_size,
            });
        }
        Ok(())
    }
}

/// Worker count from a raw environment value, [`DEFAULT_WORKERS`] when
/// it is missing, not a number, or zero.
pub fn parse_worker_count(raw: Option<&str>) -> usize {
    match raw.map(|s| s.trim().parse::<usize>()) {
        Some(Ok(n)) if n > 0 => n,
        None => DEFAULT_WORKERS,
        Some(_) => {
            warn!(
                value = raw.unwrap_or_default(),
                default = DEFAULT_WORKERS,
                "ignoring unusable {}",
                THREADS_ENV_VAR
            );
            DEFAULT_WORKERS
        }
    }
}
