use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransposeError {
    #[error("invalid matrix dimension {size}: must be a non-zero power of two")]
    InvalidDimension { size: usize },
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("index ({row}, {col}) out of range for {size}x{size} matrix")]
    IndexOutOfRange { row: usize, col: usize, size: usize },
    #[error("invalid tile size {tile}: must be a non-zero power of two")]
    InvalidTileSize { tile: usize },
    #[error("unknown algorithm {name:?}")]
    UnknownAlgorithm { name: String },
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed matrix file {} at line {line}: {reason}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("{failed} worker(s) failed, first was worker {worker}: {source}")]
    WorkerFailed {
        worker: usize,
        failed: usize,
        #[source]
        source: Box<TransposeError>,
    },
    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

pub type Result<T> = std::result::Result<T, TransposeError>;
