//! In-place transposition of square matrices, single- and multi-threaded.
//!
//! I built this to see how far you can get by only changing *who swaps
//! what*. Every strategy does the same swaps, `(i, j)` with `(j, i)` for
//! each pair above the diagonal. What changes is how those pairs get
//! split between threads:
//!
//! - **naive**: each thread takes a band of rows. Simple, but the first
//!   band has far more pairs than the last.
//! - **diagonal**: the pairs are dealt out along the diagonals, so every
//!   thread gets the same amount of work.
//! - **block**: pairs of 32×32 tiles are swapped as a unit, keeping both
//!   tiles in cache.
//!
//! ## Usage
//!
//! ```
//! use transpose_mt::{Algorithm, SquareMatrix, TransposeConfig, transpose};
//!
//! let mut m = SquareMatrix::from_rows(&[
//!     [0u32, 1, 2, 3],
//!     [4, 5, 6, 7],
//!     [8, 9, 10, 11],
//!     [12, 13, 14, 15],
//! ])
//! .unwrap();
//!
//! let config = TransposeConfig::default().with_workers(4);
//! transpose(&mut m, Algorithm::Diagonal, &config).unwrap();
//!
//! assert_eq!(m.row(0).unwrap(), &[0, 4, 8, 12]);
//! ```
//!
//! The dimension has to be a power of two; check it up front with
//! [`is_power_of_two`].

pub mod algorithm;
pub mod config;
pub mod error;
pub mod matrix;
pub mod partition;
pub mod threaded;

pub use algorithm::Algorithm;
pub use config::TransposeConfig;
pub use error::{Result, TransposeError};
pub use matrix::cache::{read_matrix, write_matrix};
pub use matrix::transpose::transpose_serial;
pub use matrix::{SquareMatrix, is_power_of_two};
pub use partition::{Partition, Policy};
pub use threaded::ParallelExecutor;

use matrix::size::ensure_power_of_two;

/// Transpose `matrix` in place with the chosen algorithm.
///
/// Every check (dimension, worker count, tile size) runs before the
/// first swap: on error the matrix is left exactly as it was.
pub fn transpose(
    matrix: &mut SquareMatrix,
    algorithm: Algorithm,
    config: &TransposeConfig,
) -> Result<()> {
    match algorithm.policy(config.tile_size) {
        None => transpose_serial(matrix),
        Some(policy) => transpose_parallel(matrix, policy, config),
    }
}

/// Rows split into contiguous bands, one per worker.
pub fn transpose_naive(matrix: &mut SquareMatrix, config: &TransposeConfig) -> Result<()> {
    transpose_parallel(matrix, Policy::Naive, config)
}

/// Pairs dealt out along the diagonals in equal shares.
pub fn transpose_diagonal(matrix: &mut SquareMatrix, config: &TransposeConfig) -> Result<()> {
    transpose_parallel(matrix, Policy::Diagonal, config)
}

/// Tile pairs of side `config.tile_size` split by count.
pub fn transpose_block(matrix: &mut SquareMatrix, config: &TransposeConfig) -> Result<()> {
    transpose_parallel(
        matrix,
        Policy::Block {
            tile: config.tile_size,
        },
        config,
    )
}

fn transpose_parallel(
    matrix: &mut SquareMatrix,
    policy: Policy,
    config: &TransposeConfig,
) -> Result<()> {
    ensure_power_of_two(matrix.size())?;
    config.validate()?;

    let partition = Partition::new(policy, matrix.size(), config.workers)?;
    ParallelExecutor::new(config.workers)?.execute(matrix, &partition)
}
