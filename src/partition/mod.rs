//! Work partitioning for the parallel transposes.
//!
//! Every policy splits the strict upper triangle `{(i, j) : i < j < N}`
//! into one [`WorkUnit`] per worker. Units never overlap and together
//! cover every pair exactly once, so workers can swap `(i, j)` with
//! `(j, i)` without any synchronisation.
//!
//! Available policies:
//! - `naive`: contiguous bands of rows (unbalanced on purpose)
//! - `diagonal`: equal-sized runs along the diagonals `j - i = d`
//! - `block`: pairs of square tiles, split by tile count

pub mod block;
pub mod diagonal;
pub mod naive;

use std::convert::Infallible;

use tracing::debug;

use crate::error::{Result, TransposeError};
use crate::matrix::size::ensure_power_of_two;

pub use block::DEFAULT_TILE_SIZE;

/// How the upper triangle is divided between workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    Naive,
    Diagonal,
    Block { tile: usize },
}

/// A run of `len` consecutive pairs along diagonal `offset`, starting at
/// row `start`: `(start, start + offset) .. (start + len - 1, start + len - 1 + offset)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagonalSegment {
    pub offset: usize,
    pub start: usize,
    pub len: usize,
}

/// The pairs one worker is responsible for swapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkUnit {
    /// Every pair `(i, j)` with `start <= i < end` and `j > i`.
    Rows { start: usize, end: usize },
    Diagonals(Vec<DiagonalSegment>),
    /// Tile coordinate pairs `(bi, bj)` with `bi <= bj`. Off-diagonal pairs
    /// exchange tile `(bi, bj)` with the transpose of tile `(bj, bi)`;
    /// diagonal pairs transpose their tile in place.
    Tiles { tile: usize, pairs: Vec<(usize, usize)> },
}

impl WorkUnit {
    /// Number of index pairs this unit swaps in an `n`×`n` matrix.
    pub fn len(&self, n: usize) -> usize {
        match self {
            Self::Rows { start, end } => (*start..*end).map(|i| n.saturating_sub(i + 1)).sum(),
            Self::Diagonals(segments) => segments.iter().map(|s| s.len).sum(),
            Self::Tiles { tile, pairs } => pairs
                .iter()
                .map(|&(bi, bj)| {
                    if bi == bj {
                        tile * tile.saturating_sub(1) / 2
                    } else {
                        tile * tile
                    }
                })
                .sum(),
        }
    }

    pub fn is_empty(&self, n: usize) -> bool {
        self.len(n) == 0
    }

    /// Calls `f(i, j)` for every pair of the unit, in the order a worker
    /// visits them. Stops at the first error.
    pub fn try_for_each_pair<F>(&self, n: usize, f: F) -> Result<()>
    where
        F: FnMut(usize, usize) -> Result<()>,
    {
        self.visit_pairs(n, f)
    }

    /// Every pair of the unit, in visiting order.
    pub fn pairs(&self, n: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.len(n));
        let Ok(()) = self.visit_pairs::<_, Infallible>(n, |i, j| {
            out.push((i, j));
            Ok(())
        });
        out
    }

    fn visit_pairs<F, E>(&self, n: usize, mut f: F) -> std::result::Result<(), E>
    where
        F: FnMut(usize, usize) -> std::result::Result<(), E>,
    {
        match self {
            Self::Rows { start, end } => {
                for i in *start..*end {
                    for j in (i + 1)..n {
                        f(i, j)?;
                    }
                }
            }
            Self::Diagonals(segments) => {
                for seg in segments {
                    for i in seg.start..seg.start + seg.len {
                        f(i, i + seg.offset)?;
                    }
                }
            }
            Self::Tiles { tile, pairs } => {
                let b = *tile;
                for &(bi, bj) in pairs {
                    let (row0, col0) = (bi * b, bj * b);
                    for p in 0..b {
                        // Diagonal tiles only touch their own upper half.
                        let q_start = if bi == bj { p + 1 } else { 0 };
                        for q in q_start..b {
                            f(row0 + p, col0 + q)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Checks that every pair of the unit lies inside an `n`×`n` matrix.
    pub fn validate(&self, n: usize) -> Result<()> {
        let out_of_range = |row, col| TransposeError::IndexOutOfRange { row, col, size: n };
        match self {
            Self::Rows { start, end } => {
                if start < end && *end > n {
                    return Err(out_of_range(end - 1, 0));
                }
            }
            Self::Diagonals(segments) => {
                for seg in segments.iter().filter(|s| s.len > 0) {
                    let last_row = seg.start + seg.len - 1;
                    let last_col = last_row + seg.offset;
                    if last_col >= n {
                        return Err(out_of_range(last_row, last_col));
                    }
                }
            }
            Self::Tiles { tile, pairs } => {
                for &(bi, bj) in pairs {
                    if bi > bj || (bj + 1) * tile > n {
                        return Err(out_of_range(bi * tile, ((bj + 1) * tile).saturating_sub(1)));
                    }
                }
            }
        }
        Ok(())
    }
}

/// A complete division of the upper triangle of an N×N matrix into
/// exactly one unit per worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    policy: Policy,
    size: usize,
    units: Vec<WorkUnit>,
}

impl Partition {
    /// Splits an `n`×`n` transpose between `workers` workers.
    ///
    /// `n` must be a power of two. Units can only be empty when there are
    /// fewer rows, pairs or tile pairs than workers.
    pub fn new(policy: Policy, n: usize, workers: usize) -> Result<Self> {
        ensure_power_of_two(n)?;
        if workers == 0 {
            return Err(TransposeError::InvalidWorkerCount);
        }
        let units = match policy {
            Policy::Naive => naive::partition(n, workers),
            Policy::Diagonal => diagonal::partition(n, workers),
            Policy::Block { tile } => block::partition(n, workers, tile)?,
        };
        let partition = Self {
            policy,
            size: n,
            units,
        };
        debug!(
            ?policy,
            size = n,
            workers,
            workloads = ?partition.workloads(),
            "built partition"
        );
        Ok(partition)
    }

    /// Partition with caller-chosen units, for exercising the executor's
    /// error paths. Nothing is checked.
    #[cfg(test)]
    pub(crate) fn from_units_unchecked(policy: Policy, size: usize, units: Vec<WorkUnit>) -> Self {
        Self {
            policy,
            size,
            units,
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn units(&self) -> &[WorkUnit] {
        &self.units
    }

    /// Pairs per unit, in worker order.
    pub fn workloads(&self) -> Vec<usize> {
        self.units.iter().map(|u| u.len(self.size)).collect()
    }
}

/// Start of part `k` when `total` items are cut into `parts` contiguous
/// ranges whose lengths differ by at most one.
pub(crate) fn split_point(k: usize, total: usize, parts: usize) -> usize {
    (k as u128 * total as u128 / parts as u128) as usize
}
