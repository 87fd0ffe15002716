//! One-shot fan-out of partition units over scoped threads.

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tracing::{debug, trace, warn};

use crate::error::{Result, TransposeError};
use crate::matrix::SquareMatrix;
use crate::partition::{Partition, WorkUnit};
use crate::threaded::shared::SharedBuffer;

/// Runs the units of a [`Partition`] in parallel against one matrix.
///
/// Nothing persists between calls: each `execute` spawns its threads,
/// joins every one of them, and only then returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelExecutor {
    workers: usize,
}

impl ParallelExecutor {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(TransposeError::InvalidWorkerCount);
        }
        Ok(Self { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Swap every pair of `partition` in `matrix`.
    ///
    /// All units are bounds-checked before the first swap, so an error
    /// from a bad partition leaves the matrix untouched. Units go to
    /// threads round-robin (one each when there are as many units as
    /// workers); threads with nothing to do aren't spawned, and a lone
    /// busy worker runs on the calling thread.
    ///
    /// Failures are collected after the join and reported once as
    /// [`TransposeError::WorkerFailed`], carrying the lowest-numbered
    /// worker's error and how many workers failed.
    ///
    /// A worker that panics, inline or on its own thread, is reported as
    /// [`TransposeError::WorkerPanicked`]. The other workers still run to
    /// completion and nothing is rolled back, so the contents of `matrix`
    /// are unspecified after that error.
    pub fn execute(&self, matrix: &mut SquareMatrix, partition: &Partition) -> Result<()> {
        self.execute_with(matrix, partition, run_worker)
    }

    fn execute_with<F>(
        &self,
        matrix: &mut SquareMatrix,
        partition: &Partition,
        work: F,
    ) -> Result<()>
    where
        F: Fn(&SharedBuffer<'_>, usize, &[&WorkUnit]) -> Result<()> + Sync,
    {
        let n = matrix.size();
        if partition.size() != n {
            return Err(TransposeError::DimensionMismatch {
                expected: n,
                found: partition.size(),
            });
        }
        for unit in partition.units() {
            unit.validate(n)?;
        }

        let mut assignments: Vec<Vec<&WorkUnit>> = vec![Vec::new(); self.workers];
        for (idx, unit) in partition.units().iter().enumerate() {
            if !unit.is_empty(n) {
                assignments[idx % self.workers].push(unit);
            }
        }
        let busy: Vec<(usize, Vec<&WorkUnit>)> = assignments
            .into_iter()
            .enumerate()
            .filter(|(_, units)| !units.is_empty())
            .collect();

        let shared = SharedBuffer::new(matrix.as_mut_slice(), n);

        let results: Vec<(usize, Result<()>)> = match busy.as_slice() {
            [] => return Ok(()),
            [(worker, units)] => {
                trace!(worker, "single busy worker, running inline");
                let inline = AssertUnwindSafe(|| work(&shared, n, units.as_slice()));
                let result = panic::catch_unwind(inline)
                    .unwrap_or_else(|_| Err(TransposeError::WorkerPanicked { worker: *worker }));
                vec![(*worker, result)]
            }
            _ => {
                debug!(
                    threads = busy.len(),
                    policy = ?partition.policy(),
                    size = n,
                    "spawning transpose workers"
                );
                let shared = &shared;
                let work = &work;
                thread::scope(|s| {
                    let handles: Vec<_> = busy
                        .iter()
                        .map(|(worker, units)| {
                            (*worker, s.spawn(move || work(shared, n, units.as_slice())))
                        })
                        .collect();

                    // join barrier
                    handles
                        .into_iter()
                        .map(|(worker, handle)| {
                            let result = handle
                                .join()
                                .unwrap_or_else(|_| Err(TransposeError::WorkerPanicked { worker }));
                            trace!(worker, ok = result.is_ok(), "worker joined");
                            (worker, result)
                        })
                        .collect::<Vec<_>>()
                })
            }
        };

        aggregate(results)
    }
}

fn run_worker(shared: &SharedBuffer<'_>, n: usize, units: &[&WorkUnit]) -> Result<()> {
    for unit in units {
        unit.try_for_each_pair(n, |i, j| shared.swap_transposed(i, j))?;
    }
    Ok(())
}

fn aggregate(results: Vec<(usize, Result<()>)>) -> Result<()> {
    let mut failures = results
        .into_iter()
        .filter_map(|(worker, result)| result.err().map(|e| (worker, e)));

    match failures.next() {
        None => Ok(()),
        Some((worker, first)) => {
            let failed = 1 + failures.count();
            warn!(worker, failed, error = %first, "transpose workers failed");
            Err(TransposeError::WorkerFailed {
                worker,
                failed,
                source: Box::new(first),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{DiagonalSegment, Policy};

    fn counting_matrix(n: usize) -> SquareMatrix {
        SquareMatrix::from_vec(n, (0..(n * n) as u32).collect()).unwrap()
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            ParallelExecutor::new(0),
            Err(TransposeError::InvalidWorkerCount)
        ));
    }

    #[test]
    fn test_execute_each_policy() {
        for policy in [Policy::Naive, Policy::Diagonal, Policy::Block { tile: 4 }] {
            let mut m = counting_matrix(16);
            let partition = Partition::new(policy, 16, 4).unwrap();
            ParallelExecutor::new(4).unwrap().execute(&mut m, &partition).unwrap();
            for i in 0..16 {
                for j in 0..16 {
                    assert_eq!(m.get(i, j).unwrap(), (j * 16 + i) as u32, "{:?}", policy);
                }
            }
        }
    }

    #[test]
    fn test_fewer_threads_than_units() {
        let mut m = counting_matrix(32);
        let partition = Partition::new(Policy::Diagonal, 32, 7).unwrap();
        ParallelExecutor::new(2).unwrap().execute(&mut m, &partition).unwrap();
        assert_eq!(m.row(0).unwrap()[1], 32);
        assert_eq!(m.row(31).unwrap()[0], 31);
    }

    #[test]
    fn test_size_mismatch() {
        let mut m = counting_matrix(8);
        let partition = Partition::new(Policy::Naive, 16, 2).unwrap();
        let result = ParallelExecutor::new(2).unwrap().execute(&mut m, &partition);
        assert!(matches!(
            result,
            Err(TransposeError::DimensionMismatch { expected: 8, found: 16 })
        ));
    }

    #[test]
    fn test_out_of_range_unit_leaves_matrix_untouched() {
        let mut m = counting_matrix(4);
        let before = m.clone();
        let units = vec![
            WorkUnit::Rows { start: 0, end: 2 },
            WorkUnit::Diagonals(vec![DiagonalSegment {
                offset: 3,
                start: 0,
                len: 2,
            }]),
        ];
        let partition = Partition::from_units_unchecked(Policy::Diagonal, 4, units);
        let result = ParallelExecutor::new(2).unwrap().execute(&mut m, &partition);
        assert!(matches!(
            result,
            Err(TransposeError::IndexOutOfRange { row: 1, col: 4, size: 4 })
        ));
        assert_eq!(m, before);
    }

    #[test]
    fn test_panicking_worker_is_reported() {
        let mut m = counting_matrix(8);
        let partition = Partition::new(Policy::Naive, 8, 2).unwrap();
        assert!(partition.units().iter().all(|u| !u.is_empty(8)));

        let result = ParallelExecutor::new(2).unwrap().execute_with(
            &mut m,
            &partition,
            |shared, n, units| {
                if units.contains(&&WorkUnit::Rows { start: 0, end: 4 }) {
                    panic!("worker 0 gave up");
                }
                run_worker(shared, n, units)
            },
        );
        match result {
            Err(TransposeError::WorkerFailed {
                worker,
                failed,
                source,
            }) => {
                assert_eq!(worker, 0);
                assert_eq!(failed, 1);
                assert!(matches!(*source, TransposeError::WorkerPanicked { worker: 0 }));
            }
            other => panic!("expected WorkerFailed, got {:?}", other),
        }

        // one busy worker runs on the calling thread
        let result = ParallelExecutor::new(1).unwrap().execute_with(
            &mut m,
            &partition,
            |_, _, _| panic!("inline worker gave up"),
        );
        assert!(matches!(
            result,
            Err(TransposeError::WorkerFailed { worker: 0, failed: 1, .. })
        ));
    }

    #[test]
    fn test_aggregate_reports_first_failure() {
        let results = vec![
            (0, Ok(())),
            (1, Err(TransposeError::WorkerPanicked { worker: 1 })),
            (2, Ok(())),
            (
                3,
                Err(TransposeError::IndexOutOfRange {
                    row: 9,
                    col: 9,
                    size: 4,
                }),
            ),
        ];
        match aggregate(results) {
            Err(TransposeError::WorkerFailed {
                worker,
                failed,
                source,
            }) => {
                assert_eq!(worker, 1);
                assert_eq!(failed, 2);
                assert!(matches!(*source, TransposeError::WorkerPanicked { worker: 1 }));
            }
            other => panic!("expected WorkerFailed, got {:?}", other),
        }
        assert!(aggregate(vec![(0, Ok(())), (1, Ok(()))]).is_ok());
    }
}
