//! Diagonal partitioning.
//!
//! The upper triangle is read diagonal by diagonal: offset `d = j - i`
//! runs `1..N`, and diagonal `d` holds the `N - d` pairs `(i, i + d)`.
//! Laid end to end that is a sequence of `N(N-1)/2` pairs, which gets cut
//! into `T` contiguous runs. Long diagonals get split across workers, so
//! every worker ends up with the same number of pairs give or take one,
//! and walks its memory with a fixed `+1 row, +1 column` stride.

use super::{DiagonalSegment, WorkUnit, split_point};

pub(crate) fn partition(n: usize, workers: usize) -> Vec<WorkUnit> {
    let total = n * n.saturating_sub(1) / 2;

    // cursor into the flattened sequence: current diagonal and position on it
    let mut offset = 1;
    let mut pos = 0;

    (0..workers)
        .map(|k| {
            let mut remaining = split_point(k + 1, total, workers) - split_point(k, total, workers);
            let mut segments = Vec::new();
            while remaining > 0 {
                let diag_len = n - offset;
                let take = (diag_len - pos).min(remaining);
                segments.push(DiagonalSegment {
                    offset,
                    start: pos,
                    len: take,
                });
                pos += take;
                remaining -= take;
                if pos == diag_len {
                    offset += 1;
                    pos = 0;
                }
            }
            WorkUnit::Diagonals(segments)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{Partition, Policy};

    #[test]
    fn test_segments_for_small_matrix() {
        // n = 4: diagonals of length 3, 2, 1 -> six pairs, two per worker
        let units = partition(4, 3);
        let seg = |offset, start, len| DiagonalSegment { offset, start, len };
        assert_eq!(
            units,
            vec![
                WorkUnit::Diagonals(vec![seg(1, 0, 2)]),
                WorkUnit::Diagonals(vec![seg(1, 2, 1), seg(2, 0, 1)]),
                WorkUnit::Diagonals(vec![seg(2, 1, 1), seg(3, 0, 1)]),
            ]
        );
    }

    #[test]
    fn test_balanced_within_one_pair() {
        for n in [2, 8, 64, 256] {
            for workers in [1, 2, 3, 5, 8, 13] {
                let loads = Partition::new(Policy::Diagonal, n, workers)
                    .unwrap()
                    .workloads();
                let max = loads.iter().max().unwrap();
                let min = loads.iter().min().unwrap();
                assert!(max - min <= 1, "n={} workers={} loads={:?}", n, workers, loads);
            }
        }
    }

    #[test]
    fn test_segments_walk_the_diagonal() {
        let partition = Partition::new(Policy::Diagonal, 16, 4).unwrap();
        for unit in partition.units() {
            for pair in unit.pairs(16).windows(2) {
                let ((i0, j0), (i1, j1)) = (pair[0], pair[1]);
                let same_diagonal = j0 - i0 == j1 - i1;
                if same_diagonal {
                    assert_eq!((i1, j1), (i0 + 1, j0 + 1));
                }
            }
        }
    }

    #[test]
    fn test_single_element_matrix() {
        let units = partition(1, 4);
        assert!(units.iter().all(|u| u.is_empty(1)));
    }
}
