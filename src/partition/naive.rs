//! Row-band partitioning.

use super::{WorkUnit, split_point};

/// Worker `k` gets rows `[k·N/T, (k+1)·N/T)`.
///
/// Row `i` holds `N - 1 - i` pairs, so the first band carries far more
/// work than the last. That imbalance is what the diagonal policy fixes.
pub(crate) fn partition(n: usize, workers: usize) -> Vec<WorkUnit> {
    (0..workers)
        .map(|k| WorkUnit::Rows {
            start: split_point(k, n, workers),
            end: split_point(k + 1, n, workers),
        })
        .collect()
}
