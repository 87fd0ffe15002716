//! Tile-pair partitioning.
//!
//! The matrix is cut into `B×B` tiles. Each tile pair `(bi, bj)` with
//! `bi < bj` is one piece of work: tile `(bi, bj)` is swapped with the
//! transpose of tile `(bj, bi)`. A diagonal tile `(b, b)` is transposed in
//! place. A piece touches at most `2·B²` elements, which keeps both tiles
//! resident in cache while they are exchanged.

use super::{WorkUnit, split_point};
use crate::error::{Result, TransposeError};
use crate::matrix::is_power_of_two;

/// 32×32 `u32` tiles: two of them fill 8 KiB, well inside L1.
pub const DEFAULT_TILE_SIZE: usize = 32;

/// Tile side actually used for an `n`×`n` matrix: the requested tile,
/// shrunk to `n` when the matrix is smaller than one tile.
pub fn effective_tile(n: usize, tile: usize) -> Result<usize> {
    if !is_power_of_two(tile) {
        return Err(TransposeError::InvalidTileSize { tile });
    }
    Ok(tile.min(n))
}

pub(crate) fn partition(n: usize, workers: usize, tile: usize) -> Result<Vec<WorkUnit>> {
    let tile = effective_tile(n, tile)?;
    let tiles_per_side = n / tile;

    let tile_pairs: Vec<(usize, usize)> = (0..tiles_per_side)
        .flat_map(|bi| (bi..tiles_per_side).map(move |bj| (bi, bj)))
        .collect();
    let count = tile_pairs.len();

    Ok((0..workers)
        .map(|k| {
            let lo = split_point(k, count, workers);
            let hi = split_point(k + 1, count, workers);
            WorkUnit::Tiles {
                tile,
                pairs: tile_pairs[lo..hi].to_vec(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::{Partition, Policy};

    #[test]
    fn test_effective_tile() {
        assert_eq!(effective_tile(1024, 32).unwrap(), 32);
        assert_eq!(effective_tile(8, 32).unwrap(), 8);
        assert_eq!(effective_tile(1, 64).unwrap(), 1);
        for bad in [0, 3, 48] {
            assert!(matches!(
                effective_tile(64, bad),
                Err(TransposeError::InvalidTileSize { tile }) if tile == bad
            ));
        }
    }

    #[test]
    fn test_tile_pairs_split_by_count() {
        // 4 tiles per side -> 10 tile pairs over 3 workers: 3, 3, 4
        let units = partition(16, 3, 4).unwrap();
        let counts: Vec<usize> = units
            .iter()
            .map(|u| match u {
                WorkUnit::Tiles { pairs, .. } => pairs.len(),
                other => panic!("unexpected unit {:?}", other),
            })
            .collect();
        assert_eq!(counts, vec![3, 3, 4]);

        match &units[0] {
            WorkUnit::Tiles { tile, pairs } => {
                assert_eq!(*tile, 4);
                assert_eq!(pairs, &vec![(0, 0), (0, 1), (0, 2)]);
            }
            other => panic!("unexpected unit {:?}", other),
        }
    }

    #[test]
    fn test_diagonal_tile_only_upper_half() {
        let unit = WorkUnit::Tiles {
            tile: 2,
            pairs: vec![(1, 1)],
        };
        assert_eq!(unit.pairs(4), vec![(2, 3)]);
    }

    #[test]
    fn test_off_diagonal_tile_swaps_whole_tile() {
        let unit = WorkUnit::Tiles {
            tile: 2,
            pairs: vec![(0, 1)],
        };
        assert_eq!(unit.pairs(4), vec![(0, 2), (0, 3), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_invalid_tile_rejected_by_partition() {
        assert!(matches!(
            Partition::new(Policy::Block { tile: 24 }, 64, 4),
            Err(TransposeError::InvalidTileSize { tile: 24 })
        ));
    }
}
