//! Row-major N×N matrix of `u32` values.

use std::fmt;

use rand::Rng;

use crate::error::{Result, TransposeError};

/// An N×N matrix stored row-major in a single buffer.
///
/// The dimension is fixed at construction. Every accessor is bounds-checked
/// and reports [`TransposeError::IndexOutOfRange`] instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareMatrix {
    data: Vec<u32>,
    size: usize,
}

impl SquareMatrix {
    /// Zero-filled N×N matrix.
    pub fn new(size: usize) -> Result<Self> {
        let len = element_count(size)?;
        Ok(Self {
            data: vec![0; len],
            size,
        })
    }

    /// Wraps an existing row-major buffer of exactly `size * size` values.
    pub fn from_vec(size: usize, data: Vec<u32>) -> Result<Self> {
        let len = element_count(size)?;
        if data.len() != len {
            return Err(TransposeError::DimensionMismatch {
                expected: len,
                found: data.len(),
            });
        }
        Ok(Self { data, size })
    }

    /// Builds a matrix from a list of rows. Every row must be as long as
    /// there are rows.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(element_count(size)?);
        for row in rows {
            let row = row.as_ref();
            if row.len() != size {
                return Err(TransposeError::DimensionMismatch {
                    expected: size,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(size, data)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Result<u32> {
        let idx = self.index(row, col)?;
        Ok(self.data[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, value: u32) -> Result<()> {
        let idx = self.index(row, col)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Exchanges the values at two positions.
    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) -> Result<()> {
        let ia = self.index(a.0, a.1)?;
        let ib = self.index(b.0, b.1)?;
        self.data.swap(ia, ib);
        Ok(())
    }

    pub fn row(&self, row: usize) -> Result<&[u32]> {
        if row >= self.size {
            return Err(TransposeError::IndexOutOfRange {
                row,
                col: 0,
                size: self.size,
            });
        }
        let start = row * self.size;
        Ok(&self.data[start..start + self.size])
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Fills the matrix with values in `0..N` from the thread-local RNG.
    pub fn randomize_values(&mut self) {
        self.randomize_with(&mut rand::thread_rng());
    }

    /// Same as [`randomize_values`](Self::randomize_values) with a caller
    /// supplied RNG, so tests can seed it.
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let bound = u32::try_from(self.size).unwrap_or(u32::MAX);
        for value in &mut self.data {
            *value = rng.gen_range(0..bound);
        }
    }

    /// First position (in row order) where the two matrices differ.
    ///
    /// Returns `Ok(None)` if they are identical and `DimensionMismatch` if
    /// they aren't the same size.
    pub fn first_mismatch(&self, other: &Self) -> Result<Option<(usize, usize)>> {
        if self.size != other.size {
            return Err(TransposeError::DimensionMismatch {
                expected: self.size,
                found: other.size,
            });
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .position(|(a, b)| a != b)
            .map(|idx| (idx / self.size, idx % self.size)))
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.size || col >= self.size {
            return Err(TransposeError::IndexOutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        Ok(row * self.size + col)
    }
}

/// `size * size`, rejecting zero and sizes whose square overflows.
fn element_count(size: usize) -> Result<usize> {
    match size.checked_mul(size) {
        Some(len) if len > 0 => Ok(len),
        _ => Err(TransposeError::InvalidDimension { size }),
    }
}

impl fmt::Display for SquareMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}x{}", self.size, self.size)?;
        for row in self.data.chunks_exact(self.size) {
            let mut values = row.iter();
            if let Some(first) = values.next() {
                write!(f, "{}", first)?;
            }
            for value in values {
                write!(f, "\t{}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_rejects_zero() {
        assert!(matches!(
            SquareMatrix::new(0),
            Err(TransposeError::InvalidDimension { size: 0 })
        ));
    }

    #[test]
    fn test_new_rejects_overflowing_size() {
        let size = 1usize << (usize::BITS / 2 + 1);
        assert!(matches!(
            SquareMatrix::new(size),
            Err(TransposeError::InvalidDimension { size: s }) if s == size
        ));
        assert!(matches!(
            SquareMatrix::from_vec(size, vec![0; 4]),
            Err(TransposeError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_get_set() {
        let mut m = SquareMatrix::new(4).unwrap();
        m.set(1, 3, 42).unwrap();
        assert_eq!(m.get(1, 3).unwrap(), 42);
        assert_eq!(m.get(3, 1).unwrap(), 0);
        assert_eq!(m.as_slice()[7], 42);
    }

    #[test]
    fn test_out_of_range() {
        let mut m = SquareMatrix::new(4).unwrap();
        assert!(matches!(
            m.get(4, 0),
            Err(TransposeError::IndexOutOfRange { row: 4, col: 0, size: 4 })
        ));
        assert!(matches!(
            m.set(0, 7, 1),
            Err(TransposeError::IndexOutOfRange { row: 0, col: 7, size: 4 })
        ));
        assert!(m.swap((0, 0), (0, 4)).is_err());
        assert!(m.row(4).is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows: Vec<Vec<u32>> = vec![vec![1, 2], vec![3]];
        assert!(matches!(
            SquareMatrix::from_rows(&rows),
            Err(TransposeError::DimensionMismatch { expected: 2, found: 1 })
        ));
        assert!(SquareMatrix::from_vec(3, vec![0; 8]).is_err());
    }

    #[test]
    fn test_randomize_bounded_by_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut m = SquareMatrix::new(16).unwrap();
        m.randomize_with(&mut rng);
        assert!(m.as_slice().iter().all(|&v| v < 16));
        // 256 draws from 0..16 can't all be zero with this seed
        assert!(m.as_slice().iter().any(|&v| v != 0));
    }

    #[test]
    fn test_first_mismatch() {
        let a = SquareMatrix::from_rows(&[[1u32, 2], [3, 4]]).unwrap();
        let mut b = a.clone();
        assert_eq!(a.first_mismatch(&b).unwrap(), None);
        b.set(1, 0, 9).unwrap();
        assert_eq!(a.first_mismatch(&b).unwrap(), Some((1, 0)));

        let c = SquareMatrix::new(4).unwrap();
        assert!(a.first_mismatch(&c).is_err());
    }

    #[test]
    fn test_display() {
        let m = SquareMatrix::from_rows(&[[1u32, 2], [3, 4]]).unwrap();
        assert_eq!(m.to_string(), "2x2\n1\t2\n3\t4\n");
    }
}
