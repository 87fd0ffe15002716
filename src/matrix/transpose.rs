use crate::error::Result;
use crate::matrix::size::ensure_power_of_two;
use crate::matrix::SquareMatrix;

/// Transpose a square matrix in place on the calling thread.
///
/// Walks every row `i` and swaps `(i, j)` with `(j, i)` for `j > i`. This
/// is the same row logic the naive strategy hands out to threads, run
/// over the whole matrix at once, and is the ground truth the parallel
/// strategies are checked against.
///
/// # Example
///
/// ```
/// use transpose_mt::{SquareMatrix, transpose_serial};
///
/// let mut m = SquareMatrix::from_rows(&[[1u32, 2], [3, 4]]).unwrap();
/// transpose_serial(&mut m).unwrap();
///
/// assert_eq!(m.as_slice(), &[1, 3, 2, 4]);
/// ```
pub fn transpose_serial(matrix: &mut SquareMatrix) -> Result<()> {
    let n = matrix.size();
    ensure_power_of_two(n)?;

    let data = matrix.as_mut_slice();
    for i in 0..n {
        for j in (i + 1)..n {
            data.swap(i * n + j, j * n + i);
        }
    }
    Ok(())
}
