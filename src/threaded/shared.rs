use std::marker::PhantomData;

use crate::error::{Result, TransposeError};

/// A view of the matrix buffer that every worker can hold at once.
///
/// The only write it allows is the transposing swap of `(i, j)` with
/// `(j, i)`. Workers are handed disjoint sets of pairs, so no two threads
/// ever touch the same element.
pub(crate) struct SharedBuffer<'a> {
    ptr: *mut u32,
    size: usize,
    _buffer: PhantomData<&'a mut [u32]>,
}

// SAFETY: the buffer outlives the view (`'a`), and the executor only
// hands out pair sets that come from one `Partition`, which are disjoint.
unsafe impl Send for SharedBuffer<'_> {}
unsafe impl Sync for SharedBuffer<'_> {}

impl<'a> SharedBuffer<'a> {
    pub(crate) fn new(data: &'a mut [u32], size: usize) -> Self {
        debug_assert_eq!(data.len(), size * size);
        Self {
            ptr: data.as_mut_ptr(),
            size,
            _buffer: PhantomData,
        }
    }

    /// Exchange `(i, j)` and `(j, i)`.
    pub(crate) fn swap_transposed(&self, i: usize, j: usize) -> Result<()> {
        let n = self.size;
        if i >= n || j >= n {
            return Err(TransposeError::IndexOutOfRange {
                row: i,
                col: j,
                size: n,
            });
        }
        // SAFETY: both offsets are < n*n, and the pair is owned by exactly
        // one worker for the duration of the parallel region.
        unsafe {
            std::ptr::swap(self.ptr.add(i * n + j), self.ptr.add(j * n + i));
        }
        Ok(())
    }
}
