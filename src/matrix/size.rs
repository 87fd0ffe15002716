use crate::error::{Result, TransposeError};

/// Returns true if `n` is a power of two (1, 2, 4, 8, ...).
///
/// Zero is not a power of two.
///
/// ```
/// use transpose_mt::is_power_of_two;
///
/// assert!(is_power_of_two(1));
/// assert!(is_power_of_two(1024));
/// assert!(!is_power_of_two(0));
/// assert!(!is_power_of_two(100));
/// ```
pub const fn is_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Rejects any dimension the partitioners can't split cleanly.
pub(crate) fn ensure_power_of_two(n: usize) -> Result<()> {
    if is_power_of_two(n) {
        Ok(())
    } else {
        Err(TransposeError::InvalidDimension { size: n })
    }
}
