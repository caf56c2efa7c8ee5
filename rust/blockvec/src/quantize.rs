//! Capacity quantization: the single rounding rule used for every capacity
//! computation in this crate.

/// Rounds `n` up to the nearest multiple of `block`.
///
/// Computes `((n / block) + (n % block != 0)) * block`. Unlike the power-of-two
/// alignment helpers, `block` may be any non-zero value.
///
/// # Returns
///
/// The smallest multiple of `block` that is greater than or equal to `n`, or `None`
/// if that multiple does not fit in `usize`.
///
/// # Examples
///
/// ```
/// use blockvec::quantize::quantize;
///
/// assert_eq!(quantize(0, 16), Some(0));
/// assert_eq!(quantize(1, 16), Some(16));
/// assert_eq!(quantize(16, 16), Some(16));
/// assert_eq!(quantize(17, 16), Some(32));
/// assert_eq!(quantize(7, 3), Some(9));
/// assert_eq!(quantize(usize::MAX, 16), None);
/// ```
///
/// # Panics
///
/// This function will panic in debug builds if `block` is 0.
#[inline]
pub fn quantize(n: usize, block: usize) -> Option<usize> {
    debug_assert_ne!(block, 0);
    let blocks = n / block + usize::from(n % block != 0);
    blocks.checked_mul(block)
}

/// Returns the minimum capacity (in elements) for a vector holding `len` elements.
///
/// This is [`quantize`] with the special case that an empty vector still keeps
/// exactly one block: `min_capacity(0, block) == Some(block)`.
///
/// # Examples
///
/// ```
/// use blockvec::quantize::min_capacity;
///
/// assert_eq!(min_capacity(0, 16), Some(16));
/// assert_eq!(min_capacity(5, 16), Some(16));
/// assert_eq!(min_capacity(33, 16), Some(48));
/// ```
#[inline]
pub fn min_capacity(len: usize, block: usize) -> Option<usize> {
    if len == 0 {
        Some(block)
    } else {
        quantize(len, block)
    }
}

/// Number of whole blocks covered by `capacity`.
#[inline]
pub fn block_count(capacity: usize, block: usize) -> usize {
    debug_assert_ne!(block, 0);
    capacity / block
}
