//! Bit utilities for binary-sized (power-of-two) buffers
mod clz;

pub use clz::{leading_zeros, HAS_CLZ};

/// Return the "order" (log2) of a binary-sized buffer, i.e., the index of the
/// highest set bit in `size`.
///
/// `size` must be non-zero. A non-power-of-two `size` yields
/// `floor(log2(size))`. The result for `size == 0` is unspecified (it's
/// currently `255`) and trips a debug assertion.
///
/// # Examples
///
/// ```
/// use great_toolchain::size_to_order;
/// assert_eq!(size_to_order(1), 0);
/// assert_eq!(size_to_order(1024), 10);
/// assert_eq!(size_to_order(0x8000_0000), 31);
/// ```
#[inline]
pub const fn size_to_order(size: u32) -> u8 {
    debug_assert!(size != 0, "the order of a zero size is undefined");
    31u32.wrapping_sub(leading_zeros(size)) as u8
}

/// Return `true` iff `size` is an exact power of two.
///
/// Zero is not binary-sized.
///
/// # Examples
///
/// ```
/// use great_toolchain::is_binary_sized;
/// assert!(is_binary_sized(1024));
/// assert!(!is_binary_sized(1023));
/// assert!(!is_binary_sized(1025));
/// assert!(!is_binary_sized(0));
/// ```
#[inline]
pub const fn is_binary_sized(size: u32) -> bool {
    size != 0 && size == 1u32 << size_to_order(size)
}

/// Return `Some(order)` if `size == 2^order`, `None` otherwise.
#[inline]
pub const fn checked_size_to_order(size: u32) -> Option<u8> {
    if is_binary_sized(size) {
        Some(size_to_order(size))
    } else {
        None
    }
}
