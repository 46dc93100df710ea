//! Count leading zeros
#![allow(clippy::if_same_then_else)]

/// Indicates whether the target has a count-leading-zeros instruction.
pub const HAS_CLZ: bool = if cfg!(target_arch = "riscv32") || cfg!(target_arch = "riscv64") {
    cfg!(target_feature = "zbb")
} else if cfg!(target_arch = "arm") {
    // Thumb-2
    cfg!(target_feature = "v6t2")
        // Armv5T and later, only in Arm mode
        || (cfg!(target_feature = "v5te") && !cfg!(target_feature = "thumb-mode"))
} else if cfg!(target_arch = "msp430") {
    false
} else if cfg!(target_arch = "avr") {
    false
} else {
    // AArch64: All
    // x86: 80386 and later (`bsr`)
    true
};

/// Return the number of leading zeros in `x`. Returns `32` if `x` is zero.
///
/// On targets without [a hardware instruction](HAS_CLZ), this avoids the
/// compiler's generic expansion, which loads several 32-bit constants and
/// is slow on Armv6-M.
#[inline]
pub const fn leading_zeros(x: u32) -> u32 {
    if HAS_CLZ {
        x.leading_zeros()
    } else {
        clz_bsearch(x)
    }
}

/// Implements [`leading_zeros`] using binary search. The last level is
/// handled by [`clz2_lut`].
#[inline]
const fn clz_bsearch(mut x: u32) -> u32 {
    if x == 0 {
        return 32;
    }

    let mut i = 0;

    if x & 0xffff_0000 == 0 {
        x <<= 16;
        i += 16;
    }
    if x & 0xff00_0000 == 0 {
        x <<= 8;
        i += 8;
    }
    if x & 0xf000_0000 == 0 {
        x <<= 4;
        i += 4;
    }
    if x & 0xc000_0000 == 0 {
        x <<= 2;
        i += 2;
    }

    i + clz2_lut(x >> 30)
}

/// Implements [`leading_zeros`] for a 2-bit value using a look-up table.
/// `x` must be in range `1..4`.
#[inline]
const fn clz2_lut(x: u32) -> u32 {
    debug_assert!(x != 0 && x < 4);
    //  3  2  1
    (0b00_00_01_00 >> (x * 2)) & 0b11
}
