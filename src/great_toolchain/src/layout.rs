//! Compile-time layout checks and helpers for hardware register blocks
use core::fmt;

use crate::ZeroInit;

/// Assert at compile time that `$member` is located at byte offset `$offset`
/// within `$structure`.
///
/// ```
/// use great_toolchain::{assert_offset, layout::ReservedWords};
///
/// #[repr(C)]
/// struct GpioRegs {
///     dir: u32,
///     _reserved: ReservedWords<31>,
///     mask: u32,
/// }
///
/// assert_offset!(GpioRegs, dir, 0);
/// assert_offset!(GpioRegs, mask, 0x80);
/// ```
///
/// A mismatch fails the build:
///
/// ```rust,compile_fail,E0080
/// #[repr(C)]
/// struct GpioRegs {
///     dir: u32,
///     mask: u32,
/// }
///
/// great_toolchain::assert_offset!(GpioRegs, mask, 0x80);
/// ```
#[macro_export]
macro_rules! assert_offset {
    ($structure:path, $member:tt, $offset:expr $(,)?) => {
        const _: () = ::core::assert!(
            $crate::memoffset::offset_of!($structure, $member) == $offset,
            ::core::concat!(
                ::core::stringify!($member),
                " is not at offset ",
                ::core::stringify!($offset),
                " in struct ",
                ::core::stringify!($structure),
            ),
        );
    };
}

/// Assert at compile time that `$structure` is exactly `$size` bytes large.
///
/// ```rust,compile_fail,E0080
/// great_toolchain::assert_size!(u32, 8);
/// ```
#[macro_export]
macro_rules! assert_size {
    ($structure:ty, $size:expr $(,)?) => {
        const _: () = ::core::assert!(
            ::core::mem::size_of::<$structure>() == $size,
            ::core::concat!(
                "struct ",
                ::core::stringify!($structure),
                " is not ",
                ::core::stringify!($size),
                " bytes large",
            ),
        );
    };
}

/// Fail the build with the actual offset of `$member` in the error message.
///
/// This is only a debugging aid for a failing [`assert_offset!`]. It *never*
/// compiles, so don't leave it in the source tree.
///
/// ```rust,compile_fail,E0308
/// #[repr(C)]
/// struct GpioRegs {
///     dir: u32,
///     mask: u32,
/// }
///
/// // error[E0308]: mismatched types
/// //   expected `()`, found `[(); 4]`
/// great_toolchain::error_message_with_offset!(GpioRegs, mask);
/// ```
#[macro_export]
macro_rules! error_message_with_offset {
    ($structure:path, $member:tt $(,)?) => {
        const _: () = [(); $crate::memoffset::offset_of!($structure, $member)];
    };
}

/// Reserved bytes in a register block (`uint8_t reserved[N]`).
///
/// There are no accessors; the field only occupies space.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Reserved<const N: usize>([u8; N]);

/// Reserved 32-bit words in a register block (`uint32_t reserved[N]`).
///
/// There are no accessors; the field only occupies space.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct ReservedWords<const N: usize>([u32; N]);

impl<const N: usize> Reserved<N> {
    pub const fn new() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> ReservedWords<N> {
    pub const fn new() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> Default for Reserved<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Default for ReservedWords<N> {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl<const N: usize> ZeroInit for Reserved<N> {}
unsafe impl<const N: usize> ZeroInit for ReservedWords<N> {}

impl<const N: usize> fmt::Debug for Reserved<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Reserved<{N}>")
    }
}

impl<const N: usize> fmt::Debug for ReservedWords<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ReservedWords<{N}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{align_of, size_of};

    /// Loosely modeled after the LPC43xx USB controller.
    #[allow(dead_code)]
    #[repr(C)]
    struct UsbRegs {
        id: u32,
        hwgeneral: u32,
        hwhost: u32,
        hwdevice: u32,
        _reserved0: ReservedWords<60>,
        usbcmd: u32,
        usbsts: u32,
        _reserved1: Reserved<3>,
        portsc1_low: u8,
        portsc1: u32,
    }

    assert_offset!(UsbRegs, id, 0x000);
    assert_offset!(UsbRegs, hwdevice, 0x00c);
    assert_offset!(UsbRegs, usbcmd, 0x100);
    assert_offset!(UsbRegs, usbsts, 0x104);
    assert_offset!(UsbRegs, portsc1_low, 0x10b);
    assert_offset!(UsbRegs, portsc1, 0x10c);
    assert_size!(UsbRegs, 0x110);

    #[allow(dead_code)]
    #[repr(C, packed)]
    struct Header {
        kind: u8,
        length: u32,
        flags: u8,
    }

    assert_offset!(Header, length, 1);
    assert_offset!(Header, flags, 5);
    assert_size!(Header, 6);

    #[allow(dead_code)]
    #[repr(C)]
    struct Pair(u16, u16);
    assert_offset!(Pair, 1, 2);

    #[test]
    fn reserved_layout() {
        assert_eq!(size_of::<Reserved<3>>(), 3);
        assert_eq!(align_of::<Reserved<3>>(), 1);
        assert_eq!(size_of::<ReservedWords<60>>(), 240);
        assert_eq!(align_of::<ReservedWords<60>>(), align_of::<u32>());
        assert_eq!(size_of::<Reserved<0>>(), 0);
    }

    #[test]
    fn reserved_debug() {
        assert_eq!(format!("{:?}", Reserved::<3>::new()), "Reserved<3>");
        assert_eq!(format!("{:?}", ReservedWords::<60>::default()), "ReservedWords<60>");
    }
}
