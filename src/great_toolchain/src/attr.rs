//! Attribute conventions
//!
//! Firmware code written against `toolchain.h` uses a fixed vocabulary of
//! compiler attributes. Most of them are part of the Rust language itself;
//! this module provides the few that need a type or a macro.
//!
//! | Attribute | Rust |
//! |---|---|
//! | packed | `#[repr(C, packed)]` |
//! | aligned(N) | `#[repr(align(N))]`, or [`Aligned`]`<T, N>` for an existing type |
//! | packed + aligned(4) | a `#[repr(C, packed)]` type wrapped in [`WordAligned`] |
//! | section(name) | `#[link_section = "name"]` |
//! | persistent | [`persistent!`](crate::persistent!) (`.bss.persistent`) |
//! | used | `#[used]` |
//! | noreturn | a `-> !` return type |
//! | printf format check | `format_args!` and friends are always checked |
//! | weak | *no stable equivalent* |
//! | naked | *no stable equivalent* on the supported compiler versions |
//!
//! There's no stable way to emit a weak definition. Overridable hooks are
//! expressed as trait methods with a default body or as an `Option<fn()>`
//! configured at build time.
//!
//! Naked functions are not wrapped here. Code that needs full control over
//! the prologue should be written in `global_asm!`.
use core::{cell::UnsafeCell, fmt, mem, ops};

use elain::{Align, Alignment};

use crate::ZeroInit;

/// Wraps `T` so that its alignment is at least `N` bytes.
///
/// The size is rounded up to a multiple of the resulting alignment, as with
/// `__attribute__((aligned(N)))`.
///
/// ```
/// use great_toolchain::attr::Aligned;
/// let buffer = Aligned::<[u8; 64], 32>::new([0; 64]);
/// assert_eq!(buffer.as_ptr() as usize % 32, 0);
/// ```
#[repr(C)]
pub struct Aligned<T, const N: usize>
where
    Align<N>: Alignment,
{
    _align: Align<N>,
    value: T,
}

/// Wraps a `#[repr(C, packed)]` type so that it's 4-byte aligned without
/// introducing any padding between its fields.
///
/// ```
/// use great_toolchain::attr::WordAligned;
/// use core::mem::{align_of, size_of};
///
/// #[repr(C, packed)]
/// struct SetupPacket {
///     request_type: u8,
///     request: u8,
///     value: u16,
///     index: u16,
///     length: u16,
/// }
///
/// assert_eq!(size_of::<WordAligned<SetupPacket>>(), 8);
/// assert_eq!(align_of::<WordAligned<SetupPacket>>(), 4);
/// ```
pub type WordAligned<T> = Aligned<T, 4>;

impl<T, const N: usize> Aligned<T, N>
where
    Align<N>: Alignment,
{
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            _align: Align::NEW,
            value,
        }
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, const N: usize> ops::Deref for Aligned<T, N>
where
    Align<N>: Alignment,
{
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T, const N: usize> ops::DerefMut for Aligned<T, N>
where
    Align<N>: Alignment,
{
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<T: Clone, const N: usize> Clone for Aligned<T, N>
where
    Align<N>: Alignment,
{
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T: Copy, const N: usize> Copy for Aligned<T, N> where Align<N>: Alignment {}

impl<T: Default, const N: usize> Default for Aligned<T, N>
where
    Align<N>: Alignment,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Aligned<T, N>
where
    Align<N>: Alignment,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Aligned").field(&self.value).finish()
    }
}

unsafe impl<T: ZeroInit, const N: usize> ZeroInit for Aligned<T, N> where Align<N>: Alignment {}

/// Storage that survives a warm reset.
///
/// Declare these with [`persistent!`](crate::persistent!), which places them in
/// `.bss.persistent`. The startup code doesn't zero that section, so the
/// content is all-zero only after a cold boot and holds whatever was written
/// last after a warm reset.
#[repr(transparent)]
pub struct Persistent<T: ZeroInit>(UnsafeCell<T>);

// Safety: Every access goes through `unsafe` methods whose callers guarantee
// exclusion
unsafe impl<T: ZeroInit + Send> Sync for Persistent<T> {}

impl<T: ZeroInit> Persistent<T> {
    /// Construct a `Persistent` filled with zero bytes.
    pub const fn zeroed() -> Self {
        // Safety: `T: ZeroInit`
        Self(UnsafeCell::new(unsafe { mem::zeroed() }))
    }

    /// Get a raw pointer to the content.
    #[inline]
    pub const fn as_ptr(&self) -> *mut T {
        self.0.get()
    }

    /// Read the content.
    ///
    /// # Safety
    ///
    /// There must be no concurrent writes, and a value previously stored in
    /// this cell must be valid for the current firmware image (the layout of
    /// `T` may have changed since the last reset).
    #[inline]
    pub unsafe fn read(&self) -> T
    where
        T: Copy,
    {
        // Safety: Upheld by the caller
        unsafe { self.as_ptr().read_volatile() }
    }

    /// Overwrite the content.
    ///
    /// # Safety
    ///
    /// There must be no concurrent reads or writes.
    #[inline]
    pub unsafe fn write(&self, value: T) {
        // Safety: Upheld by the caller
        unsafe { self.as_ptr().write_volatile(value) }
    }
}

impl<T: ZeroInit> fmt::Debug for Persistent<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Persistent").field(&self.as_ptr()).finish()
    }
}

/// Define statics that persist across a reset.
///
/// ```
/// use core::sync::atomic::{AtomicU32, Ordering};
///
/// great_toolchain::persistent! {
///     /// Incremented by the bootloader on every warm reset.
///     static RESET_COUNT: AtomicU32;
/// }
///
/// // Safety: nothing else accesses `RESET_COUNT` concurrently
/// unsafe {
///     let count = &*RESET_COUNT.as_ptr();
///     count.fetch_add(1, Ordering::Relaxed);
/// }
/// ```
#[macro_export]
macro_rules! persistent {
    ($(
        $( #[$meta:meta] )*
        $vis:vis static $name:ident: $ty:ty;
    )*) => {$(
        $( #[$meta] )*
        #[cfg_attr(
            any(target_os = "macos", target_os = "ios"),
            link_section = "__DATA,__bss_persist"
        )]
        #[cfg_attr(
            not(any(target_os = "macos", target_os = "ios")),
            link_section = ".bss.persistent"
        )]
        $vis static $name: $crate::attr::Persistent<$ty> = $crate::attr::Persistent::zeroed();
    )*};
}
