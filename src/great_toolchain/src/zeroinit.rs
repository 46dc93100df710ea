use core::{cell::UnsafeCell, mem, sync::atomic};

/// Trait for types whose all-zero bit pattern is a valid value.
///
/// Statics of these types can live in a zero-filled (`NOBITS`) section such
/// as `.bss.persistent`, because the loader never has to copy an initializer
/// for them.
///
/// # Safety
///
/// Zero-initialization is not safe for all types. For example, references
/// (`&_`) and `NonNull` must never be null.
pub unsafe trait ZeroInit {}

unsafe impl<T> ZeroInit for atomic::AtomicPtr<T> {}

unsafe impl<T: ZeroInit> ZeroInit for UnsafeCell<T> {}
unsafe impl<T> ZeroInit for mem::MaybeUninit<T> {}

unsafe impl<T: ?Sized> ZeroInit for *const T {}
unsafe impl<T: ?Sized> ZeroInit for *mut T {}
unsafe impl<T: ?Sized> ZeroInit for Option<&'_ T> {}
unsafe impl<T: ?Sized> ZeroInit for Option<&'_ mut T> {}

macro_rules! impl_zero_init {
    (
        $(
            $( #[$meta:meta] )*
            $ty:ty,
        )*
    ) => {
        $(
            $( #[$meta] )*
            unsafe impl ZeroInit for $ty {}
        )*
    };
}

impl_zero_init! {
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    i8,
    i16,
    i32,
    i64,
    i128,
    usize,
    isize,
    f32,
    f64,
    #[cfg(target_has_atomic = "8")]
    atomic::AtomicBool,
    #[cfg(target_has_atomic = "8")]
    atomic::AtomicU8,
    #[cfg(target_has_atomic = "16")]
    atomic::AtomicU16,
    #[cfg(target_has_atomic = "32")]
    atomic::AtomicU32,
    #[cfg(target_has_atomic = "64")]
    atomic::AtomicU64,
    #[cfg(target_has_atomic = "ptr")]
    atomic::AtomicUsize,
    #[cfg(target_has_atomic = "8")]
    atomic::AtomicI8,
    #[cfg(target_has_atomic = "16")]
    atomic::AtomicI16,
    #[cfg(target_has_atomic = "32")]
    atomic::AtomicI32,
    #[cfg(target_has_atomic = "64")]
    atomic::AtomicI64,
    #[cfg(target_has_atomic = "ptr")]
    atomic::AtomicIsize,
    (),
}

unsafe impl<T, const LEN: usize> ZeroInit for [T; LEN] where T: ZeroInit {}

macro_rules! fn_impl_zero_init {
    ( $($t:ident,)* ) => {
        unsafe impl<Ret, $($t,)*> ZeroInit for Option<fn($($t,)*) -> Ret> {}
        unsafe impl<Ret, $($t,)*> ZeroInit for Option<unsafe fn($($t,)*) -> Ret> {}
        unsafe impl<Ret, $($t,)*> ZeroInit for Option<extern "C" fn($($t,)*) -> Ret> {}
        unsafe impl<Ret, $($t,)*> ZeroInit for Option<unsafe extern "C" fn($($t,)*) -> Ret> {}
    };
}

macro_rules! fn_impl_zero_init_all {
    ( $h:ident, $($t:ident,)* ) => {
        fn_impl_zero_init! { $h, $($t,)* }
        fn_impl_zero_init_all! { $($t,)* }
    };
    () => {
        fn_impl_zero_init! {}
    };
}

fn_impl_zero_init_all! {
    A, B, C, D, E, F,
}
