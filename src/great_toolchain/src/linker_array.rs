//! Linker arrays
//!
//! A linker array is a named section holding nothing but function pointers.
//! Every object file contributes entries to it, and the linker concatenates
//! them in link order. The startup code (for `.preinit_array`, `.init_array`,
//! and `.fini_array`) and the cooperative scheduler (for `.task_array`) find
//! the array through boundary symbols exported by the link script.
//!
//! The order of entries coming from different objects is decided by the
//! linker, not by this crate.
use core::{fmt, mem, slice};

/// The type of entries in `.preinit_array` and `.init_array`.
pub type InitFn = unsafe extern "C" fn();

/// The type of entries in `.fini_array`.
pub type FiniFn = unsafe extern "C" fn();

/// The type of entries in `.task_array`.
pub type TaskFn = extern "C" fn();

/// Register a function to be called by the startup code before any
/// `.init_array` entry.
///
/// Emits a `#[used]` static named `<f>_initcall_p` in `.preinit_array`. `f`
/// must be coercible to [`InitFn`].
///
/// ```
/// unsafe extern "C" fn enable_fpu() {}
/// great_toolchain::call_on_preinit!(enable_fpu);
/// ```
#[macro_export]
macro_rules! call_on_preinit {
    ($preinit:ident) => {
        $crate::paste::paste! {
            #[cfg_attr(
                any(target_os = "macos", target_os = "ios"),
                link_section = "__DATA,__mod_init_func"
            )]
            #[cfg_attr(
                not(any(target_os = "macos", target_os = "ios")),
                link_section = ".preinit_array"
            )]
            #[used]
            #[allow(non_upper_case_globals)]
            static [<$preinit _initcall_p>]: $crate::linker_array::InitFn = $preinit;
        }
    };
}

/// Register a function to be called by the startup code before `main`.
///
/// Emits a `#[used]` static named `<f>_initcall_p` in `.init_array`. `f`
/// must be coercible to [`InitFn`].
///
/// ```
/// extern "C" fn setup_clocks() {}
/// great_toolchain::call_on_init!(setup_clocks);
/// ```
///
/// A function of any other signature is rejected:
///
/// ```rust,compile_fail,E0308
/// extern "C" fn setup_clocks(_hz: u32) {}
/// great_toolchain::call_on_init!(setup_clocks);
/// ```
#[macro_export]
macro_rules! call_on_init {
    ($init:ident) => {
        $crate::paste::paste! {
            #[cfg_attr(
                any(target_os = "macos", target_os = "ios"),
                link_section = "__DATA,__mod_init_func"
            )]
            #[cfg_attr(
                not(any(target_os = "macos", target_os = "ios")),
                link_section = ".init_array"
            )]
            #[used]
            #[allow(non_upper_case_globals)]
            static [<$init _initcall_p>]: $crate::linker_array::InitFn = $init;
        }
    };
}

/// Register a finalizer to be called before the device resets.
///
/// Emits a `#[used]` static named `<f>_finalizer_p` in `.fini_array`. `f`
/// must be coercible to [`FiniFn`].
///
/// ```
/// unsafe extern "C" fn flush_logs() {}
/// great_toolchain::call_before_reset!(flush_logs);
/// ```
#[macro_export]
macro_rules! call_before_reset {
    ($fini:ident) => {
        $crate::paste::paste! {
            #[cfg_attr(
                any(target_os = "macos", target_os = "ios"),
                link_section = "__DATA,__mod_term_func"
            )]
            #[cfg_attr(
                not(any(target_os = "macos", target_os = "ios")),
                link_section = ".fini_array"
            )]
            #[used]
            #[allow(non_upper_case_globals)]
            static [<$fini _finalizer_p>]: $crate::linker_array::FiniFn = $fini;
        }
    };
}

/// Register a task for the cooperative scheduler, which calls every entry of
/// `.task_array` once per iteration.
///
/// Emits a `#[used]` static named `<f>_implementation_p` in `.task_array`.
/// `f` must be coercible to [`TaskFn`].
///
/// ```
/// extern "C" fn heartbeat_task() {}
/// great_toolchain::define_task!(heartbeat_task);
/// ```
///
/// Tasks are safe functions; an `unsafe` one is rejected:
///
/// ```rust,compile_fail,E0308
/// unsafe extern "C" fn heartbeat_task() {}
/// great_toolchain::define_task!(heartbeat_task);
/// ```
#[macro_export]
macro_rules! define_task {
    ($task:ident) => {
        $crate::paste::paste! {
            #[cfg_attr(
                any(target_os = "macos", target_os = "ios"),
                link_section = "__DATA,__task_array"
            )]
            #[cfg_attr(
                not(any(target_os = "macos", target_os = "ios")),
                link_section = ".task_array"
            )]
            #[used]
            #[allow(non_upper_case_globals)]
            static [<$task _implementation_p>]: $crate::linker_array::TaskFn = $task;
        }
    };
}

/// Define a function returning the [`LinkerArray`] delimited by two symbols
/// exported by the link script, or the [`BoundsError`] found while validating
/// them.
///
/// ```rust,ignore
/// use great_toolchain::linker_array::{InitFn, TaskFn};
///
/// great_toolchain::linker_array! {
///     pub fn init_array() -> LinkerArray<InitFn> = __init_array_start..__init_array_end;
///     pub fn task_array() -> LinkerArray<TaskFn> = __task_array_start..__task_array_end;
/// }
/// ```
///
/// The symbols are declared as zero-length arrays of the entry type, so only
/// their addresses are ever used.
#[macro_export]
macro_rules! linker_array {
    ($(
        $( #[$meta:meta] )*
        $vis:vis fn $name:ident() -> LinkerArray<$ty:ty> = $start:ident .. $end:ident;
    )*) => {$(
        $( #[$meta] )*
        $vis fn $name() -> ::core::result::Result<
            $crate::linker_array::LinkerArray<$ty>,
            $crate::linker_array::BoundsError,
        > {
            extern "C" {
                static $start: [$ty; 0];
                static $end: [$ty; 0];
            }

            // Safety: The link script places `$start` and `$end` around a
            //         section containing nothing but `$ty`s, which stays
            //         unmodified for the rest of the program's lifetime.
            #[allow(unused_unsafe)]
            unsafe {
                $crate::linker_array::LinkerArray::from_bounds(
                    ::core::ptr::addr_of!($start).cast::<$ty>(),
                    ::core::ptr::addr_of!($end).cast::<$ty>(),
                )
            }
        }
    )*};
}

/// The error type returned by [`LinkerArray::from_bounds`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundsError {
    /// `start` or `end` is null.
    Null,
    /// `end` precedes `start`.
    Reversed,
    /// `start` or `end` is not aligned to the entry type.
    Misaligned,
    /// The distance between `start` and `end` is not a whole number of
    /// entries.
    Ragged,
}

impl BoundsError {
    /// Get the short name of the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use great_toolchain::linker_array::BoundsError;
    /// assert_eq!(BoundsError::Reversed.as_str(), "Reversed");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Reversed => "Reversed",
            Self::Misaligned => "Misaligned",
            Self::Ragged => "Ragged",
        }
    }
}

impl fmt::Debug for BoundsError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BoundsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "linker array boundary is null",
            Self::Reversed => "linker array ends before it starts",
            Self::Misaligned => "linker array boundary is misaligned",
            Self::Ragged => "linker array size is not a multiple of the entry size",
        })
    }
}

#[doc = svgbobdoc::transform!(
/// A view of a linker array: a contiguous run of `T`s with no header or
/// footer, delimited by two addresses.
///
/// <center>
///
/// ```svgbob
///   "__init_array_start"                               "__init_array_end"
///          |                                                   |
///          v                                                   v
///          +----------------+----------------+-----------------+
///          | "main.o entry" | "usb.o entry"  | "clock.o entry" |
///          +----------------+----------------+-----------------+
///          |<-- "size_of::<T>()" -->|
/// ```
///
/// </center>
)]
#[derive(Clone, Copy)]
pub struct LinkerArray<T: 'static> {
    entries: &'static [T],
}

impl<T: 'static> LinkerArray<T> {
    /// An empty linker array.
    pub const EMPTY: Self = Self { entries: &[] };

    /// Construct a `LinkerArray` from its boundary addresses.
    ///
    /// # Safety
    ///
    /// If the bounds pass validation, the memory between `start` and `end`
    /// must hold initialized `T`s that are never modified afterwards.
    pub unsafe fn from_bounds(start: *const T, end: *const T) -> Result<Self, BoundsError> {
        if start.is_null() || end.is_null() {
            return Err(BoundsError::Null);
        }

        let (start_addr, end_addr) = (start as usize, end as usize);
        if end_addr < start_addr {
            return Err(BoundsError::Reversed);
        }

        let align = mem::align_of::<T>();
        if start_addr % align != 0 || end_addr % align != 0 {
            return Err(BoundsError::Misaligned);
        }

        let size = mem::size_of::<T>();
        let len = if size == 0 {
            0
        } else {
            let byte_len = end_addr - start_addr;
            if byte_len % size != 0 {
                return Err(BoundsError::Ragged);
            }
            byte_len / size
        };

        // Safety: Upheld by the caller
        let entries = unsafe { slice::from_raw_parts(start, len) };

        Ok(Self { entries })
    }

    /// Construct a `LinkerArray` from a `'static` slice.
    pub const fn from_slice(entries: &'static [T]) -> Self {
        Self { entries }
    }

    /// Get the entries as a slice.
    #[inline]
    pub const fn as_slice(&self) -> &'static [T] {
        self.entries
    }

    /// Get the number of entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in array order.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'static, T> {
        self.entries.iter()
    }
}

impl LinkerArray<InitFn> {
    /// Call every entry in array order, the way the startup code runs
    /// `.preinit_array`, `.init_array`, and `.fini_array`.
    ///
    /// # Safety
    ///
    /// Each entry's own safety requirements must hold at this point of the
    /// boot (or reset) sequence.
    pub unsafe fn call_each(&self) {
        for (i, entry) in self.entries.iter().enumerate() {
            log::trace!("calling linker array entry {i} ({entry:p})");
            // Safety: Upheld by the caller
            unsafe { (*entry)() };
        }
    }
}

impl<T: 'static> Default for LinkerArray<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T: 'static> fmt::Debug for LinkerArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LinkerArray")
            .field("start", &self.entries.as_ptr())
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<T: 'static> IntoIterator for LinkerArray<T> {
    type Item = &'static T;
    type IntoIter = slice::Iter<'static, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
