#![deny(unsafe_op_in_unsafe_fn)]
#![doc = include_str!("./lib.md")]
#![cfg_attr(not(test), no_std)] // Link `std` only when building a test (`cfg(test)`)

// `assert_offset!` and friends require `offset_of!`.
#[doc(hidden)]
pub extern crate memoffset;

// The registration macros require `paste!` to derive symbol names.
#[doc(hidden)]
pub extern crate paste;

#[macro_use]
pub mod linker_array;
#[macro_use]
pub mod layout;
#[macro_use]
pub mod util;
#[macro_use]
pub mod attr;
pub mod bits;
mod zeroinit;

pub use bits::{checked_size_to_order, is_binary_sized, size_to_order};
pub use zeroinit::*;

/// The prelude module.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{
        attr::{Aligned, Persistent, WordAligned},
        bits::{is_binary_sized, size_to_order},
        layout::{Reserved, ReservedWords},
        linker_array::{FiniFn, InitFn, LinkerArray, TaskFn},
        util::{array_size, container_of, BackRef},
        ZeroInit,
    };
}
