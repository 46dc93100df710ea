//! Generic helpers
use core::ops;

/// Get the number of elements in a fixed-size array.
///
/// Unlike `sizeof(arr) / sizeof(arr[0])`, this rejects pointers and slices at
/// compile time instead of silently returning a bogus count.
///
/// ```
/// use great_toolchain::util::array_size;
/// static DESCRIPTORS: [u8; 18] = [0; 18];
/// const LEN: usize = array_size(&DESCRIPTORS);
/// assert_eq!(LEN, 18);
/// ```
///
/// ```rust,compile_fail,E0308
/// use great_toolchain::util::array_size;
/// let buffer: &[u8] = &[0; 18];
/// array_size(buffer);
/// ```
#[inline]
pub const fn array_size<T, const N: usize>(_: &[T; N]) -> usize {
    N
}

/// Get the number of elements in a fixed-size array expression. See
/// [`array_size`](fn@crate::util::array_size).
#[macro_export]
macro_rules! array_size {
    ($arr:expr $(,)?) => {
        $crate::util::array_size(&$arr)
    };
}

/// Get the smaller of two values, evaluating each operand exactly once. If
/// they compare equal, `$b` is returned.
///
/// This can be used in constant contexts for primitive types.
///
/// ```
/// use great_toolchain::min;
/// const BUFFER_SIZE: usize = min!(512, 1 << 8);
/// assert_eq!(BUFFER_SIZE, 256);
/// ```
#[macro_export]
macro_rules! min {
    ($a:expr, $b:expr $(,)?) => {
        match ($a, $b) {
            (a, b) => {
                if a < b {
                    a
                } else {
                    b
                }
            }
        }
    };
}

/// A member's record of which element of a container owns it.
///
/// This replaces `CONTAINER_OF`-style pointer arithmetic: instead of
/// subtracting a field offset from the member's address, the member stores the
/// owner's index in an [indexable container](ops::Index), and
/// [`container_of`] looks the owner up.
///
/// ```
/// use great_toolchain::util::{container_of, BackRef, Member};
///
/// struct TransferDescriptor {
///     owner: BackRef<usize>,
///     length: u16,
/// }
///
/// impl Member<usize> for TransferDescriptor {
///     fn back_ref(&self) -> &BackRef<usize> {
///         &self.owner
///     }
/// }
///
/// struct Endpoint {
///     address: u8,
///     td: TransferDescriptor,
/// }
///
/// let endpoints = [0, 1].map(|i| Endpoint {
///     address: 0x80 | i as u8,
///     td: TransferDescriptor { owner: BackRef::new(i), length: 64 },
/// });
///
/// let td = &endpoints[1].td;
/// assert_eq!(container_of(&endpoints, td).address, 0x81);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackRef<I> {
    owner: I,
}

impl<I> BackRef<I> {
    #[inline]
    pub const fn new(owner: I) -> Self {
        Self { owner }
    }

    /// Get the index of the owner.
    #[inline]
    pub const fn owner(&self) -> &I {
        &self.owner
    }

    /// Point this member at a different owner, e.g., after moving it.
    #[inline]
    pub fn set_owner(&mut self, owner: I) {
        self.owner = owner;
    }
}

/// Types embedded in a container element and able to name their owner.
pub trait Member<I> {
    fn back_ref(&self) -> &BackRef<I>;
}

impl<I> Member<I> for BackRef<I> {
    #[inline]
    fn back_ref(&self) -> &BackRef<I> {
        self
    }
}

/// Get the element of `container` that owns `member`.
///
/// Panics if the recorded index is out of the container's bounds, the same
/// way indexing does.
#[inline]
pub fn container_of<'a, C, I, M>(container: &'a C, member: &M) -> &'a C::Output
where
    C: ops::Index<I> + ?Sized,
    I: Clone,
    M: Member<I> + ?Sized,
{
    &container[member.back_ref().owner().clone()]
}

/// Get the element of `container` that owns the member identified by
/// `back_ref`, mutably.
///
/// This takes the [`BackRef`] by value because the member itself is usually
/// borrowed from `container`.
#[inline]
pub fn container_of_mut<C, I>(container: &mut C, back_ref: BackRef<I>) -> &mut C::Output
where
    C: ops::IndexMut<I> + ?Sized,
{
    &mut container[back_ref.owner]
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn array_size_fn() {
        let table = [0u16; 7];
        assert_eq!(array_size(&table), 7);
        assert_eq!(array_size!(table), 7);
        assert_eq!(array_size!([(); 0]), 0);
    }

    #[test]
    fn min_picks_smaller() {
        assert_eq!(min!(3, 5), 3);
        assert_eq!(min!(5, 3), 3);
        assert_eq!(min!(-1i32, 1), -1);
        assert_eq!(min!(1.5, 0.5), 0.5);
    }

    #[test]
    fn min_picks_second_on_tie() {
        let (a, b) = (7u8, 7u8);
        assert!(core::ptr::eq(min!(&a, &b), &b));
    }

    #[test]
    fn min_evaluates_each_operand_once() {
        let a_calls = Cell::new(0);
        let b_calls = Cell::new(0);
        let a = || {
            a_calls.set(a_calls.get() + 1);
            10
        };
        let b = || {
            b_calls.set(b_calls.get() + 1);
            20
        };

        assert_eq!(min!(a(), b()), 10);
        assert_eq!((a_calls.get(), b_calls.get()), (1, 1));

        assert_eq!(min!(b(), a()), 10);
        assert_eq!((a_calls.get(), b_calls.get()), (2, 2));
    }

    #[test]
    fn min_in_const() {
        const X: u32 = min!(1024, 4096);
        assert_eq!(X, 1024);
    }

    struct Slot {
        id: u32,
        link: BackRef<usize>,
    }

    #[test]
    fn container_of_finds_owner() {
        let slots: Vec<Slot> = (0..4)
            .map(|i| Slot {
                id: 100 + i as u32,
                link: BackRef::new(i),
            })
            .collect();

        for slot in &slots {
            assert_eq!(container_of(&slots[..], &slot.link).id, slot.id);
        }
    }

    #[test]
    fn container_of_mut_updates_owner() {
        let mut slots = [
            Slot {
                id: 0,
                link: BackRef::new(0),
            },
            Slot {
                id: 1,
                link: BackRef::new(1),
            },
        ];

        let link = slots[1].link;
        container_of_mut(&mut slots, link).id = 42;
        assert_eq!(slots[1].id, 42);
        assert_eq!(slots[0].id, 0);
    }

    #[test]
    #[should_panic]
    fn container_of_out_of_bounds() {
        let slots: [Slot; 0] = [];
        let stray = BackRef::new(3usize);
        let _ = container_of(&slots, &stray);
    }
}
