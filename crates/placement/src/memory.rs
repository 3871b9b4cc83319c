//! Classic bulk algorithms over raw pointers.
//!
//! Ranges are given as `[first, last)` pointer pairs or as `(first, n)`. The
//! destination of copy and move is a bare pointer whose length is implied by
//! the input.
//!
//! For zero-sized `T`, a `[first, last)` pair always describes an empty range;
//! use the `_n` forms instead.
//!
//! None of these functions rolls back on panic. See the
//! [crate documentation](crate#failure-semantics).

use snafu::IntoError as _;

use crate::{
    DefaultInit, ValueInit,
    cursor::{
        Counted, Sentinel as _, Unreachable, debug_assert_disjoint, for_each_slot,
        try_for_each_slot, zip_slots,
    },
    error::{ConstructError, ConstructSnafu},
    primitive::{construct_at, default_construct_at, value_construct_at},
    result::InOutResult,
};

/// Default-initializes every slot of `[first, last)`.
///
/// Trivial types keep their storage untouched; their values are indeterminate.
/// Returns `last`.
///
/// # Safety
///
/// `[first, last)` must be a valid range of raw slots within one allocation.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::memory;
///
/// let mut slots = [const { MaybeUninit::<Vec<u8>>::uninit() }; 3];
/// let first = slots.as_mut_ptr().cast::<Vec<u8>>();
/// unsafe {
///     memory::uninitialized_default_construct(first, first.add(3));
///     assert!((*first.add(2)).is_empty());
///     core::ptr::drop_in_place(core::ptr::slice_from_raw_parts_mut(first, 3));
/// }
/// ```
pub unsafe fn uninitialized_default_construct<T>(first: *mut T, last: *mut T) -> *mut T
where
    T: DefaultInit,
{
    trace!(?first, ?last, "uninitialized_default_construct");
    unsafe {
        for_each_slot(first, &last, |slot, _| {
            default_construct_at(slot);
        })
    }
}

/// Default-initializes `n` slots starting at `first`.
///
/// Returns `first + n`.
///
/// # Safety
///
/// `first` must point to `n` consecutive raw slots.
pub unsafe fn uninitialized_default_construct_n<T>(first: *mut T, n: usize) -> *mut T
where
    T: DefaultInit,
{
    trace!(?first, n, "uninitialized_default_construct_n");
    unsafe {
        for_each_slot(first, &Counted(n), |slot, _| {
            default_construct_at(slot);
        })
    }
}

/// Value-initializes every slot of `[first, last)`.
///
/// Trivial types are zeroed. Returns `last`.
///
/// # Safety
///
/// `[first, last)` must be a valid range of raw slots within one allocation.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::memory;
///
/// let mut slots = [MaybeUninit::<f64>::uninit(); 5];
/// let first = slots.as_mut_ptr().cast::<f64>();
/// unsafe {
///     memory::uninitialized_value_construct(first, first.add(5));
///     assert!(slots.iter().all(|slot| slot.assume_init() == 0.0));
/// }
/// ```
pub unsafe fn uninitialized_value_construct<T>(first: *mut T, last: *mut T) -> *mut T
where
    T: ValueInit,
{
    trace!(?first, ?last, "uninitialized_value_construct");
    unsafe {
        for_each_slot(first, &last, |slot, _| {
            value_construct_at(slot);
        })
    }
}

/// Value-initializes `n` slots starting at `first`.
///
/// Returns `first + n`.
///
/// # Safety
///
/// `first` must point to `n` consecutive raw slots.
pub unsafe fn uninitialized_value_construct_n<T>(first: *mut T, n: usize) -> *mut T
where
    T: ValueInit,
{
    trace!(?first, n, "uninitialized_value_construct_n");
    unsafe {
        for_each_slot(first, &Counted(n), |slot, _| {
            value_construct_at(slot);
        })
    }
}

/// Copies `[first, last)` into the raw slots starting at `d_first`.
///
/// Each destination slot is constructed from a clone of the matching source
/// element. Returns the end of the constructed destination range.
///
/// # Safety
///
/// `[first, last)` must be a valid range of live objects within one
/// allocation, `d_first` must point to as many raw slots, and the two ranges
/// must not overlap.
pub unsafe fn uninitialized_copy<T>(first: *const T, last: *const T, d_first: *mut T) -> *mut T
where
    T: Clone,
{
    trace!(?first, ?last, ?d_first, "uninitialized_copy");
    debug_assert_disjoint(first, last.len_from(first), d_first, None);
    let step = |src: *const T, dst: *mut T| unsafe {
        construct_at(dst, (*src).clone());
    };
    unsafe { zip_slots(first, &last, d_first, &Unreachable, step).output }
}

/// Copies `n` objects starting at `first` into the raw slots starting at
/// `d_first`.
///
/// Returns `d_first + n`.
///
/// # Safety
///
/// `first` must point to `n` live objects, `d_first` to `n` raw slots, and the
/// two ranges must not overlap.
pub unsafe fn uninitialized_copy_n<T>(first: *const T, n: usize, d_first: *mut T) -> *mut T
where
    T: Clone,
{
    trace!(?first, n, ?d_first, "uninitialized_copy_n");
    debug_assert_disjoint(first, Some(n), d_first, None);
    let step = |src: *const T, dst: *mut T| unsafe {
        construct_at(dst, (*src).clone());
    };
    unsafe { zip_slots(first, &Counted(n), d_first, &Unreachable, step).output }
}

/// Moves `[first, last)` into the raw slots starting at `d_first`.
///
/// The source slots are raw afterwards and must not be dropped. Returns the
/// end of the constructed destination range.
///
/// # Safety
///
/// Same as [`uninitialized_copy`].
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::memory;
///
/// let mut source = [Box::new(1), Box::new(2)].map(MaybeUninit::new);
/// let mut dest = [const { MaybeUninit::<Box<i32>>::uninit() }; 2];
/// let first = source.as_mut_ptr().cast::<Box<i32>>();
/// unsafe {
///     memory::uninitialized_move(first, first.add(2), dest.as_mut_ptr().cast());
///     // `source` holds raw slots now; only `dest` is dropped.
///     let [a, b] = dest.map(|slot| slot.assume_init());
///     assert_eq!((*a, *b), (1, 2));
/// }
/// ```
pub unsafe fn uninitialized_move<T>(first: *mut T, last: *mut T, d_first: *mut T) -> *mut T {
    trace!(?first, ?last, ?d_first, "uninitialized_move");
    debug_assert_disjoint(first, last.len_from(first), d_first, None);
    let step = |src: *const T, dst: *mut T| unsafe {
        construct_at(dst, src.read());
    };
    unsafe { zip_slots(first.cast_const(), &last.cast_const(), d_first, &Unreachable, step).output }
}

/// Moves `n` objects starting at `first` into the raw slots starting at
/// `d_first`.
///
/// The source slots are raw afterwards and must not be dropped. Returns the
/// positions reached in both ranges, `(first + n, d_first + n)`.
///
/// # Safety
///
/// Same as [`uninitialized_copy_n`].
pub unsafe fn uninitialized_move_n<T>(
    first: *mut T,
    n: usize,
    d_first: *mut T,
) -> InOutResult<*mut T, *mut T> {
    trace!(?first, n, ?d_first, "uninitialized_move_n");
    debug_assert_disjoint(first, Some(n), d_first, None);
    let step = |src: *const T, dst: *mut T| unsafe {
        construct_at(dst, src.read());
    };
    unsafe {
        zip_slots(first.cast_const(), &Counted(n), d_first, &Unreachable, step)
            .map_input(<*const T>::cast_mut)
    }
}

/// Fills every slot of `[first, last)` with a clone of `value`.
///
/// Returns `last`.
///
/// # Safety
///
/// `[first, last)` must be a valid range of raw slots within one allocation.
pub unsafe fn uninitialized_fill<T>(first: *mut T, last: *mut T, value: &T) -> *mut T
where
    T: Clone,
{
    trace!(?first, ?last, "uninitialized_fill");
    unsafe {
        for_each_slot(first, &last, |slot, _| {
            construct_at(slot, value.clone());
        })
    }
}

/// Fills `n` slots starting at `first` with clones of `value`.
///
/// Returns `first + n`; with `n == 0` nothing is constructed and `first` is
/// returned.
///
/// # Safety
///
/// `first` must point to `n` consecutive raw slots.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::memory;
///
/// let mut slots = [const { MaybeUninit::<String>::uninit() }; 2];
/// let first = slots.as_mut_ptr().cast::<String>();
/// unsafe {
///     assert_eq!(memory::uninitialized_fill_n(first, 0, &String::new()), first);
///
///     let end = memory::uninitialized_fill_n(first, 2, &String::from("ab"));
///     assert_eq!(end, first.add(2));
///     assert_eq!(slots.map(|slot| slot.assume_init()), ["ab", "ab"]);
/// }
/// ```
pub unsafe fn uninitialized_fill_n<T>(first: *mut T, n: usize, value: &T) -> *mut T
where
    T: Clone,
{
    trace!(?first, n, "uninitialized_fill_n");
    unsafe {
        for_each_slot(first, &Counted(n), |slot, _| {
            construct_at(slot, value.clone());
        })
    }
}

/// Constructs `f(index)` into every slot of `[first, last)`.
///
/// Returns `last`.
///
/// # Safety
///
/// `[first, last)` must be a valid range of raw slots within one allocation.
pub unsafe fn uninitialized_construct_with<T, F>(first: *mut T, last: *mut T, mut f: F) -> *mut T
where
    F: FnMut(usize) -> T,
{
    trace!(?first, ?last, "uninitialized_construct_with");
    unsafe {
        for_each_slot(first, &last, |slot, index| {
            construct_at(slot, f(index));
        })
    }
}

/// Constructs `f(index)` into `n` slots starting at `first`.
///
/// Returns `first + n`.
///
/// # Safety
///
/// `first` must point to `n` consecutive raw slots.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::memory;
///
/// let mut slots = [const { MaybeUninit::<String>::uninit() }; 3];
/// unsafe {
///     memory::uninitialized_construct_with_n(slots.as_mut_ptr().cast(), 3, |i| i.to_string());
///     assert_eq!(slots.map(|slot| slot.assume_init()), ["0", "1", "2"]);
/// }
/// ```
pub unsafe fn uninitialized_construct_with_n<T, F>(first: *mut T, n: usize, mut f: F) -> *mut T
where
    F: FnMut(usize) -> T,
{
    trace!(?first, n, "uninitialized_construct_with_n");
    unsafe {
        for_each_slot(first, &Counted(n), |slot, index| {
            construct_at(slot, f(index));
        })
    }
}

/// Constructs `f(index)` into every slot of `[first, last)`, stopping at the
/// first error.
///
/// Returns the end of the range. On error, the slots constructed so far stay
/// live and the error says how many there are.
///
/// # Safety
///
/// `[first, last)` must be a valid range of raw slots within one allocation.
#[track_caller]
pub unsafe fn try_uninitialized_construct_with<T, E, F>(
    first: *mut T,
    last: *mut T,
    mut f: F,
) -> Result<*mut T, ConstructError<E>>
where
    E: core::error::Error + 'static,
    F: FnMut(usize) -> Result<T, E>,
{
    trace!(?first, ?last, "try_uninitialized_construct_with");
    let step = |slot: *mut T, index| -> Result<(), E> {
        let value = f(index)?;
        unsafe {
            construct_at(slot, value);
        }
        Ok(())
    };
    match unsafe { try_for_each_slot(first, &last, step) } {
        Ok(end) => Ok(end),
        Err((source, constructed)) => {
            debug!(constructed, "element construction failed");
            Err(ConstructSnafu { constructed }.into_error(source))
        }
    }
}

/// Constructs `f(index)` into `n` slots starting at `first`, stopping at the
/// first error.
///
/// Returns `first + n`. On error, the slots constructed so far stay live and
/// the error says how many there are.
///
/// # Safety
///
/// `first` must point to `n` consecutive raw slots.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::memory;
///
/// let input = ["1", "2", "x", "4"];
/// let mut slots = [MaybeUninit::<u8>::uninit(); 4];
/// let first = slots.as_mut_ptr().cast::<u8>();
///
/// let err = unsafe {
///     memory::try_uninitialized_construct_with_n(first, 4, |i| input[i].parse::<u8>())
/// }
/// .unwrap_err();
/// assert_eq!(err.constructed(), 2);
/// assert_eq!(unsafe { (*first, *first.add(1)) }, (1, 2));
/// ```
#[track_caller]
pub unsafe fn try_uninitialized_construct_with_n<T, E, F>(
    first: *mut T,
    n: usize,
    mut f: F,
) -> Result<*mut T, ConstructError<E>>
where
    E: core::error::Error + 'static,
    F: FnMut(usize) -> Result<T, E>,
{
    trace!(?first, n, "try_uninitialized_construct_with_n");
    let step = |slot: *mut T, index| -> Result<(), E> {
        let value = f(index)?;
        unsafe {
            construct_at(slot, value);
        }
        Ok(())
    };
    match unsafe { try_for_each_slot(first, &Counted(n), step) } {
        Ok(end) => Ok(end),
        Err((source, constructed)) => {
            debug!(constructed, "element construction failed");
            Err(ConstructSnafu { constructed }.into_error(source))
        }
    }
}

#[cfg(test)]
mod tests {
    use core::{cell::Cell, mem::MaybeUninit};
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    thread_local! {
        static LIVE: Cell<isize> = const { Cell::new(0) };
        static CONSTRUCTED: Cell<usize> = const { Cell::new(0) };
    }

    fn live() -> isize {
        LIVE.with(Cell::get)
    }

    fn constructed() -> usize {
        CONSTRUCTED.with(Cell::get)
    }

    /// Counts constructions and destructions on the current thread.
    #[derive(Debug, PartialEq, Eq)]
    struct Tracked(u32);

    impl Tracked {
        fn new(value: u32) -> Self {
            LIVE.with(|c| c.set(c.get() + 1));
            CONSTRUCTED.with(|c| c.set(c.get() + 1));
            Self(value)
        }
    }

    impl Default for Tracked {
        fn default() -> Self {
            Self::new(0)
        }
    }

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            assert_ne!(self.0, u32::MAX, "clone of poisoned value");
            Self::new(self.0)
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            LIVE.with(|c| c.set(c.get() - 1));
        }
    }

    impl DefaultInit for Tracked {
        unsafe fn default_init(slot: *mut Self) {
            unsafe { slot.write(Self::default()) }
        }
    }

    fn uninit<T, const N: usize>() -> [MaybeUninit<T>; N] {
        [const { MaybeUninit::uninit() }; N]
    }

    unsafe fn destroy<T>(first: *mut T, n: usize) {
        unsafe { core::ptr::drop_in_place(core::ptr::slice_from_raw_parts_mut(first, n)) }
    }

    #[test]
    fn test_value_construct_five_zeros() {
        let mut slots = uninit::<i32, 5>();
        let first = slots.as_mut_ptr().cast::<i32>();
        unsafe {
            uninitialized_value_construct(first, first.add(5));
            assert_eq!(slots.map(|slot| slot.assume_init()), [0; 5]);
        }

        let mut slots = uninit::<i32, 5>();
        let first = slots.as_mut_ptr().cast::<i32>();
        unsafe {
            assert_eq!(uninitialized_value_construct_n(first, 5), first.add(5));
            assert_eq!(slots.map(|slot| slot.assume_init()), [0; 5]);
        }
    }

    #[test]
    fn test_default_construct_cycles() {
        let mut slots = uninit::<Tracked, 4>();
        let first = slots.as_mut_ptr().cast::<Tracked>();
        let before = constructed();
        for round in 1..=3 {
            unsafe {
                uninitialized_default_construct(first, first.add(4));
                assert_eq!(live(), 4);
                assert_eq!(constructed() - before, 4 * round);
                destroy(first, 4);
            }
            assert_eq!(live(), 0);
        }
        unsafe {
            assert_eq!(uninitialized_default_construct_n(first, 2), first.add(2));
            destroy(first, 2);
        }
    }

    #[test]
    fn test_copy_leaves_source_intact() {
        let source: Vec<_> = (0..4).map(Tracked::new).collect();
        let mut slots = uninit::<Tracked, 4>();
        let dest = slots.as_mut_ptr().cast::<Tracked>();
        unsafe {
            let end = uninitialized_copy(source.as_ptr(), source.as_ptr().add(4), dest);
            assert_eq!(end, dest.add(4));
            assert_eq!(live(), 8);
            assert_eq!(&*core::ptr::slice_from_raw_parts(dest, 4), &source[..]);

            destroy(dest, 4);
            assert_eq!(uninitialized_copy_n(source.as_ptr(), 2, dest), dest.add(2));
            assert_eq!((*dest.add(1)).0, 1);
            destroy(dest, 2);
        }
        drop(source);
        assert_eq!(live(), 0);
    }

    #[test]
    fn test_move_consumes_source() {
        let mut source = uninit::<Tracked, 3>();
        let mut dest = uninit::<Tracked, 3>();
        let (first, d_first) = (source.as_mut_ptr().cast::<Tracked>(), dest.as_mut_ptr().cast());
        unsafe {
            uninitialized_construct_with_n(first, 3, |i| Tracked::new(u32::try_from(i).unwrap()));
            let before = constructed();

            let result = uninitialized_move_n(first, 3, d_first);
            assert_eq!(result, InOutResult::new(first.add(3), d_first.add(3)));
            // Moves construct nothing new and destroy nothing.
            assert_eq!(constructed(), before);
            assert_eq!(live(), 3);

            // The source slots are raw again: build new objects into them.
            uninitialized_move(d_first, d_first.add(3), first);
            assert_eq!((*first.add(2)).0, 2);
            destroy(first, 3);
        }
        assert_eq!(live(), 0);
    }

    #[test]
    fn test_fill() {
        let mut slots = uninit::<Tracked, 3>();
        let first = slots.as_mut_ptr().cast::<Tracked>();
        let value = Tracked::new(7);
        unsafe {
            assert_eq!(uninitialized_fill_n(first, 0, &value), first);
            assert_eq!(live(), 1);

            uninitialized_fill(first, first.add(3), &value);
            let filled = &*core::ptr::slice_from_raw_parts(first, 3);
            assert!(filled.iter().all(|t| *t == value));
            destroy(first, 3);
        }
    }

    #[test]
    fn test_panic_during_copy_keeps_constructed() {
        let source = [Tracked::new(1), Tracked::new(2), Tracked::new(u32::MAX), Tracked::new(4)];
        let mut slots = uninit::<Tracked, 4>();
        let dest = slots.as_mut_ptr().cast::<Tracked>();

        let result = catch_unwind(AssertUnwindSafe(|| unsafe {
            uninitialized_copy(source.as_ptr(), source.as_ptr().add(4), dest);
        }));
        assert!(result.is_err());
        // Two copies were made and nobody destroyed them.
        assert_eq!(live(), 6);
        unsafe {
            assert_eq!((*dest.add(1)).0, 2);
            destroy(dest, 2);
        }
        drop(source);
        assert_eq!(live(), 0);
    }

    #[test]
    fn test_single_range_forms_return_last() {
        let mut slots = uninit::<String, 3>();
        let first = slots.as_mut_ptr().cast::<String>();
        let last = first.wrapping_add(3);
        unsafe {
            assert_eq!(uninitialized_default_construct(first, last), last);
            destroy(first, 3);
            assert_eq!(uninitialized_value_construct(first, last), last);
            destroy(first, 3);
            assert_eq!(uninitialized_fill(first, last, &String::from("f")), last);
            destroy(first, 3);
            assert_eq!(uninitialized_construct_with(first, last, |i| i.to_string()), last);
            assert_eq!(*first.add(2), "2");
            destroy(first, 3);

            assert_eq!(uninitialized_fill(first, first, &String::new()), first);
        }
    }

    #[test]
    fn test_construct_with() {
        let mut slots = uninit::<u64, 4>();
        let first = slots.as_mut_ptr().cast::<u64>();
        unsafe {
            uninitialized_construct_with(first, first.add(4), |i| 1 << i);
            assert_eq!(slots.map(|slot| slot.assume_init()), [1, 2, 4, 8]);
        }
    }

    #[test]
    fn test_try_construct_with() {
        let input = ["10", "20", "oops"];
        let mut slots = uninit::<u16, 3>();
        let first = slots.as_mut_ptr().cast::<u16>();

        let line = line!() + 2;
        let err = unsafe {
            try_uninitialized_construct_with(first, first.add(3), |i| input[i].parse::<u16>())
        }
        .unwrap_err();
        assert_eq!(err.constructed(), 2);
        assert_eq!(err.location().line(), line);
        assert!(err.location().file().ends_with("memory.rs"));

        let end = unsafe {
            try_uninitialized_construct_with_n(first, 2, |i| input[i].parse::<u16>()).unwrap()
        };
        assert_eq!(end, first.wrapping_add(2));
        unsafe {
            assert_eq!((*first, *first.add(1)), (10, 20));
        }
    }
}
