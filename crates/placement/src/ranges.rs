//! Range-based bulk algorithms.
//!
//! Ranges are anything implementing [`SlotRange`]: a [`RawRange`], a
//! `&mut [MaybeUninit<T>]`, or a `(first, sentinel)` pair. Copy and move take
//! both an input and an output range and stop at whichever ends first; the
//! returned [`InOutResult`] says how far each side got.
//!
//! [`RawRange`]: crate::RawRange

use crate::{
    DefaultInit, ValueInit,
    cursor::{Counted, Sentinel, SlotRange, debug_assert_disjoint, for_each_slot, zip_slots},
    primitive::{construct_at, default_construct_at, value_construct_at},
    result::InOutResult,
};

/// Checks that the part of both runs a copy or move would walk is disjoint.
fn debug_assert_walk_disjoint<T, IS, OS>(ifirst: *mut T, ilast: &IS, ofirst: *mut T, olast: &OS)
where
    IS: Sentinel<T>,
    OS: Sentinel<T>,
{
    let walked = match (ilast.len_from(ifirst), olast.len_from(ofirst)) {
        (Some(input), Some(output)) => Some(input.min(output)),
        (input, output) => input.or(output),
    };
    debug_assert_disjoint(ifirst, walked, ofirst, walked);
}

/// Default-initializes every slot of `range`.
///
/// Returns the end of the range.
///
/// # Safety
///
/// `range` must describe raw slots valid for writes.
pub unsafe fn uninitialized_default_construct<T, R>(range: R) -> *mut T
where
    T: DefaultInit,
    R: SlotRange<T>,
{
    let (first, last) = range.into_bounds();
    trace!(?first, "ranges::uninitialized_default_construct");
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
    unsafe { uninitialized_default_construct((first, Counted(n))) }
}

/// Value-initializes every slot of `range`.
///
/// Returns the end of the range.
///
/// # Safety
///
/// `range` must describe raw slots valid for writes.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::{RawRange, ranges};
///
/// let mut slots = [MaybeUninit::<u16>::uninit(); 5];
/// let range = RawRange::from_uninit_slice(&mut slots);
/// let end = unsafe { ranges::uninitialized_value_construct(range) };
/// assert_eq!(end, range.last());
/// assert_eq!(slots.map(|slot| unsafe { slot.assume_init() }), [0; 5]);
/// ```
pub unsafe fn uninitialized_value_construct<T, R>(range: R) -> *mut T
where
    T: ValueInit,
    R: SlotRange<T>,
{
    let (first, last) = range.into_bounds();
    trace!(?first, "ranges::uninitialized_value_construct");
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
    unsafe { uninitialized_value_construct((first, Counted(n))) }
}

/// Copies from `input` into `output`, stopping at whichever range ends first.
///
/// Returns the positions reached in both ranges.
///
/// # Safety
///
/// `input` must describe live objects, `output` raw slots valid for writes,
/// and the two must not overlap.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::{RawRange, ranges};
///
/// let source = [String::from("a"), String::from("b"), String::from("c")];
/// let mut slots = [const { MaybeUninit::<String>::uninit() }; 2];
///
/// let input = RawRange::from_slice(&source);
/// let output = RawRange::from_uninit_slice(&mut slots);
/// let result = unsafe { ranges::uninitialized_copy(input, output) };
///
/// // The output ran out first; "c" was never touched.
/// assert_eq!(result.output, output.last());
/// assert_eq!(unsafe { &*result.input }, "c");
/// assert_eq!(slots.map(|slot| unsafe { slot.assume_init() }), ["a", "b"]);
/// ```
pub unsafe fn uninitialized_copy<T, I, O>(input: I, output: O) -> InOutResult<*const T, *mut T>
where
    T: Clone,
    I: SlotRange<T>,
    O: SlotRange<T>,
{
    let (ifirst, ilast) = input.into_bounds();
    let (ofirst, olast) = output.into_bounds();
    trace!(?ifirst, ?ofirst, "ranges::uninitialized_copy");
    debug_assert_walk_disjoint(ifirst, &ilast, ofirst, &olast);
    let step = |src: *const T, dst: *mut T| unsafe {
        construct_at(dst, (*src).clone());
    };
    unsafe { zip_slots(ifirst.cast_const(), &ilast, ofirst, &olast, step) }
}

/// Copies `n` objects starting at `ifirst` into `output`, stopping early if
/// `output` ends first.
///
/// Returns the positions reached in both ranges.
///
/// # Safety
///
/// `ifirst` must point to `n` live objects, `output` must describe raw slots
/// valid for writes, and the two must not overlap.
pub unsafe fn uninitialized_copy_n<T, O>(
    ifirst: *const T,
    n: usize,
    output: O,
) -> InOutResult<*const T, *mut T>
where
    T: Clone,
    O: SlotRange<T>,
{
    unsafe { uninitialized_copy((ifirst.cast_mut(), Counted(n)), output) }
}

/// Moves from `input` into `output`, stopping at whichever range ends first.
///
/// The consumed source slots are raw afterwards and must not be dropped; the
/// rest of `input` is untouched. Returns the positions reached in both
/// ranges.
///
/// # Safety
///
/// `input` must describe live objects, `output` raw slots valid for writes,
/// and the two must not overlap.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::{RawRange, ranges};
///
/// let mut source = [Box::new(1), Box::new(2), Box::new(3)].map(MaybeUninit::new);
/// let mut slots = [const { MaybeUninit::<Box<i32>>::uninit() }; 5];
///
/// let input = RawRange::from_uninit_slice(&mut source);
/// let output = RawRange::from_uninit_slice(&mut slots);
/// let result = unsafe { ranges::uninitialized_move(input, output) };
///
/// // The input ran out first.
/// assert_eq!(result.input, input.last());
/// assert_eq!(result.output, output.first().wrapping_add(3));
/// for slot in &mut slots[..3] {
///     unsafe { slot.assume_init_drop() };
/// }
/// ```
pub unsafe fn uninitialized_move<T, I, O>(input: I, output: O) -> InOutResult<*mut T, *mut T>
where
    I: SlotRange<T>,
    O: SlotRange<T>,
{
    let (ifirst, ilast) = input.into_bounds();
    let (ofirst, olast) = output.into_bounds();
    trace!(?ifirst, ?ofirst, "ranges::uninitialized_move");
    debug_assert_walk_disjoint(ifirst, &ilast, ofirst, &olast);
    let step = |src: *const T, dst: *mut T| unsafe {
        construct_at(dst, src.read());
    };
    unsafe {
        zip_slots(ifirst.cast_const(), &ilast, ofirst, &olast, step)
            .map_input(<*const T>::cast_mut)
    }
}

/// Moves `n` objects starting at `ifirst` into `output`, stopping early if
/// `output` ends first.
///
/// Returns the positions reached in both ranges.
///
/// # Safety
///
/// `ifirst` must point to `n` live objects, `output` must describe raw slots
/// valid for writes, and the two must not overlap.
pub unsafe fn uninitialized_move_n<T, O>(
    ifirst: *mut T,
    n: usize,
    output: O,
) -> InOutResult<*mut T, *mut T>
where
    O: SlotRange<T>,
{
    unsafe { uninitialized_move((ifirst, Counted(n)), output) }
}

/// Fills every slot of `range` with a clone of `value`.
///
/// Returns the end of the range.
///
/// # Safety
///
/// `range` must describe raw slots valid for writes.
pub unsafe fn uninitialized_fill<T, R>(range: R, value: &T) -> *mut T
where
    T: Clone,
    R: SlotRange<T>,
{
    let (first, last) = range.into_bounds();
    trace!(?first, "ranges::uninitialized_fill");
    unsafe {
        for_each_slot(first, &last, |slot, _| {
            construct_at(slot, value.clone());
        })
    }
}

/// Fills `n` slots starting at `first` with clones of `value`.
///
/// Returns `first + n`.
///
/// # Safety
///
/// `first` must point to `n` consecutive raw slots.
pub unsafe fn uninitialized_fill_n<T>(first: *mut T, n: usize, value: &T) -> *mut T
where
    T: Clone,
{
    unsafe { uninitialized_fill((first, Counted(n)), value) }
}

#[cfg(test)]
mod tests {
    use core::{cell::Cell, mem::MaybeUninit};

    use super::*;
    use crate::{RawRange, cursor::Unreachable};

    struct CountDrops<'a>(&'a Cell<usize>);

    impl Drop for CountDrops<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_copy_bound_asymmetry() {
        let source = [1_u32, 2, 3];
        let mut long = [MaybeUninit::<u32>::uninit(); 5];
        let input = RawRange::from_slice(&source);
        let output = RawRange::from_uninit_slice(&mut long);
        let result = unsafe { uninitialized_copy(input, output) };
        assert_eq!(result.input, input.last().cast_const());
        assert_eq!(result.output, output.first().wrapping_add(3));

        let source = [1_u32, 2, 3, 4, 5];
        let mut short = [MaybeUninit::<u32>::uninit(); 3];
        let input = RawRange::from_slice(&source);
        let output = RawRange::from_uninit_slice(&mut short);
        let result = unsafe { uninitialized_copy(input, output) };
        assert_eq!(result.input, input.first().wrapping_add(3).cast_const());
        assert_eq!(result.output, output.last());
        assert_eq!(short.map(|slot| unsafe { slot.assume_init() }), [1, 2, 3]);
    }

    #[test]
    fn test_move_stops_before_unplaceable_element() {
        let drops = Cell::new(0);
        let mut source: [_; 5] = core::array::from_fn(|_| MaybeUninit::new(CountDrops(&drops)));
        let mut dest: [MaybeUninit<CountDrops<'_>>; 3] =
            core::array::from_fn(|_| MaybeUninit::uninit());

        let input = RawRange::from_uninit_slice(&mut source);
        let output = RawRange::from_uninit_slice(&mut dest);
        let result = unsafe { uninitialized_move(input, output) };
        assert_eq!(result.input, input.first().wrapping_add(3));
        assert_eq!(result.output, output.last());
        assert_eq!(drops.get(), 0);

        // Three elements moved; two are still live in the source.
        for slot in &mut dest {
            unsafe { slot.assume_init_drop() };
        }
        for slot in &mut source[3..] {
            unsafe { slot.assume_init_drop() };
        }
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn test_counted_forms() {
        let source = [7_i8, 8, 9];
        let mut dest = [MaybeUninit::<i8>::uninit(); 2];
        let result = unsafe { uninitialized_copy_n(source.as_ptr(), 3, &mut dest) };
        assert_eq!(result.input, source.as_ptr().wrapping_add(2));
        assert_eq!(dest.map(|slot| unsafe { slot.assume_init() }), [7, 8]);

        let mut source = [String::from("x"), String::from("y")].map(MaybeUninit::new);
        let mut dest = [const { MaybeUninit::<String>::uninit() }; 4];
        let first = source.as_mut_ptr().cast::<String>();
        let result = unsafe { uninitialized_move_n(first, 2, &mut dest[..]) };
        assert_eq!(result.input, first.wrapping_add(2));
        assert_eq!(result.output, dest.as_mut_ptr().cast::<String>().wrapping_add(2));
        let moved = dest[..2].iter().map(|slot| unsafe { slot.assume_init_read() });
        assert!(moved.eq(["x", "y"]));
    }

    #[test]
    fn test_single_range_forms() {
        let mut slots = [MaybeUninit::<u8>::uninit(); 4];
        let range = RawRange::from_uninit_slice(&mut slots);
        unsafe {
            assert_eq!(uninitialized_fill(range, &3), range.last());
            assert_eq!(uninitialized_fill_n(range.first(), 0, &4), range.first());
            assert_eq!(uninitialized_value_construct_n(range.first(), 1), range.first().add(1));
            assert_eq!(uninitialized_default_construct_n(range.first(), 4), range.last());
            assert_eq!(uninitialized_default_construct(range), range.last());
        }
        assert_eq!(unsafe { slots[0].assume_init() }, 0);
        assert_eq!(unsafe { slots[3].assume_init() }, 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic = "input and output overlap"]
    fn test_overlapping_copy_is_caught() {
        let mut buf = [0_u16; 6];
        let base = buf.as_mut_ptr();
        let (input, output) =
            unsafe { (RawRange::from_count(base, 4), RawRange::from_count(base.add(2), 4)) };
        unsafe { uninitialized_copy(input, output) };
    }

    #[test]
    fn test_only_walked_part_must_be_disjoint() {
        let mut buf = [1_u16, 2, 3, 4, 0, 0];
        let base = buf.as_mut_ptr();
        // The input spans the output, but the walk stops after two slots.
        let (input, output) =
            unsafe { (RawRange::from_count(base, 6), RawRange::from_count(base.add(4), 2)) };
        let result = unsafe { uninitialized_move(input, output) };
        assert_eq!(result.output, output.last());
        assert_eq!(buf, [1, 2, 3, 4, 1, 2]);
    }

    #[test]
    fn test_unbounded_output() {
        let source = [5_u64, 6];
        let mut dest = [MaybeUninit::<u64>::uninit(); 2];
        let output = (dest.as_mut_ptr().cast::<u64>(), Unreachable);
        let result = unsafe { uninitialized_copy(RawRange::from_slice(&source), output) };
        assert_eq!(result.output, dest.as_mut_ptr().cast::<u64>().wrapping_add(2));
        assert_eq!(dest.map(|slot| unsafe { slot.assume_init() }), [5, 6]);
    }
}
