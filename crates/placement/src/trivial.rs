//! `const fn` algorithms for trivial element types.
//!
//! Every function here may run during constant evaluation, so a `const` or
//! `static` initializer can build its value slot by slot in storage it created
//! itself (typically a local [`SlotArray`](crate::SlotArray)). At run time they
//! behave exactly like their counterparts in [`memory`](crate::memory).
//!
//! Element types are restricted to [`Trivial`]: a `const fn` cannot call
//! `Clone::clone` or `Default::default`, and a trivial type needs neither.
//! Copying is a bitwise read of the source slot.
//!
//! The `[first, last)` forms measure the range with
//! [`offset_from`](pointer::offset_from), so `first` and `last` must belong to
//! the same allocation and `T` must not be zero-sized.
//!
//! The run-time [`DefaultInit`](crate::DefaultInit) and
//! [`ValueInit`](crate::ValueInit) implementations of every trivial type call
//! [`default_construct_at`] and [`value_construct_at`], so both evaluation
//! modes share one code path.

use crate::{Trivial, result::InOutResult};

/// Default-initializes a `T` at `location`.
///
/// Nothing is written. The object is live but its value is indeterminate:
/// reading it before assigning to it is undefined behavior at run time and is
/// rejected during constant evaluation.
///
/// # Safety
///
/// `location` must be non-null, properly aligned and valid for writes of `T`.
#[inline]
pub const unsafe fn default_construct_at<T>(location: *mut T) -> *mut T
where
    T: Trivial,
{
    location
}

/// Value-initializes a `T` at `location` by zeroing it.
///
/// # Safety
///
/// `location` must be non-null, properly aligned and valid for writes of `T`.
///
/// # Examples
///
/// ```
/// use placement::{SlotArray, trivial};
///
/// const ORIGIN: (i32, i32) = {
///     let mut slots = SlotArray::<(i32, i32), 1>::new();
///     unsafe {
///         trivial::value_construct_at(slots.as_mut_ptr());
///         slots.assume_init()[0]
///     }
/// };
/// assert_eq!(ORIGIN, (0, 0));
/// ```
#[inline]
pub const unsafe fn value_construct_at<T>(location: *mut T) -> *mut T
where
    T: Trivial,
{
    unsafe { crate::construct_at(location, core::mem::zeroed()) }
}

/// Number of slots in `[first, last)`.
#[expect(clippy::cast_sign_loss)]
const unsafe fn distance<T>(first: *const T, last: *const T) -> usize {
    let n = unsafe { last.offset_from(first) };
    debug_assert!(n >= 0);
    n as usize
}

const fn min(a: usize, b: usize) -> usize {
    if a < b { a } else { b }
}

/// Default-initializes every slot of `[first, last)`.
///
/// Returns `last`.
///
/// # Safety
///
/// `[first, last)` must be a valid range of raw slots within one allocation.
#[inline]
pub const unsafe fn uninitialized_default_construct<T>(first: *mut T, last: *mut T) -> *mut T
where
    T: Trivial,
{
    unsafe {
        let n = distance(first.cast_const(), last.cast_const());
        uninitialized_default_construct_n(first, n)
    }
}

/// Default-initializes `n` slots starting at `first`.
///
/// Returns `first + n`.
///
/// # Safety
///
/// `first` must point to `n` consecutive raw slots.
#[inline]
pub const unsafe fn uninitialized_default_construct_n<T>(first: *mut T, n: usize) -> *mut T
where
    T: Trivial,
{
    let mut i = 0;
    while i < n {
        unsafe {
            default_construct_at(first.add(i));
        }
        i += 1;
    }
    unsafe { first.add(n) }
}

/// Value-initializes (zeroes) every slot of `[first, last)`.
///
/// Returns `last`.
///
/// # Safety
///
/// `[first, last)` must be a valid range of raw slots within one allocation.
///
/// # Examples
///
/// ```
/// use placement::{SlotArray, trivial};
///
/// const ZEROS: [u64; 5] = {
///     let mut slots = SlotArray::<u64, 5>::new();
///     let first = slots.as_mut_ptr();
///     unsafe {
///         trivial::uninitialized_value_construct(first, first.add(5));
///         slots.assume_init()
///     }
/// };
/// assert_eq!(ZEROS, [0; 5]);
/// ```
#[inline]
pub const unsafe fn uninitialized_value_construct<T>(first: *mut T, last: *mut T) -> *mut T
where
    T: Trivial,
{
    unsafe {
        let n = distance(first.cast_const(), last.cast_const());
        uninitialized_value_construct_n(first, n)
    }
}

/// Value-initializes (zeroes) `n` slots starting at `first`.
///
/// Returns `first + n`.
///
/// # Safety
///
/// `first` must point to `n` consecutive raw slots.
#[inline]
pub const unsafe fn uninitialized_value_construct_n<T>(first: *mut T, n: usize) -> *mut T
where
    T: Trivial,
{
    let mut i = 0;
    while i < n {
        unsafe {
            value_construct_at(first.add(i));
        }
        i += 1;
    }
    unsafe { first.add(n) }
}

/// Copies `[first, last)` into the raw slots starting at `d_first`.
///
/// Returns the end of the constructed destination range.
///
/// # Safety
///
/// `[first, last)` must be a valid range of live objects within one
/// allocation, `d_first` must point to as many raw slots, and the two ranges
/// must not overlap.
#[inline]
pub const unsafe fn uninitialized_copy<T>(
    first: *const T,
    last: *const T,
    d_first: *mut T,
) -> *mut T
where
    T: Trivial,
{
    unsafe { uninitialized_copy_n(first, distance(first, last), d_first) }
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
#[inline]
pub const unsafe fn uninitialized_copy_n<T>(first: *const T, n: usize, d_first: *mut T) -> *mut T
where
    T: Trivial,
{
    let mut i = 0;
    while i < n {
        unsafe {
            crate::construct_at(d_first.add(i), first.add(i).read());
        }
        i += 1;
    }
    unsafe { d_first.add(n) }
}

/// Copies from `[ifirst, ilast)` into `[ofirst, olast)`, stopping at whichever
/// range ends first.
///
/// Returns the positions reached in both ranges.
///
/// # Safety
///
/// Both ranges must be valid within their allocations, the input must hold
/// live objects, the output must be raw slots, and the two must not overlap.
///
/// # Examples
///
/// ```
/// use placement::{SlotArray, trivial};
///
/// const PREFIX: [u8; 3] = {
///     let source = *b"hello";
///     let mut slots = SlotArray::<u8, 3>::new();
///     let out = slots.as_mut_ptr();
///     unsafe {
///         let input = source.as_ptr();
///         let result = trivial::uninitialized_copy_bounded(input, input.add(5), out, out.add(3));
///         assert!(result.input.offset_from(input) == 3);
///         slots.assume_init()
///     }
/// };
/// assert_eq!(&PREFIX, b"hel");
/// ```
#[inline]
pub const unsafe fn uninitialized_copy_bounded<T>(
    ifirst: *const T,
    ilast: *const T,
    ofirst: *mut T,
    olast: *mut T,
) -> InOutResult<*const T, *mut T>
where
    T: Trivial,
{
    unsafe {
        let n = min(
            distance(ifirst, ilast),
            distance(ofirst.cast_const(), olast.cast_const()),
        );
        let output = uninitialized_copy_n(ifirst, n, ofirst);
        InOutResult::new(ifirst.add(n), output)
    }
}

/// Moves `[first, last)` into the raw slots starting at `d_first`.
///
/// The source slots are raw afterwards. Returns the end of the constructed
/// destination range.
///
/// # Safety
///
/// Same as [`uninitialized_copy`].
#[inline]
pub const unsafe fn uninitialized_move<T>(first: *mut T, last: *mut T, d_first: *mut T) -> *mut T
where
    T: Trivial,
{
    unsafe {
        let n = distance(first.cast_const(), last.cast_const());
        uninitialized_move_n(first, n, d_first).output
    }
}

/// Moves `n` objects starting at `first` into the raw slots starting at
/// `d_first`.
///
/// Returns `(first + n, d_first + n)`.
///
/// # Safety
///
/// Same as [`uninitialized_copy_n`].
#[inline]
pub const unsafe fn uninitialized_move_n<T>(
    first: *mut T,
    n: usize,
    d_first: *mut T,
) -> InOutResult<*mut T, *mut T>
where
    T: Trivial,
{
    let mut i = 0;
    while i < n {
        unsafe {
            crate::construct_at(d_first.add(i), first.add(i).read());
        }
        i += 1;
    }
    unsafe { InOutResult::new(first.add(n), d_first.add(n)) }
}

/// Moves from `[ifirst, ilast)` into `[ofirst, olast)`, stopping at whichever
/// range ends first.
///
/// Only the consumed source slots become raw. Returns the positions reached in
/// both ranges.
///
/// # Safety
///
/// Same as [`uninitialized_copy_bounded`].
#[inline]
pub const unsafe fn uninitialized_move_bounded<T>(
    ifirst: *mut T,
    ilast: *mut T,
    ofirst: *mut T,
    olast: *mut T,
) -> InOutResult<*mut T, *mut T>
where
    T: Trivial,
{
    unsafe {
        let n = min(
            distance(ifirst.cast_const(), ilast.cast_const()),
            distance(ofirst.cast_const(), olast.cast_const()),
        );
        uninitialized_move_n(ifirst, n, ofirst)
    }
}

/// Fills every slot of `[first, last)` with `value`.
///
/// Returns `last`.
///
/// # Safety
///
/// `[first, last)` must be a valid range of raw slots within one allocation.
#[inline]
pub const unsafe fn uninitialized_fill<T>(first: *mut T, last: *mut T, value: T) -> *mut T
where
    T: Trivial,
{
    unsafe {
        let n = distance(first.cast_const(), last.cast_const());
        uninitialized_fill_n(first, n, value)
    }
}

/// Fills `n` slots starting at `first` with `value`.
///
/// Returns `first + n`; with `n == 0` nothing is written and `first` is
/// returned.
///
/// # Safety
///
/// `first` must point to `n` consecutive raw slots.
///
/// # Examples
///
/// ```
/// use placement::{SlotArray, trivial};
///
/// static SEVENS: [i8; 4] = {
///     let mut slots = SlotArray::<i8, 4>::new();
///     unsafe {
///         trivial::uninitialized_fill_n(slots.as_mut_ptr(), 4, 7);
///         slots.assume_init()
///     }
/// };
/// assert_eq!(SEVENS, [7; 4]);
/// ```
#[inline]
pub const unsafe fn uninitialized_fill_n<T>(first: *mut T, n: usize, value: T) -> *mut T
where
    T: Trivial,
{
    let mut i = 0;
    while i < n {
        unsafe {
            crate::construct_at(first.add(i), value);
        }
        i += 1;
    }
    unsafe { first.add(n) }
}
