//! Cursors, sentinels and range descriptors.
//!
//! A run of slots is described by a starting cursor (`*mut T`) and a
//! [`Sentinel`] that says when the walk is over: an end pointer, a step count
//! ([`Counted`]), or nothing at all ([`Unreachable`]). Every bulk algorithm in
//! [`memory`](crate::memory), [`ranges`](crate::ranges) and
//! [`slice`](crate::slice) drives one of the walkers at the bottom of this
//! module.

use core::{fmt, mem::MaybeUninit, ops::Range};

use crate::{
    error::{RangeError, RangeErrorKind},
    result::InOutResult,
};

/// An end condition for a walk over slots.
pub trait Sentinel<T> {
    /// Returns `true` if the walk is over once it reached `cursor` after
    /// `steps` steps.
    fn is_reached(&self, cursor: *const T, steps: usize) -> bool;

    /// Returns the number of slots between `first` and the sentinel, if it is
    /// known without walking.
    fn len_from(&self, first: *const T) -> Option<usize> {
        let _ = first;
        None
    }
}

fn pointer_distance<T>(first: *const T, last: *const T) -> Option<usize> {
    match size_of::<T>() {
        0 => Some(0),
        size => last.addr().checked_sub(first.addr()).map(|bytes| bytes / size),
    }
}

impl<T> Sentinel<T> for *const T {
    #[inline]
    fn is_reached(&self, cursor: *const T, _steps: usize) -> bool {
        cursor == *self
    }

    fn len_from(&self, first: *const T) -> Option<usize> {
        pointer_distance(first, *self)
    }
}

impl<T> Sentinel<T> for *mut T {
    #[inline]
    fn is_reached(&self, cursor: *const T, _steps: usize) -> bool {
        cursor == self.cast_const()
    }

    fn len_from(&self, first: *const T) -> Option<usize> {
        pointer_distance(first, self.cast_const())
    }
}

/// A sentinel reached after a fixed number of steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Counted(pub usize);

impl<T> Sentinel<T> for Counted {
    #[inline]
    fn is_reached(&self, _cursor: *const T, steps: usize) -> bool {
        steps >= self.0
    }

    fn len_from(&self, _first: *const T) -> Option<usize> {
        Some(self.0)
    }
}

/// A sentinel that is never reached.
///
/// Used for the unbounded destination of the classic copy and move forms,
/// whose length is implied by the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Unreachable;

impl<T> Sentinel<T> for Unreachable {
    #[inline]
    fn is_reached(&self, _cursor: *const T, _steps: usize) -> bool {
        false
    }
}

/// A value that can be split into a starting cursor and a sentinel.
pub trait SlotRange<T> {
    /// The end condition of the range.
    type Sentinel: Sentinel<T>;

    /// Splits the range into its first cursor and its sentinel.
    fn into_bounds(self) -> (*mut T, Self::Sentinel);
}

impl<T, S> SlotRange<T> for (*mut T, S)
where
    S: Sentinel<T>,
{
    type Sentinel = S;

    #[inline]
    fn into_bounds(self) -> (*mut T, S) {
        self
    }
}

impl<T> SlotRange<T> for RawRange<T> {
    type Sentinel = Counted;

    #[inline]
    fn into_bounds(self) -> (*mut T, Counted) {
        self.counted()
    }
}

impl<T> SlotRange<T> for &mut [MaybeUninit<T>] {
    type Sentinel = Counted;

    #[inline]
    fn into_bounds(self) -> (*mut T, Counted) {
        (self.as_mut_ptr().cast(), Counted(self.len()))
    }
}

impl<T, const N: usize> SlotRange<T> for &mut [MaybeUninit<T>; N] {
    type Sentinel = Counted;

    #[inline]
    fn into_bounds(self) -> (*mut T, Counted) {
        (self.as_mut_ptr().cast(), Counted(N))
    }
}

/// A contiguous run of slots of `T`.
///
/// A `RawRange` is a plain descriptor: it neither owns nor borrows the slots,
/// and says nothing about whether they hold live objects. Its length is kept
/// as a count, so ranges of zero-sized types have a length too.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::{RawRange, RangeErrorKind};
///
/// let mut slots = [MaybeUninit::<u32>::uninit(); 4];
/// let first = slots.as_mut_ptr().cast::<u32>();
///
/// let range = RawRange::new(first, first.wrapping_add(4)).unwrap();
/// assert_eq!(range.len(), 4);
///
/// let err = RawRange::new(first.wrapping_add(4), first).unwrap_err();
/// assert!(matches!(err.kind(), RangeErrorKind::Reversed { .. }));
/// ```
pub struct RawRange<T> {
    first: *mut T,
    len: usize,
}

impl<T> Clone for RawRange<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RawRange<T> {}

impl<T> PartialEq for RawRange<T> {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first && self.len == other.len
    }
}

impl<T> Eq for RawRange<T> {}

impl<T> fmt::Debug for RawRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawRange")
            .field("first", &self.first)
            .field("last", &self.last())
            .field("len", &self.len)
            .finish()
    }
}

impl<T> RawRange<T> {
    /// Creates a range from its bounds, checking that they describe a run of
    /// slots.
    ///
    /// Both bounds must be non-null and aligned for `T`, `first` must not be
    /// past `last`, and the distance between them must be a whole number of
    /// elements. A range of a zero-sized type built this way is always empty;
    /// use [`from_count`](Self::from_count) to give it a length.
    ///
    /// The bounds are not dereferenced, and nothing is known about the
    /// allocation they belong to.
    #[track_caller]
    pub fn new(first: *mut T, last: *mut T) -> Result<Self, RangeError> {
        let expected_alignment = align_of::<T>();
        for bound in [first, last] {
            ensure!(!bound.is_null(), RangeErrorKind::NullPointer);
            ensure!(
                bound.is_aligned(),
                RangeErrorKind::UnalignedPointer {
                    address: bound.addr(),
                    expected_alignment,
                }
            );
        }
        ensure!(
            first.addr() <= last.addr(),
            RangeErrorKind::Reversed {
                first: first.addr(),
                last: last.addr(),
            }
        );

        let distance = last.addr() - first.addr();
        let element_size = size_of::<T>();
        let reachable = if element_size == 0 {
            distance == 0
        } else {
            distance % element_size == 0
        };
        ensure!(
            reachable,
            RangeErrorKind::Unreachable {
                distance,
                element_size,
            }
        );

        let len = distance.checked_div(element_size).unwrap_or(0);
        Ok(Self { first, len })
    }

    /// Creates a range from its bounds without checking them.
    ///
    /// # Safety
    ///
    /// The bounds must satisfy the conditions checked by [`new`](Self::new).
    #[must_use]
    pub const unsafe fn new_unchecked(first: *mut T, last: *mut T) -> Self {
        #[expect(clippy::cast_sign_loss)]
        let len = if size_of::<T>() == 0 {
            0
        } else {
            unsafe { last.offset_from(first) as usize }
        };
        Self { first, len }
    }

    /// Creates a range of `len` slots starting at `first`.
    ///
    /// # Safety
    ///
    /// `first` must be non-null and aligned, and `first + len` must stay
    /// within the allocation of `first`.
    #[must_use]
    pub const unsafe fn from_count(first: *mut T, len: usize) -> Self {
        Self { first, len }
    }

    /// Creates a range covering the slots of `slots`.
    ///
    /// The range does not borrow `slots`.
    #[must_use]
    pub const fn from_uninit_slice(slots: &mut [MaybeUninit<T>]) -> Self {
        Self {
            first: slots.as_mut_ptr().cast(),
            len: slots.len(),
        }
    }

    /// Creates a range covering the elements of `slice`, for use as the input
    /// of a copy.
    ///
    /// The range does not borrow `slice`. Writing through it is undefined
    /// behavior.
    #[must_use]
    pub const fn from_slice(slice: &[T]) -> Self {
        Self {
            first: slice.as_ptr().cast_mut(),
            len: slice.len(),
        }
    }

    /// Returns the first slot of the range.
    #[must_use]
    pub const fn first(&self) -> *mut T {
        self.first
    }

    /// Returns the end of the range, one past its last slot.
    #[must_use]
    pub const fn last(&self) -> *mut T {
        self.first.wrapping_add(self.len)
    }

    /// Returns the number of slots in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the range has no slots.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Splits the range into its first slot and a [`Counted`] sentinel.
    #[must_use]
    pub const fn counted(&self) -> (*mut T, Counted) {
        (self.first, Counted(self.len))
    }

    /// Returns the addresses covered by the range, in bytes.
    #[must_use]
    pub fn byte_span(&self) -> Range<usize> {
        let start = self.first.addr();
        start..start + self.len * size_of::<T>()
    }

    /// Returns `true` if the two ranges share at least one byte.
    ///
    /// Empty ranges and ranges of zero-sized types never overlap anything.
    #[must_use]
    pub fn overlaps<U>(&self, other: &RawRange<U>) -> bool {
        let (a, b) = (self.byte_span(), other.byte_span());
        !a.is_empty() && !b.is_empty() && a.start < b.end && b.start < a.end
    }
}

/// Asserts in debug builds that an input and an output run do not overlap.
///
/// A run of unknown length is taken to be as long as the other one, which is
/// how far a copy or move into it would reach. Nothing is checked when
/// neither length is known.
pub(crate) fn debug_assert_disjoint<T>(
    input: *const T,
    input_len: Option<usize>,
    output: *mut T,
    output_len: Option<usize>,
) {
    if !cfg!(debug_assertions) || size_of::<T>() == 0 {
        return;
    }
    let (Some(input_len), Some(output_len)) =
        (input_len.or(output_len), output_len.or(input_len))
    else {
        return;
    };
    let (input, output) = unsafe {
        (
            RawRange::from_count(input.cast_mut(), input_len),
            RawRange::from_count(output, output_len),
        )
    };
    debug_assert!(
        !input.overlaps(&output),
        "input and output overlap: {input:?} and {output:?}"
    );
}

/// Calls `f` on every slot from `first` until `sentinel` is reached.
///
/// Returns the cursor where the walk stopped. If `f` fails, returns the error
/// along with the number of slots `f` completed.
pub(crate) unsafe fn try_for_each_slot<T, S, E, F>(
    first: *mut T,
    sentinel: &S,
    mut f: F,
) -> Result<*mut T, (E, usize)>
where
    S: Sentinel<T>,
    F: FnMut(*mut T, usize) -> Result<(), E>,
{
    let mut cursor = first;
    let mut steps = 0;
    while !sentinel.is_reached(cursor.cast_const(), steps) {
        if let Err(err) = f(cursor, steps) {
            return Err((err, steps));
        }
        cursor = unsafe { cursor.add(1) };
        steps += 1;
    }
    Ok(cursor)
}

/// Calls `f` on every slot from `first` until `sentinel` is reached.
///
/// Returns the cursor where the walk stopped.
pub(crate) unsafe fn for_each_slot<T, S, F>(first: *mut T, sentinel: &S, mut f: F) -> *mut T
where
    S: Sentinel<T>,
    F: FnMut(*mut T, usize),
{
    let step = |slot, index| -> Result<(), core::convert::Infallible> {
        f(slot, index);
        Ok(())
    };
    match unsafe { try_for_each_slot(first, sentinel, step) } {
        Ok(end) => end,
        Err((never, _)) => match never {},
    }
}

/// Walks an input and an output in lock-step, calling `f` on each pair, until
/// either sentinel is reached.
///
/// The output sentinel is checked first, so no input element is taken unless
/// there is a slot to put it in.
pub(crate) unsafe fn zip_slots<T, IS, OS, F>(
    input: *const T,
    input_end: &IS,
    output: *mut T,
    output_end: &OS,
    mut f: F,
) -> InOutResult<*const T, *mut T>
where
    IS: Sentinel<T>,
    OS: Sentinel<T>,
    F: FnMut(*const T, *mut T),
{
    let (mut src, mut dst) = (input, output);
    let mut steps = 0;
    while !output_end.is_reached(dst.cast_const(), steps) && !input_end.is_reached(src, steps) {
        f(src, dst);
        unsafe {
            src = src.add(1);
            dst = dst.add(1);
        }
        steps += 1;
    }
    InOutResult::new(src, dst)
}
