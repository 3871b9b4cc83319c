//! Safe bulk algorithms over slices of uninitialized slots.
//!
//! The output is a `&mut [MaybeUninit<T>]` and the result is the initialized
//! prefix as a `&mut [T]`. Dropping those objects is up to the caller: a slot
//! of `MaybeUninit<T>` never drops its contents, so forgetting to do so leaks
//! them but is not unsound. Borrowing guarantees that input and output never
//! overlap.
//!
//! There is no safe default-construct: for a trivial `T` it would hand out
//! references to indeterminate values.

use core::{mem::MaybeUninit, slice};

use snafu::IntoError as _;

use crate::{
    ValueInit,
    cursor::{Counted, for_each_slot, try_for_each_slot},
    error::{ConstructError, ConstructSnafu},
    primitive::construct_at,
    ranges,
    result::InOutResult,
};

/// Reinterprets the first `len` slots as initialized.
///
/// # Safety
///
/// The first `len` slots must hold live objects.
unsafe fn assume_init_prefix<T>(slots: &mut [MaybeUninit<T>], len: usize) -> &mut [T] {
    debug_assert!(len <= slots.len());
    unsafe { slice::from_raw_parts_mut(slots.as_mut_ptr().cast(), len) }
}

/// Value-initializes every slot.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::slice;
///
/// let mut slots = [MaybeUninit::<u32>::uninit(); 5];
/// assert_eq!(slice::value_construct(&mut slots), [0; 5]);
/// ```
pub fn value_construct<T>(slots: &mut [MaybeUninit<T>]) -> &mut [T]
where
    T: ValueInit,
{
    let len = slots.len();
    unsafe {
        ranges::uninitialized_value_construct::<T, _>(&mut *slots);
        assume_init_prefix(slots, len)
    }
}

/// Fills every slot with a clone of `value`.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::slice;
///
/// let mut slots = [const { MaybeUninit::<Vec<u8>>::uninit() }; 3];
/// let filled = slice::fill(&mut slots, &vec![1, 2]);
/// filled[0].push(3);
/// assert_eq!(filled, [vec![1, 2, 3], vec![1, 2], vec![1, 2]]);
/// # for v in filled { unsafe { core::ptr::drop_in_place(v) } }
/// ```
pub fn fill<'a, T>(slots: &'a mut [MaybeUninit<T>], value: &T) -> &'a mut [T]
where
    T: Clone,
{
    let len = slots.len();
    unsafe {
        ranges::uninitialized_fill::<T, _>(&mut *slots, value);
        assume_init_prefix(slots, len)
    }
}

/// Constructs `f(index)` into every slot.
pub fn construct_with<T, F>(slots: &mut [MaybeUninit<T>], mut f: F) -> &mut [T]
where
    F: FnMut(usize) -> T,
{
    let (first, len) = (slots.as_mut_ptr().cast::<T>(), slots.len());
    trace!(len, "slice::construct_with");
    unsafe {
        for_each_slot(first, &Counted(len), |slot, index| {
            construct_at(slot, f(index));
        });
        assume_init_prefix(slots, len)
    }
}

/// Constructs `f(index)` into every slot, stopping at the first error.
///
/// On error the constructed prefix is leaked; [`ConstructError::constructed`]
/// says how long it is, and the caller may still reach it through `slots`.
#[track_caller]
pub fn try_construct_with<T, E, F>(
    slots: &mut [MaybeUninit<T>],
    mut f: F,
) -> Result<&mut [T], ConstructError<E>>
where
    E: core::error::Error + 'static,
    F: FnMut(usize) -> Result<T, E>,
{
    let (first, len) = (slots.as_mut_ptr().cast::<T>(), slots.len());
    trace!(len, "slice::try_construct_with");
    let step = |slot: *mut T, index| -> Result<(), E> {
        let value = f(index)?;
        unsafe {
            construct_at(slot, value);
        }
        Ok(())
    };
    match unsafe { try_for_each_slot(first, &Counted(len), step) } {
        Ok(_) => Ok(unsafe { assume_init_prefix(slots, len) }),
        Err((source, constructed)) => {
            debug!(constructed, "element construction failed");
            Err(ConstructSnafu { constructed }.into_error(source))
        }
    }
}

/// Copies from `input` into `output`, stopping at whichever ends first.
///
/// Returns the part of `input` that was not copied and the initialized prefix
/// of `output`.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::slice;
///
/// let source = [1, 2, 3, 4, 5];
/// let mut slots = [MaybeUninit::<i32>::uninit(); 3];
/// let result = slice::uninitialized_copy(&source, &mut slots);
/// assert_eq!(result.input, [4, 5]);
/// assert_eq!(result.output, [1, 2, 3]);
/// ```
pub fn uninitialized_copy<'a, 'b, T>(
    input: &'a [T],
    output: &'b mut [MaybeUninit<T>],
) -> InOutResult<&'a [T], &'b mut [T]>
where
    T: Clone,
{
    let n = input.len().min(output.len());
    unsafe {
        ranges::uninitialized_copy_n(input.as_ptr(), n, &mut *output);
        InOutResult::new(&input[n..], assume_init_prefix(output, n))
    }
}

/// Moves elements out of `input` into `output`, stopping at whichever ends
/// first.
///
/// An element is only taken from `input` once there is a slot for it. Returns
/// the remaining iterator and the initialized prefix of `output`.
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::slice;
///
/// let mut slots = [const { MaybeUninit::<String>::uninit() }; 2];
/// let names = ["a", "b", "c"].map(String::from);
/// let mut result = slice::uninitialized_move(names, &mut slots);
/// assert_eq!(result.output, ["a", "b"]);
/// assert_eq!(result.input.next().as_deref(), Some("c"));
/// # for s in result.output { unsafe { core::ptr::drop_in_place(s) } }
/// ```
pub fn uninitialized_move<I, T>(
    input: I,
    output: &mut [MaybeUninit<T>],
) -> InOutResult<I::IntoIter, &mut [T]>
where
    I: IntoIterator<Item = T>,
{
    let mut input = input.into_iter();
    let mut len = 0;
    for slot in output.iter_mut() {
        let Some(value) = input.next() else {
            break;
        };
        unsafe {
            construct_at(slot.as_mut_ptr(), value);
        }
        len += 1;
    }
    trace!(len, "slice::uninitialized_move");
    InOutResult::new(input, unsafe { assume_init_prefix(output, len) })
}
