//! Placement primitives.
//!
//! These are the only operations that conjure an object into existence at a
//! raw address. Every bulk algorithm in this crate is a loop over one of them.
//!
//! All primitives return the address they were given, now understood to hold
//! a live `T`. None of them reads or drops the previous contents of the slot.

use crate::init::{DefaultInit, ValueInit};

/// Direct-initializes a `T` at `location` from `value`.
///
/// Returns `location`, which now holds a live `T`.
///
/// This function is usable during constant evaluation, provided `location`
/// points into storage created within the same evaluation.
///
/// # Safety
///
/// `location` must be non-null, properly aligned and valid for writes of `T`,
/// and must not hold a live object (it would be overwritten without being
/// dropped).
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::construct_at;
///
/// let mut slot = MaybeUninit::<String>::uninit();
/// let value = unsafe { &mut *construct_at(slot.as_mut_ptr(), String::from("live")) };
/// value.push('!');
/// assert_eq!(value, "live!");
/// unsafe { slot.assume_init_drop() };
/// ```
#[inline]
pub const unsafe fn construct_at<T>(location: *mut T, value: T) -> *mut T {
    unsafe {
        location.write(value);
    }
    location
}

/// Direct-initializes a `T` at `location` from the value returned by `f`.
///
/// The arguments of the constructor are whatever `f` captures. If `f` panics,
/// the slot stays raw.
///
/// # Safety
///
/// Same as [`construct_at`].
#[inline]
pub unsafe fn construct_at_with<T, F>(location: *mut T, f: F) -> *mut T
where
    F: FnOnce() -> T,
{
    debug_assert!(!location.is_null() && location.is_aligned());
    unsafe { construct_at(location, f()) }
}

/// Direct-initializes a `T` at `location` from the value returned by `f`, or
/// returns the error returned by `f`.
///
/// On error the slot stays raw.
///
/// # Safety
///
/// Same as [`construct_at`].
#[inline]
pub unsafe fn try_construct_at_with<T, E, F>(location: *mut T, f: F) -> Result<*mut T, E>
where
    F: FnOnce() -> Result<T, E>,
{
    debug_assert!(!location.is_null() && location.is_aligned());
    let value = f()?;
    Ok(unsafe { construct_at(location, value) })
}

/// Value-initializes a `T` at `location`.
///
/// This is the zero-argument form of [`construct_at`]: trivial types are
/// zeroed, other types run their zero-argument constructor.
///
/// # Safety
///
/// Same as [`construct_at`].
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::value_construct_at;
///
/// let mut slot = MaybeUninit::<[u16; 4]>::uninit();
/// let value = unsafe { *value_construct_at(slot.as_mut_ptr()) };
/// assert_eq!(value, [0; 4]);
/// ```
#[inline]
pub unsafe fn value_construct_at<T>(location: *mut T) -> *mut T
where
    T: ValueInit,
{
    debug_assert!(!location.is_null() && location.is_aligned());
    unsafe {
        T::value_init(location);
    }
    location
}

/// Default-initializes a `T` at `location`.
///
/// For a [`Trivial`](crate::Trivial) type nothing is written: the object is
/// live but its value is indeterminate, and reading it before assigning to it
/// is undefined behavior. This holds identically during constant evaluation,
/// where such a read is rejected. Types with a user-provided constructor run
/// it, as [`value_construct_at`] does.
///
/// # Safety
///
/// Same as [`construct_at`].
///
/// # Examples
///
/// ```
/// use core::mem::MaybeUninit;
///
/// use placement::default_construct_at;
///
/// let mut slot = MaybeUninit::<[u8; 4096]>::uninit();
/// let page = unsafe {
///     let page = default_construct_at(slot.as_mut_ptr());
///     // The contents are indeterminate until written.
///     page.write_bytes(0xff, 1);
///     slot.assume_init_ref()
/// };
/// assert!(page.iter().all(|&b| b == 0xff));
/// ```
#[inline]
pub unsafe fn default_construct_at<T>(location: *mut T) -> *mut T
where
    T: DefaultInit,
{
    debug_assert!(!location.is_null() && location.is_aligned());
    unsafe {
        T::default_init(location);
    }
    location
}

#[cfg(test)]
mod tests {
    use core::mem::MaybeUninit;

    use super::*;

    #[test]
    fn test_construct_at_returns_location() {
        let mut slot = MaybeUninit::<u64>::uninit();
        let location = slot.as_mut_ptr();
        unsafe {
            assert_eq!(construct_at(location, 42), location);
            assert_eq!(slot.assume_init(), 42);
        }
    }

    #[test]
    fn test_construct_at_with_panic_leaves_slot_raw() {
        let mut slot = MaybeUninit::<String>::uninit();
        let location = slot.as_mut_ptr();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| unsafe {
            construct_at_with(location, || -> String { panic!("constructor failed") });
        }));
        assert!(result.is_err());

        // The slot is still raw and can be constructed into.
        unsafe {
            construct_at_with(location, || String::from("second try"));
            assert_eq!(slot.assume_init_read(), "second try");
        }
    }

    #[test]
    fn test_try_construct_at_with() {
        let mut slot = MaybeUninit::<u32>::uninit();
        let location = slot.as_mut_ptr();
        unsafe {
            let err = try_construct_at_with(location, || "7x".parse::<u32>()).unwrap_err();
            assert_eq!(*err.kind(), core::num::IntErrorKind::InvalidDigit);

            let ok = try_construct_at_with(location, || "7".parse::<u32>()).unwrap();
            assert_eq!(ok, location);
            assert_eq!(slot.assume_init(), 7);
        }
    }

    #[test]
    fn test_value_construct_at() {
        let mut slot = MaybeUninit::<(i64, f64)>::uninit();
        unsafe {
            let value = *value_construct_at(slot.as_mut_ptr());
            assert_eq!(value.0, 0);
            assert!(value.1.to_bits() == 0);
        }

        let mut slot = MaybeUninit::<String>::uninit();
        unsafe {
            value_construct_at(slot.as_mut_ptr());
            assert!(slot.assume_init_read().is_empty());
        }
    }

    #[test]
    fn test_default_construct_at_user_provided() {
        let mut slot = MaybeUninit::<Vec<String>>::uninit();
        unsafe {
            let location = default_construct_at(slot.as_mut_ptr());
            (*location).push(String::from("x"));
            assert_eq!(slot.assume_init_read(), ["x"]);
        }
    }
}
