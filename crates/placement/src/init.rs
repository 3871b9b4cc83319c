//! Initialization kinds.
//!
//! A raw slot can be brought to life in two ways without an explicit value:
//!
//! - **Value-initialization** ([`ValueInit`]): the zero-argument construction.
//!   Trivial types are zeroed; types with a user-provided constructor run it.
//! - **Default-initialization** ([`DefaultInit`]): trivial types are left
//!   untouched, so their value is indeterminate; types with a user-provided
//!   constructor run it, exactly as for value-initialization.
//!
//! [`Trivial`] marks the types for which the two differ. Both traits have a
//! blanket implementation for every trivial type that delegates to the
//! `const fn` primitives in [`trivial`](crate::trivial), so the run-time path
//! and the compile-time path are the same code.
//!
//! Aggregates get both traits from `#[derive(DefaultInit)]`, which initializes
//! field by field, or `Trivial` from `#[derive(Trivial)]`.

use core::{
    cell::{Cell, RefCell},
    marker::{PhantomData, PhantomPinned},
    mem::MaybeUninit,
    num::Wrapping,
};

use crate::trivial;

/// Types that are trivially copyable and trivially destructible, and for
/// which the all-zero bit pattern is a valid value.
///
/// Default-initializing a trivial type leaves its storage indeterminate;
/// value-initializing it zeroes the storage.
///
/// # Safety
///
/// The all-zero bit pattern must be a valid value of `Self`.
///
/// # Derive
///
/// `#[derive(Trivial)]` implements this trait for structs whose fields are
/// all trivial. The struct must also be `Copy`.
///
/// ```
/// use placement::Trivial;
///
/// #[derive(Clone, Copy, Trivial)]
/// struct Point {
///     x: f32,
///     y: f32,
/// }
/// ```
pub unsafe trait Trivial: Copy {}

macro_rules! impl_trivial {
    ($($ty:ty),+ $(,)?) => {
        $(unsafe impl Trivial for $ty {})+
    };
}

impl_trivial!(u8, u16, u32, u64, u128, usize);
impl_trivial!(i8, i16, i32, i64, i128, isize);
impl_trivial!(f32, f64, bool, char, (), PhantomPinned);

unsafe impl<T> Trivial for *const T {}
unsafe impl<T> Trivial for *mut T {}
unsafe impl<T> Trivial for PhantomData<T> where T: ?Sized {}
unsafe impl<T> Trivial for MaybeUninit<T> where T: Copy {}
unsafe impl<T> Trivial for Wrapping<T> where T: Trivial {}
unsafe impl<T, const N: usize> Trivial for [T; N] where T: Trivial {}

macro_rules! impl_trivial_tuple {
    ($(($($name:ident),+))+) => {
        $(unsafe impl<$($name),+> Trivial for ($($name,)+) where $($name: Trivial),+ {})+
    };
}

impl_trivial_tuple! {
    (A)
    (A, B)
    (A, B, C)
    (A, B, C, D)
    (A, B, C, D, E)
    (A, B, C, D, E, F)
}

/// Types that can be default-initialized into a raw slot.
///
/// Implemented for every [`Trivial`] type (a no-op: the storage keeps
/// whatever bits it had, and reading it before assignment is undefined
/// behavior), for types whose default constructor is `Default::default`, and
/// by `#[derive(DefaultInit)]`.
///
/// # Derive
///
/// ```
/// use placement::DefaultInit;
///
/// #[derive(DefaultInit)]
/// struct Frame {
///     // default-initialized: indeterminate
///     payload: [u8; 64],
///     // default member initializer
///     #[placement(value = 64)]
///     capacity: usize,
///     // user-provided constructor
///     name: String,
/// }
/// ```
pub trait DefaultInit {
    /// Default-initializes a `Self` at `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must be non-null, properly aligned and valid for writes of
    /// `Self`, and must not hold a live object.
    unsafe fn default_init(slot: *mut Self);
}

/// Types that can be value-initialized into a raw slot.
///
/// Implemented for every [`Trivial`] type (the storage is zeroed), for types
/// whose zero-argument constructor is `Default::default`, and by
/// `#[derive(DefaultInit)]`.
pub trait ValueInit {
    /// Value-initializes a `Self` at `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must be non-null, properly aligned and valid for writes of
    /// `Self`, and must not hold a live object.
    unsafe fn value_init(slot: *mut Self);
}

impl<T> DefaultInit for T
where
    T: Trivial,
{
    #[inline]
    unsafe fn default_init(slot: *mut Self) {
        unsafe {
            trivial::default_construct_at(slot);
        }
    }
}

impl<T> ValueInit for T
where
    T: Trivial,
{
    #[inline]
    unsafe fn value_init(slot: *mut Self) {
        unsafe {
            trivial::value_construct_at(slot);
        }
    }
}

macro_rules! impl_init_via_default {
    ($([$($generics:tt)*] $ty:ty),+ $(,)?) => {
        $(
            impl<$($generics)*> DefaultInit for $ty {
                #[inline]
                unsafe fn default_init(slot: *mut Self) {
                    unsafe {
                        slot.write(<Self as Default>::default());
                    }
                }
            }

            impl<$($generics)*> ValueInit for $ty {
                #[inline]
                unsafe fn value_init(slot: *mut Self) {
                    unsafe {
                        slot.write(<Self as Default>::default());
                    }
                }
            }
        )+
    };
}

impl_init_via_default!(
    [T] Option<T>,
    [T: Default] Cell<T>,
    [T: Default] RefCell<T>,
);

#[cfg(feature = "alloc")]
mod alloc_impls {
    use alloc::{
        collections::{BTreeMap, BTreeSet, VecDeque},
        string::String,
        vec::Vec,
    };

    use super::{DefaultInit, ValueInit};

    impl_init_via_default!(
        [] String,
        [T] Vec<T>,
        [T] VecDeque<T>,
        [K, V] BTreeMap<K, V>,
        [T] BTreeSet<T>,
    );
}

#[cfg(test)]
mod tests {
    use core::mem::MaybeUninit;

    use super::*;

    #[test]
    fn test_value_init_zeroes_trivial() {
        let mut slot = MaybeUninit::<(u32, [i16; 3], bool, *const u8)>::uninit();
        slot.write((7, [1, 2, 3], true, core::ptr::dangling()));
        unsafe {
            // The slot is reused as raw storage; its old value has no drop glue.
            ValueInit::value_init(slot.as_mut_ptr());
            let (a, b, c, d) = slot.assume_init();
            assert_eq!(a, 0);
            assert_eq!(b, [0; 3]);
            assert!(!c);
            assert!(d.is_null());
        }
    }

    #[test]
    fn test_init_via_default() {
        let mut slot = MaybeUninit::<Option<String>>::uninit();
        unsafe {
            DefaultInit::default_init(slot.as_mut_ptr());
            assert_eq!(slot.assume_init_read(), None);
        }

        let mut slot = MaybeUninit::<Vec<u32>>::uninit();
        unsafe {
            ValueInit::value_init(slot.as_mut_ptr());
            assert!(slot.assume_init_read().is_empty());
        }

        let mut slot = MaybeUninit::<Cell<u32>>::uninit();
        unsafe {
            DefaultInit::default_init(slot.as_mut_ptr());
            assert_eq!(slot.assume_init_read().get(), 0);
        }
    }
}
