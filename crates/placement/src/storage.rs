//! Fixed-capacity raw storage.

use core::{fmt, mem::MaybeUninit, slice};

use crate::cursor::RawRange;

/// An array of `N` raw slots of `T`.
///
/// `SlotArray` is storage only. It never tracks which slots are live and never
/// drops its contents, exactly like `[MaybeUninit<T>; N]`, which is its
/// representation. It can be created during constant evaluation, which makes it
/// the natural origin of slots for the algorithms in [`trivial`](crate::trivial).
///
/// # Examples
///
/// ```
/// use placement::{SlotArray, memory};
///
/// let mut slots = SlotArray::<String, 4>::new();
/// let range = slots.range();
/// unsafe {
///     memory::uninitialized_fill(range.first(), range.last(), &String::from("-"));
///     let values = slots.assume_init_mut(4);
///     values[1].push('+');
///     assert_eq!(values, ["-", "-+", "-", "-"]);
///     core::ptr::drop_in_place(values);
/// }
/// ```
#[repr(transparent)]
pub struct SlotArray<T, const N: usize> {
    slots: [MaybeUninit<T>; N],
}

impl<T, const N: usize> SlotArray<T, N> {
    /// Creates an array of raw slots.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { MaybeUninit::uninit() }; N],
        }
    }

    /// Returns the number of slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns a pointer to the first slot.
    #[must_use]
    pub const fn as_ptr(&self) -> *const T {
        self.slots.as_ptr().cast()
    }

    /// Returns a mutable pointer to the first slot.
    #[must_use]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.slots.as_mut_ptr().cast()
    }

    /// Returns a range covering every slot.
    ///
    /// The range does not borrow the storage; it stays valid as long as the
    /// `SlotArray` is not moved.
    #[must_use]
    pub const fn range(&mut self) -> RawRange<T> {
        RawRange::from_uninit_slice(&mut self.slots)
    }

    /// Returns the slots.
    #[must_use]
    pub const fn as_uninit_mut(&mut self) -> &mut [MaybeUninit<T>; N] {
        &mut self.slots
    }

    /// Extracts the values of all slots.
    ///
    /// # Safety
    ///
    /// Every slot must hold a live object.
    #[must_use]
    pub const unsafe fn assume_init(self) -> [T; N] {
        unsafe { (&raw const self.slots).cast::<[T; N]>().read() }
    }

    /// Returns the first `len` slots as initialized values.
    ///
    /// # Safety
    ///
    /// `len <= N`, and the first `len` slots must hold live objects.
    #[must_use]
    pub const unsafe fn assume_init_ref(&self, len: usize) -> &[T] {
        debug_assert!(len <= N);
        unsafe { slice::from_raw_parts(self.as_ptr(), len) }
    }

    /// Returns the first `len` slots as mutable initialized values.
    ///
    /// # Safety
    ///
    /// `len <= N`, and the first `len` slots must hold live objects.
    #[must_use]
    pub const unsafe fn assume_init_mut(&mut self, len: usize) -> &mut [T] {
        debug_assert!(len <= N);
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
    }
}

impl<T, const N: usize> Default for SlotArray<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> fmt::Debug for SlotArray<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotArray")
            .field("capacity", &N)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{memory, slice as slots};

    #[test]
    fn test_layout() {
        assert_eq!(size_of::<SlotArray<u64, 3>>(), size_of::<[u64; 3]>());
        assert_eq!(align_of::<SlotArray<u16, 3>>(), align_of::<u16>());
        assert_eq!(SlotArray::<u8, 7>::new().capacity(), 7);
    }

    #[test]
    fn test_range_and_views() {
        let mut storage = SlotArray::<u32, 4>::default();
        let range = storage.range();
        assert_eq!(range.first(), storage.as_mut_ptr());
        assert_eq!(range.len(), 4);

        unsafe {
            memory::uninitialized_copy_n([3, 1, 4].as_ptr(), 3, range.first());
            assert_eq!(storage.assume_init_ref(3), [3, 1, 4]);
            storage.assume_init_mut(2)[1] = 5;
            assert_eq!(storage.assume_init_ref(2), [3, 5]);
        }

        let values = slots::value_construct(storage.as_uninit_mut());
        assert_eq!(values, [0; 4]);
        assert_eq!(unsafe { storage.assume_init() }, [0; 4]);
    }
}
