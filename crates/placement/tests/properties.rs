#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]
#![cfg(test)]

use core::{cell::Cell, mem::MaybeUninit};

use placement::{RawRange, SlotArray, memory, ranges, trivial};
use proptest::prelude::*;

const CAP: usize = 32;

thread_local! {
    static DROPS: Cell<usize> = const { Cell::new(0) };
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Noisy(u32);

impl Drop for Noisy {
    fn drop(&mut self) {
        DROPS.with(|d| d.set(d.get() + 1));
    }
}

fn drops() -> usize {
    DROPS.with(Cell::get)
}

proptest! {
    #[test]
    fn copy_stops_at_shorter_range(
        source in prop::collection::vec(any::<u32>(), 0..CAP),
        out_len in 0..CAP,
    ) {
        let mut slots = SlotArray::<u32, CAP>::new();
        let input = RawRange::from_slice(&source);
        let output = unsafe { RawRange::from_count(slots.as_mut_ptr(), out_len) };
        let result = unsafe { ranges::uninitialized_copy(input, output) };

        let count = source.len().min(out_len);
        prop_assert_eq!(result.input, input.first().cast_const().wrapping_add(count));
        prop_assert_eq!(result.output, output.first().wrapping_add(count));
        prop_assert_eq!(unsafe { slots.assume_init_ref(count) }, &source[..count]);
    }

    #[test]
    fn const_and_runtime_copy_agree(
        source in prop::collection::vec(any::<i16>(), 0..CAP),
        out_len in 0..CAP,
    ) {
        let mut a = SlotArray::<i16, CAP>::new();
        let mut b = SlotArray::<i16, CAP>::new();
        let first = source.as_ptr();
        let last = first.wrapping_add(source.len());
        let (oa, ob) = (a.as_mut_ptr(), b.as_mut_ptr());

        let runtime = unsafe {
            ranges::uninitialized_copy((first.cast_mut(), last), (oa, oa.add(out_len)))
        };
        let constant = unsafe {
            trivial::uninitialized_copy_bounded(first, last, ob, ob.add(out_len))
        };

        let count = source.len().min(out_len);
        prop_assert_eq!(runtime.input, constant.input);
        prop_assert_eq!(unsafe { runtime.output.offset_from(oa) }, unsafe {
            constant.output.offset_from(ob)
        });
        prop_assert_eq!(unsafe { a.assume_init_ref(count) }, unsafe { b.assume_init_ref(count) });
    }

    #[test]
    fn fill_is_uniform(value in any::<u64>(), n in 0..CAP) {
        let mut slots = [MaybeUninit::<u64>::uninit(); CAP];
        let first = slots.as_mut_ptr().cast::<u64>();
        let end = unsafe { memory::uninitialized_fill_n(first, n, &value) };

        prop_assert_eq!(end, first.wrapping_add(n));
        let uniform = slots[..n].iter().all(|slot| unsafe { slot.assume_init() } == value);
        prop_assert!(uniform);
    }

    #[test]
    fn move_transfers_ownership(len in 0..CAP, out_len in 0..CAP) {
        let mut source = SlotArray::<Noisy, CAP>::new();
        let mut target = SlotArray::<Noisy, CAP>::new();
        let input = unsafe { RawRange::from_count(source.as_mut_ptr(), len) };
        unsafe {
            memory::uninitialized_construct_with_n(input.first(), len, |i| {
                Noisy(u32::try_from(i).unwrap())
            });
        }
        let before = drops();

        let output = unsafe { RawRange::from_count(target.as_mut_ptr(), out_len) };
        let result = unsafe { ranges::uninitialized_move(input, output) };
        let moved = len.min(out_len);

        // Moving never destroys anything.
        prop_assert_eq!(drops(), before);
        prop_assert_eq!(result.input, input.first().wrapping_add(moved));

        let moved_items = unsafe { target.assume_init_mut(moved) };
        let in_order = moved_items
            .iter()
            .enumerate()
            .all(|(i, item)| usize::try_from(item.0) == Ok(i));
        prop_assert!(in_order);
        unsafe {
            core::ptr::drop_in_place(moved_items);
            let rest = RawRange::new_unchecked(result.input, input.last());
            let rest = core::slice::from_raw_parts_mut(rest.first(), rest.len());
            core::ptr::drop_in_place(rest);
        }
        prop_assert_eq!(drops(), before + len);
    }
}
