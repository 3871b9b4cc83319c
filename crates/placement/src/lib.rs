//! Object-lifetime-safe algorithms over uninitialized memory.
//!
//! This crate provides the primitives that bring a value into existence at a
//! raw address ("placement"), and bulk algorithms that do so over a range of
//! raw slots. It never allocates or frees storage: the storage always belongs
//! to a collaborator such as a stack buffer, an allocator-provided block or a
//! field of another object. The crate is `no_std` compatible.
//!
//! # Layers
//!
//! ## Placement primitives
//!
//! - [`construct_at`]: direct-initializes a `T` at an address from a value.
//! - [`construct_at_with`]: direct-initializes a `T` from a constructor
//!   closure.
//! - [`value_construct_at`]: zero-argument construction. Trivial types are
//!   zeroed.
//! - [`default_construct_at`]: default-initialization. Trivial types keep
//!   their storage untouched, so their value is indeterminate.
//!
//! ## Bulk algorithms
//!
//! Five families (default-construct, value-construct, copy, move, fill), each
//! in three shapes:
//!
//! | Module | Shape | Safety |
//! |--------|-------|--------|
//! | [`memory`] | `[first, last)` pointer pairs and `(first, n)` counts | `unsafe` |
//! | [`ranges`] | range objects with explicit output bounds | `unsafe` |
//! | [`slice`] | `&mut [MaybeUninit<T>]` outputs | safe |
//!
//! [`trivial`] repeats the pointer shapes as `const fn` for [`Trivial`]
//! element types.
//!
//! ## Contract layer
//!
//! [`cursor`] holds the iteration core shared by every bulk algorithm and the
//! [`RawRange`] descriptor; [`result`] holds [`InOutResult`]; [`error`] holds
//! the error types.
//!
//! # Example
//!
//! ```rust
//! use core::mem::MaybeUninit;
//!
//! use placement::memory;
//!
//! let source = [String::from("a"), String::from("b"), String::from("c")];
//! let mut slots = [const { MaybeUninit::<String>::uninit() }; 3];
//!
//! let dest = slots.as_mut_ptr().cast::<String>();
//! unsafe {
//!     let end = memory::uninitialized_copy(
//!         source.as_ptr(),
//!         source.as_ptr().add(source.len()),
//!         dest,
//!     );
//!     assert_eq!(end, dest.add(3));
//!     assert_eq!((*dest.add(1)).as_str(), "b");
//!
//!     // Destruction is the collaborator's business.
//!     core::ptr::drop_in_place(core::ptr::slice_from_raw_parts_mut(dest, 3));
//! }
//! ```
//!
//! # Constant evaluation
//!
//! Every algorithm in [`trivial`] is a `const fn` and may run inside a `const`
//! or `static` initializer, provided the slots come from storage created within
//! the same evaluation (such as a local [`SlotArray`]). Writing through a
//! pointer to storage from outside the evaluation is rejected by the compiler.
//!
//! ```rust
//! use placement::{SlotArray, trivial};
//!
//! const SQUARES: [u32; 4] = {
//!     let source = [1, 4, 9, 16];
//!     let mut slots = SlotArray::<u32, 4>::new();
//!     unsafe {
//!         trivial::uninitialized_copy(
//!             source.as_ptr(),
//!             source.as_ptr().add(4),
//!             slots.as_mut_ptr(),
//!         );
//!         slots.assume_init()
//!     }
//! };
//! assert_eq!(SQUARES, [1, 4, 9, 16]);
//! ```
//!
//! Default-initialization behaves the same in both evaluation modes: the
//! storage of a trivial type is left indeterminate, so reading it is rejected
//! during constant evaluation exactly as it is undefined at run time.
//!
//! ```rust,compile_fail
//! use core::mem::MaybeUninit;
//!
//! use placement::trivial;
//!
//! static READS_ZERO: bool = {
//!     let mut slot = MaybeUninit::<u32>::uninit();
//!     unsafe {
//!         trivial::default_construct_at(slot.as_mut_ptr());
//!         slot.assume_init() == 0
//!     }
//! };
//! ```
//!
//! Value-initialization, on the other hand, is guaranteed to produce zero:
//!
//! ```rust
//! use core::mem::MaybeUninit;
//!
//! use placement::trivial;
//!
//! static READS_ZERO: bool = {
//!     let mut slot = MaybeUninit::<u32>::uninit();
//!     unsafe {
//!         trivial::value_construct_at(slot.as_mut_ptr());
//!         slot.assume_init() == 0
//!     }
//! };
//! assert!(READS_ZERO);
//! ```
//!
//! # Failure semantics
//!
//! If constructing an element panics, the panic propagates unchanged. The
//! algorithms never roll back: destination slots constructed before the panic
//! hold live objects, and for the move family the source slots consumed so far
//! are raw again. Cleaning up is the caller's job. The `try_*` forms in
//! [`memory`] report a failed construction as a [`ConstructError`] carrying the
//! number of slots already constructed.
//!
//! # Features
//!
//! - `alloc` (default): [`DefaultInit`]/[`ValueInit`] for `String`, `Vec<T>`
//!   and other `alloc` collections.
//! - `derive` (default): `#[derive(Trivial)]` and `#[derive(DefaultInit)]`.
//! - `tracing`: emit a trace event per bulk call.
//! - `error-with-location`: record where a [`RangeError`] was created.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "derive")]
pub use placement_derive::{DefaultInit, Trivial};

pub use self::{
    cursor::{Counted, RawRange, Sentinel, SlotRange, Unreachable},
    error::{ConstructError, Location, RangeError, RangeErrorKind},
    init::{DefaultInit, Trivial, ValueInit},
    primitive::{
        construct_at, construct_at_with, default_construct_at, try_construct_at_with,
        value_construct_at,
    },
    result::InOutResult,
    storage::SlotArray,
};

#[macro_use]
mod macros;
#[macro_use]
mod log;

pub mod cursor;
pub mod error;
pub mod init;
pub mod memory;
pub mod primitive;
pub mod ranges;
pub mod result;
pub mod slice;
pub mod storage;
pub mod trivial;

/// Version token announcing that the algorithms in [`trivial`] are `const fn`.
///
/// Collaborators that build containers during constant evaluation can compare
/// against this value at build time, e.g.
/// `const _: () = assert!(placement::CONSTEXPR_MEMORY_ALGORITHMS >= 202_411);`.
pub const CONSTEXPR_MEMORY_ALGORITHMS: u32 = 202_411;
