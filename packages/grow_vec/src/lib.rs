//! A contiguous growable array built directly on raw element storage.
//!
//! This crate provides [`GrowVec`], a dynamic array that keeps "allocated capacity" and
//! "live, constructed content" as two explicitly separate notions. The backing region is
//! raw uninitialized memory owned by a move-only storage handle; the container layers
//! construction, destruction and relocation on top of it and keeps the two notions
//! consistent under every mutation.
//!
//! # Key Features
//!
//! - **Contiguous storage**: The live elements form one slice, with all the slice
//!   machinery available through `Deref`
//! - **Amortized O(1) append**: Capacity doubles on growth, bounding total relocation
//!   cost across any append sequence to linear
//! - **In-place construction**: [`push_with()`](GrowVec::push_with) and
//!   [`insert_with()`](GrowVec::insert_with) construct elements directly inside their
//!   final slot, at any position
//! - **Value semantics**: O(1) moves and swaps; element-wise [`Clone`] with an
//!   allocation-reusing `clone_from`
//! - **Unwind safety throughout**: A panicking element constructor, clone or default
//!   never leaves the container in an inconsistent state, and growth paths discard
//!   only the partially built replacement region
//! - **Thread mobility**: The container can move between threads whenever its element
//!   type can (but is not internally synchronized)
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```rust
//! use grow_vec::GrowVec;
//!
//! let mut values = GrowVec::new();
//!
//! for value in 1..=5 {
//!     values.push(value);
//! }
//!
//! assert_eq!(values.as_slice(), &[1, 2, 3, 4, 5]);
//! assert_eq!(values.capacity(), 8);
//!
//! values.insert(0, 0);
//! assert_eq!(values.remove(3), 3);
//! assert_eq!(values.as_slice(), &[0, 1, 2, 4, 5]);
//! ```
//!
//! ## In-place construction
//!
//! ```rust
//! use grow_vec::GrowVec;
//!
//! let mut lines = GrowVec::<String>::new();
//!
//! // SAFETY: The closure fully initializes the slot.
//! let line = unsafe {
//!     lines.push_with(|slot| {
//!         _ = slot.write(String::from("built in place"));
//!     })
//! };
//!
//! line.push_str(", then extended");
//!
//! assert_eq!(lines.as_slice(), &["built in place, then extended"]);
//! ```

mod grow_vec;
mod raw_storage;

pub use grow_vec::GrowVec;
pub(crate) use raw_storage::RawStorage;
