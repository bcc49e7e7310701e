use std::alloc::{Layout, alloc, dealloc};
use std::any::type_name;
use std::ptr::NonNull;

/// This is the backing storage of a `GrowVec`. It is currently an implementation detail,
/// though could conceivably be made public in the future to support fixed-size buffer needs.
///
/// Owns one heap region sized for a fixed number of slots of `T` and nothing more. The
/// region is never implicitly initialized - every slot is uninitialized memory until some
/// owner above writes a value into it, and the storage has no idea which slots hold live
/// values at any given time. Destroying those values before this storage is dropped or
/// replaced is entirely the owner's responsibility; `Drop` here releases the allocation
/// without running any element destructors.
///
/// Ownership of the region is exclusive. There is deliberately no copy path - the storage
/// moves, and two instances can trade regions via `mem::swap`, but the same allocation is
/// never reachable from two instances at once.
#[derive(Debug)]
pub(crate) struct RawStorage<T> {
    /// Base of the region. Dangling (but well-aligned and non-null) when `capacity` is
    /// zero, so it remains usable for zero-length slice views.
    first_slot_ptr: NonNull<T>,

    /// Total number of slots in the region, whether or not they hold live values.
    capacity: usize,
}

impl<T> RawStorage<T> {
    /// Creates storage with the requested number of slots, allocating immediately.
    ///
    /// A capacity of zero never touches the allocator.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized or if the allocation cannot be satisfied.
    #[must_use]
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(
            size_of::<T>() > 0,
            "RawStorage must have non-zero item size"
        );

        if capacity == 0 {
            return Self {
                first_slot_ptr: NonNull::dangling(),
                capacity: 0,
            };
        }

        // SAFETY: The layout is non-zero-sized because both the item size (guarded by the
        // assertion above) and the capacity (guarded by the early return above) are non-zero.
        let first_slot_ptr = NonNull::new(unsafe { alloc(Self::layout(capacity)).cast::<T>() })
            .expect(
                "we do not intend to handle allocation failure as a real possibility - OOM is panic",
            );

        Self {
            first_slot_ptr,
            capacity,
        }
    }

    #[must_use]
    fn layout(capacity: usize) -> Layout {
        Layout::array::<T>(capacity).expect("simple flat array layout must be calculable")
    }

    /// The number of slots in the region.
    #[must_use]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Base pointer of the region.
    ///
    /// Valid for zero-length reads and writes even when the capacity is zero.
    #[must_use]
    pub(crate) fn first_slot_ptr(&self) -> NonNull<T> {
        self.first_slot_ptr
    }

    /// Pointer to the slot at `offset`.
    ///
    /// `offset == capacity` is explicitly allowed - the one-past-end pointer is a valid
    /// range boundary, just not valid to dereference.
    ///
    /// # Safety
    ///
    /// The caller must ensure `offset <= capacity`. This is checked by an assertion in
    /// debug builds only.
    #[must_use]
    pub(crate) unsafe fn slot_ptr(&self, offset: usize) -> NonNull<T> {
        debug_assert!(
            offset <= self.capacity,
            "slot offset {offset} out of bounds in storage of {} with capacity {}",
            type_name::<T>(),
            self.capacity
        );

        // SAFETY: The caller guarantees `offset <= capacity`, so the result stays within
        // the allocated region or exactly one slot past its end.
        unsafe { self.first_slot_ptr.add(offset) }
    }
}

impl<T> Drop for RawStorage<T> {
    fn drop(&mut self) {
        if self.capacity == 0 {
            // Nothing was ever allocated.
            return;
        }

        // SAFETY: The layout must match between alloc and dealloc. It does - both are
        // derived from the same capacity, which never changes after construction.
        unsafe {
            dealloc(self.first_slot_ptr.as_ptr().cast(), Self::layout(self.capacity));
        }
    }
}

// SAFETY: Yes, there are raw pointers involved here but the storage holds no live values
// of its own - it is inert memory plus a capacity. As long as T itself can move between
// threads, so can the region that will hold values of T.
unsafe impl<T: Send> Send for RawStorage<T> {}

// SAFETY: Shared references to the storage only expose the capacity and pointer values,
// never the (uninitialized) contents, so the same reasoning as for `Send` applies.
unsafe impl<T: Sync> Sync for RawStorage<T> {}

#[cfg(test)]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::arithmetic_side_effects,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::mem;

    use static_assertions::assert_not_impl_any;

    use super::*;

    // Region ownership is exclusive, so the storage must never grow a copy path.
    assert_not_impl_any!(RawStorage<u32>: Clone);

    #[test]
    fn zero_capacity_allocates_nothing() {
        let storage = RawStorage::<u32>::new(0);

        assert_eq!(storage.capacity(), 0);
    }

    #[test]
    fn allocates_requested_slot_count() {
        let storage = RawStorage::<u64>::new(4);

        assert_eq!(storage.capacity(), 4);
    }

    #[test]
    fn slots_are_writable_and_readable() {
        let storage = RawStorage::<usize>::new(3);

        for offset in 0..3 {
            unsafe { storage.slot_ptr(offset).write(offset * 10) };
        }

        for offset in 0..3 {
            assert_eq!(unsafe { storage.slot_ptr(offset).read() }, offset * 10);
        }
    }

    #[test]
    fn one_past_end_offset_is_allowed() {
        let storage = RawStorage::<u32>::new(2);

        let end_ptr = unsafe { storage.slot_ptr(2) };

        let distance = unsafe {
            end_ptr
                .as_ptr()
                .offset_from(storage.first_slot_ptr().as_ptr())
        };
        assert_eq!(distance, 2);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic]
    fn offset_beyond_capacity_is_contract_violation() {
        let storage = RawStorage::<u32>::new(2);

        _ = unsafe { storage.slot_ptr(3) };
    }

    #[test]
    fn swap_exchanges_regions() {
        let mut first = RawStorage::<u32>::new(1);
        let mut second = RawStorage::<u32>::new(5);

        mem::swap(&mut first, &mut second);

        assert_eq!(first.capacity(), 5);
        assert_eq!(second.capacity(), 1);
    }

    #[test]
    fn replace_leaves_empty_state_behind() {
        let mut storage = RawStorage::<u32>::new(3);

        let taken = mem::replace(&mut storage, RawStorage::new(0));

        assert_eq!(taken.capacity(), 3);
        assert_eq!(storage.capacity(), 0);
    }

    #[test]
    fn values_survive_a_swap() {
        let mut first = RawStorage::<u32>::new(1);
        let mut second = RawStorage::<u32>::new(1);

        unsafe { first.slot_ptr(0).write(7) };
        unsafe { second.slot_ptr(0).write(8) };

        mem::swap(&mut first, &mut second);

        assert_eq!(unsafe { first.slot_ptr(0).read() }, 8);
        assert_eq!(unsafe { second.slot_ptr(0).read() }, 7);
    }

    #[test]
    #[should_panic]
    fn zst_is_panic() {
        drop(RawStorage::<()>::new(1));
    }
}
