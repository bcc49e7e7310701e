use std::any::type_name;
use std::mem::MaybeUninit;
use std::ops::{Deref, DerefMut};
use std::{ptr, slice};

use crate::RawStorage;

/// A contiguous growable array built directly on raw element storage.
///
/// The container owns a single raw region of element slots and tracks how many of those
/// slots currently hold live values. The live values always occupy the logical indices
/// `[0, len)`; the slots `[len, capacity)` are uninitialized memory that has never been
/// (or is no longer) home to a value. Every mutation keeps those two ranges consistent:
/// growth replaces the region with a larger one and relocates the live values into it,
/// insertion and removal shift the live range, and destruction drops the live values
/// before the region is released.
///
/// There are multiple ways to add items to the collection:
///
/// * [`push()`][Self::push] / [`insert()`][Self::insert] - move a finished value into
///   place. This is the simplest way to add an item.
/// * [`push_with()`][Self::push_with] / [`insert_with()`][Self::insert_with] - construct
///   the value in place inside its final slot, which avoids moving large or complex
///   values through the stack.
///
/// Appending is amortized O(1): when the region is full, its capacity doubles (starting
/// from 1), so the total relocation cost across any sequence of appends stays linear.
///
/// # Value semantics
///
/// The container moves in O(1) without touching its elements, and `mem::swap` exchanges
/// the full contents of two containers in O(1). [`Clone`] performs an element-wise copy
/// into independent storage sized exactly for the source's length, and `clone_from`
/// reuses the existing allocation whenever it is large enough.
///
/// # Reference invalidation
///
/// Any operation that grows the region or shifts the live range moves values in memory.
/// The borrow checker enforces the corresponding invalidation contract at compile time:
/// no reference into the container can be held across a mutating call.
///
/// # Example
///
/// ```rust
/// use grow_vec::GrowVec;
///
/// let mut values = GrowVec::new();
///
/// values.push(1);
/// values.push(2);
/// let three = values.push(3);
/// *three += 39;
///
/// assert_eq!(values.as_slice(), &[1, 2, 42]);
///
/// values.insert(1, 7);
/// assert_eq!(values.as_slice(), &[1, 7, 2, 42]);
///
/// assert_eq!(values.remove(2), 2);
/// assert_eq!(values.pop(), Some(42));
/// assert_eq!(values.as_slice(), &[1, 7]);
/// ```
#[derive(Debug)]
pub struct GrowVec<T> {
    /// Backing region. Replaced wholesale whenever the container grows - the old region
    /// is released only after the live values have been relocated out of it.
    storage: RawStorage<T>,

    /// Number of live values at the front of the region. Never exceeds the capacity.
    len: usize,
}

impl<T> GrowVec<T> {
    /// Creates an empty container without allocating.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grow_vec::GrowVec;
    ///
    /// let values = GrowVec::<String>::new();
    ///
    /// assert_eq!(values.len(), 0);
    /// assert_eq!(values.capacity(), 0);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    #[must_use]
    pub fn new() -> Self {
        assert!(size_of::<T>() > 0, "GrowVec must have non-zero item size");

        Self {
            storage: RawStorage::new(0),
            len: 0,
        }
    }

    /// Creates a container holding `len` default-constructed elements, in storage of
    /// exactly that capacity.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grow_vec::GrowVec;
    ///
    /// let values = GrowVec::<u64>::with_len(4);
    ///
    /// assert_eq!(values.as_slice(), &[0, 0, 0, 0]);
    /// assert_eq!(values.capacity(), 4);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    #[must_use]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut values = Self::new();
        values.resize(len);
        values
    }

    /// The number of live elements in the container.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Can be mutated to infinitely growing memory use.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the container holds no elements.
    ///
    /// An empty container may still be holding unused capacity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of elements the container can hold without reallocating.
    ///
    /// This is the total capacity, including the slots already occupied by live elements.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// The live elements as a contiguous slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The live range [0, len) holds initialized values by the container
        // invariant, and the base pointer is non-null and aligned even when empty.
        unsafe { slice::from_raw_parts(self.storage.first_slot_ptr().as_ptr(), self.len) }
    }

    /// The live elements as a contiguous mutable slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: As in `as_slice`; we hold an exclusive reference to the container,
        // so no other reference into the live range can exist.
        unsafe { slice::from_raw_parts_mut(self.storage.first_slot_ptr().as_ptr(), self.len) }
    }

    /// Iterates over shared references to the live elements.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterates over exclusive references to the live elements.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Ensures the capacity is at least `min_capacity`, reallocating if it is not.
    ///
    /// Note that unlike `Vec::reserve`, the argument is the total target capacity, not
    /// an additional element count. Does nothing if the current capacity is already
    /// sufficient; otherwise allocates a fresh region of exactly `min_capacity` slots,
    /// relocates the live elements into it and releases the old region.
    ///
    /// If the new region cannot be allocated, the resulting panic unwinds with the
    /// container unchanged - the old region is only released after a successful
    /// relocation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grow_vec::GrowVec;
    ///
    /// let mut values = GrowVec::new();
    /// values.push(1);
    ///
    /// values.reserve(100);
    ///
    /// assert_eq!(values.capacity(), 100);
    /// assert_eq!(values.as_slice(), &[1]);
    /// ```
    pub fn reserve(&mut self, min_capacity: usize) {
        if min_capacity <= self.capacity() {
            return;
        }

        let new_storage = RawStorage::new(min_capacity);

        // SAFETY: The regions are distinct allocations and both are sized for at least
        // `len` elements. The live values transfer to the new region bitwise - after
        // this, the old region no longer holds anything that needs destroying.
        unsafe {
            ptr::copy_nonoverlapping(
                self.storage.first_slot_ptr().as_ptr(),
                new_storage.first_slot_ptr().as_ptr(),
                self.len,
            );
        }

        // Adopt the new region; the old one is released without running any element
        // destructors because the values now live elsewhere.
        self.storage = new_storage;
    }

    /// Grows or shrinks the container to exactly `new_len` elements.
    ///
    /// Growing default-constructs the added range; shrinking destroys the excess tail.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grow_vec::GrowVec;
    ///
    /// let mut values = GrowVec::new();
    /// values.push(1);
    /// values.push(2);
    ///
    /// values.resize(4);
    /// assert_eq!(values.as_slice(), &[1, 2, 0, 0]);
    ///
    /// values.resize(1);
    /// assert_eq!(values.as_slice(), &[1]);
    /// ```
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        if new_len > self.len {
            self.reserve(new_len);

            while self.len < new_len {
                // SAFETY: len < new_len <= capacity after the reserve above, so the slot
                // is in bounds and not part of the live range.
                let slot_ptr = unsafe { self.storage.slot_ptr(self.len) };

                // SAFETY: The slot is uninitialized and exclusively ours. Advancing `len`
                // only after the write means a panicking `T::default()` unwinds with the
                // container still consistent.
                unsafe { slot_ptr.write(T::default()) };

                self.len = self
                    .len
                    .checked_add(1)
                    .expect("guarded by len < new_len, which fits in usize");
            }
        } else {
            self.truncate(new_len);
        }
    }

    /// Destroys the tail elements `[new_len, len)`, keeping capacity as it is.
    ///
    /// Does nothing if `new_len` is not less than the current length.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }

        let tail_len = self
            .len
            .checked_sub(new_len)
            .expect("guarded by new_len < len above");

        // Shorten the live range before destroying anything so a panicking element
        // destructor cannot lead to a second drop of the tail.
        self.len = new_len;

        // SAFETY: new_len < the old len <= capacity, so the tail start is in bounds.
        let tail_ptr = unsafe { self.storage.slot_ptr(new_len) };

        // SAFETY: The tail slots held live values that are no longer part of the live
        // range, so this drops each of them exactly once.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(tail_ptr.as_ptr(), tail_len));
        }
    }

    /// Destroys every live element, keeping capacity as it is.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Appends a value, growing the capacity if the container is full.
    ///
    /// Returns an exclusive reference to the element in its final slot.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grow_vec::GrowVec;
    ///
    /// let mut values = GrowVec::new();
    ///
    /// for value in 1..=5 {
    ///     values.push(value);
    /// }
    ///
    /// assert_eq!(values.as_slice(), &[1, 2, 3, 4, 5]);
    /// assert_eq!(values.capacity(), 8);
    /// ```
    pub fn push(&mut self, value: T) -> &mut T {
        // SAFETY: The closure fully initializes the slot by writing `value` into it.
        unsafe {
            self.push_with(move |slot| {
                _ = slot.write(value);
            })
        }
    }

    /// Appends an element constructed in place inside its final slot.
    ///
    /// This can be more efficient than constructing the value separately and then moving
    /// it into the container, especially for large or complex types.
    ///
    /// Returns an exclusive reference to the new element.
    ///
    /// # Safety
    ///
    /// The closure must fully initialize the slot before returning normally. It may
    /// panic instead, in which case the container is left exactly as it was; any value
    /// the closure placed in the slot before panicking is abandoned without being
    /// dropped.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grow_vec::GrowVec;
    ///
    /// let mut values = GrowVec::<String>::new();
    ///
    /// // SAFETY: The closure fully initializes the slot.
    /// let value = unsafe {
    ///     values.push_with(|slot| {
    ///         _ = slot.write("constructed in place".to_string());
    ///     })
    /// };
    ///
    /// assert_eq!(value, "constructed in place");
    /// ```
    pub unsafe fn push_with(&mut self, f: impl FnOnce(&mut MaybeUninit<T>)) -> &mut T {
        if self.len == self.capacity() {
            // SAFETY: Forwarding the initialization contract to the caller.
            return unsafe { self.grow_push_with(f) };
        }

        // SAFETY: len < capacity, so this slot is in bounds and outside the live range.
        let slot_ptr = unsafe { self.storage.slot_ptr(self.len) };

        // SAFETY: The slot holds no live value and we have exclusive access through
        // `&mut self`. If the closure panics before initializing, `len` has not moved,
        // so the container remains consistent.
        f(unsafe { slot_ptr.cast::<MaybeUninit<T>>().as_mut() });

        self.len = self
            .len
            .checked_add(1)
            .expect("guarded by len < capacity, which fits in usize");

        // SAFETY: The closure initialized the slot per this method's contract.
        unsafe { slot_ptr.cast::<T>().as_mut() }
    }

    /// Inserts a value before the element at `index`, shifting everything from `index`
    /// onward one slot toward the back.
    ///
    /// `index == len` is exactly an append. Grows the capacity if the container is full.
    /// Returns an exclusive reference to the element in its final slot.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grow_vec::GrowVec;
    ///
    /// let mut values = GrowVec::new();
    /// values.push("a".to_string());
    /// values.push("b".to_string());
    ///
    /// values.insert(1, "x".to_string());
    ///
    /// assert_eq!(values.as_slice(), &["a", "x", "b"]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        // SAFETY: The closure fully initializes the slot by writing `value` into it.
        unsafe {
            self.insert_with(index, move |slot| {
                _ = slot.write(value);
            })
        }
    }

    /// Inserts an element constructed in place inside its final slot, before the element
    /// at `index`.
    ///
    /// `index == len` is exactly an append. Grows the capacity if the container is full.
    /// Returns an exclusive reference to the new element.
    ///
    /// # Safety
    ///
    /// The closure must fully initialize the slot before returning normally. It may
    /// panic instead, in which case the container is left exactly as it was; any value
    /// the closure placed in the slot before panicking is abandoned without being
    /// dropped.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub unsafe fn insert_with(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut MaybeUninit<T>),
    ) -> &mut T {
        assert!(
            index <= self.len,
            "insert index {index} out of bounds in GrowVec of {} with length {}",
            type_name::<T>(),
            self.len
        );

        if index == self.len {
            // SAFETY: Forwarding the initialization contract to the caller.
            return unsafe { self.push_with(f) };
        }

        if self.len == self.capacity() {
            // SAFETY: Forwarding the initialization contract to the caller.
            return unsafe { self.grow_insert_with(index, f) };
        }

        let tail_len = self
            .len
            .checked_sub(index)
            .expect("guarded by index < len above");

        // SAFETY: index < len <= capacity, so the gap slot is in bounds.
        let mut gap_ptr = unsafe { self.storage.slot_ptr(index) };

        // SAFETY: index + 1 <= len <= capacity, a valid (possibly one-past-end) offset.
        let one_past_gap_ptr = unsafe { gap_ptr.add(1) };

        // Open the gap: shift [index, len) one slot toward the back. The ranges overlap
        // and slot `index` is logically uninitialized afterwards.
        // SAFETY: Source and destination both lie within the region because len < capacity.
        unsafe {
            ptr::copy(gap_ptr.as_ptr(), one_past_gap_ptr.as_ptr(), tail_len);
        }

        // If the initializer panics, shift the tail back down so the live range is
        // contiguous again and the container is exactly as it was before the call.
        let restore_tail = scopeguard::guard((), move |()| {
            // SAFETY: The shifted tail still holds the only live copies of these values.
            unsafe {
                ptr::copy(one_past_gap_ptr.as_ptr(), gap_ptr.as_ptr(), tail_len);
            }
        });

        // SAFETY: The gap slot holds no live value and we have exclusive access.
        f(unsafe { gap_ptr.cast::<MaybeUninit<T>>().as_mut() });

        // Initialization succeeded - the tail stays where it is.
        scopeguard::ScopeGuard::into_inner(restore_tail);

        self.len = self
            .len
            .checked_add(1)
            .expect("guarded by len < capacity, which fits in usize");

        // SAFETY: The closure initialized the gap slot per this method's contract.
        unsafe { gap_ptr.as_mut() }
    }

    /// Removes the element at `index` and returns it, shifting everything after it one
    /// slot toward the front.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grow_vec::GrowVec;
    ///
    /// let mut values = GrowVec::new();
    /// for value in [1, 2, 3, 4] {
    ///     values.push(value);
    /// }
    ///
    /// assert_eq!(values.remove(1), 2);
    /// assert_eq!(values.as_slice(), &[1, 3, 4]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "remove index {index} out of bounds in GrowVec of {} with length {}",
            type_name::<T>(),
            self.len
        );

        // SAFETY: index < len, so the slot is in bounds.
        let removed_ptr = unsafe { self.storage.slot_ptr(index) };

        // SAFETY: The slot holds a live value, and the shift below reuses the slot for
        // its successor, so this read takes sole ownership of the value.
        let value = unsafe { removed_ptr.read() };

        let tail_len = self
            .len
            .checked_sub(index)
            .and_then(|tail| tail.checked_sub(1))
            .expect("guarded by index < len above");

        // SAFETY: index + 1 <= len <= capacity, a valid (possibly one-past-end) offset.
        let tail_ptr = unsafe { removed_ptr.add(1) };

        // Close the gap: shift (index, len) one slot toward the front. The ranges
        // overlap. The now-duplicate last slot leaves the live range via the length
        // decrement - its value must not be dropped, as it moved down a slot.
        // SAFETY: The tail lies within the live range, in bounds on both sides.
        unsafe {
            ptr::copy(tail_ptr.as_ptr(), removed_ptr.as_ptr(), tail_len);
        }

        self.len = self
            .len
            .checked_sub(1)
            .expect("guarded by index < len above");

        value
    }

    /// Removes and returns the last element, or `None` if the container is empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grow_vec::GrowVec;
    ///
    /// let mut values = GrowVec::new();
    /// values.push(1);
    ///
    /// assert_eq!(values.pop(), Some(1));
    /// assert_eq!(values.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        self.len = self
            .len
            .checked_sub(1)
            .expect("guarded by is_empty above");

        // SAFETY: Slot `len` held the last live value and is no longer part of the live
        // range after the decrement, so this read takes sole ownership.
        let last_ptr = unsafe { self.storage.slot_ptr(self.len) };

        // SAFETY: The slot holds an initialized value.
        Some(unsafe { last_ptr.read() })
    }

    /// The capacity to grow to when the current region is full.
    #[must_use]
    fn grown_capacity(&self) -> usize {
        let capacity = self.capacity();

        if capacity == 0 {
            1
        } else {
            capacity.checked_mul(2).expect(
                "doubling overflowed usize, which cannot happen for a capacity that was actually allocated",
            )
        }
    }

    /// Append-with-growth: constructs the new last element into the replacement region
    /// first, then relocates the existing values and adopts the region.
    ///
    /// A panicking initializer releases only the fresh region; the container stays as
    /// it was.
    ///
    /// # Safety
    ///
    /// Same contract as [`push_with`][Self::push_with].
    unsafe fn grow_push_with(&mut self, f: impl FnOnce(&mut MaybeUninit<T>)) -> &mut T {
        let new_storage = RawStorage::new(self.grown_capacity());

        // SAFETY: len < the grown capacity, so the target slot is in bounds.
        let slot_ptr = unsafe { new_storage.slot_ptr(self.len) };

        // SAFETY: A freshly allocated region holds no live values, and nothing else can
        // reach it yet.
        f(unsafe { slot_ptr.cast::<MaybeUninit<T>>().as_mut() });

        // SAFETY: Distinct regions, both sized for at least `len` elements; the live
        // values transfer bitwise around the already-constructed new element.
        unsafe {
            ptr::copy_nonoverlapping(
                self.storage.first_slot_ptr().as_ptr(),
                new_storage.first_slot_ptr().as_ptr(),
                self.len,
            );
        }

        self.storage = new_storage;

        self.len = self
            .len
            .checked_add(1)
            .expect("guarded by len < grown capacity, which fits in usize");

        // SAFETY: The closure initialized the slot per the caller's contract.
        unsafe { slot_ptr.cast::<T>().as_mut() }
    }

    /// Insert-with-growth: constructs the new element at its final index in the
    /// replacement region first, then relocates the prefix and suffix around it and
    /// adopts the region.
    ///
    /// A panicking initializer releases only the fresh region; the container stays as
    /// it was.
    ///
    /// # Safety
    ///
    /// Same contract as [`insert_with`][Self::insert_with]. The caller must also ensure
    /// `index < len`.
    unsafe fn grow_insert_with(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut MaybeUninit<T>),
    ) -> &mut T {
        let new_storage = RawStorage::new(self.grown_capacity());

        // SAFETY: index < len < the grown capacity, so the target slot is in bounds.
        let slot_ptr = unsafe { new_storage.slot_ptr(index) };

        // SAFETY: A freshly allocated region holds no live values, and nothing else can
        // reach it yet.
        f(unsafe { slot_ptr.cast::<MaybeUninit<T>>().as_mut() });

        let suffix_len = self
            .len
            .checked_sub(index)
            .expect("guarded by index < len in the caller");

        let suffix_target = index
            .checked_add(1)
            .expect("guarded by index < len, which fits in usize");

        // SAFETY: index < len, so the suffix start is within the old region.
        let old_suffix_ptr = unsafe { self.storage.slot_ptr(index) };

        // SAFETY: index + 1 + suffix_len == len + 1 <= the grown capacity.
        let new_suffix_ptr = unsafe { new_storage.slot_ptr(suffix_target) };

        // SAFETY: Distinct regions; the prefix [0, index) lands below the new element.
        unsafe {
            ptr::copy_nonoverlapping(
                self.storage.first_slot_ptr().as_ptr(),
                new_storage.first_slot_ptr().as_ptr(),
                index,
            );
        }

        // SAFETY: Distinct regions; the suffix [index, len) lands one slot past the new
        // element. For an insert just before the last element this relocates exactly one
        // value, same as the non-growing path shifts exactly one.
        unsafe {
            ptr::copy_nonoverlapping(old_suffix_ptr.as_ptr(), new_suffix_ptr.as_ptr(), suffix_len);
        }

        self.storage = new_storage;

        self.len = self
            .len
            .checked_add(1)
            .expect("guarded by len < grown capacity, which fits in usize");

        // SAFETY: The closure initialized the slot per the caller's contract.
        unsafe { slot_ptr.cast::<T>().as_mut() }
    }
}

impl<T> Drop for GrowVec<T> {
    fn drop(&mut self) {
        let live_ptr = self.storage.first_slot_ptr().as_ptr();

        // SAFETY: The live range [0, len) holds initialized values; each is dropped
        // exactly once here, after which the storage releases the region without
        // touching element lifecycles.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(live_ptr, self.len));
        }
    }
}

impl<T> Default for GrowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for GrowVec<T> {
    /// Clones into independent storage sized exactly for the source's length.
    ///
    /// If an element clone panics, the partially built copy destroys its completed
    /// prefix and releases its region during unwind; the source is never touched.
    fn clone(&self) -> Self {
        let mut copy = Self {
            storage: RawStorage::new(self.len),
            len: 0,
        };

        for value in self {
            // SAFETY: copy.len < self.len == the copy's capacity, so the slot is in
            // bounds and uninitialized.
            let slot_ptr = unsafe { copy.storage.slot_ptr(copy.len) };

            // SAFETY: Writing an owned value into an uninitialized in-bounds slot.
            // Advancing `len` only afterwards means a panicking element clone unwinds
            // with `copy` internally consistent, so its own drop cleans up.
            unsafe { slot_ptr.write(value.clone()) };

            copy.len = copy
                .len
                .checked_add(1)
                .expect("guarded by len < capacity, which fits in usize");
        }

        copy
    }

    /// Clones `source` into `self`, reusing the existing allocation when it is large
    /// enough.
    ///
    /// When the allocation must grow, a complete replacement is built first so that a
    /// failed element clone leaves `self` untouched.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            *self = source.clone();
            return;
        }

        let common_len = self.len.min(source.len);

        // Overwrite the common prefix element by element, reusing element-level
        // allocations where T supports it.
        for (target, value) in self.as_mut_slice().iter_mut().zip(source) {
            target.clone_from(value);
        }

        if source.len > self.len {
            for value in source.iter().skip(common_len) {
                // SAFETY: len < source.len <= capacity, so the slot is in bounds and
                // uninitialized.
                let slot_ptr = unsafe { self.storage.slot_ptr(self.len) };

                // SAFETY: Writing an owned value into an uninitialized in-bounds slot;
                // `len` advances only after the write.
                unsafe { slot_ptr.write(value.clone()) };

                self.len = self
                    .len
                    .checked_add(1)
                    .expect("guarded by len < source length, which fits in usize");
            }
        } else {
            self.truncate(source.len);
        }
    }
}

impl<T> Deref for GrowVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for GrowVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<'v, T> IntoIterator for &'v GrowVec<T> {
    type Item = &'v T;
    type IntoIter = slice::Iter<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'v, T> IntoIterator for &'v mut GrowVec<T> {
    type Item = &'v mut T;
    type IntoIter = slice::IterMut<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::cell::Cell;
    use std::mem;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(GrowVec<u32>: Send, Sync);
    assert_not_impl_any!(GrowVec<Rc<u32>>: Send, Sync);

    /// Counts how many times a value (or any of its clones) has been dropped.
    struct Droppable {
        drops: Rc<Cell<usize>>,
    }

    impl Droppable {
        fn new(drops: &Rc<Cell<usize>>) -> Self {
            Self {
                drops: Rc::clone(drops),
            }
        }
    }

    impl Drop for Droppable {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn smoke_test() {
        let mut values = GrowVec::new();

        assert_eq!(values.len(), 0);
        assert_eq!(values.capacity(), 0);
        assert!(values.is_empty());

        values.push(1);
        values.push(2);
        values.push(3);

        assert_eq!(values.as_slice(), &[1, 2, 3]);
        assert!(!values.is_empty());

        assert_eq!(values.pop(), Some(3));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn push_follows_doubling_sequence() {
        let mut values = GrowVec::new();
        let mut observed_capacities = Vec::new();

        for value in 1..=5 {
            values.push(value);
            observed_capacities.push(values.capacity());
        }

        assert_eq!(observed_capacities, [1, 2, 4, 4, 8]);
        assert_eq!(values.len(), 5);
        assert_eq!(values.as_slice(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn growth_preserves_order_and_contents() {
        let mut values = GrowVec::new();

        for value in 0..100 {
            values.push(value.to_string());
        }

        for (index, value) in values.iter().enumerate() {
            assert_eq!(*value, index.to_string());
        }

        assert_eq!(values.len(), 100);
        assert_eq!(values.capacity(), 128);
    }

    #[test]
    fn push_returns_reference_to_new_element() {
        let mut values = GrowVec::new();

        let value = values.push(5);
        *value += 1;

        assert_eq!(values.as_slice(), &[6]);
    }

    #[test]
    fn with_len_value_constructs_defaults() {
        let values = GrowVec::<u64>::with_len(4);

        assert_eq!(values.as_slice(), &[0, 0, 0, 0]);
        assert_eq!(values.capacity(), 4);
    }

    #[test]
    fn reserve_is_noop_when_capacity_sufficient() {
        let mut values = GrowVec::new();
        values.push(1);
        values.reserve(10);

        values.reserve(2);

        assert_eq!(values.capacity(), 10);
    }

    #[test]
    fn reserve_relocates_live_elements() {
        let mut values = GrowVec::new();
        values.push("a".to_string());
        values.push("b".to_string());

        values.reserve(100);

        assert_eq!(values.capacity(), 100);
        assert_eq!(values.as_slice(), &["a", "b"]);
    }

    #[test]
    fn resize_then_shrink_preserves_prefix() {
        let mut values = GrowVec::new();
        for value in 1..=5 {
            values.push(value);
        }

        values.resize(3);
        assert_eq!(values.as_slice(), &[1, 2, 3]);

        values.resize(5);
        assert_eq!(values.as_slice(), &[1, 2, 3, 0, 0]);
    }

    #[test]
    fn insert_in_middle_shifts_tail() {
        let mut values = GrowVec::new();
        for value in [10, 20, 30, 40] {
            values.push(value);
        }
        values.reserve(8);

        values.insert(2, 99);

        assert_eq!(values.as_slice(), &[10, 20, 99, 30, 40]);
    }

    #[test]
    fn insert_at_end_is_append() {
        let mut values = GrowVec::new();
        values.push(1);

        values.insert(1, 2);

        assert_eq!(values.as_slice(), &[1, 2]);
    }

    #[test]
    fn insert_into_full_container_grows() {
        let mut values = GrowVec::new();
        values.push("a".to_string());
        values.push("b".to_string());
        assert_eq!(values.capacity(), 2);

        values.insert(1, "x".to_string());

        assert_eq!(values.as_slice(), &["a", "x", "b"]);
        assert!(values.capacity() >= 3);
    }

    #[test]
    fn insert_before_last_without_growth_shifts_one_element() {
        let mut values = GrowVec::new();
        values.reserve(4);
        for value in [1, 2, 3] {
            values.push(value);
        }

        values.insert(2, 99);

        assert_eq!(values.as_slice(), &[1, 2, 99, 3]);
    }

    #[test]
    fn insert_before_last_with_growth_relocates_one_element() {
        let mut values = GrowVec::new();
        for value in [1, 2, 3, 4] {
            values.push(value);
        }
        assert_eq!(values.len(), values.capacity());

        values.insert(3, 99);

        assert_eq!(values.as_slice(), &[1, 2, 3, 99, 4]);
        assert_eq!(values.capacity(), 8);
    }

    #[test]
    fn insert_then_remove_restores_sequence() {
        let mut values = GrowVec::new();
        for value in [10, 20, 30, 40] {
            values.push(value);
        }

        values.insert(2, 99);
        assert_eq!(values.as_slice(), &[10, 20, 99, 30, 40]);

        assert_eq!(values.remove(2), 99);
        assert_eq!(values.as_slice(), &[10, 20, 30, 40]);
    }

    #[test]
    fn remove_in_middle_closes_gap() {
        let mut values = GrowVec::new();
        for value in [1, 2, 3, 4] {
            values.push(value);
        }

        assert_eq!(values.remove(1), 2);

        assert_eq!(values.as_slice(), &[1, 3, 4]);
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn remove_last_shifts_nothing() {
        let mut values = GrowVec::new();
        for value in [1, 2, 3] {
            values.push(value);
        }

        assert_eq!(values.remove(2), 3);

        assert_eq!(values.as_slice(), &[1, 2]);
    }

    #[test]
    fn pop_returns_in_reverse_order() {
        let mut values = GrowVec::new();
        values.push(1);
        values.push(2);

        assert_eq!(values.pop(), Some(2));
        assert_eq!(values.pop(), Some(1));
        assert_eq!(values.pop(), None);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut values = GrowVec::<u32>::new();

        assert_eq!(values.pop(), None);
        assert_eq!(values.len(), 0);
    }

    #[test]
    fn clone_is_element_wise_and_independent() {
        let mut source = GrowVec::new();
        source.push("a".to_string());
        source.push("b".to_string());

        let mut copy = source.clone();
        assert_eq!(copy.as_slice(), source.as_slice());
        assert_eq!(copy.capacity(), source.len());

        copy.as_mut_slice()[0].push('!');
        copy.push("c".to_string());

        assert_eq!(source.as_slice(), &["a", "b"]);
        assert_eq!(copy.as_slice(), &["a!", "b", "c"]);
    }

    #[test]
    fn clone_from_reuses_capacity() {
        let mut target = GrowVec::new();
        for value in 0..8 {
            target.push(value);
        }
        let mut source = GrowVec::new();
        source.push(100);
        source.push(101);

        target.clone_from(&source);

        assert_eq!(target.as_slice(), &[100, 101]);
        assert_eq!(target.capacity(), 8);
    }

    #[test]
    fn clone_from_grows_when_capacity_insufficient() {
        let mut target = GrowVec::new();
        target.push(1);
        let mut source = GrowVec::new();
        for value in [7, 8, 9] {
            source.push(value);
        }

        target.clone_from(&source);

        assert_eq!(target.as_slice(), &[7, 8, 9]);
        assert_eq!(target.capacity(), 3);
    }

    #[test]
    fn clone_from_extends_shorter_target() {
        let mut target = GrowVec::new();
        target.reserve(4);
        target.push("x".to_string());
        let mut source = GrowVec::new();
        for value in ["a", "b", "c"] {
            source.push(value.to_string());
        }

        target.clone_from(&source);

        assert_eq!(target.as_slice(), &["a", "b", "c"]);
        assert_eq!(target.capacity(), 4);
    }

    #[test]
    fn take_empties_source_without_touching_elements() {
        let mut values = GrowVec::new();
        for value in [1, 2, 3] {
            values.push(value);
        }

        let taken = mem::take(&mut values);

        assert_eq!(taken.as_slice(), &[1, 2, 3]);
        assert_eq!(values.len(), 0);
        assert_eq!(values.capacity(), 0);
    }

    #[test]
    fn swap_exchanges_contents() {
        let mut first = GrowVec::new();
        first.push(1);
        let mut second = GrowVec::new();
        second.push(2);
        second.push(3);

        mem::swap(&mut first, &mut second);

        assert_eq!(first.as_slice(), &[2, 3]);
        assert_eq!(second.as_slice(), &[1]);
    }

    #[test]
    fn elements_are_dropped_on_container_drop() {
        let drops = Rc::new(Cell::new(0));

        {
            let mut values = GrowVec::new();
            for _ in 0..3 {
                values.push(Droppable::new(&drops));
            }

            assert_eq!(drops.get(), 0);
        }

        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn truncate_drops_tail_and_keeps_capacity() {
        let drops = Rc::new(Cell::new(0));
        let mut values = GrowVec::new();
        for _ in 0..4 {
            values.push(Droppable::new(&drops));
        }
        let capacity_before = values.capacity();

        values.truncate(1);

        assert_eq!(drops.get(), 3);
        assert_eq!(values.len(), 1);
        assert_eq!(values.capacity(), capacity_before);
    }

    #[test]
    fn clear_drops_everything() {
        let drops = Rc::new(Cell::new(0));
        let mut values = GrowVec::new();
        for _ in 0..2 {
            values.push(Droppable::new(&drops));
        }

        values.clear();

        assert_eq!(drops.get(), 2);
        assert!(values.is_empty());
    }

    #[test]
    fn remove_hands_value_to_caller_without_dropping() {
        let drops = Rc::new(Cell::new(0));
        let mut values = GrowVec::new();
        for _ in 0..3 {
            values.push(Droppable::new(&drops));
        }

        let removed = values.remove(1);
        assert_eq!(drops.get(), 0);

        drop(removed);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn growth_does_not_drop_or_duplicate_elements() {
        let drops = Rc::new(Cell::new(0));

        {
            let mut values = GrowVec::new();
            for _ in 0..17 {
                values.push(Droppable::new(&drops));
            }

            // Relocation moves values bitwise - no destructor may have run yet.
            assert_eq!(drops.get(), 0);
        }

        assert_eq!(drops.get(), 17);
    }

    #[test]
    fn in_place_construction_does_not_clone() {
        struct CloneCounter {
            clones: Rc<Cell<usize>>,
        }

        impl Clone for CloneCounter {
            fn clone(&self) -> Self {
                self.clones.set(self.clones.get() + 1);
                Self {
                    clones: Rc::clone(&self.clones),
                }
            }
        }

        let clones = Rc::new(Cell::new(0));

        let mut values = GrowVec::new();

        _ = unsafe {
            values.push_with(|slot| {
                _ = slot.write(CloneCounter {
                    clones: Rc::clone(&clones),
                });
            })
        };

        _ = unsafe {
            values.insert_with(0, |slot| {
                _ = slot.write(CloneCounter {
                    clones: Rc::clone(&clones),
                });
            })
        };

        assert_eq!(clones.get(), 0);
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn failed_clone_releases_partial_copy_and_leaves_source_intact() {
        struct PanicsOnClone {
            panic_on_clone: bool,
            drops: Rc<Cell<usize>>,
        }

        impl Clone for PanicsOnClone {
            fn clone(&self) -> Self {
                assert!(!self.panic_on_clone, "clone failure requested by test");
                Self {
                    panic_on_clone: false,
                    drops: Rc::clone(&self.drops),
                }
            }
        }

        impl Drop for PanicsOnClone {
            fn drop(&mut self) {
                self.drops.set(self.drops.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));
        let mut source = GrowVec::new();
        for panic_on_clone in [false, false, true] {
            source.push(PanicsOnClone {
                panic_on_clone,
                drops: Rc::clone(&drops),
            });
        }

        let result = catch_unwind(AssertUnwindSafe(|| source.clone()));
        assert!(result.is_err());

        // The two successfully cloned elements were destroyed during the unwind.
        assert_eq!(drops.get(), 2);
        assert_eq!(source.len(), 3);

        drop(source);
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn failed_in_place_insert_leaves_container_unchanged() {
        let mut values = GrowVec::new();
        for value in [1, 2, 3] {
            values.push(value);
        }
        values.reserve(8);

        let result = catch_unwind(AssertUnwindSafe(|| {
            _ = unsafe {
                values.insert_with(1, |_slot| panic!("initializer failure requested by test"))
            };
        }));
        assert!(result.is_err());

        assert_eq!(values.as_slice(), &[1, 2, 3]);
        assert_eq!(values.capacity(), 8);
    }

    #[test]
    fn failed_in_place_insert_with_growth_leaves_container_unchanged() {
        let mut values = GrowVec::new();
        for value in [1, 2, 3, 4] {
            values.push(value);
        }
        assert_eq!(values.len(), values.capacity());

        let result = catch_unwind(AssertUnwindSafe(|| {
            _ = unsafe {
                values.insert_with(2, |_slot| panic!("initializer failure requested by test"))
            };
        }));
        assert!(result.is_err());

        assert_eq!(values.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(values.capacity(), 4);
    }

    #[test]
    fn iteration_covers_live_range_in_order() {
        let mut values = GrowVec::new();
        for value in [1, 2, 3] {
            values.push(value);
        }

        let mut observed = Vec::new();
        for value in &values {
            observed.push(*value);
        }
        assert_eq!(observed, [1, 2, 3]);

        for value in &mut values {
            *value *= 10;
        }
        assert_eq!(values.as_slice(), &[10, 20, 30]);
    }

    #[test]
    fn slice_view_supports_slice_operations() {
        let mut values = GrowVec::new();
        for value in [3, 1, 2] {
            values.push(value);
        }

        values.as_mut_slice().sort_unstable();

        assert_eq!(values.first(), Some(&1));
        assert_eq!(values.last(), Some(&3));
    }

    #[test]
    #[should_panic]
    fn insert_out_of_bounds_panics() {
        let mut values = GrowVec::new();
        values.push(1);

        _ = values.insert(5, 2);
    }

    #[test]
    #[should_panic]
    fn remove_out_of_bounds_panics() {
        let mut values = GrowVec::new();
        values.push(1);

        _ = values.remove(1);
    }

    #[test]
    #[should_panic]
    fn slice_index_out_of_bounds_panics() {
        let mut values = GrowVec::new();
        values.push(1);

        _ = values.as_slice()[3];
    }

    #[test]
    #[should_panic]
    fn zst_is_panic() {
        drop(GrowVec::<()>::new());
    }
}
