use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::slice;

use crate::errors::Result;
use crate::{Element, ElementError, Error, RawBuffer};

/// A growable array that owns its storage as a raw memory lease and alone
/// manages the lifecycle of every element constructed within it.
///
/// The array is built on [`RawBuffer`], which acquires and releases the
/// contiguous region but never runs element constructors or destructors.
/// Exactly the slots in `[0, len)` hold live elements; the slots in
/// `[len, capacity)` are uninitialized memory that is never read, duplicated,
/// or dropped as an element.
///
/// # Failure-safety tiers
///
/// Element operations are fallible (see [`Element`]) and each array operation
/// documents which of two guarantees it offers when one fails:
///
/// * **strong**: the array is left exactly as it was before the call;
/// * **basic**: the array stays internally consistent (no leaked
///   construction, no double drop) but its contents may be partially
///   modified.
///
/// Collapsing these two tiers into one vague promise is the classic defect in
/// this class of data structure, so the split is explicit throughout.
///
/// # Relocation policy
///
/// Growth relocates elements into a freshly acquired region either by
/// ownership transfer or by duplication. The policy is fixed per element type
/// by [`RELOCATES_BY_TRANSFER`][Self::RELOCATES_BY_TRANSFER]: transfer is
/// used when it cannot fail (or when the element supports no duplication at
/// all), otherwise duplication is used so that a failure partway through
/// relocation leaves the original region fully intact.
///
/// # Examples
///
/// ```
/// use dynamic_array::DynamicArray;
///
/// let mut values = DynamicArray::new();
/// values.push_back(1_i32).unwrap();
/// values.push_back(2).unwrap();
/// values.push_back(3).unwrap();
///
/// values.insert(1, 9).unwrap();
/// assert_eq!(values.as_slice(), &[1, 9, 2, 3]);
///
/// values.erase(0).unwrap();
/// assert_eq!(values.as_slice(), &[9, 2, 3]);
/// ```
pub struct DynamicArray<T: Element> {
    /// The owned storage region. Never constructs or destroys elements.
    buffer: RawBuffer<T>,

    /// Number of constructed elements, occupying slots `[0, len)`.
    len: usize,
}

impl<T: Element> DynamicArray<T> {
    /// Whether growth relocates elements by ownership transfer rather than by
    /// duplication.
    ///
    /// Evaluated once per element type from the [`Element`] capability
    /// queries. When this is `false`, every growth path offers the strong
    /// guarantee; when it is `true` and transfer is fallible (a combination
    /// only reachable for non-duplicable elements), a transfer failure during
    /// growth leaves the array valid but with moved-from elements, because
    /// already-drained sources cannot be restored.
    pub const RELOCATES_BY_TRANSFER: bool = T::TRANSFER_CANNOT_FAIL || !T::SUPPORTS_DUPLICATION;

    /// Creates an empty array with no backing region.
    ///
    /// Does not touch the allocator and never fails.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: RawBuffer::new(),
            len: 0,
        }
    }

    /// Creates an array of `len` freshly constructed (default) elements.
    ///
    /// Strong guarantee: if acquiring the region or constructing any element
    /// fails, every element constructed by this call is dropped and the
    /// region is released; no partial instance is ever observable.
    ///
    /// # Errors
    ///
    /// Propagates region acquisition failure and any [`Element::fresh`]
    /// failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_array::DynamicArray;
    ///
    /// let zeros = DynamicArray::<u32>::with_len(4).unwrap();
    /// assert_eq!(zeros.as_slice(), &[0, 0, 0, 0]);
    /// assert_eq!(zeros.capacity(), 4);
    /// ```
    pub fn with_len(len: usize) -> Result<Self> {
        let mut array = Self {
            buffer: RawBuffer::acquire(len)?,
            len: 0,
        };

        for _ in 0..len {
            // A failure drops `array`, which unwinds the constructed prefix
            // and releases the region.
            let value = T::fresh()?;

            // SAFETY: `array.len < len <= capacity`, and the slot at
            // `array.len` is unconstructed until this write.
            unsafe {
                array.buffer.slot_ptr(array.len).write(value);
            }

            // Cannot overflow: bounded by the requested length.
            array.len = array.len.wrapping_add(1);
        }

        Ok(array)
    }

    /// Creates an independent copy of this array.
    ///
    /// The copy's capacity equals this array's length. Strong guarantee: on
    /// failure, everything the call constructed is unwound and no copy is
    /// observable.
    ///
    /// `Clone` is deliberately not implemented because duplication is
    /// fallible for the element types this structure is built to host.
    ///
    /// # Errors
    ///
    /// Propagates region acquisition failure and any [`Element::duplicate`]
    /// failure, including the unconditional failure of elements that do not
    /// support duplication.
    pub fn duplicate(&self) -> Result<Self> {
        let mut duplicate = Self {
            buffer: RawBuffer::acquire(self.len)?,
            len: 0,
        };

        for element in self.as_slice() {
            let value = element.duplicate()?;

            // SAFETY: `duplicate.len < self.len <= capacity`, and the slot is
            // unconstructed until this write.
            unsafe {
                duplicate.buffer.slot_ptr(duplicate.len).write(value);
            }

            // Cannot overflow: bounded by the source length.
            duplicate.len = duplicate.len.wrapping_add(1);
        }

        Ok(duplicate)
    }

    /// Number of constructed elements.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Can be mutated to claim elements that were never constructed.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the array holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of element slots the current region can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The constructed elements as a contiguous slice spanning `[0, len)`.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The slots in `[0, len)` hold constructed elements by the
        // structure's core invariant.
        unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.len) }
    }

    /// The constructed elements as a mutable contiguous slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: The slots in `[0, len)` hold constructed elements by the
        // structure's core invariant, and we hold the exclusive reference.
        unsafe { slice::from_raw_parts_mut(self.buffer.as_mut_ptr(), self.len) }
    }

    /// Exchanges the entire contents of two arrays. Never fails.
    pub fn swap(&mut self, other: &mut Self) {
        self.buffer.swap(&mut other.buffer);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Overwrites this array with a copy of `source`.
    ///
    /// Two paths with different guarantees:
    ///
    /// * when `source.len() > self.capacity()`, a full duplicate of `source`
    ///   is built first and swapped in only once complete. Strong guarantee:
    ///   a failure leaves this array completely unmodified.
    /// * otherwise, elements are assigned in place over the shared prefix,
    ///   the tail is dropped (shrinking) or duplicated into unconstructed
    ///   slots (growing). Basic guarantee only: a mid-way failure leaves a
    ///   valid array whose already-processed prefix reflects `source`.
    ///
    /// # Errors
    ///
    /// Propagates region acquisition and element duplication/assignment
    /// failures.
    pub fn assign(&mut self, source: &Self) -> Result<()> {
        if source.len > self.capacity() {
            // Duplicate-and-swap: commit is an infallible swap.
            let mut staged = source.duplicate()?;
            self.swap(&mut staged);
            return Ok(());
        }

        let shared = self.len.min(source.len);
        {
            let targets = self.as_mut_slice();
            for (index, value) in source.as_slice().iter().take(shared).enumerate() {
                let target = targets
                    .get_mut(index)
                    .expect("index is bounded by the shared prefix length");
                target.assign(value)?;
            }
        }

        if source.len < self.len {
            self.destroy_tail(source.len);
        } else {
            for value in source.as_slice().iter().skip(shared) {
                let duplicated = value.duplicate()?;

                // SAFETY: `len < source.len <= capacity`, and the slot is
                // unconstructed until this write.
                unsafe {
                    self.buffer.slot_ptr(self.len).write(duplicated);
                }

                // Cannot overflow: bounded by the source length.
                self.len = self.len.wrapping_add(1);
            }
        }

        Ok(())
    }

    /// Ensures the region can hold at least `capacity` elements.
    ///
    /// A no-op when `capacity` does not exceed the current capacity; element
    /// addresses are then unchanged. Otherwise a region of exactly `capacity`
    /// slots is acquired and every element is relocated into it under the
    /// type's relocation policy.
    ///
    /// Guarantee tier: strong when relocating by duplication. When relocating
    /// by a fallible transfer (non-duplicable elements only), a mid-way
    /// failure unwinds the new region but leaves already-drained sources in
    /// moved-from states; the array remains valid and keeps its length.
    ///
    /// # Errors
    ///
    /// Propagates region acquisition failure and element relocation failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_array::DynamicArray;
    ///
    /// let mut values = DynamicArray::<u64>::with_len(2).unwrap();
    /// values.reserve(10).unwrap();
    ///
    /// assert_eq!(values.capacity(), 10);
    /// assert_eq!(values.as_slice(), &[0, 0]);
    /// ```
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity() {
            return Ok(());
        }

        let region = RawBuffer::acquire(capacity)?;

        if Self::RELOCATES_BY_TRANSFER {
            self.relocate_by_transfer(&region, self.len, false)?;
        } else {
            self.relocate_by_duplication(&region, self.len, false)?;
        }

        self.commit_relocation(region);
        Ok(())
    }

    /// Sets the length to `len`, dropping or default-constructing elements.
    ///
    /// Shrinking drops exactly the elements in `[len, old_len)`. Growing
    /// reserves capacity for `len` elements and constructs the new tail with
    /// [`Element::fresh`]; if a construction fails, the elements this call
    /// constructed are dropped and the previous length is restored (capacity
    /// growth may persist).
    ///
    /// # Errors
    ///
    /// Propagates region acquisition, relocation and construction failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynamic_array::DynamicArray;
    ///
    /// let mut values = DynamicArray::new();
    /// for value in [1_i32, 2, 3] {
    ///     values.push_back(value).unwrap();
    /// }
    ///
    /// values.resize(5).unwrap();
    /// assert_eq!(values.as_slice(), &[1, 2, 3, 0, 0]);
    /// ```
    pub fn resize(&mut self, len: usize) -> Result<()> {
        if len <= self.len {
            self.destroy_tail(len);
            return Ok(());
        }

        self.reserve(len)?;

        let previous_len = self.len;
        while self.len < len {
            match T::fresh() {
                Ok(value) => {
                    // SAFETY: `len < capacity` after the reserve above, and
                    // the slot is unconstructed until this write.
                    unsafe {
                        self.buffer.slot_ptr(self.len).write(value);
                    }

                    // Cannot overflow: bounded by the requested length.
                    self.len = self.len.wrapping_add(1);
                }
                Err(error) => {
                    self.destroy_tail(previous_len);
                    return Err(error.into());
                }
            }
        }

        Ok(())
    }

    /// Drops the last element and shortens the array by one. A no-op when the
    /// array is empty. Never fails.
    pub fn pop_back(&mut self) {
        if self.len == 0 {
            return;
        }

        // Cannot underflow: guarded by the emptiness check above.
        self.len = self.len.wrapping_sub(1);

        // SAFETY: The slot at the old last index held a constructed element
        // and is dropped exactly once here; `len` no longer covers it.
        unsafe {
            self.buffer.slot_ptr(self.len).drop_in_place();
        }
    }

    /// Appends `value` at the logical end.
    ///
    /// Equivalent to [`insert`][Self::insert] at index `len()`; see
    /// [`emplace`][Self::emplace] for the guarantee tiers.
    ///
    /// # Errors
    ///
    /// Propagates region acquisition and element relocation failures.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        self.emplace(self.len, move || Ok(value)).map(|_| ())
    }

    /// Constructs an element at the logical end from `make`.
    ///
    /// # Errors
    ///
    /// Propagates the `make` failure and region acquisition or relocation
    /// failures.
    pub fn emplace_back(
        &mut self,
        make: impl FnOnce() -> Result<T, ElementError>,
    ) -> Result<&mut T> {
        self.emplace(self.len, make)
    }

    /// Inserts `value` at `index`, shifting later elements one slot toward
    /// the end.
    ///
    /// The value is placed by ownership transfer; callers that want copy-in
    /// semantics duplicate first. See [`emplace`][Self::emplace] for the
    /// guarantee tiers.
    ///
    /// # Errors
    ///
    /// Propagates region acquisition and element relocation/shift failures.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<&mut T> {
        self.emplace(index, move || Ok(value))
    }

    /// Constructs an element at `index` from `make`, preserving the relative
    /// order of all other elements, and returns a reference to it.
    ///
    /// Two cases:
    ///
    /// * **The region is full** (`len == capacity`): a region of
    ///   `max(1, 2 * len)` slots is acquired, the new element is constructed
    ///   directly in its target slot, and the existing elements are relocated
    ///   around it under the type's relocation policy. Strong guarantee when
    ///   relocating by duplication. When relocating by a fallible transfer,
    ///   a later transfer failure cannot restore already-drained sources:
    ///   the new region is unwound and the array stays valid at its previous
    ///   length with moved-from elements, which is the documented weaker
    ///   edge of the transfer policy.
    /// * **Spare capacity exists**: the current last element is moved into
    ///   the trailing slot, `[index, len - 1)` is shifted one slot toward the
    ///   end working backward, and the new element takes the vacated slot.
    ///   Basic guarantee: a failure during the shift drops the relocated
    ///   trailing element (nothing leaks) and leaves the array valid at its
    ///   previous length with contents in an unspecified arrangement.
    ///
    /// # Errors
    ///
    /// Propagates the `make` failure (strong: the array is untouched) and
    /// region acquisition or element relocation/shift failures as above.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn emplace(
        &mut self,
        index: usize,
        make: impl FnOnce() -> Result<T, ElementError>,
    ) -> Result<&mut T> {
        assert!(
            index <= self.len,
            "emplace index {index} is beyond the array length {}",
            self.len
        );

        if self.len == self.capacity() {
            self.emplace_into_new_region(index, make)?;
        } else {
            self.emplace_in_place(index, make)?;
        }

        // Cannot overflow: the region holding `len + 1` elements was just
        // populated, so the slot count fits addressable memory.
        self.len = self.len.wrapping_add(1);

        Ok(self
            .as_mut_slice()
            .get_mut(index)
            .expect("the element at `index` was constructed by the branch above"))
    }

    /// Removes the element at `index`, shifting later elements one slot
    /// toward the front. After success the element formerly at `index + 1`
    /// occupies `index`.
    ///
    /// Basic guarantee: a failure during the shift leaves the array valid at
    /// its previous length with contents in an unspecified arrangement.
    ///
    /// # Errors
    ///
    /// Propagates element shift ([`Element::transfer_assign`]) failures.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> Result<()> {
        assert!(
            index < self.len,
            "erase index {index} is out of bounds for array of length {}",
            self.len
        );

        // Cannot underflow: `len > index >= 0`.
        let last = self.len.wrapping_sub(1);

        let mut cursor = index;
        while cursor < last {
            // Cannot overflow: bounded by `last < len`.
            let next = cursor.wrapping_add(1);

            let target_ptr = self.buffer.slot_ptr(cursor).as_ptr();
            let source_ptr = self.buffer.slot_ptr(next).as_ptr();

            // SAFETY: Both slots are in `[0, len)` and constructed; the
            // pointers address distinct slots so the references do not alias.
            let target = unsafe { &mut *target_ptr };
            // SAFETY: As above.
            let source = unsafe { &mut *source_ptr };

            target.transfer_assign(source)?;
            cursor = next;
        }

        // The trailing element is now a drained leftover of the shift.
        self.pop_back();
        Ok(())
    }

    /// Emplacement when the region is full: everything is staged in a new,
    /// larger region and committed only by the final infallible swap.
    fn emplace_into_new_region(
        &mut self,
        index: usize,
        make: impl FnOnce() -> Result<T, ElementError>,
    ) -> Result<()> {
        // An empty array grows to a single slot; afterwards capacity doubles.
        let capacity = self
            .len
            .checked_mul(2)
            .ok_or(Error::CapacityOverflow { slots: usize::MAX })?
            .max(1);

        let region = RawBuffer::acquire(capacity)?;

        // The new element is constructed in its final slot before anything is
        // relocated, so a failed construction costs only the fresh region.
        let value = make()?;

        // SAFETY: `index <= len < capacity` and the slot is unconstructed.
        unsafe {
            region.slot_ptr(index).write(value);
        }

        let relocated = if Self::RELOCATES_BY_TRANSFER {
            self.relocate_by_transfer(&region, index, true)
        } else {
            self.relocate_by_duplication(&region, index, true)
        };

        // On failure the relocation routine has already unwound the new
        // region, including the element constructed above; dropping `region`
        // then merely releases memory.
        relocated?;

        self.commit_relocation(region);
        Ok(())
    }

    /// Emplacement into spare capacity: the gap at `index` is opened by
    /// moving the trailing element up and shifting backward via assignment.
    fn emplace_in_place(
        &mut self,
        index: usize,
        make: impl FnOnce() -> Result<T, ElementError>,
    ) -> Result<()> {
        // Constructing the value first keeps this path strong with respect to
        // `make` failures: nothing has been rearranged yet.
        let value = make()?;

        if index == self.len {
            // SAFETY: `len < capacity` (spare capacity branch) and the slot
            // is unconstructed until this write.
            unsafe {
                self.buffer.slot_ptr(self.len).write(value);
            }
            return Ok(());
        }

        // Cannot underflow: `index < len` here, so the array is non-empty.
        let last = self.len.wrapping_sub(1);

        // Open the gap: move the last element into the trailing slot. On
        // failure nothing has been constructed or lost; the source is merely
        // left moved-from (valid).
        {
            let source_ptr = self.buffer.slot_ptr(last).as_ptr();

            // SAFETY: The slot at `last` is constructed and no other
            // reference to it exists.
            let source = unsafe { &mut *source_ptr };

            let moved = T::transfer(source)?;

            // SAFETY: `len < capacity` and the trailing slot is
            // unconstructed until this write.
            unsafe {
                self.buffer.slot_ptr(self.len).write(moved);
            }
        }

        // Shift `[index, last)` one slot toward the end, working backward so
        // each slot is drained before it is overwritten.
        let mut target = last;
        while target > index {
            // Cannot underflow: `target > index >= 0`.
            let source_index = target.wrapping_sub(1);

            let target_ptr = self.buffer.slot_ptr(target).as_ptr();
            let source_ptr = self.buffer.slot_ptr(source_index).as_ptr();

            // SAFETY: Both slots are in `[0, len)` and constructed; distinct
            // slots, so the references do not alias.
            let target_ref = unsafe { &mut *target_ptr };
            // SAFETY: As above.
            let source_ref = unsafe { &mut *source_ptr };

            if let Err(error) = target_ref.transfer_assign(source_ref) {
                // Drop the relocated trailing element so nothing leaks; the
                // array keeps its length, contents in unspecified order.
                // SAFETY: The trailing slot was constructed by the gap
                // opening above and `len` does not cover it.
                unsafe {
                    self.buffer.slot_ptr(self.len).drop_in_place();
                }
                return Err(error.into());
            }

            target = source_index;
        }

        // The slot at `index` now holds a drained leftover; retire it and
        // place the new element.
        // SAFETY: The slot is constructed and dropped exactly once here.
        unsafe {
            self.buffer.slot_ptr(index).drop_in_place();
        }
        // SAFETY: The same slot is unconstructed after the drop above.
        unsafe {
            self.buffer.slot_ptr(index).write(value);
        }

        Ok(())
    }

    /// Duplicates every element into `region`, leaving the slot at `gap`
    /// untouched (`gap == len` leaves no gap). On failure, everything this
    /// routine constructed is unwound, including the caller's pre-constructed
    /// gap element when `gap_holds_element` is set, so the caller is
    /// left with an empty region and a fully intact array (strong).
    fn relocate_by_duplication(
        &self,
        region: &RawBuffer<T>,
        gap: usize,
        gap_holds_element: bool,
    ) -> Result<()> {
        for (index, element) in self.as_slice().iter().enumerate() {
            match element.duplicate() {
                Ok(value) => {
                    // SAFETY: The mapped slot is within the region (sized for
                    // at least `len + 1` when a gap is present) and
                    // unconstructed until this write.
                    unsafe {
                        region.slot_ptr(Self::skip_gap(index, gap)).write(value);
                    }
                }
                Err(error) => {
                    self.unwind_region(region, index, gap, gap_holds_element);
                    return Err(error.into());
                }
            }
        }

        Ok(())
    }

    /// Transfers every element into `region`, leaving the slot at `gap`
    /// untouched. On failure the new region is unwound exactly as in
    /// [`relocate_by_duplication`][Self::relocate_by_duplication], but
    /// already-drained sources cannot be restored: the array remains valid
    /// with moved-from elements (basic). Unreachable for element types whose
    /// transfer cannot fail.
    fn relocate_by_transfer(
        &mut self,
        region: &RawBuffer<T>,
        gap: usize,
        gap_holds_element: bool,
    ) -> Result<()> {
        for index in 0..self.len {
            let source_ptr = self.buffer.slot_ptr(index).as_ptr();

            // SAFETY: The slot is in `[0, len)` and constructed; no other
            // reference to it exists while we hold `&mut self`.
            let source = unsafe { &mut *source_ptr };

            match T::transfer(source) {
                Ok(value) => {
                    // SAFETY: The mapped slot is within the region and
                    // unconstructed until this write.
                    unsafe {
                        region.slot_ptr(Self::skip_gap(index, gap)).write(value);
                    }
                }
                Err(error) => {
                    self.unwind_region(region, index, gap, gap_holds_element);
                    return Err(error.into());
                }
            }
        }

        Ok(())
    }

    /// Maps a source index to its slot in a region with a one-slot gap.
    fn skip_gap(index: usize, gap: usize) -> usize {
        if index < gap {
            index
        } else {
            // Cannot overflow: the region was sized for `len + 1` slots.
            index.wrapping_add(1)
        }
    }

    /// Drops the `relocated` elements already placed in `region` (and the
    /// caller's pre-constructed gap element, if any), leaving the region
    /// fully unconstructed.
    fn unwind_region(
        &self,
        region: &RawBuffer<T>,
        relocated: usize,
        gap: usize,
        gap_holds_element: bool,
    ) {
        for index in 0..relocated {
            // SAFETY: These mapped slots were constructed by the relocation
            // loop and are dropped exactly once here.
            unsafe {
                region.slot_ptr(Self::skip_gap(index, gap)).drop_in_place();
            }
        }

        if gap_holds_element {
            // SAFETY: The caller constructed an element at `gap` and hands
            // responsibility for it to this unwind.
            unsafe {
                region.slot_ptr(gap).drop_in_place();
            }
        }
    }

    /// Retires the now-stale elements in the old region and adopts `region`
    /// as the backing storage. Infallible: this is the commit point of every
    /// relocation.
    fn commit_relocation(&mut self, mut region: RawBuffer<T>) {
        for index in 0..self.len {
            // SAFETY: The slots in `[0, len)` of the old region hold
            // constructed (possibly drained) elements, dropped exactly once.
            unsafe {
                self.buffer.slot_ptr(index).drop_in_place();
            }
        }

        self.buffer.swap(&mut region);
        // `region` now owns the old storage and releases it on drop.
    }

    /// Drops the constructed elements in `[from, len)`, in index order, and
    /// truncates the array to `from`.
    fn destroy_tail(&mut self, from: usize) {
        debug_assert!(
            from <= self.len,
            "destroy_tail start {from} is beyond the array length {}",
            self.len
        );

        let previous_len = self.len;
        // Truncate before dropping so a panicking element drop cannot lead to
        // a double drop from the array's own destructor.
        self.len = from;

        for index in from..previous_len {
            // SAFETY: These slots held constructed elements and `len` no
            // longer covers them; each is dropped exactly once here.
            unsafe {
                self.buffer.slot_ptr(index).drop_in_place();
            }
        }
    }
}

impl<T: Element> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // Elements drop in index order; the buffer releases itself afterwards.
        self.destroy_tail(0);
    }
}

impl<T: Element> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Element> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Element + PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Element + Eq> Eq for DynamicArray<T> {}

impl<T: Element + fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a, T: Element> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T: Element> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

#[cfg(test)]
#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::cell::RefCell;
    use std::fmt::Debug;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(DynamicArray<u32>: Send, Debug, Default);

    /// Shared instrumentation for the probe element types below. Each test
    /// thread gets its own state, so tests stay independent under the
    /// parallel test runner.
    #[derive(Debug, Default)]
    struct ProbeState {
        /// Probe values currently alive (constructed minus dropped).
        live: usize,

        /// Remaining successes per operation. `None` means unlimited.
        fresh_budget: Option<usize>,
        duplicate_budget: Option<usize>,
        transfer_budget: Option<usize>,
        assign_budget: Option<usize>,
    }

    thread_local! {
        static PROBES: RefCell<ProbeState> = RefCell::new(ProbeState::default());
    }

    fn reset_probes() {
        PROBES.with(|state| *state.borrow_mut() = ProbeState::default());
    }

    fn live_probes() -> usize {
        PROBES.with(|state| state.borrow().live)
    }

    fn allow_fresh(count: usize) {
        PROBES.with(|state| state.borrow_mut().fresh_budget = Some(count));
    }

    fn allow_duplications(count: usize) {
        PROBES.with(|state| state.borrow_mut().duplicate_budget = Some(count));
    }

    fn allow_transfers(count: usize) {
        PROBES.with(|state| state.borrow_mut().transfer_budget = Some(count));
    }

    fn allow_assigns(count: usize) {
        PROBES.with(|state| state.borrow_mut().assign_budget = Some(count));
    }

    fn consume(budget: &mut Option<usize>, operation: &'static str) -> Result<(), ElementError> {
        match budget {
            Some(0) => Err(ElementError::new(operation, "budget exhausted")),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn register_live() {
        PROBES.with(|state| state.borrow_mut().live += 1);
    }

    /// Marker left behind in a probe that has been transferred out of.
    const DRAINED: u64 = u64::MAX;

    /// A duplicable element with a fallible transfer, so arrays of it
    /// relocate by duplication. Every lifecycle operation checks its budget
    /// and the live count tracks leaks and double drops.
    #[derive(Debug, PartialEq, Eq)]
    struct Probe {
        value: u64,
    }

    impl Probe {
        fn new(value: u64) -> Self {
            register_live();
            Self { value }
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            PROBES.with(|state| {
                let mut state = state.borrow_mut();
                assert!(state.live > 0, "more probes dropped than constructed");
                state.live -= 1;
            });
        }
    }

    impl Element for Probe {
        const TRANSFER_CANNOT_FAIL: bool = false;

        fn fresh() -> Result<Self, ElementError> {
            PROBES.with(|state| consume(&mut state.borrow_mut().fresh_budget, "fresh"))?;
            Ok(Self::new(0))
        }

        fn duplicate(&self) -> Result<Self, ElementError> {
            PROBES.with(|state| consume(&mut state.borrow_mut().duplicate_budget, "duplicate"))?;
            Ok(Self::new(self.value))
        }

        fn transfer(source: &mut Self) -> Result<Self, ElementError> {
            PROBES.with(|state| consume(&mut state.borrow_mut().transfer_budget, "transfer"))?;
            Ok(Self::new(mem::replace(&mut source.value, DRAINED)))
        }

        fn assign(&mut self, source: &Self) -> Result<(), ElementError> {
            PROBES.with(|state| consume(&mut state.borrow_mut().assign_budget, "assign"))?;
            self.value = source.value;
            Ok(())
        }

        fn transfer_assign(&mut self, source: &mut Self) -> Result<(), ElementError> {
            PROBES.with(|state| consume(&mut state.borrow_mut().transfer_budget, "transfer"))?;
            self.value = mem::replace(&mut source.value, DRAINED);
            Ok(())
        }
    }

    /// A non-duplicable element with an infallible transfer, modeling handles
    /// that can only ever be moved.
    #[derive(Debug, PartialEq, Eq)]
    struct Exclusive {
        value: u64,
    }

    impl Exclusive {
        fn new(value: u64) -> Self {
            register_live();
            Self { value }
        }
    }

    impl Drop for Exclusive {
        fn drop(&mut self) {
            PROBES.with(|state| state.borrow_mut().live -= 1);
        }
    }

    impl Element for Exclusive {
        const SUPPORTS_DUPLICATION: bool = false;

        fn fresh() -> Result<Self, ElementError> {
            Ok(Self::new(0))
        }

        fn duplicate(&self) -> Result<Self, ElementError> {
            Err(ElementError::new(
                "duplicate",
                "this element type only supports ownership transfer",
            ))
        }

        fn transfer(source: &mut Self) -> Result<Self, ElementError> {
            Ok(Self::new(mem::replace(&mut source.value, DRAINED)))
        }
    }

    /// The worst case: no duplication and a transfer that can fail, forcing
    /// relocation onto the fallible transfer path.
    #[derive(Debug, PartialEq, Eq)]
    struct Brittle {
        value: u64,
    }

    impl Brittle {
        fn new(value: u64) -> Self {
            register_live();
            Self { value }
        }
    }

    impl Drop for Brittle {
        fn drop(&mut self) {
            PROBES.with(|state| state.borrow_mut().live -= 1);
        }
    }

    impl Element for Brittle {
        const TRANSFER_CANNOT_FAIL: bool = false;
        const SUPPORTS_DUPLICATION: bool = false;

        fn fresh() -> Result<Self, ElementError> {
            Ok(Self::new(0))
        }

        fn duplicate(&self) -> Result<Self, ElementError> {
            Err(ElementError::new(
                "duplicate",
                "this element type only supports ownership transfer",
            ))
        }

        fn transfer(source: &mut Self) -> Result<Self, ElementError> {
            PROBES.with(|state| consume(&mut state.borrow_mut().transfer_budget, "transfer"))?;
            Ok(Self::new(mem::replace(&mut source.value, DRAINED)))
        }
    }

    fn probe_array(values: &[u64]) -> DynamicArray<Probe> {
        let mut array = DynamicArray::new();
        for &value in values {
            array.push_back(Probe::new(value)).unwrap();
        }
        array
    }

    fn probe_values(array: &DynamicArray<Probe>) -> Vec<u64> {
        array.iter().map(|probe| probe.value).collect()
    }

    #[test]
    fn relocation_policy_follows_element_capabilities() {
        // Infallible transfer: always relocate by transfer.
        assert!(DynamicArray::<u32>::RELOCATES_BY_TRANSFER);
        assert!(DynamicArray::<Exclusive>::RELOCATES_BY_TRANSFER);
        // No duplication available: transfer is the only option.
        assert!(DynamicArray::<Brittle>::RELOCATES_BY_TRANSFER);
        // Fallible transfer with duplication available: duplicate.
        assert!(!DynamicArray::<Probe>::RELOCATES_BY_TRANSFER);
    }

    #[test]
    fn new_array_is_empty_without_region() {
        let array = DynamicArray::<u32>::new();

        assert_eq!(array.len(), 0);
        assert!(array.is_empty());
        assert_eq!(array.capacity(), 0);
    }

    #[test]
    fn with_len_constructs_fresh_elements() {
        reset_probes();
        {
            let array = DynamicArray::<Probe>::with_len(3).unwrap();

            assert_eq!(array.len(), 3);
            assert_eq!(array.capacity(), 3);
            assert_eq!(probe_values(&array), vec![0, 0, 0]);
            assert_eq!(live_probes(), 3);
        }
        assert_eq!(live_probes(), 0);
    }

    #[test]
    fn with_len_zero_needs_no_region() {
        let array = DynamicArray::<u32>::with_len(0).unwrap();

        assert!(array.is_empty());
        assert_eq!(array.capacity(), 0);
    }

    #[test]
    fn with_len_failure_unwinds_constructed_prefix() {
        reset_probes();
        allow_fresh(2);

        DynamicArray::<Probe>::with_len(4).unwrap_err();

        assert_eq!(live_probes(), 0);
    }

    #[test]
    fn duplicate_produces_independent_copy() {
        reset_probes();
        let original = probe_array(&[1, 2, 3]);

        let mut copy = original.duplicate().unwrap();
        copy[0].value = 99;

        assert_eq!(probe_values(&original), vec![1, 2, 3]);
        assert_eq!(probe_values(&copy), vec![99, 2, 3]);
        assert_eq!(copy.capacity(), original.len());
        assert_eq!(live_probes(), 6);
    }

    #[test]
    fn duplicate_failure_unwinds_partial_copy() {
        reset_probes();
        let original = probe_array(&[1, 2, 3]);
        allow_duplications(1);

        original.duplicate().unwrap_err();

        assert_eq!(probe_values(&original), vec![1, 2, 3]);
        assert_eq!(live_probes(), 3);
    }

    #[test]
    fn duplicate_of_non_duplicable_elements_fails_cleanly() {
        reset_probes();
        let mut original = DynamicArray::new();
        original.push_back(Exclusive::new(1)).unwrap();
        original.push_back(Exclusive::new(2)).unwrap();

        original.duplicate().unwrap_err();

        assert_eq!(original.len(), 2);
        assert_eq!(live_probes(), 2);
    }

    #[test]
    fn elements_are_reachable_as_a_slice() {
        let mut array = DynamicArray::new();
        for value in [10_u32, 20, 30] {
            array.push_back(value).unwrap();
        }

        assert_eq!(array.as_slice(), &[10, 20, 30]);
        assert_eq!(array[1], 20);
        assert_eq!(array.iter().sum::<u32>(), 60);
    }

    #[test]
    fn mutable_iteration_updates_in_place() {
        let mut array = DynamicArray::new();
        for value in [1_u32, 2, 3] {
            array.push_back(value).unwrap();
        }

        for value in &mut array {
            *value *= 10;
        }

        assert_eq!(array.as_slice(), &[10, 20, 30]);
    }

    #[test]
    fn equality_compares_contents_not_capacity() {
        let mut a = DynamicArray::new();
        a.push_back(1_u32).unwrap();
        a.push_back(2).unwrap();

        let mut b = DynamicArray::new();
        b.reserve(16).unwrap();
        b.push_back(1_u32).unwrap();
        b.push_back(2).unwrap();

        assert_eq!(a, b);

        b.push_back(3).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn debug_formats_as_list() {
        let mut array = DynamicArray::new();
        array.push_back(7_u32).unwrap();
        array.push_back(8).unwrap();

        assert_eq!(format!("{array:?}"), "[7, 8]");
    }

    #[test]
    fn default_is_empty() {
        let array = DynamicArray::<u32>::default();

        assert!(array.is_empty());
        assert_eq!(array.capacity(), 0);
    }

    #[test]
    fn swap_exchanges_contents_and_capacity() {
        let mut a = DynamicArray::<u32>::with_len(2).unwrap();
        let mut b = DynamicArray::new();
        b.push_back(5_u32).unwrap();
        let b_capacity = b.capacity();

        a.swap(&mut b);

        assert_eq!(a.as_slice(), &[5]);
        assert_eq!(a.capacity(), b_capacity);
        assert_eq!(b.as_slice(), &[0, 0]);
        assert_eq!(b.capacity(), 2);
    }

    #[test]
    fn take_leaves_source_empty_without_double_release() {
        reset_probes();
        let mut array = probe_array(&[1, 2, 3]);

        let first = mem::take(&mut array);

        assert!(array.is_empty());
        assert_eq!(array.capacity(), 0);
        assert_eq!(probe_values(&first), vec![1, 2, 3]);

        let second = mem::take(&mut array);
        assert!(second.is_empty());

        drop(first);
        drop(second);
        drop(array);
        assert_eq!(live_probes(), 0);
    }

    #[test]
    fn assign_within_capacity_reuses_the_region() {
        reset_probes();
        let mut target = probe_array(&[1, 2, 3, 4]);
        let region = target.as_slice().as_ptr();
        let source = probe_array(&[7, 8]);

        target.assign(&source).unwrap();

        assert_eq!(probe_values(&target), vec![7, 8]);
        assert_eq!(target.as_slice().as_ptr(), region);
        assert_eq!(live_probes(), 4);
    }

    #[test]
    fn assign_extends_into_spare_capacity() {
        reset_probes();
        let mut target = probe_array(&[1]);
        target.reserve(4).unwrap();
        let source = probe_array(&[7, 8, 9]);

        target.assign(&source).unwrap();

        assert_eq!(probe_values(&target), vec![7, 8, 9]);
        assert_eq!(target.capacity(), 4);
        assert_eq!(live_probes(), 6);
    }

    #[test]
    fn assign_beyond_capacity_is_strong() {
        reset_probes();
        let mut target = probe_array(&[1, 2]);
        let source = probe_array(&[7, 8, 9, 10, 11]);
        assert!(source.len() > target.capacity());
        allow_duplications(2);

        target.assign(&source).unwrap_err();

        // The target is completely untouched; only the partial staged copy
        // was unwound.
        assert_eq!(probe_values(&target), vec![1, 2]);
        assert_eq!(live_probes(), 7);
    }

    #[test]
    fn assign_in_place_failure_leaves_valid_array() {
        reset_probes();
        let mut target = probe_array(&[1, 2, 3]);
        let source = probe_array(&[7, 8, 9]);
        allow_assigns(1);

        target.assign(&source).unwrap_err();

        // Basic tier: the processed prefix reflects the source, the rest is
        // unchanged, and nothing leaked.
        assert_eq!(target.len(), 3);
        assert_eq!(probe_values(&target), vec![7, 2, 3]);
        assert_eq!(live_probes(), 6);
    }

    #[test]
    fn reserve_is_a_noop_when_capacity_suffices() {
        let mut array = DynamicArray::<u32>::with_len(2).unwrap();
        array.reserve(8).unwrap();
        let region = array.as_slice().as_ptr();

        array.reserve(4).unwrap();

        assert_eq!(array.capacity(), 8);
        assert_eq!(array.as_slice().as_ptr(), region);
    }

    #[test]
    fn reserve_relocates_by_duplication_for_fallible_transfer() {
        reset_probes();
        let mut array = probe_array(&[1, 2, 3]);
        allow_transfers(0);

        array.reserve(10).unwrap();

        assert_eq!(array.capacity(), 10);
        assert_eq!(probe_values(&array), vec![1, 2, 3]);
        assert_eq!(live_probes(), 3);
    }

    #[test]
    fn reserve_duplication_failure_is_strong() {
        reset_probes();
        let mut array = probe_array(&[1, 2, 3]);
        let capacity = array.capacity();
        allow_duplications(1);

        array.reserve(10).unwrap_err();

        assert_eq!(array.capacity(), capacity);
        assert_eq!(probe_values(&array), vec![1, 2, 3]);
        assert_eq!(live_probes(), 3);
    }

    #[test]
    fn reserve_transfers_non_duplicable_elements() {
        reset_probes();
        let mut array = DynamicArray::new();
        for value in [1, 2, 3] {
            array.push_back(Exclusive::new(value)).unwrap();
        }

        array.reserve(16).unwrap();

        assert_eq!(array.capacity(), 16);
        let values: Vec<u64> = array.iter().map(|element| element.value).collect();
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(live_probes(), 3);
    }

    #[test]
    fn reserve_transfer_failure_keeps_the_array_valid() {
        reset_probes();
        let mut array = DynamicArray::new();
        array.reserve(4).unwrap();
        for value in [1, 2, 3] {
            array.push_back(Brittle::new(value)).unwrap();
        }
        allow_transfers(1);

        array.reserve(10).unwrap_err();

        // Basic tier: length and capacity are unchanged and nothing leaked,
        // but the drained prefix is moved-from.
        assert_eq!(array.len(), 3);
        assert_eq!(array.capacity(), 4);
        assert_eq!(live_probes(), 3);
        assert_eq!(array[0].value, DRAINED);
        assert_eq!(array[2].value, 3);
    }

    #[test]
    fn resize_shrinking_drops_the_tail() {
        reset_probes();
        let mut array = probe_array(&[1, 2, 3, 4]);

        array.resize(2).unwrap();

        assert_eq!(probe_values(&array), vec![1, 2]);
        assert_eq!(live_probes(), 2);
    }

    #[test]
    fn resize_growing_appends_fresh_elements() {
        reset_probes();
        let mut array = probe_array(&[5, 6]);

        array.resize(4).unwrap();

        assert_eq!(probe_values(&array), vec![5, 6, 0, 0]);
        assert_eq!(live_probes(), 4);
    }

    #[test]
    fn resize_to_current_length_changes_nothing() {
        let mut array = DynamicArray::<u32>::with_len(3).unwrap();
        let region = array.as_slice().as_ptr();

        array.resize(3).unwrap();

        assert_eq!(array.len(), 3);
        assert_eq!(array.as_slice().as_ptr(), region);
    }

    #[test]
    fn resize_growth_failure_restores_previous_length() {
        reset_probes();
        let mut array = probe_array(&[1]);
        allow_fresh(2);

        array.resize(5).unwrap_err();

        assert_eq!(probe_values(&array), vec![1]);
        assert_eq!(live_probes(), 1);
    }

    #[test]
    fn pop_back_drops_the_last_element() {
        reset_probes();
        let mut array = probe_array(&[1, 2, 3]);

        array.pop_back();

        assert_eq!(probe_values(&array), vec![1, 2]);
        assert_eq!(live_probes(), 2);
    }

    #[test]
    fn pop_back_on_empty_is_a_noop() {
        let mut array = DynamicArray::<u32>::new();

        array.pop_back();

        assert!(array.is_empty());
    }

    #[test]
    fn push_back_appends_in_order() {
        let mut array = DynamicArray::new();
        for value in 0..10_u32 {
            array.push_back(value).unwrap();
        }

        assert_eq!(array.len(), 10);
        assert_eq!(array[9], 9);
    }

    #[test]
    fn growth_doubles_capacity() {
        let mut array = DynamicArray::new();
        let mut relocations = 0_u32;
        let mut capacity = array.capacity();

        for value in 0..100_u32 {
            array.push_back(value).unwrap();
            if array.capacity() != capacity {
                relocations += 1;
                capacity = array.capacity();
            }
        }

        assert_eq!(capacity, 128);
        // 0 -> 1 -> 2 -> 4 -> ... -> 128 is eight region changes.
        assert_eq!(relocations, 8);
    }

    #[test]
    fn emplace_back_returns_a_usable_reference() {
        let mut array = DynamicArray::new();
        array.push_back(1_u32).unwrap();

        let slot = array.emplace_back(|| Ok(5)).unwrap();
        *slot += 1;

        assert_eq!(array.as_slice(), &[1, 6]);
    }

    #[test]
    fn emplace_construction_failure_is_strong() {
        reset_probes();
        let mut array = probe_array(&[1, 2, 3]);
        array.reserve(8).unwrap();
        let capacity = array.capacity();

        array
            .emplace(1, || Err(ElementError::new("fresh", "refused")))
            .unwrap_err();

        assert_eq!(probe_values(&array), vec![1, 2, 3]);
        assert_eq!(array.capacity(), capacity);
        assert_eq!(live_probes(), 3);
    }

    #[test]
    fn emplace_construction_failure_in_a_full_array_is_strong() {
        reset_probes();
        let mut array = probe_array(&[1, 2]);
        array.resize(array.capacity()).unwrap();
        let len = array.len();

        array
            .emplace(0, || Err(ElementError::new("fresh", "refused")))
            .unwrap_err();

        assert_eq!(array.len(), len);
        assert_eq!(live_probes(), len);
    }

    #[test]
    fn emplace_into_full_region_places_at_index() {
        reset_probes();
        let mut array = probe_array(&[1, 2, 3, 4]);
        array.resize(array.capacity()).unwrap();
        let len = array.len();

        array.emplace(2, || Ok(Probe::new(99))).unwrap();

        assert_eq!(array.len(), len + 1);
        assert_eq!(probe_values(&array), vec![1, 2, 99, 3, 4]);
        assert_eq!(live_probes(), array.len());
    }

    #[test]
    fn emplace_growth_duplication_failure_is_strong() {
        reset_probes();
        let mut array = probe_array(&[1, 2]);
        array.resize(array.capacity()).unwrap();
        let snapshot = probe_values(&array);
        let capacity = array.capacity();
        allow_duplications(1);

        array.insert(0, Probe::new(99)).unwrap_err();

        assert_eq!(probe_values(&array), snapshot);
        assert_eq!(array.capacity(), capacity);
        assert_eq!(live_probes(), snapshot.len());
    }

    #[test]
    fn emplace_growth_transfer_failure_keeps_length_and_leaks_nothing() {
        reset_probes();
        let mut array = DynamicArray::new();
        array.push_back(Brittle::new(1)).unwrap();
        array.push_back(Brittle::new(2)).unwrap();
        assert_eq!(array.len(), array.capacity());
        // The new element and the first relocation succeed; the second
        // relocation fails, unwinding the new region including the
        // pre-constructed gap element.
        allow_transfers(1);

        array.insert(0, Brittle::new(99)).unwrap_err();

        assert_eq!(array.len(), 2);
        assert_eq!(array.capacity(), 2);
        assert_eq!(live_probes(), 2);

        drop(array);
        assert_eq!(live_probes(), 0);
    }

    #[test]
    fn insert_shifts_later_elements_toward_the_end() {
        let mut array = DynamicArray::new();
        for value in [1_u32, 2, 3] {
            array.push_back(value).unwrap();
        }

        array.insert(1, 9).unwrap();

        assert_eq!(array.as_slice(), &[1, 9, 2, 3]);
    }

    #[test]
    fn insert_at_both_ends() {
        let mut array = DynamicArray::new();
        array.push_back(5_u32).unwrap();

        array.insert(0, 4).unwrap();
        array.insert(array.len(), 6).unwrap();

        assert_eq!(array.as_slice(), &[4, 5, 6]);
    }

    #[test]
    fn insert_preserves_values_for_move_only_elements() {
        reset_probes();
        let mut array = DynamicArray::new();
        array.reserve(8).unwrap();
        for value in [1, 2, 3] {
            array.push_back(Exclusive::new(value)).unwrap();
        }

        array.insert(1, Exclusive::new(9)).unwrap();

        let values: Vec<u64> = array.iter().map(|element| element.value).collect();
        assert_eq!(values, vec![1, 9, 2, 3]);
        assert_eq!(live_probes(), 4);
    }

    #[test]
    fn insert_shift_failure_keeps_length_and_leaks_nothing() {
        reset_probes();
        let mut array = probe_array(&[10, 20, 30]);
        array.reserve(8).unwrap();
        // One transfer opens the gap; the first backward shift then fails.
        allow_transfers(1);

        array.insert(0, Probe::new(99)).unwrap_err();

        assert_eq!(array.len(), 3);
        assert_eq!(live_probes(), 3);
    }

    #[test]
    fn erase_shifts_later_elements_toward_the_front() {
        let mut array = DynamicArray::new();
        for value in [1_u32, 2, 3, 4] {
            array.push_back(value).unwrap();
        }

        array.erase(1).unwrap();

        assert_eq!(array.as_slice(), &[1, 3, 4]);
    }

    #[test]
    fn erase_first_and_last() {
        reset_probes();
        let mut array = probe_array(&[1, 2, 3]);

        array.erase(0).unwrap();
        array.erase(array.len() - 1).unwrap();

        assert_eq!(probe_values(&array), vec![2]);
        assert_eq!(live_probes(), 1);
    }

    #[test]
    fn erase_down_to_empty() {
        reset_probes();
        let mut array = probe_array(&[1, 2]);

        array.erase(0).unwrap();
        array.erase(0).unwrap();

        assert!(array.is_empty());
        assert_eq!(live_probes(), 0);
    }

    #[test]
    fn erase_shift_failure_keeps_length() {
        reset_probes();
        let mut array = DynamicArray::new();
        array.reserve(4).unwrap();
        for value in [1, 2, 3] {
            array.push_back(Brittle::new(value)).unwrap();
        }
        allow_transfers(0);

        array.erase(0).unwrap_err();

        assert_eq!(array.len(), 3);
        assert_eq!(live_probes(), 3);
    }

    #[test]
    fn drop_releases_every_element() {
        reset_probes();
        let array = probe_array(&[1, 2, 3, 4, 5]);
        assert_eq!(live_probes(), 5);

        drop(array);

        assert_eq!(live_probes(), 0);
    }

    #[test]
    #[should_panic]
    fn emplace_beyond_length_panics() {
        let mut array = DynamicArray::<u32>::with_len(2).unwrap();

        drop(array.insert(3, 1));
    }

    #[test]
    #[should_panic]
    fn erase_at_length_panics() {
        let mut array = DynamicArray::<u32>::with_len(2).unwrap();

        drop(array.erase(2));
    }

    #[test]
    fn random_operations_match_reference_model() {
        let mut rng = StdRng::seed_from_u64(0x_DA7A_ABBA);
        let mut array = DynamicArray::new();
        let mut model: Vec<u64> = Vec::new();

        for step in 0..1000_u64 {
            match rng.random_range(0..4_u8) {
                0 => {
                    array.push_back(step).unwrap();
                    model.push(step);
                }
                1 => {
                    let index = rng.random_range(0..=model.len());
                    array.insert(index, step).unwrap();
                    model.insert(index, step);
                }
                2 if !model.is_empty() => {
                    let index = rng.random_range(0..model.len());
                    array.erase(index).unwrap();
                    model.remove(index);
                }
                _ => {
                    array.pop_back();
                    model.pop();
                }
            }

            assert_eq!(array.as_slice(), model.as_slice());
        }
    }
}
