use std::alloc::{self, Layout};
use std::fmt;
use std::mem;
use std::ptr::NonNull;

use crate::Error;

/// An owned span of uninitialized memory sized for a fixed number of element
/// slots.
///
/// The buffer is a pure memory lease: it acquires and releases the region but
/// never constructs or destroys elements within it. Whether any given slot
/// currently holds a live element is entirely the caller's bookkeeping; the
/// [`DynamicArray`][crate::DynamicArray] built on top of this type is the
/// sole party running constructors and destructors into the region.
///
/// A buffer is uniquely owned. It is deliberately not clonable: duplicating
/// the raw region without running element constructors would produce aliased,
/// semantically invalid copies. Ownership moves with the value; [`mem::take`]
/// and [`RawBuffer::swap`] transfer the region without ever failing, leaving
/// the vacated side at capacity zero.
///
/// # Examples
///
/// ```
/// use dynamic_array::RawBuffer;
///
/// let buffer = RawBuffer::<u64>::acquire(4).unwrap();
/// assert_eq!(buffer.capacity(), 4);
///
/// // Slots are raw memory; nothing has been constructed in them.
/// let first_slot = buffer.slot_ptr(0);
/// let one_past_end = buffer.slot_ptr(4); // valid to form, never to read
/// ```
pub struct RawBuffer<T> {
    /// Base address of the region. Dangling (and never dereferenced) when
    /// `capacity` is zero.
    ptr: NonNull<T>,

    /// Number of element slots the region can hold, constructed or not.
    capacity: usize,
}

impl<T> RawBuffer<T> {
    /// Creates a buffer with zero capacity and no backing region.
    ///
    /// Does not touch the allocator and never fails.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
        }
    }

    /// Acquires a region sized for exactly `capacity` element slots.
    ///
    /// Zero capacity yields the empty buffer without an allocator request.
    /// The caller never observes a partial region: on error there is no
    /// buffer at all.
    ///
    /// # Errors
    ///
    /// [`Error::CapacityOverflow`] if the byte size of the region does not
    /// fit in a valid layout; [`Error::RegionAcquisition`] if the allocator
    /// refuses the request.
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized. A zero-sized element needs no storage and
    /// has no business being placed in a raw memory lease.
    pub fn acquire(capacity: usize) -> Result<Self, Error> {
        assert!(
            size_of::<T>() > 0,
            "RawBuffer cannot hold zero-sized element types"
        );

        if capacity == 0 {
            return Ok(Self::new());
        }

        let layout = Layout::array::<T>(capacity)
            .map_err(|_| Error::CapacityOverflow { slots: capacity })?;

        // SAFETY: The layout has non-zero size, guarded by the zero-sized
        // type assertion and the zero-capacity early return above.
        let region = unsafe { alloc::alloc(layout) };

        let Some(ptr) = NonNull::new(region.cast::<T>()) else {
            return Err(Error::RegionAcquisition { slots: capacity });
        };

        Ok(Self { ptr, capacity })
    }

    /// Number of element slots the region can hold.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Can be mutated to report a capacity the region does not have.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Address of the slot at `offset`.
    ///
    /// `offset` may equal the capacity, yielding the valid one-past-end
    /// address; that address must never be dereferenced.
    ///
    /// The precondition `offset <= capacity` is a programming fault, not a
    /// recoverable error: it is checked fatally in debug builds and is
    /// undefined behavior in release builds.
    #[must_use]
    pub fn slot_ptr(&self, offset: usize) -> NonNull<T> {
        debug_assert!(
            offset <= self.capacity,
            "slot offset {offset} out of bounds for buffer of {} slots",
            self.capacity
        );

        // SAFETY: Guarded by the precondition above; offsets up to and
        // including the capacity stay within (or one past) the region.
        unsafe { self.ptr.add(offset) }
    }

    /// Base address of the region for shared access.
    ///
    /// Reading a slot through this pointer as an element is valid only if the
    /// caller has constructed an element there.
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Base address of the region for exclusive access.
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Exchanges the regions and capacities of two buffers. Never fails.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.capacity == 0 {
            return;
        }

        let layout = Layout::array::<T>(self.capacity)
            .expect("layout was validated when the region was acquired");

        // SAFETY: The region was acquired with this exact layout and has not
        // been released before; releasing exactly once here.
        unsafe {
            alloc::dealloc(self.ptr.as_ptr().cast(), layout);
        }
    }
}

impl<T> fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

// SAFETY: The buffer is an exclusively owned allocation addressed through a
// raw pointer; it carries no thread affinity beyond that of the element type
// whose values the caller may have placed in the region.
unsafe impl<T: Send> Send for RawBuffer<T> {}

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(RawBuffer<u32>: Send, Debug, Default);

    #[test]
    fn empty_buffer_has_no_region() {
        let buffer = RawBuffer::<u32>::new();

        assert_eq!(buffer.capacity(), 0);
    }

    #[test]
    fn zero_capacity_acquire_is_empty() {
        let buffer = RawBuffer::<u32>::acquire(0).unwrap();

        assert_eq!(buffer.capacity(), 0);
    }

    #[test]
    fn acquired_region_holds_raw_values() {
        let buffer = RawBuffer::<u32>::acquire(3).unwrap();

        assert_eq!(buffer.capacity(), 3);

        for offset in 0..3_usize {
            // SAFETY: Each offset is within the acquired region and u32 does
            // not require drop handling, so raw writes are sufficient.
            unsafe {
                buffer
                    .slot_ptr(offset)
                    .write(u32::try_from(offset * 10).unwrap());
            }
        }

        for offset in 0..3_usize {
            // SAFETY: These slots were written above.
            let value = unsafe { buffer.slot_ptr(offset).read() };
            assert_eq!(value, u32::try_from(offset * 10).unwrap());
        }
    }

    #[test]
    fn one_past_end_address_is_formable() {
        let buffer = RawBuffer::<u64>::acquire(2).unwrap();

        let base = buffer.slot_ptr(0);
        let end = buffer.slot_ptr(2);

        // SAFETY: Both pointers derive from the same region; forming the
        // one-past-end address and comparing is valid, dereferencing is not.
        let distance = unsafe { end.offset_from(base) };
        assert_eq!(distance, 2);
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut buffer = RawBuffer::<u32>::acquire(4).unwrap();

        let taken = mem::take(&mut buffer);

        assert_eq!(buffer.capacity(), 0);
        assert_eq!(taken.capacity(), 4);
    }

    #[test]
    fn swap_exchanges_regions() {
        let mut a = RawBuffer::<u32>::acquire(2).unwrap();
        let mut b = RawBuffer::<u32>::acquire(5).unwrap();
        let a_base = a.as_ptr();
        let b_base = b.as_ptr();

        a.swap(&mut b);

        assert_eq!(a.capacity(), 5);
        assert_eq!(b.capacity(), 2);
        assert_eq!(a.as_ptr(), b_base);
        assert_eq!(b.as_ptr(), a_base);
    }

    #[test]
    fn repeated_take_then_drop_does_not_double_release() {
        let mut buffer = RawBuffer::<u32>::acquire(8).unwrap();

        let first = mem::take(&mut buffer);
        let second = mem::take(&mut buffer);

        assert_eq!(second.capacity(), 0);
        drop(first);
        drop(second);
        drop(buffer);
    }

    #[test]
    #[should_panic]
    fn zero_sized_element_type_is_panic() {
        drop(RawBuffer::<()>::acquire(3));
    }

    #[test]
    fn debug_output_reports_capacity() {
        let buffer = RawBuffer::<u32>::acquire(6).unwrap();

        let formatted = format!("{buffer:?}");
        assert!(formatted.contains("capacity: 6"));
    }
}
