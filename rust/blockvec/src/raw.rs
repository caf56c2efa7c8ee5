//! Type-erased block vector: the raw storage engine.

use std::{
    ops::Range,
    sync::atomic::{AtomicU64, Ordering},
};

use blockvec_common::{Result, error::Error, verify_arg};

use crate::{
    config::{BlockVecConfig, CapacityPolicy},
    quantize::{block_count, min_capacity, quantize},
    view::{DetachedView, RawView, RawViewMut, Window},
};

/// A growable, type-erased array of fixed-size elements.
///
/// Elements are opaque runs of `element_size` bytes. Capacity grows in whole
/// blocks of `block_size` elements and is never reduced implicitly: shrinking the
/// length keeps the buffer, and only [`RawBlockVec::crop_capacity`] gives memory
/// back.
///
/// The element buffer starts at an address aligned to `config.alignment`, which
/// lets the typed facade reinterpret it in place.
///
/// Every operation that fails leaves the vector exactly as it was: length,
/// capacity and contents are untouched.
pub struct RawBlockVec {
    /// Backing storage: `start` padding bytes followed by `capacity * element_size`
    /// element bytes, all initialized.
    inner: Vec<u8>,
    /// Offset from the start of `inner` to the first (aligned) element.
    start: usize,
    element_size: usize,
    len: usize,
    capacity: usize,
    config: BlockVecConfig,
    /// Process-unique identity, never reused after the vector is dropped.
    id: u64,
    /// Bumped whenever the length changes or the buffer moves.
    epoch: u64,
}

static NEXT_VECTOR_ID: AtomicU64 = AtomicU64::new(0);

impl RawBlockVec {
    /// Creates an empty vector of `element_size`-byte elements with the default
    /// configuration.
    pub fn new(element_size: usize) -> Result<RawBlockVec> {
        Self::with_config(element_size, BlockVecConfig::default())
    }

    /// Creates an empty vector with the given configuration.
    ///
    /// The initial buffer holds `config.initial_capacity` elements rounded up to a
    /// whole number of blocks (one block when the hint is zero) and is zero-filled.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `element_size` is zero or `config` is invalid.
    /// - `CapacityOverflow` if the initial capacity in bytes does not fit `usize`.
    /// - `AllocationError` if the buffer cannot be reserved.
    pub fn with_config(element_size: usize, config: BlockVecConfig) -> Result<RawBlockVec> {
        Self::from_bytes(element_size, &[], config)
    }

    /// Creates a vector holding a copy of `bytes`, interpreted as consecutive
    /// elements of `element_size` bytes.
    ///
    /// # Errors
    ///
    /// As [`RawBlockVec::with_config`], plus `InvalidArgument` if `bytes.len()` is
    /// not a multiple of `element_size`.
    pub fn from_bytes(
        element_size: usize,
        bytes: &[u8],
        config: BlockVecConfig,
    ) -> Result<RawBlockVec> {
        verify_arg!(element_size, element_size != 0);
        config.validate()?;
        verify_arg!(bytes, bytes.len() % element_size == 0);

        let len = bytes.len() / element_size;
        let capacity = min_capacity(len.max(config.initial_capacity), config.block_size)
            .ok_or_else(|| Error::capacity_overflow(len, element_size))?;
        let (mut inner, start) = allocate(capacity, element_size, config.alignment)?;
        inner[start..start + bytes.len()].copy_from_slice(bytes);

        Ok(RawBlockVec {
            inner,
            start,
            element_size,
            len,
            capacity,
            config: config.with_initial_capacity(0),
            id: NEXT_VECTOR_ID.fetch_add(1, Ordering::Relaxed),
            epoch: 0,
        })
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the vector can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the size of a single element in bytes.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Returns the growth quantum in elements.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// Returns the number of whole blocks covered by the current capacity.
    #[inline]
    pub fn blocks(&self) -> usize {
        block_count(self.capacity, self.config.block_size)
    }

    /// Returns the capacity policy applied to implicit growth.
    #[inline]
    pub fn policy(&self) -> CapacityPolicy {
        self.config.policy
    }

    /// Returns the configuration this vector currently operates under.
    ///
    /// The `initial_capacity` hint is consumed at construction and reads as zero.
    #[inline]
    pub fn config(&self) -> BlockVecConfig {
        self.config
    }

    /// Returns the total number of heap bytes reserved, including alignment padding.
    pub fn heap_size(&self) -> usize {
        self.inner.capacity()
    }

    /// Returns the live elements as a byte slice of `len * element_size` bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.start + self.len * self.element_size;
        &self.inner[self.start..end]
    }

    /// Returns the live elements as a mutable byte slice.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let end = self.start + self.len * self.element_size;
        &mut self.inner[self.start..end]
    }

    /// Returns the bytes of the element at `index`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<&[u8]> {
        if index >= self.len {
            return Err(Error::out_of_bounds(index, self.len));
        }
        let range = self.slot_range(index);
        Ok(&self.inner[range])
    }

    /// Returns the bytes of the element at `index` for in-place modification.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Result<&mut [u8]> {
        if index >= self.len {
            return Err(Error::out_of_bounds(index, self.len));
        }
        let range = self.slot_range(index);
        Ok(&mut self.inner[range])
    }

    /// Overwrites the element at `index` with `value`.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if `value` is not exactly `element_size` bytes.
    /// - `OutOfBounds` if `index >= len`.
    pub fn set(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.verify_element(value)?;
        self.get_mut(index)?.copy_from_slice(value);
        Ok(())
    }

    /// Returns the slot at `index`, extending the vector first if needed.
    ///
    /// If `index < len` the existing slot is returned. Otherwise the vector is
    /// resized to `index + 1` (growing the capacity under the elastic policy) and
    /// the new last slot is returned. Slots exposed between the old length and
    /// `index` hold whatever bytes the buffer already contained (zeros, for memory
    /// that has never been used).
    ///
    /// # Errors
    ///
    /// Any error of [`RawBlockVec::resize`].
    pub fn slot_mut(&mut self, index: usize) -> Result<&mut [u8]> {
        if index >= self.len {
            let new_len = index
                .checked_add(1)
                .ok_or_else(|| Error::capacity_overflow(index, self.element_size))?;
            self.resize(new_len)?;
        }
        let range = self.slot_range(index);
        Ok(&mut self.inner[range])
    }

    /// Appends one slot and returns it for the caller to fill.
    pub fn push_slot(&mut self) -> Result<&mut [u8]> {
        self.slot_mut(self.len)
    }

    /// Appends a copy of `value`.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if `value` is not exactly `element_size` bytes.
    /// - Any error of [`RawBlockVec::resize`].
    pub fn push(&mut self, value: &[u8]) -> Result<()> {
        self.verify_element(value)?;
        self.push_slot()?.copy_from_slice(value);
        Ok(())
    }

    /// Removes the last element and returns its bytes.
    ///
    /// Capacity is never reduced. The returned slice stays readable until the
    /// next mutation of the vector.
    ///
    /// # Errors
    ///
    /// `EmptyContainer` if the vector is empty.
    pub fn pop(&mut self) -> Result<&[u8]> {
        if self.len == 0 {
            return Err(Error::empty_container());
        }
        self.set_len(self.len - 1);
        let range = self.slot_range(self.len);
        Ok(&self.inner[range])
    }

    /// Sets the length to zero. The buffer is kept.
    pub fn clear(&mut self) {
        self.set_len(0);
    }

    /// Sets the length to `new_len`.
    ///
    /// Growing past the capacity reallocates to `quantize(new_len, block_size)`
    /// elements; existing elements are preserved byte-for-byte and fresh memory is
    /// zero-filled. Shrinking never reallocates: the capacity stays as is and the
    /// bytes of dropped elements remain in the buffer.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` under [`CapacityPolicy::Fixed`] if `new_len > capacity`.
    /// - `CapacityOverflow` if the new capacity in bytes does not fit `usize`.
    /// - `AllocationError` if the buffer cannot be reallocated.
    pub fn resize(&mut self, new_len: usize) -> Result<()> {
        if new_len > self.capacity {
            self.grow_for(new_len)?;
        }
        self.set_len(new_len);
        Ok(())
    }

    /// Reserves room for at least `additional` more elements.
    ///
    /// This is an explicit sizing call and is honoured under either policy.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or_else(|| Error::capacity_overflow(self.len, self.element_size))?;
        if required <= self.capacity {
            return Ok(());
        }
        let new_capacity = quantize(required, self.config.block_size)
            .ok_or_else(|| Error::capacity_overflow(required, self.element_size))?;
        self.reallocate(new_capacity)
    }

    /// Reallocates the buffer down to the smallest whole number of blocks that
    /// holds the current length (exactly one block when empty).
    ///
    /// # Errors
    ///
    /// `AllocationError` if the smaller buffer cannot be reserved; the current
    /// buffer stays in place.
    pub fn crop_capacity(&mut self) -> Result<()> {
        let target = min_capacity(self.len, self.config.block_size)
            .ok_or_else(|| Error::capacity_overflow(self.len, self.element_size))?;
        if target < self.capacity {
            self.reallocate(target)?;
        }
        Ok(())
    }

    /// Changes the growth quantum.
    ///
    /// The capacity required for the current length is recomputed with the new
    /// quantum; the buffer grows if that exceeds the current capacity and is never
    /// shrunk here. A smaller quantum may therefore leave a capacity that is not a
    /// multiple of it; the capacity is re-quantized on the next growth or crop.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `block_size` is zero.
    /// - `CapacityOverflow` / `AllocationError` if the regrowth fails, in which case
    ///   the old quantum is kept.
    pub fn set_block_size(&mut self, block_size: usize) -> Result<()> {
        verify_arg!(block_size, block_size != 0);
        let required = min_capacity(self.len, block_size)
            .ok_or_else(|| Error::capacity_overflow(self.len, self.element_size))?;
        if required > self.capacity {
            self.reallocate(required)?;
        }
        self.config.block_size = block_size;
        Ok(())
    }

    /// Writes `count` copies of `value` to indices `0..count`, growing the length
    /// to `count` if it is shorter. Elements from `count` onwards are untouched.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if `value` is not exactly `element_size` bytes.
    /// - Any error of [`RawBlockVec::resize`].
    pub fn fill(&mut self, value: &[u8], count: usize) -> Result<()> {
        self.verify_element(value)?;
        if count > self.len {
            self.resize(count)?;
        }
        let bytes = count * self.element_size;
        for slot in self.as_bytes_mut()[..bytes].chunks_exact_mut(value.len()) {
            slot.copy_from_slice(value);
        }
        Ok(())
    }

    /// Makes this vector a copy of `src`: resizes to `src.len()` and copies every
    /// element.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if the element sizes differ; `self` is left unmodified.
    /// - Any error of [`RawBlockVec::resize`].
    pub fn copy_from(&mut self, src: &RawBlockVec) -> Result<()> {
        if self.element_size != src.element_size {
            return Err(Error::type_mismatch(self.element_size, src.element_size));
        }
        self.resize(src.len)?;
        self.as_bytes_mut().copy_from_slice(src.as_bytes());
        Ok(())
    }

    /// Returns a deep copy with the same configuration and capacity.
    pub fn try_clone(&self) -> Result<RawBlockVec> {
        let config = self.config.with_initial_capacity(self.capacity);
        Self::from_bytes(self.element_size, self.as_bytes(), config)
    }

    /// Releases the buffer.
    ///
    /// Consumes the vector; dropping it has the same effect. Resources referenced
    /// by the stored elements are the caller's to release.
    pub fn free(mut self) {
        self.clear();
    }

    /// Returns a read-only view of elements `begin..end`.
    ///
    /// `begin` and `end` may be given in either order. The window is clamped to the
    /// current length and is empty if `begin >= len`. No data is copied.
    pub fn view(&self, begin: usize, end: usize) -> RawView<'_> {
        RawView::new(self, Window::normalize(begin, end, self.len))
    }

    /// Returns a read-write view of elements `begin..end`, normalized as in
    /// [`RawBlockVec::view`].
    pub fn view_mut(&mut self, begin: usize, end: usize) -> RawViewMut<'_> {
        let window = Window::normalize(begin, end, self.len);
        RawViewMut::new(self, window)
    }

    /// Returns an owned description of the window `begin..end` that can outlive
    /// borrows of this vector and be re-attached later.
    pub fn detach_view(&self, begin: usize, end: usize) -> DetachedView {
        self.view(begin, end).detach()
    }
}

impl RawBlockVec {
    /// Address of the element buffer, used to tie detached views to this vector.
    #[inline]
    pub(crate) fn buffer_addr(&self) -> usize {
        self.inner.as_ptr() as usize + self.start
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    #[inline]
    fn slot_range(&self, index: usize) -> Range<usize> {
        let offset = self.start + index * self.element_size;
        offset..offset + self.element_size
    }

    #[inline]
    fn set_len(&mut self, new_len: usize) {
        if new_len != self.len {
            self.len = new_len;
            self.epoch += 1;
        }
    }

    fn verify_element(&self, value: &[u8]) -> Result<()> {
        if value.len() != self.element_size {
            return Err(Error::type_mismatch(self.element_size, value.len()));
        }
        Ok(())
    }

    /// Makes room for `required` elements, subject to the capacity policy.
    #[cold]
    fn grow_for(&mut self, required: usize) -> Result<()> {
        if self.config.policy.is_fixed() {
            return Err(Error::capacity_exceeded(required, self.capacity));
        }
        let new_capacity = quantize(required, self.config.block_size)
            .ok_or_else(|| Error::capacity_overflow(required, self.element_size))?;
        self.reallocate(new_capacity)
    }

    /// Moves the live elements into a fresh buffer of `new_capacity` elements.
    ///
    /// The new buffer is fully reserved before anything is modified.
    fn reallocate(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity >= self.len);
        let (mut inner, start) =
            allocate(new_capacity, self.element_size, self.config.alignment)?;
        let live = self.len * self.element_size;
        inner[start..start + live].copy_from_slice(self.as_bytes());
        self.inner = inner;
        self.start = start;
        self.capacity = new_capacity;
        self.epoch += 1;
        Ok(())
    }
}

impl std::fmt::Debug for RawBlockVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawBlockVec")
            .field("element_size", &self.element_size)
            .field("len", &self.len)
            .field("cap", &self.capacity)
            .field("block_size", &self.config.block_size)
            .field("policy", &self.config.policy)
            .field("internal_offset", &self.start)
            .field("internal_cap", &self.inner.capacity())
            .finish_non_exhaustive()
    }
}

impl PartialEq for RawBlockVec {
    fn eq(&self, other: &RawBlockVec) -> bool {
        self.element_size == other.element_size && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for RawBlockVec {}

/// Reserves a zero-filled buffer for `capacity` elements whose first element is
/// aligned to `alignment`. Returns the buffer and the offset of that element.
fn allocate(capacity: usize, element_size: usize, alignment: usize) -> Result<(Vec<u8>, usize)> {
    let bytes = capacity
        .checked_mul(element_size)
        .ok_or_else(|| Error::capacity_overflow(capacity, element_size))?;
    let total = bytes
        .checked_add(alignment - 1)
        .ok_or_else(|| Error::capacity_overflow(capacity, element_size))?;

    let mut inner = Vec::<u8>::new();
    inner
        .try_reserve_exact(total)
        .map_err(|_| Error::allocation(total))?;

    let p = inner.as_ptr() as usize;
    let start = p.next_multiple_of(alignment) - p;
    // Within the reserved capacity, so the buffer does not move.
    inner.resize(start + bytes, 0);
    Ok((inner, start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockvec_common::error::ErrorKind;

    fn int_vec(values: &[i32]) -> RawBlockVec {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        RawBlockVec::from_bytes(4, &bytes, BlockVecConfig::default()).unwrap()
    }

    fn read_i32(slot: &[u8]) -> i32 {
        i32::from_ne_bytes(slot.try_into().unwrap())
    }

    #[test]
    fn test_new_allocates_one_block() {
        let vec = RawBlockVec::new(4).unwrap();
        assert!(vec.is_empty());
        assert_eq!(vec.capacity(), BlockVecConfig::DEFAULT_BLOCK_SIZE);
        assert_eq!(vec.element_size(), 4);
        assert_eq!(vec.blocks(), 1);
        assert!(vec.heap_size() >= 4 * BlockVecConfig::DEFAULT_BLOCK_SIZE);
    }

    #[test]
    fn test_zero_element_size_rejected() {
        let err = RawBlockVec::new(0).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidArgument { name, .. } if name == "element_size"
        ));
    }

    #[test]
    fn test_zero_block_size_rejected() {
        let err = RawBlockVec::with_config(4, BlockVecConfig::new().with_block_size(0))
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
    }

    #[test]
    fn test_from_bytes_requires_whole_elements() {
        let err = RawBlockVec::from_bytes(4, &[1, 2, 3], BlockVecConfig::default()).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidArgument { name, .. } if name == "bytes"
        ));
    }

    #[test]
    fn test_initial_capacity_hint_is_quantized() {
        let config = BlockVecConfig::new()
            .with_block_size(8)
            .with_initial_capacity(17);
        let vec = RawBlockVec::with_config(2, config).unwrap();
        assert_eq!(vec.capacity(), 24);
        assert_eq!(vec.config().initial_capacity, 0);
    }

    #[test]
    fn test_buffer_is_aligned() {
        for alignment in [1, 8, 64, 256] {
            let config = BlockVecConfig::new().with_alignment(alignment);
            let mut vec = RawBlockVec::with_config(3, config).unwrap();
            assert_eq!(vec.buffer_addr() % alignment, 0);
            vec.resize(1000).unwrap();
            assert_eq!(vec.buffer_addr() % alignment, 0);
        }
    }

    #[test]
    fn test_from_array_get_pop_scenario() {
        let mut vec = int_vec(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(vec.len(), 7);
        assert_eq!(read_i32(vec.get(2).unwrap()), 3);

        let popped = read_i32(vec.pop().unwrap());
        assert_eq!(popped, 7);
        assert_eq!(vec.len(), 6);

        let err = vec.get(6).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::OutOfBounds { index: 6, len: 6 }
        ));
    }

    #[test]
    fn test_resize_grows_to_quantized_capacity() {
        let config = BlockVecConfig::new().with_block_size(10);
        let mut vec = RawBlockVec::with_config(4, config).unwrap();
        assert_eq!(vec.capacity(), 10);

        vec.resize(11).unwrap();
        assert_eq!(vec.len(), 11);
        assert_eq!(vec.capacity(), 20);

        vec.resize(35).unwrap();
        assert_eq!(vec.capacity(), 40);
    }

    #[test]
    fn test_resize_same_length_does_not_reallocate() {
        let mut vec = RawBlockVec::new(4).unwrap();
        vec.resize(40).unwrap();
        let addr = vec.buffer_addr();
        let capacity = vec.capacity();
        vec.resize(40).unwrap();
        assert_eq!(vec.buffer_addr(), addr);
        assert_eq!(vec.capacity(), capacity);
    }

    #[test]
    fn test_shrink_is_lazy() {
        let mut vec = RawBlockVec::new(4).unwrap();
        vec.resize(100).unwrap();
        let capacity = vec.capacity();
        vec.resize(3).unwrap();
        assert_eq!(vec.len(), 3);
        assert_eq!(vec.capacity(), capacity);
        vec.clear();
        assert_eq!(vec.capacity(), capacity);
    }

    #[test]
    fn test_growth_preserves_elements_and_zero_fills() {
        let mut vec = int_vec(&[10, 20, 30]);
        vec.resize(50).unwrap();
        assert_eq!(read_i32(vec.get(0).unwrap()), 10);
        assert_eq!(read_i32(vec.get(2).unwrap()), 30);
        assert!(vec.as_bytes()[12..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_reexposed_slots_keep_stale_bytes() {
        let mut vec = int_vec(&[1, 2, 3]);
        vec.resize(1).unwrap();
        vec.resize(3).unwrap();
        assert_eq!(read_i32(vec.get(2).unwrap()), 3);
    }

    #[test]
    fn test_slot_mut_grows_and_returns_slot() {
        let mut vec = RawBlockVec::new(4).unwrap();
        vec.slot_mut(20).unwrap().copy_from_slice(&7i32.to_ne_bytes());
        assert_eq!(vec.len(), 21);
        assert_eq!(vec.capacity(), 32);
        assert_eq!(read_i32(vec.get(20).unwrap()), 7);
        assert_eq!(read_i32(vec.get(5).unwrap()), 0);

        vec.slot_mut(5).unwrap().copy_from_slice(&9i32.to_ne_bytes());
        assert_eq!(vec.len(), 21);
        assert_eq!(read_i32(vec.get(5).unwrap()), 9);
    }

    #[test]
    fn test_push_and_set() {
        let mut vec = RawBlockVec::new(2).unwrap();
        vec.push(&[1, 2]).unwrap();
        vec.push(&[3, 4]).unwrap();
        assert_eq!(vec.as_bytes(), &[1, 2, 3, 4]);

        vec.set(0, &[9, 9]).unwrap();
        assert_eq!(vec.get(0).unwrap(), &[9, 9]);

        assert!(vec.set(2, &[0, 0]).unwrap_err().is_out_of_bounds());
        let err = vec.push(&[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch {
                expected: 2,
                actual: 3
            }
        ));
        assert_eq!(vec.len(), 2);
    }

    #[test]
    fn test_pop_empty() {
        let mut vec = RawBlockVec::new(8).unwrap();
        let err = vec.pop().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::EmptyContainer));
        assert_eq!(vec.len(), 0);
    }

    #[test]
    fn test_pop_never_shrinks() {
        let mut vec = int_vec(&[1; 40]);
        let capacity = vec.capacity();
        while !vec.is_empty() {
            vec.pop().unwrap();
        }
        assert_eq!(vec.capacity(), capacity);
    }

    #[test]
    fn test_crop_capacity_after_clear() {
        let mut vec = RawBlockVec::new(4).unwrap();
        vec.resize(100).unwrap();
        vec.resize(0).unwrap();
        vec.crop_capacity().unwrap();
        assert_eq!(vec.capacity(), vec.block_size());
    }

    #[test]
    fn test_crop_capacity_keeps_elements() {
        let mut vec = int_vec(&[5, 6, 7]);
        vec.resize(200).unwrap();
        vec.resize(3).unwrap();
        vec.crop_capacity().unwrap();
        assert_eq!(vec.capacity(), 16);
        assert_eq!(read_i32(vec.get(1).unwrap()), 6);
        assert_eq!(vec.len(), 3);
    }

    #[test]
    fn test_set_block_size() {
        let mut vec = int_vec(&[1; 20]);
        assert_eq!(vec.capacity(), 32);

        vec.set_block_size(50).unwrap();
        assert_eq!(vec.block_size(), 50);
        assert_eq!(vec.capacity(), 50);

        // A smaller quantum never shrinks the buffer on its own.
        vec.set_block_size(4).unwrap();
        assert_eq!(vec.capacity(), 50);
        vec.resize(51).unwrap();
        assert_eq!(vec.capacity(), 52);
        vec.resize(20).unwrap();
        vec.crop_capacity().unwrap();
        assert_eq!(vec.capacity(), 20);

        let err = vec.set_block_size(0).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
        assert_eq!(vec.block_size(), 4);
    }

    #[test]
    fn test_fill_overwrites_prefix_and_grows() {
        let mut vec = int_vec(&[1, 2, 3, 4]);
        vec.fill(&8i32.to_ne_bytes(), 2).unwrap();
        assert_eq!(vec.len(), 4);
        assert_eq!(read_i32(vec.get(1).unwrap()), 8);
        assert_eq!(read_i32(vec.get(2).unwrap()), 3);

        vec.fill(&5i32.to_ne_bytes(), 30).unwrap();
        assert_eq!(vec.len(), 30);
        assert!((0..30).all(|i| read_i32(vec.get(i).unwrap()) == 5));
    }

    #[test]
    fn test_copy_from() {
        let src = int_vec(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17]);
        let mut dest = int_vec(&[42]);
        dest.copy_from(&src).unwrap();
        assert_eq!(dest, src);
        assert_eq!(dest.capacity(), 32);
    }

    #[test]
    fn test_copy_from_type_mismatch_leaves_dest() {
        let src = RawBlockVec::from_bytes(8, &[0; 16], BlockVecConfig::default()).unwrap();
        let mut dest = int_vec(&[1, 2, 3]);
        let err = dest.copy_from(&src).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch {
                expected: 4,
                actual: 8
            }
        ));
        assert_eq!(dest, int_vec(&[1, 2, 3]));
    }

    #[test]
    fn test_fixed_policy_refuses_implicit_growth() {
        let config = BlockVecConfig::new().with_block_size(4).fixed();
        let mut vec = RawBlockVec::with_config(1, config).unwrap();
        for b in 0..4u8 {
            vec.push(&[b]).unwrap();
        }
        let err = vec.push(&[4]).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::CapacityExceeded {
                requested: 5,
                capacity: 4
            }
        ));
        assert_eq!(vec.len(), 4);
        assert!(vec.resize(10).is_err());
        assert!(vec.slot_mut(4).is_err());

        vec.reserve(4).unwrap();
        assert_eq!(vec.capacity(), 8);
        vec.push(&[4]).unwrap();
        assert_eq!(vec.as_bytes(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_reserve() {
        let mut vec = RawBlockVec::new(4).unwrap();
        vec.reserve(5).unwrap();
        assert_eq!(vec.capacity(), 16);
        vec.reserve(17).unwrap();
        assert_eq!(vec.capacity(), 32);
        assert!(vec.is_empty());
    }

    #[test]
    fn test_capacity_overflow() {
        let mut vec = RawBlockVec::new(16).unwrap();
        let err = vec.resize(usize::MAX / 2).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::CapacityOverflow { .. }));
        assert!(vec.is_empty());
        assert_eq!(vec.capacity(), 16);
    }

    #[test]
    fn test_allocation_failure_keeps_state() {
        let mut vec = int_vec(&[1, 2, 3]);
        // Fits usize, but no allocator can satisfy it.
        let err = vec.resize(isize::MAX as usize / 8).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::AllocationError { .. }));
        assert_eq!(vec, int_vec(&[1, 2, 3]));
        assert_eq!(vec.capacity(), 16);
    }

    #[test]
    fn test_try_clone() {
        let mut vec = int_vec(&[1, 2, 3]);
        vec.reserve(60).unwrap();
        let clone = vec.try_clone().unwrap();
        assert_eq!(clone, vec);
        assert_eq!(clone.capacity(), vec.capacity());
        assert_ne!(clone.buffer_addr(), vec.buffer_addr());
        assert_ne!(clone.id(), vec.id());
    }

    #[test]
    fn test_epoch_tracks_layout_changes() {
        let mut vec = int_vec(&[1, 2, 3]);
        let e0 = vec.epoch();
        vec.set(0, &0i32.to_ne_bytes()).unwrap();
        assert_eq!(vec.epoch(), e0);
        vec.resize(3).unwrap();
        assert_eq!(vec.epoch(), e0);
        vec.pop().unwrap();
        assert!(vec.epoch() > e0);
    }

    #[test]
    fn test_debug_format() {
        let vec = int_vec(&[1, 2]);
        let debug = format!("{vec:?}");
        assert!(debug.contains("RawBlockVec"));
        assert!(debug.contains("len: 2"));
        assert!(debug.contains("cap: 16"));
    }

    #[test]
    fn test_free() {
        let vec = int_vec(&[1, 2, 3]);
        vec.free();
    }
}
