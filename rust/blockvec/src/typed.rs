//! Strongly-typed facade over [`RawBlockVec`] and its views.
//!
//! Each typed operation forwards to the raw engine and reinterprets the returned
//! bytes as `T`. Bounds, growth and capacity policy live in the raw engine only.

use std::marker::PhantomData;

use blockvec_common::{Result, error::Error, verify_arg};
use bytemuck::Pod;

use crate::{
    config::{BlockVecConfig, CapacityPolicy},
    raw::RawBlockVec,
    view::{DetachedView, RawView, RawViewMut},
};

/// A block vector of `T` values.
///
/// `T` must be [`Pod`]: the vector stores elements as plain bytes and never runs
/// destructors or inspects their contents.
pub struct BlockVec<T> {
    raw: RawBlockVec,
    _marker: PhantomData<T>,
}

impl<T: Pod> BlockVec<T> {
    /// Creates an empty vector with the default configuration.
    pub fn new() -> Result<BlockVec<T>> {
        Self::with_config(BlockVecConfig::default())
    }

    /// Creates an empty vector with the given configuration.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `T` is zero-sized, `config` is invalid, or its
    /// alignment is smaller than the alignment of `T`; allocation errors as for
    /// [`RawBlockVec::with_config`].
    pub fn with_config(config: BlockVecConfig) -> Result<BlockVec<T>> {
        Self::from_slice_with_config(&[], config)
    }

    /// Creates a vector holding a copy of `values`, with the default configuration.
    pub fn from_slice(values: &[T]) -> Result<BlockVec<T>> {
        Self::from_slice_with_config(values, BlockVecConfig::default())
    }

    pub fn from_slice_with_config(values: &[T], config: BlockVecConfig) -> Result<BlockVec<T>> {
        verify_arg!(alignment, config.alignment >= std::mem::align_of::<T>());
        let raw = RawBlockVec::from_bytes(
            std::mem::size_of::<T>(),
            bytemuck::cast_slice(values),
            config,
        )?;
        Ok(BlockVec {
            raw,
            _marker: PhantomData,
        })
    }

    /// Wraps a type-erased vector.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if the element size is not `size_of::<T>()`.
    /// - `InvalidArgument` if the buffer alignment is too small for `T`.
    pub fn try_from_raw(raw: RawBlockVec) -> Result<BlockVec<T>> {
        if raw.element_size() != std::mem::size_of::<T>() {
            return Err(Error::type_mismatch(
                std::mem::size_of::<T>(),
                raw.element_size(),
            ));
        }
        verify_arg!(alignment, raw.config().alignment >= std::mem::align_of::<T>());
        Ok(BlockVec {
            raw,
            _marker: PhantomData,
        })
    }

    /// Returns the type-erased vector.
    pub fn into_raw(self) -> RawBlockVec {
        self.raw
    }

    pub fn as_raw(&self) -> &RawBlockVec {
        &self.raw
    }

    /// Returns the type-erased vector for raw byte access. The element size is
    /// fixed, so raw operations cannot break the typed view of the buffer.
    pub fn as_raw_mut(&mut self) -> &mut RawBlockVec {
        &mut self.raw
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.raw.block_size()
    }

    #[inline]
    pub fn policy(&self) -> CapacityPolicy {
        self.raw.policy()
    }

    /// Appends `value`, growing by one block when full.
    pub fn push(&mut self, value: T) -> Result<()> {
        self.raw.push(bytemuck::bytes_of(&value))
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&T> {
        self.raw.get(index).map(bytemuck::from_bytes)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        self.raw.get_mut(index).map(bytemuck::from_bytes_mut)
    }

    /// Overwrites the element at `index`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len()`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// Writes `value` at `index`, extending the vector to `index + 1` first if
    /// needed (see [`RawBlockVec::slot_mut`]).
    pub fn store(&mut self, index: usize, value: T) -> Result<()> {
        *bytemuck::from_bytes_mut::<T>(self.raw.slot_mut(index)?) = value;
        Ok(())
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// `EmptyContainer` if the vector is empty.
    pub fn pop(&mut self) -> Result<T> {
        self.raw.pop().map(|bytes| *bytemuck::from_bytes::<T>(bytes))
    }

    /// Writes `count` copies of `value` to indices `0..count`.
    pub fn fill(&mut self, value: T, count: usize) -> Result<()> {
        self.raw.fill(bytemuck::bytes_of(&value), count)
    }

    pub fn resize(&mut self, new_len: usize) -> Result<()> {
        self.raw.resize(new_len)
    }

    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.raw.reserve(additional)
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    pub fn crop_capacity(&mut self) -> Result<()> {
        self.raw.crop_capacity()
    }

    pub fn set_block_size(&mut self, block_size: usize) -> Result<()> {
        self.raw.set_block_size(block_size)
    }

    /// Makes this vector a copy of `src`.
    pub fn copy_from(&mut self, src: &BlockVec<T>) -> Result<()> {
        self.raw.copy_from(&src.raw)
    }

    pub fn try_clone(&self) -> Result<BlockVec<T>> {
        Ok(BlockVec {
            raw: self.raw.try_clone()?,
            _marker: PhantomData,
        })
    }

    /// Releases the buffer. Equivalent to dropping the vector.
    pub fn free(self) {
        self.raw.free();
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        bytemuck::cast_slice(self.raw.as_bytes())
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(self.raw.as_bytes_mut())
    }

    /// Returns a read-only view of elements `begin..end`; see [`RawBlockVec::view`].
    pub fn view(&self, begin: usize, end: usize) -> View<'_, T> {
        View::new(self.raw.view(begin, end))
    }

    pub fn view_mut(&mut self, begin: usize, end: usize) -> ViewMut<'_, T> {
        ViewMut::new(self.raw.view_mut(begin, end))
    }

    pub fn detach_view(&self, begin: usize, end: usize) -> DetachedView {
        self.raw.detach_view(begin, end)
    }

    /// Re-binds a detached view to this vector; see [`DetachedView::attach`].
    pub fn attach(&self, view: &DetachedView) -> Result<View<'_, T>> {
        view.attach(&self.raw).map(View::new)
    }

    pub fn attach_mut(&mut self, view: &DetachedView) -> Result<ViewMut<'_, T>> {
        view.attach_mut(&mut self.raw).map(ViewMut::new)
    }
}

impl<T: Pod + std::fmt::Debug> std::fmt::Debug for BlockVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockVec")
            .field("values", &self.as_slice())
            .field("len", &self.len())
            .field("cap", &self.capacity())
            .field("block_size", &self.block_size())
            .finish_non_exhaustive()
    }
}

impl<T: Pod + PartialEq> PartialEq for BlockVec<T> {
    fn eq(&self, other: &BlockVec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Pod> TryFrom<&[T]> for BlockVec<T> {
    type Error = Error;

    fn try_from(values: &[T]) -> Result<BlockVec<T>> {
        BlockVec::from_slice(values)
    }
}

/// A read-only typed window over a [`BlockVec`].
#[derive(Clone, Copy)]
pub struct View<'a, T> {
    raw: RawView<'a>,
    _marker: PhantomData<&'a [T]>,
}

impl<'a, T: Pod> View<'a, T> {
    fn new(raw: RawView<'a>) -> View<'a, T> {
        View {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[inline]
    pub fn begin(&self) -> usize {
        self.raw.begin()
    }

    /// Returns element `index` of the view.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&'a T> {
        self.raw.get(index).map(bytemuck::from_bytes)
    }

    pub fn as_slice(&self) -> &'a [T] {
        bytemuck::cast_slice(self.raw.as_bytes())
    }

    /// Copies the visible elements into a new, independent vector.
    pub fn materialize(&self) -> Result<BlockVec<T>> {
        BlockVec::try_from_raw(self.raw.materialize()?)
    }

    pub fn detach(&self) -> DetachedView {
        self.raw.detach()
    }
}

impl<T: Pod + std::fmt::Debug> std::fmt::Debug for View<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("begin", &self.begin())
            .field("values", &self.as_slice())
            .finish()
    }
}

/// A read-write typed window over a [`BlockVec`].
pub struct ViewMut<'a, T> {
    raw: RawViewMut<'a>,
    _marker: PhantomData<&'a mut [T]>,
}

impl<'a, T: Pod> ViewMut<'a, T> {
    fn new(raw: RawViewMut<'a>) -> ViewMut<'a, T> {
        ViewMut {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[inline]
    pub fn begin(&self) -> usize {
        self.raw.begin()
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        self.raw.get(index).map(bytemuck::from_bytes)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        self.raw.get_mut(index).map(bytemuck::from_bytes_mut)
    }

    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.raw.set(index, bytemuck::bytes_of(&value))
    }

    /// Writes `value` into every visible element.
    pub fn fill(&mut self, value: T) -> Result<()> {
        self.raw.fill(bytemuck::bytes_of(&value))
    }

    pub fn as_slice(&self) -> &[T] {
        bytemuck::cast_slice(self.raw.as_bytes())
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(self.raw.as_bytes_mut())
    }

    pub fn as_view(&self) -> View<'_, T> {
        View::new(self.raw.as_view())
    }

    pub fn materialize(&self) -> Result<BlockVec<T>> {
        self.as_view().materialize()
    }
}
