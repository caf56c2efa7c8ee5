//! Zero-copy windows over a [`RawBlockVec`].
//!
//! A view never owns memory. Every access is resolved through the parent vector
//! as `begin + index`, so a view cannot observe a buffer that has since been
//! reallocated:
//!
//! - [`RawView`] and [`RawViewMut`] borrow the parent; the borrow checker rejects
//!   any resize, crop or other parent mutation while they are alive.
//! - [`DetachedView`] holds no borrow. It remembers the parent's buffer address
//!   and layout epoch, and [`DetachedView::attach`] refuses to re-bind once the
//!   parent has been reallocated or its length has changed.
//!
//! [`RawView::materialize`] is the only way to turn a view into an independent,
//! owned vector.

use blockvec_common::{Result, error::Error};

use crate::raw::RawBlockVec;

/// A normalized `[begin, begin + len)` window, in elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Window {
    pub(crate) begin: usize,
    pub(crate) len: usize,
}

impl Window {
    /// Orders `begin`/`end` and clamps them to `parent_len`.
    ///
    /// An empty window is anchored at `parent_len`, which keeps its byte range
    /// inside the parent's live region.
    pub(crate) fn normalize(begin: usize, end: usize, parent_len: usize) -> Window {
        let (begin, end) = if begin > end { (end, begin) } else { (begin, end) };
        if begin >= parent_len {
            return Window {
                begin: parent_len,
                len: 0,
            };
        }
        Window {
            begin,
            len: end.min(parent_len) - begin,
        }
    }

    #[inline]
    fn byte_range(&self, element_size: usize) -> std::ops::Range<usize> {
        self.begin * element_size..(self.begin + self.len) * element_size
    }

    #[inline]
    fn check_index(&self, index: usize) -> Result<usize> {
        if index < self.len {
            Ok(self.begin + index)
        } else {
            Err(Error::out_of_bounds(index, self.len))
        }
    }
}

/// A read-only window over a contiguous range of a [`RawBlockVec`].
#[derive(Clone, Copy)]
pub struct RawView<'a> {
    parent: &'a RawBlockVec,
    window: Window,
}

impl<'a> RawView<'a> {
    pub(crate) fn new(parent: &'a RawBlockVec, window: Window) -> RawView<'a> {
        RawView { parent, window }
    }

    /// Number of elements visible through the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.window.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.len == 0
    }

    /// Index in the parent of the first visible element.
    #[inline]
    pub fn begin(&self) -> usize {
        self.window.begin
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.parent.element_size()
    }

    /// Returns the vector this view reads from.
    pub fn parent(&self) -> &'a RawBlockVec {
        self.parent
    }

    /// Returns the bytes of element `index` of the view.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        let index = self.window.check_index(index)?;
        self.parent.get(index)
    }

    /// Returns the visible elements as one byte slice.
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.parent.as_bytes()[self.window.byte_range(self.parent.element_size())]
    }

    /// Copies the visible elements into a new vector with the parent's block size,
    /// policy and alignment.
    pub fn materialize(&self) -> Result<RawBlockVec> {
        RawBlockVec::from_bytes(self.element_size(), self.as_bytes(), self.parent.config())
    }

    /// Releases the borrow, keeping enough information to re-attach later.
    pub fn detach(&self) -> DetachedView {
        DetachedView::snapshot(self.parent, self.window)
    }
}

impl std::fmt::Debug for RawView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawView")
            .field("begin", &self.window.begin)
            .field("len", &self.window.len)
            .field("bytes", &self.as_bytes())
            .finish()
    }
}

/// A read-write window over a contiguous range of a [`RawBlockVec`].
///
/// Writes go straight to the parent's buffer. The window's length is fixed; it
/// cannot grow the parent.
pub struct RawViewMut<'a> {
    parent: &'a mut RawBlockVec,
    window: Window,
}

impl<'a> RawViewMut<'a> {
    pub(crate) fn new(parent: &'a mut RawBlockVec, window: Window) -> RawViewMut<'a> {
        RawViewMut { parent, window }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.window.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.len == 0
    }

    #[inline]
    pub fn begin(&self) -> usize {
        self.window.begin
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.parent.element_size()
    }

    pub fn get(&self, index: usize) -> Result<&[u8]> {
        let index = self.window.check_index(index)?;
        self.parent.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut [u8]> {
        let index = self.window.check_index(index)?;
        self.parent.get_mut(index)
    }

    /// Overwrites element `index` of the view.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `index >= len()`, `TypeMismatch` if `value` is not one
    /// element long.
    pub fn set(&mut self, index: usize, value: &[u8]) -> Result<()> {
        let index = self.window.check_index(index)?;
        self.parent.set(index, value)
    }

    /// Writes `value` into every visible element.
    pub fn fill(&mut self, value: &[u8]) -> Result<()> {
        if value.len() != self.element_size() {
            return Err(Error::type_mismatch(self.element_size(), value.len()));
        }
        for slot in self.as_bytes_mut().chunks_exact_mut(value.len()) {
            slot.copy_from_slice(value);
        }
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.parent.as_bytes()[self.window.byte_range(self.parent.element_size())]
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let range = self.window.byte_range(self.parent.element_size());
        &mut self.parent.as_bytes_mut()[range]
    }

    /// Reborrows as a read-only view.
    pub fn as_view(&self) -> RawView<'_> {
        RawView::new(self.parent, self.window)
    }

    pub fn materialize(&self) -> Result<RawBlockVec> {
        self.as_view().materialize()
    }

    pub fn detach(&self) -> DetachedView {
        DetachedView::snapshot(self.parent, self.window)
    }
}

impl std::fmt::Debug for RawViewMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_view().fmt(f)
    }
}

/// A window description that holds no borrow of its parent.
///
/// Re-attaching succeeds only while the parent is the same vector, with the same
/// buffer and length it had when the view was detached. Vector identities are
/// never reused, so a view cannot bind to a new vector that happens to receive
/// the old buffer. Any resize, push, pop, clear, crop
/// or regrowth in between makes the view stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetachedView {
    window: Window,
    element_size: usize,
    parent_id: u64,
    buffer_addr: usize,
    epoch: u64,
}

impl DetachedView {
    fn snapshot(parent: &RawBlockVec, window: Window) -> DetachedView {
        DetachedView {
            window,
            element_size: parent.element_size(),
            parent_id: parent.id(),
            buffer_addr: parent.buffer_addr(),
            epoch: parent.epoch(),
        }
    }

    #[inline]
    pub fn begin(&self) -> usize {
        self.window.begin
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.window.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.len == 0
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Returns `true` if the view can still be attached to `parent`.
    pub fn is_valid_for(&self, parent: &RawBlockVec) -> bool {
        self.verify(parent).is_ok()
    }

    /// Re-binds the view to `parent` for reading.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if `parent` stores elements of a different size.
    /// - `StaleView` if `parent` is not the vector the view was taken from, or
    ///   has been reallocated or resized since.
    pub fn attach<'a>(&self, parent: &'a RawBlockVec) -> Result<RawView<'a>> {
        self.verify(parent)?;
        Ok(RawView::new(parent, self.window))
    }

    /// Re-binds the view to `parent` for reading and writing.
    pub fn attach_mut<'a>(&self, parent: &'a mut RawBlockVec) -> Result<RawViewMut<'a>> {
        self.verify(parent)?;
        Ok(RawViewMut::new(parent, self.window))
    }

    fn verify(&self, parent: &RawBlockVec) -> Result<()> {
        if parent.element_size() != self.element_size {
            return Err(Error::type_mismatch(self.element_size, parent.element_size()));
        }
        if parent.id() != self.parent_id
            || parent.buffer_addr() != self.buffer_addr
            || parent.epoch() != self.epoch
            || self.window.begin + self.window.len > parent.len()
        {
            return Err(Error::stale_view(self.window.begin, self.window.len));
        }
        Ok(())
    }
}
