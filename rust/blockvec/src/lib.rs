//! Block vectors: growable arrays whose capacity grows in fixed-size blocks of
//! elements, with zero-copy views into the backing buffer.
//!
//! - [`RawBlockVec`] is the type-erased storage engine. Elements are opaque runs of
//!   `element_size` bytes; all capacity, bounds and growth logic lives here.
//! - [`BlockVec<T>`] is the typed facade for [`bytemuck::Pod`] element types. It
//!   forwards every operation to the raw engine and reinterprets the bytes.
//! - [`RawView`], [`RawViewMut`], [`View`] and [`ViewMut`] are borrowed windows
//!   over a vector; [`DetachedView`] is the borrow-free form that is re-validated
//!   when attached.
//!
//! Capacity is always a whole number of blocks after a growth (see
//! [`quantize::quantize`]) and is never reduced implicitly; call
//! `crop_capacity` to return unused blocks. Under [`CapacityPolicy::Fixed`] the
//! capacity becomes a ceiling for implicit growth.
//!
//! None of the types are synchronized. A vector may be sent between threads, but
//! sharing one across threads requires external locking.

pub mod config;
pub mod quantize;
pub mod raw;
pub mod typed;
pub mod view;

pub use blockvec_common::{
    Result,
    error::{Error, ErrorKind},
};
pub use config::{BlockVecConfig, CapacityPolicy};
pub use raw::RawBlockVec;
pub use typed::{BlockVec, View, ViewMut};
pub use view::{DetachedView, RawView, RawViewMut};
