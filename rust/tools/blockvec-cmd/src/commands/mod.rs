//! Command implementations for blockvec-cmd

pub mod demo;
pub mod inspect;
pub mod slice;
