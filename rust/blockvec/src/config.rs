//! Construction parameters for block vectors.

use blockvec_common::{Result, verify_arg};

/// How a vector reacts when an operation needs more room than its current capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CapacityPolicy {
    /// Capacity is a cache: exceeding it reallocates to the next quantized size.
    #[default]
    Elastic,
    /// Capacity is a hard ceiling for implicit growth. Operations that would
    /// grow past it fail with `CapacityExceeded`; explicit sizing calls
    /// (`reserve`, `set_block_size`, `crop_capacity`) are still honoured.
    Fixed,
}

impl CapacityPolicy {
    /// Returns `true` for [`CapacityPolicy::Fixed`].
    #[inline]
    pub fn is_fixed(self) -> bool {
        self == CapacityPolicy::Fixed
    }
}

/// Configuration for a block vector.
///
/// Plain value, copied into every vector built from it. There is no
/// process-wide default other than [`BlockVecConfig::default`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockVecConfig {
    /// Growth quantum in elements. Capacity is always a multiple of this value
    /// after a growth.
    ///
    /// Default: 16. Must be non-zero.
    pub block_size: usize,

    /// Reaction to implicit growth past capacity.
    pub policy: CapacityPolicy,

    /// Capacity hint in elements, applied at construction and quantized like any
    /// other capacity. Zero yields exactly one block.
    pub initial_capacity: usize,

    /// Byte alignment of the first element.
    ///
    /// Default: 64. Must be a power of two; typed access additionally requires it
    /// to be at least the element type's alignment.
    pub alignment: usize,
}

impl BlockVecConfig {
    /// Default growth quantum, in elements.
    pub const DEFAULT_BLOCK_SIZE: usize = 16;

    /// Default alignment of the element buffer, in bytes.
    pub const DEFAULT_ALIGNMENT: usize = 64;

    /// Largest supported alignment, in bytes.
    pub const MAX_ALIGNMENT: usize = 4096;

    /// Creates the default elastic configuration.
    pub fn new() -> Self {
        Self {
            block_size: Self::DEFAULT_BLOCK_SIZE,
            policy: CapacityPolicy::Elastic,
            initial_capacity: 0,
            alignment: Self::DEFAULT_ALIGNMENT,
        }
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_policy(mut self, policy: CapacityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment;
        self
    }

    /// Shorthand for `with_policy(CapacityPolicy::Fixed)`.
    pub fn fixed(self) -> Self {
        self.with_policy(CapacityPolicy::Fixed)
    }

    /// Checks that the block size is non-zero and the alignment is a supported
    /// power of two.
    pub fn validate(&self) -> Result<()> {
        verify_arg!(block_size, self.block_size != 0);
        verify_arg!(alignment, self.alignment.is_power_of_two());
        verify_arg!(alignment, self.alignment <= Self::MAX_ALIGNMENT);
        Ok(())
    }
}

impl Default for BlockVecConfig {
    fn default() -> Self {
        Self::new()
    }
}
