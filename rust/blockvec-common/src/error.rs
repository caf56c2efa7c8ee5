use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn allocation(requested_bytes: usize) -> Error {
        Error(ErrorKind::AllocationError { requested_bytes }.into())
    }

    pub fn capacity_overflow(elements: usize, element_size: usize) -> Error {
        Error(
            ErrorKind::CapacityOverflow {
                elements,
                element_size,
            }
            .into(),
        )
    }

    pub fn capacity_exceeded(requested: usize, capacity: usize) -> Error {
        Error(
            ErrorKind::CapacityExceeded {
                requested,
                capacity,
            }
            .into(),
        )
    }

    pub fn out_of_bounds(index: usize, len: usize) -> Error {
        Error(ErrorKind::OutOfBounds { index, len }.into())
    }

    pub fn empty_container() -> Error {
        Error(ErrorKind::EmptyContainer.into())
    }

    pub fn type_mismatch(expected: usize, actual: usize) -> Error {
        Error(ErrorKind::TypeMismatch { expected, actual }.into())
    }

    pub fn stale_view(begin: usize, len: usize) -> Error {
        Error(ErrorKind::StaleView { begin, len }.into())
    }

    /// Returns `true` if this is an [`ErrorKind::OutOfBounds`] error.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfBounds { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("failed to allocate {requested_bytes} bytes")]
    AllocationError { requested_bytes: usize },

    #[error("capacity of {elements} elements of {element_size} bytes overflows usize")]
    CapacityOverflow {
        elements: usize,
        element_size: usize,
    },

    #[error("fixed capacity exceeded: requested {requested} elements, capacity {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("container is empty")]
    EmptyContainer,

    #[error("element size mismatch: expected {expected} bytes, got {actual} bytes")]
    TypeMismatch { expected: usize, actual: usize },

    #[error("stale view [{begin}, +{len}): parent was modified after the view was detached")]
    StaleView { begin: usize, len: usize },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
