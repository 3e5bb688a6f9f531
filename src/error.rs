use std::fmt;

/// Error type for the soak driver and binary.
///
/// Pool operations themselves never fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid configuration value
    InvalidArgument(String),

    /// A soak worker thread panicked
    WorkerPanicked(usize),

    /// A buffer was observed held by more than one owner
    OwnershipViolation(usize),

    /// The pool held more buffers than it has slots
    CapacityExceeded { resident: usize, slots: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::WorkerPanicked(id) => write!(f, "Worker {} panicked", id),
            Error::OwnershipViolation(count) => {
                write!(f, "Ownership violation: {} buffers held twice", count)
            }
            Error::CapacityExceeded { resident, slots } => write!(
                f,
                "Capacity exceeded: {} resident buffers in {} slots",
                resident, slots
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for soak operations
pub type Result<T> = std::result::Result<T, Error>;
