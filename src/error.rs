// Error taxonomy shared by every store operation

use std::io;
use thiserror::Error;

/// Error type for tasktrack operations
#[derive(Error, Debug)]
pub enum Error {
    /// Description rejected before any storage access
    #[error("{0}")]
    Validation(String),

    /// Status token outside the known set
    #[error("Invalid status '{0}'. Valid: todo, in-progress, done")]
    InvalidStatus(String),

    /// Caller-supplied task ID that is not an integer
    #[error("Task ID must be an integer")]
    ParseId,

    /// Well-formed ID with no matching task
    #[error("Task with ID {0} not found")]
    NotFound(u64),

    /// I/O failure unrelated to corruption
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),
}

/// Result type alias for tasktrack operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn empty_description() -> Self {
        Error::Validation("Description cannot be empty".to_string())
    }

    pub(crate) fn description_too_long(max: usize) -> Self {
        Error::Validation(format!("Description is too long (max {max} chars)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        assert_eq!(
            Error::InvalidStatus("donee".to_string()).to_string(),
            "Invalid status 'donee'. Valid: todo, in-progress, done"
        );
        assert_eq!(Error::NotFound(7).to_string(), "Task with ID 7 not found");
        assert_eq!(Error::ParseId.to_string(), "Task ID must be an integer");
        assert_eq!(
            Error::empty_description().to_string(),
            "Description cannot be empty"
        );
        assert_eq!(
            Error::description_too_long(255).to_string(),
            "Description is too long (max 255 chars)"
        );
    }

    #[test]
    fn test_storage_wraps_io() {
        let err = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(matches!(err, Error::Storage(_)));
        assert!(err.to_string().starts_with("Storage error:"));
    }
}
