use thiserror::Error;

/// Lifecycle errors from the process-wide intersection entry points.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynchError {
    #[error("intersection is already initialized")]
    AlreadyInitialized,

    #[error("intersection is not initialized")]
    NotInitialized,

    #[error("intersection still in use by {holders} other caller(s)")]
    StillInUse { holders: usize },
}
