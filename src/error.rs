//! Error handling for the Arka core.
//!
//! Most public component contracts never surface these errors: storage reads
//! degrade to "absent", unknown profiles return `false`, unknown operations
//! fall back to a baseline. The variants below are what the internal helpers
//! propagate before that conversion happens.

/// A specialized `Result` type for Arka operations.
pub type Result<T> = std::result::Result<T, ArkaError>;

/// The main error type for Arka.
#[derive(Debug, thiserror::Error)]
pub enum ArkaError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Envelope payload could not be decoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Key-value backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No operation registered under the given name
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// No profile registered under the given id
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    /// No intent registered under the given tag
    #[error("Unknown intent: {0}")]
    UnknownIntent(String),

    /// Not one of the chart range tags
    #[error("Unknown range tag: {0}")]
    UnknownRange(String),

    /// A raced future did not finish before its deadline
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// A spawned background task failed
    #[error("Task error: {0}")]
    Task(String),
}

impl ArkaError {
    /// Create a new encoding error
    pub fn encoding_error(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create a new storage error
    pub fn storage_error(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new unknown-operation error
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation(name.into())
    }

    /// Create a new task error
    pub fn task_error(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }

    /// Create a new unknown-intent error
    pub fn unknown_intent(tag: impl Into<String>) -> Self {
        Self::UnknownIntent(tag.into())
    }

    /// Create a new unknown-range error
    pub fn unknown_range(tag: impl Into<String>) -> Self {
        Self::UnknownRange(tag.into())
    }

    /// Create a new unknown-profile error
    pub fn unknown_profile(id: impl Into<String>) -> Self {
        Self::UnknownProfile(id.into())
    }
}
