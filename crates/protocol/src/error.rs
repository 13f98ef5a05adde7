use thiserror::Error;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors that can occur while reading protocol text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The input contained no complete `<<<SPEC_START>>>` … `<<<SPEC_END>>>` block
    #[error("Protocol not found or invalid format")]
    NotFound,
}
