use specforge_document::DocumentError;
use specforge_protocol::ProtocolError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// The batch holds no protocol block; distinct from a batch that resolved to nothing
    #[error("Protocol not found or invalid format.")]
    NoProtocol,

    #[error("Document store error: {0}")]
    DocumentError(#[from] DocumentError),
}

impl From<ProtocolError> for ResolveError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::NotFound => Self::NoProtocol,
        }
    }
}
