use thiserror::Error;

/// Invocation-level failures that prevent a response from reaching
/// CloudFormation. Provider and validation failures are reported as a
/// `FAILED` response instead.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid lifecycle event: {0}")]
    InvalidEvent(String),
    #[error("handler misconfiguration: {0}")]
    Configuration(String),
    #[error("failed to serialize custom resource response: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to deliver custom resource response: {0}")]
    ResponseDelivery(String),
}
