//! Errors raised while rendering a problem onto a response

/// Failure to render a [`crate::Problem`] onto a [`crate::ResponseWriter`].
#[derive(thiserror::Error, Debug)]
pub enum ProblemError {
    /// The problem could not be encoded as JSON. Nothing was written.
    #[error("failed to serialize problem details: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Headers and status were set but the body could not be written.
    #[error("failed to write problem details body: {0}")]
    Write(#[source] std::io::Error),
}
