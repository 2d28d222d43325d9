//! Error taxonomy for service operations.
//!
//! Every operation fails with one of these variants. The HTTP layer maps
//! them to status codes and a JSON body with a `detail` field.

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Request payload failed shape validation.
    #[error("{0}")]
    InvalidInput(String),

    /// No record with the requested id.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A required setting is missing or invalid.
    #[error("{0}")]
    Configuration(String),

    /// The text-generation provider call failed.
    #[error("{0}")]
    Upstream(String),

    /// The document store could not complete the operation.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl Error {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Wraps a store failure, logging the full cause chain.
    pub fn storage(err: anyhow::Error) -> Self {
        let cause = format!("{err:#}");
        tracing::error!(error = %cause, "Document store operation failed");
        Self::StorageUnavailable(cause)
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 422,
            Self::NotFound { .. } => 404,
            Self::Configuration(_) | Self::Upstream(_) => 500,
            Self::StorageUnavailable(_) => 503,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::InvalidInput("bad".into()).status_code(), 422);
        assert_eq!(Error::not_found("Product").status_code(), 404);
        assert_eq!(Error::Configuration("x".into()).status_code(), 500);
        assert_eq!(Error::Upstream("x".into()).status_code(), 500);
        assert_eq!(Error::StorageUnavailable("x".into()).status_code(), 503);
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(Error::not_found("Post").to_string(), "Post not found");
    }

    #[test]
    fn test_storage_keeps_cause_chain() {
        let err = anyhow::anyhow!("disk full").context("Failed to commit write transaction");
        let message = Error::storage(err).to_string();
        assert!(message.contains("Failed to commit write transaction"));
        assert!(message.contains("disk full"));
    }
}
