use thiserror::Error;

/// Errors from the external vector index boundary.
///
/// The taxonomy matters upstream: a missing index is a deployment fault and
/// must short-circuit, while service faults are surfaced for a higher-level
/// retry/alert decision. Nothing here is retried inside this crate.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The named index does not exist - a configuration fault, distinct from
    /// transient service trouble.
    #[error("index not found: {0}")]
    IndexNotFound(String),
    /// The index service rejected our credentials.
    #[error("index authentication failed: {0}")]
    Auth(String),
    /// Quota, throttling, or 5xx trouble at the index service.
    #[error("index service error: {0}")]
    Service(String),
    /// Transport-level failure before any response arrived.
    #[error("index request failed: {0}")]
    Http(String),
    /// The response arrived but does not match the expected schema.
    #[error("malformed index response: {0}")]
    InvalidResponse(String),
}

impl IndexError {
    /// True for faults where a retry at a higher layer could help.
    pub fn is_transient(&self) -> bool {
        matches!(self, IndexError::Service(_) | IndexError::Http(_))
    }
}
