use thiserror::Error;

/// Errors from the chat-completion boundary.
///
/// The server maps these onto user-facing responses: auth faults become 403s
/// with the product message, quota/rate faults become 503s, everything else a
/// 500. Nothing is retried here.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The LLM service rejected our credentials.
    #[error("chat authentication failed: {0}")]
    Auth(String),
    /// Token quota or rate limit exhausted at the provider.
    #[error("chat quota exceeded: {0}")]
    Quota(String),
    /// 5xx or timeout trouble at the provider.
    #[error("chat service error: {0}")]
    Service(String),
    /// Transport-level failure before any response arrived.
    #[error("chat request failed: {0}")]
    Http(String),
    /// The response arrived but does not match the expected schema.
    #[error("malformed chat response: {0}")]
    InvalidResponse(String),
    /// Configuration is inconsistent (e.g., missing API key).
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),
}

impl GenerationError {
    /// Faults worth alerting an operator about (credentials, quota, outage).
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            GenerationError::Auth(_) | GenerationError::Quota(_) | GenerationError::Service(_)
        )
    }
}
