use std::io;
use thiserror::Error;

/// Errors surfaced by the embedding producer.
///
/// Encoder and transform failures are fatal for the request: nothing here is
/// retried locally, the caller decides what to do with a failed embedding.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The ONNX model file could not be located.
    #[error("model file not found: {0}")]
    ModelNotFound(String),
    /// The tokenizer JSON is missing.
    #[error("tokenizer missing: {0}")]
    TokenizerMissing(String),
    /// Configuration is inconsistent (e.g., unknown mode).
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),
    /// The fitted TF-IDF parameters could not be loaded or are malformed.
    #[error("vocabulary error: {0}")]
    Vocabulary(String),
    /// Low-level IO failures while touching the filesystem.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// ONNX Runtime, tokenizer, or pooling errors.
    #[error("inference failure: {0}")]
    Inference(String),
}
