use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration for the embedding producer.
///
/// # Example
/// ```no_run
/// use embedding::{EmbeddingConfig, EmbeddingService};
/// use std::path::PathBuf;
///
/// let cfg = EmbeddingConfig {
///     model_path: PathBuf::from("./models/kure-base/model.onnx"),
///     tokenizer_path: PathBuf::from("./models/kure-base/tokenizer.json"),
///     tfidf_params_path: Some(PathBuf::from("./models/tfidf_params.json")),
///     ..Default::default()
/// };
///
/// let service = EmbeddingService::new(cfg).unwrap();
/// let _ = service.embed_query("공복 혈당이 높아요");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Inference mode selector: `"onnx"` (local encoder) or `"stub"`
    /// (deterministic vectors for tests). The stub is never a silent
    /// fallback; it has to be selected explicitly.
    pub mode: String,
    /// Friendly label surfaced on every [`QueryEmbedding`](crate::QueryEmbedding).
    pub model_name: String,
    /// Local path of the ONNX encoder.
    pub model_path: PathBuf,
    /// Path to `tokenizer.json` for the encoder.
    pub tokenizer_path: PathBuf,
    /// Fitted TF-IDF parameters (vocabulary + idf table) as JSON. When absent
    /// the sparse transform always produces an empty vector and every query
    /// takes the dense-only path.
    pub tfidf_params_path: Option<PathBuf>,
    /// Token truncation limit for the encoder.
    pub max_sequence_length: usize,
    /// Expected dense dimensionality; must match the external index.
    pub embedding_dim: usize,
    /// Normalize the dense vector to unit length (required for cosine
    /// similarity against the index).
    pub normalize: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            mode: "onnx".into(),
            model_name: "kure-base".into(),
            model_path: PathBuf::from("./models/kure-base/model.onnx"),
            tokenizer_path: PathBuf::from("./models/kure-base/tokenizer.json"),
            tfidf_params_path: Some(PathBuf::from("./models/tfidf_params.json")),
            max_sequence_length: 512,
            embedding_dim: 768,
            normalize: true,
        }
    }
}
