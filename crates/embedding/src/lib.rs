//! Query embedding for the coaching retrieval pipeline.
//!
//! This crate turns a user question into the pair of signals the vector index
//! understands: a dense semantic vector from a local transformer encoder, and
//! a sparse lexical vector from a pre-fitted TF-IDF transform.
//!
//! Two modes:
//!
//! - **ONNX mode** - Run the encoder locally. Requires model + tokenizer files.
//! - **Stub mode** - For testing. Generates fake but consistent vectors so the
//!   rest of the pipeline can be exercised without model assets. Stub mode is
//!   always an explicit choice, never a fallback: a broken encoder fails the
//!   request.
//!
//! The dense path tokenizes with truncation at 512 tokens, mean-pools the
//! final hidden states under the attention mask (denominator floored at 1e-9),
//! and L2-normalizes so cosine scores against the index are meaningful. The
//! sparse path may legitimately produce an empty vector - that is a signal,
//! not an error: downstream search switches to dense-only mode with a higher
//! relevance bar.
//!
//! ## Threading notes
//!
//! Tokenizers and ONNX sessions get cached per thread. First call on any
//! thread does the expensive setup; after that it's fast.
//!
//! ## Quick example
//!
//! ```no_run
//! use embedding::{EmbeddingConfig, EmbeddingService};
//! use std::path::PathBuf;
//!
//! let cfg = EmbeddingConfig {
//!     model_path: PathBuf::from("models/kure-base/model.onnx"),
//!     tokenizer_path: PathBuf::from("models/kure-base/tokenizer.json"),
//!     tfidf_params_path: Some(PathBuf::from("models/tfidf_params.json")),
//!     ..Default::default()
//! };
//!
//! let service = EmbeddingService::new(cfg).unwrap();
//! let embedded = service.embed_query("공복 혈당이 계속 높게 나와요").unwrap();
//! assert_eq!(embedded.dense.len(), 768);
//! ```

pub mod config;
pub mod error;
pub mod types;

mod cache;
mod normalize;
mod onnx;
mod stub;
mod tfidf;

pub use crate::config::EmbeddingConfig;
pub use crate::error::EmbeddingError;
pub use crate::types::{QueryEmbedding, SparseVector};

use crate::cache::get_or_load_encoder;
use crate::normalize::l2_normalize_in_place;
use crate::onnx::run_encoder;
use crate::stub::make_stub_vector;
use crate::tfidf::TfidfVectorizer;

/// Embedding producer, explicitly constructed and injected into callers.
///
/// Holds the fitted TF-IDF transform (loaded eagerly so a bad deployment
/// artifact fails at startup, not mid-request) and the encoder configuration.
/// The ONNX session itself is cached per thread on first use.
#[derive(Debug)]
pub struct EmbeddingService {
    cfg: EmbeddingConfig,
    vectorizer: TfidfVectorizer,
}

impl EmbeddingService {
    /// Build the service, loading fitted TF-IDF parameters when configured.
    pub fn new(cfg: EmbeddingConfig) -> Result<Self, EmbeddingError> {
        match cfg.mode.as_str() {
            "onnx" | "stub" => {}
            other => {
                return Err(EmbeddingError::InvalidConfig(format!(
                    "unknown embedding mode '{other}'"
                )))
            }
        }

        let vectorizer = match cfg.tfidf_params_path.as_deref() {
            Some(path) => TfidfVectorizer::from_file(path)?,
            None => TfidfVectorizer::empty(),
        };

        Ok(Self { cfg, vectorizer })
    }

    /// Convert a query into its dense + sparse representation.
    ///
    /// The caller guarantees the query is non-empty after trimming; this
    /// producer does not re-validate. Encoder failures propagate as fatal
    /// errors - there is no retry and no stub fallback.
    pub fn embed_query(&self, query: &str) -> Result<QueryEmbedding, EmbeddingError> {
        let mut dense = match self.cfg.mode.as_str() {
            "stub" => make_stub_vector(query, &self.cfg)?,
            _ => {
                let handle = get_or_load_encoder(&self.cfg)?;
                run_encoder(handle.as_ref(), query, self.cfg.max_sequence_length)?
            }
        };

        if dense.len() != self.cfg.embedding_dim {
            return Err(EmbeddingError::Inference(format!(
                "encoder produced {} components, expected {}",
                dense.len(),
                self.cfg.embedding_dim
            )));
        }

        if self.cfg.normalize {
            l2_normalize_in_place(&mut dense);
        }

        let sparse = self.vectorizer.transform(query);
        tracing::debug!(
            dense_dim = dense.len(),
            sparse_terms = sparse.len(),
            "query embedded"
        );

        Ok(QueryEmbedding {
            dense,
            sparse,
            model_name: self.cfg.model_name.clone(),
            normalized: self.cfg.normalize,
        })
    }

    /// The configured dense dimensionality (must match the external index).
    pub fn embedding_dim(&self) -> usize {
        self.cfg.embedding_dim
    }
}
