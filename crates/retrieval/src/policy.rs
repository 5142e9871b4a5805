use serde::{Deserialize, Serialize};

/// Number of candidates requested from the index per query.
pub const TOP_K: usize = 10;

/// Relevance bar when both dense and sparse signals are present.
pub const HYBRID_THRESHOLD: f32 = 0.25;

/// Relevance bar when only the dense signal is available.
pub const DENSE_ONLY_THRESHOLD: f32 = 0.30;

/// How the index is queried for a given request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Combined dense + sparse similarity query.
    Hybrid,
    /// Dense-only query; used when the sparse transform found no known terms.
    DenseOnly,
}

/// Query mode plus the relevance threshold applied to its results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SearchPolicy {
    pub mode: SearchMode,
    pub threshold: f32,
}

/// Decide the query mode and relevance threshold from the lexical signal.
///
/// A present sparse vector means the query contains terms the guide corpus
/// knows about - a more specific query, so the bar for "relevant" drops to
/// 0.25. With no lexical signal the dense-only query carries the full burden
/// and the bar rises to 0.30. An empty sparse vector is a designed fallback,
/// not a failure.
pub fn search_policy(has_sparse_signal: bool) -> SearchPolicy {
    if has_sparse_signal {
        SearchPolicy {
            mode: SearchMode::Hybrid,
            threshold: HYBRID_THRESHOLD,
        }
    } else {
        SearchPolicy {
            mode: SearchMode::DenseOnly,
            threshold: DENSE_ONLY_THRESHOLD,
        }
    }
}
