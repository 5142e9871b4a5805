//! Hybrid guide retrieval for the coaching chatbot.
//!
//! Given an embedded query (dense + sparse, see the `embedding` crate), this
//! crate decides how to query the external vector index, issues the query,
//! applies the relevance threshold, and assembles the bounded context string
//! that gets injected into the answer prompt.
//!
//! The moving parts, in pipeline order:
//!
//! - [`search_policy`] - pure decision function: lexical signal present?
//!   hybrid query at threshold 0.25; absent? dense-only at 0.30.
//! - [`VectorIndex`] / [`PineconeIndex`] - the managed-index boundary. Typed
//!   request/response structs; auth, index-missing, and transient faults are
//!   distinct errors so the caller can short-circuit or retry appropriately.
//! - [`filter_matches`] / [`no_relevant_guide`] - threshold filtering that
//!   preserves rank positions, and the all-or-nothing no-guide check.
//! - [`assemble_context`] - newline join under the 2000 / 2500-minus-query
//!   character caps.
//!
//! [`GuideRetriever`] wires the first three together; context assembly stays
//! a free function because the answer endpoint receives reference records
//! back from the client rather than re-running retrieval.

pub mod context;
pub mod error;
pub mod filter;
pub mod index;
pub mod policy;
pub mod types;

pub use crate::context::{assemble_context, MAX_COMBINED_CHARS, MAX_CONTEXT_CHARS};
pub use crate::error::IndexError;
pub use crate::filter::{filter_matches, no_relevant_guide};
pub use crate::index::{PineconeConfig, PineconeIndex, VectorIndex};
pub use crate::policy::{
    search_policy, SearchMode, SearchPolicy, DENSE_ONLY_THRESHOLD, HYBRID_THRESHOLD, TOP_K,
};
pub use crate::types::{GuideMatch, GuideMetadata, ReferenceRecord};

use embedding::QueryEmbedding;
use std::cmp::Ordering;
use std::sync::Arc;

/// Ranked candidates plus the policy that produced them.
#[derive(Debug, Clone)]
pub struct RetrievedGuides {
    pub policy: SearchPolicy,
    /// Candidates sorted by score descending.
    pub matches: Vec<GuideMatch>,
}

/// Query-time orchestration over an injected [`VectorIndex`].
pub struct GuideRetriever {
    index: Arc<dyn VectorIndex>,
}

impl GuideRetriever {
    pub fn new(index: Arc<dyn VectorIndex>) -> Self {
        Self { index }
    }

    /// Issue the policy-selected query and return ranked candidates.
    ///
    /// Candidates are re-sorted by score descending before returning - the
    /// external index already ranks them, but the ordering is an invariant
    /// downstream code relies on, so it is enforced here.
    pub async fn retrieve(
        &self,
        embedded: &QueryEmbedding,
    ) -> Result<RetrievedGuides, IndexError> {
        let policy = search_policy(!embedded.sparse.is_empty());
        let sparse = match policy.mode {
            SearchMode::Hybrid => Some(&embedded.sparse),
            SearchMode::DenseOnly => None,
        };

        let mut matches = self
            .index
            .query(&embedded.dense, sparse, TOP_K, true)
            .await?;

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        tracing::debug!(
            mode = ?policy.mode,
            threshold = policy.threshold,
            candidates = matches.len(),
            "index query complete"
        );

        Ok(RetrievedGuides { policy, matches })
    }

    /// Retrieve and threshold in one step: the record list handed to the
    /// prompt layer, same length and order as the ranked candidates.
    pub async fn find_guides(
        &self,
        embedded: &QueryEmbedding,
    ) -> Result<Vec<ReferenceRecord>, IndexError> {
        let retrieved = self.retrieve(embedded).await?;
        Ok(filter_matches(&retrieved.matches, retrieved.policy.threshold))
    }
}
