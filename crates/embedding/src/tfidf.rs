use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::normalize::l2_normalize_in_place;
use crate::types::SparseVector;
use crate::EmbeddingError;

/// Fitted TF-IDF parameters, exported by the offline fitting job as JSON.
///
/// The fit itself runs over the guide corpus in a batch step; at query time
/// only the transform is applied.
#[derive(Debug, Deserialize)]
struct TfidfParams {
    /// term → vocabulary index
    vocabulary: HashMap<String, u32>,
    /// idf weight per vocabulary index
    idf: Vec<f32>,
}

/// Applies a pre-fitted term-weighting transform to raw query text.
///
/// Tokenization mirrors the fitting side: lowercase, unicode alphanumeric
/// runs, tokens shorter than two characters dropped. Weights are tf·idf,
/// L2-normalized over the nonzero entries, returned sorted by vocabulary
/// index.
#[derive(Debug)]
pub(crate) struct TfidfVectorizer {
    vocabulary: HashMap<String, u32>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Load fitted parameters from disk, validating that every vocabulary
    /// index has an idf weight.
    pub(crate) fn from_file(path: &Path) -> Result<Self, EmbeddingError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            EmbeddingError::Vocabulary(format!("cannot read {}: {e}", path.display()))
        })?;
        let params: TfidfParams = serde_json::from_str(&raw).map_err(|e| {
            EmbeddingError::Vocabulary(format!("malformed tfidf params {}: {e}", path.display()))
        })?;

        if let Some(max_index) = params.vocabulary.values().max() {
            if (*max_index as usize) >= params.idf.len() {
                return Err(EmbeddingError::Vocabulary(format!(
                    "vocabulary index {} exceeds idf table of length {}",
                    max_index,
                    params.idf.len()
                )));
            }
        }

        Ok(Self {
            vocabulary: params.vocabulary,
            idf: params.idf,
        })
    }

    /// Transform with an empty vocabulary: every query maps to the empty
    /// sparse vector, forcing the dense-only search path.
    pub(crate) fn empty() -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Apply the fitted transform to one query.
    pub(crate) fn transform(&self, text: &str) -> SparseVector {
        if self.vocabulary.is_empty() {
            return SparseVector::default();
        }

        let mut counts: HashMap<u32, f32> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(token.as_str()) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }
        if counts.is_empty() {
            return SparseVector::default();
        }

        let mut entries: Vec<(u32, f32)> = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index as usize]))
            .collect();
        entries.sort_unstable_by_key(|(index, _)| *index);

        let indices: Vec<u32> = entries.iter().map(|(index, _)| *index).collect();
        let mut values: Vec<f32> = entries.into_iter().map(|(_, value)| value).collect();
        l2_normalize_in_place(&mut values);

        SparseVector { indices, values }
    }
}

/// Lowercased unicode alphanumeric runs, minimum two characters.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(|token| token.to_lowercase())
}
