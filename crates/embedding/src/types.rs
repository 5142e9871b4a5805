use serde::{Deserialize, Serialize};

/// Sparse lexical vector produced by the fitted TF-IDF transform.
///
/// `indices` are unique, ascending vocabulary positions; `values` carries the
/// matching weights. An empty vector is a valid output and signals "no known
/// term matched", which callers use to fall back to dense-only search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SparseVector {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseVector {
    /// True when the transform found no known terms in the query.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of nonzero entries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }
}

/// Combined output of the embedding producer for one query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryEmbedding {
    /// Dense semantic vector, fixed dimensionality matching the index.
    pub dense: Vec<f32>,
    /// Sparse lexical signal; may have zero entries.
    pub sparse: SparseVector,
    /// Name of the encoder that produced the dense vector.
    pub model_name: String,
    /// Whether `dense` was L2-normalized.
    pub normalized: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_vector_default_is_empty() {
        let sv = SparseVector::default();
        assert!(sv.is_empty());
        assert_eq!(sv.len(), 0);
    }

    #[test]
    fn sparse_vector_len_counts_entries() {
        let sv = SparseVector {
            indices: vec![3, 17, 42],
            values: vec![0.1, 0.5, 0.2],
        };
        assert!(!sv.is_empty());
        assert_eq!(sv.len(), 3);
    }

    #[test]
    fn query_embedding_serde_roundtrip() {
        let embedding = QueryEmbedding {
            dense: vec![0.6, 0.8],
            sparse: SparseVector {
                indices: vec![1],
                values: vec![1.0],
            },
            model_name: "test-encoder".into(),
            normalized: true,
        };

        let serialized = serde_json::to_string(&embedding).unwrap();
        let deserialized: QueryEmbedding = serde_json::from_str(&serialized).unwrap();
        assert_eq!(embedding, deserialized);
    }
}
