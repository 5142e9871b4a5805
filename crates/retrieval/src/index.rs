use async_trait::async_trait;
use embedding::SparseVector;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::IndexError;
use crate::types::{GuideMatch, GuideMetadata};

/// Similarity index boundary.
///
/// The production implementation talks to a managed vector index over HTTP;
/// tests inject doubles. The index returns scored candidates only - relevance
/// thresholding happens in the filter, not here.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Issue a top-k similarity query. `sparse: None` means dense-only.
    async fn query(
        &self,
        dense: &[f32],
        sparse: Option<&SparseVector>,
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<GuideMatch>, IndexError>;
}

/// Connection settings for the managed vector index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PineconeConfig {
    /// Index endpoint, e.g. `https://coach-guides-abc123.svc.us-east-1.pinecone.io`.
    pub index_host: String,
    /// Service API key.
    pub api_key: String,
    /// Overall request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            index_host: String::new(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Reqwest-backed client for a Pinecone-style index.
pub struct PineconeIndex {
    client: reqwest::Client,
    cfg: PineconeConfig,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(skip_serializing_if = "Option::is_none")]
    sparse_vector: Option<&'a SparseVector>,
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Deserialize)]
struct WireMatch {
    id: String,
    score: f32,
    metadata: Option<GuideMetadata>,
}

impl PineconeIndex {
    /// Build the client. Fails fast on an empty host so a broken deployment
    /// surfaces at startup.
    pub fn new(cfg: PineconeConfig) -> Result<Self, IndexError> {
        if cfg.index_host.trim().is_empty() {
            return Err(IndexError::IndexNotFound(
                "index host is not configured".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| IndexError::Http(e.to_string()))?;

        Ok(Self { client, cfg })
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.cfg.index_host.trim_end_matches('/'))
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        dense: &[f32],
        sparse: Option<&SparseVector>,
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<GuideMatch>, IndexError> {
        let body = QueryRequest {
            vector: dense,
            sparse_vector: sparse,
            top_k,
            include_metadata,
        };

        let response = self
            .client
            .post(self.query_url())
            .header("Api-Key", &self.cfg.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| IndexError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_status(status, detail));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| IndexError::InvalidResponse(e.to_string()))?;

        parsed
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.ok_or_else(|| {
                    IndexError::InvalidResponse(format!(
                        "match '{}' is missing metadata although include_metadata was set",
                        m.id
                    ))
                })?;
                Ok(GuideMatch {
                    id: m.id,
                    score: m.score,
                    metadata,
                })
            })
            .collect()
    }
}

/// Map a non-2xx status to the error taxonomy. 404 from the index endpoint
/// means the index itself is gone, which is a deployment fault rather than
/// something worth retrying.
fn classify_status(status: StatusCode, detail: String) -> IndexError {
    match status {
        StatusCode::NOT_FOUND => IndexError::IndexNotFound(detail),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => IndexError::Auth(detail),
        s => IndexError::Service(format!("HTTP {s}: {detail}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_404_as_index_not_found() {
        let err = classify_status(StatusCode::NOT_FOUND, "no such index".into());
        assert!(matches!(err, IndexError::IndexNotFound(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn classify_401_and_403_as_auth() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            IndexError::Auth(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, String::new()),
            IndexError::Auth(_)
        ));
    }

    #[test]
    fn classify_5xx_and_429_as_transient_service_faults() {
        let err = classify_status(StatusCode::BAD_GATEWAY, String::new());
        assert!(matches!(err, IndexError::Service(_)));
        assert!(err.is_transient());

        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, String::new());
        assert!(err.is_transient());
    }

    #[test]
    fn empty_host_rejected_at_construction() {
        let err = PineconeIndex::new(PineconeConfig::default()).unwrap_err();
        assert!(matches!(err, IndexError::IndexNotFound(_)));
    }

    #[test]
    fn query_url_normalizes_trailing_slash() {
        let index = PineconeIndex::new(PineconeConfig {
            index_host: "https://guides.svc.pinecone.io/".into(),
            api_key: "k".into(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(index.query_url(), "https://guides.svc.pinecone.io/query");
    }

    #[test]
    fn query_request_omits_absent_sparse_vector() {
        let body = QueryRequest {
            vector: &[0.1, 0.2],
            sparse_vector: None,
            top_k: 10,
            include_metadata: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sparse_vector").is_none());
        assert_eq!(json["top_k"], 10);
    }

    #[test]
    fn query_request_includes_sparse_vector_when_present() {
        let sparse = SparseVector {
            indices: vec![3, 9],
            values: vec![0.7, 0.3],
        };
        let body = QueryRequest {
            vector: &[0.1],
            sparse_vector: Some(&sparse),
            top_k: 10,
            include_metadata: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["sparse_vector"]["indices"], serde_json::json!([3, 9]));
    }

    #[test]
    fn wire_response_deserializes() {
        let raw = r#"{
            "matches": [
                {"id": "guide-1", "score": 0.8,
                 "metadata": {"text": "물을 드세요", "keywords": ["수분"], "url": null}}
            ]
        }"#;
        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.matches.len(), 1);
        assert_eq!(parsed.matches[0].id, "guide-1");
    }

    #[test]
    fn wire_response_tolerates_missing_matches_field() {
        let parsed: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.matches.is_empty());
    }
}
