use serde::{Deserialize, Serialize};

/// Metadata stored alongside each guide document in the vector index.
///
/// Validated at the boundary: responses that do not fit this schema are
/// rejected with a typed error instead of being poked at dynamically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuideMetadata {
    /// Guide body text, injected into the answer prompt.
    pub text: String,
    /// Topic keywords attached during indexing.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Optional illustration URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// One scored candidate returned by the vector index.
///
/// Created per query and discarded once the response is built; never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuideMatch {
    pub id: String,
    pub score: f32,
    pub metadata: GuideMetadata,
}

/// Relevance-filtered record handed to the prompt-construction layer.
///
/// `id: None` marks a candidate that fell below the active threshold; the
/// slot is kept so rank positions stay stable across the response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceRecord {
    pub id: Option<String>,
    pub keywords: Vec<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ReferenceRecord {
    /// Placeholder for a candidate that failed the relevance threshold.
    pub fn no_match() -> Self {
        Self {
            id: None,
            keywords: Vec::new(),
            text: String::new(),
            image_url: None,
        }
    }

    /// True when this record passed the threshold.
    pub fn is_match(&self) -> bool {
        self.id.is_some()
    }
}
