use crate::types::{GuideMatch, ReferenceRecord};

/// Apply the relevance threshold to ranked candidates.
///
/// Output has the same length and order as the input: passing candidates keep
/// their full record, failing ones become the no-match placeholder so rank
/// positions stay stable for the caller.
pub fn filter_matches(matches: &[GuideMatch], threshold: f32) -> Vec<ReferenceRecord> {
    matches
        .iter()
        .map(|m| {
            if m.score >= threshold {
                ReferenceRecord {
                    id: Some(m.id.clone()),
                    keywords: m.metadata.keywords.clone(),
                    text: m.metadata.text.clone(),
                    image_url: m.metadata.url.clone(),
                }
            } else {
                ReferenceRecord::no_match()
            }
        })
        .collect()
}

/// True when not a single candidate cleared the threshold.
///
/// All-or-nothing by design: one passing candidate is enough to proceed with
/// partial guidance; only total failure triggers the no-guide branch
/// upstream. An empty candidate list counts as no guide.
pub fn no_relevant_guide(records: &[ReferenceRecord]) -> bool {
    records.iter().all(|r| !r.is_match())
}
