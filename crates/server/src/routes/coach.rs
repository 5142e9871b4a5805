use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use embedding::EmbeddingError;
use generation::{GenerationError, NO_REFERENCE_FALLBACK};
use retrieval::{assemble_context, no_relevant_guide, IndexError, ReferenceRecord};

/// Product copy for upstream faults, per flow.
const SUMMARY_UNAVAILABLE: &str = "현재 AI 질문 요약이 어렵습니다. 잠시 후에 다시 사용해주세요.";
const SEARCH_UNAVAILABLE: &str =
    "현재 AI 답변 가이드 검색이 어렵습니다. 잠시 후에 다시 사용해주세요.";
const ANSWER_UNAVAILABLE: &str = "현재 AI 답변 추천이 어렵습니다. 잠시 후에 다시 사용해주세요.";

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ReferenceRequest {
    pub query: String,
}

/// One reference row in the wire format the clients consume. Placeholder
/// rows keep their slot with a null index.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub index: Option<String>,
    pub keyword: Vec<String>,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub query: String,
    #[serde(default)]
    pub data: Vec<AnswerData>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerData {
    #[serde(default)]
    pub reference: Vec<ReferenceEntry>,
}

/// Reject queries that are empty once trimmed.
fn require_query(query: &str) -> ServerResult<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ServerError::EmptyQuery);
    }
    Ok(trimmed)
}

fn map_chat_error(err: GenerationError, message: &str) -> ServerError {
    let status = match err {
        GenerationError::Auth(_) => StatusCode::FORBIDDEN,
        GenerationError::Quota(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    ServerError::upstream(status, message, err.to_string())
}

fn map_index_error(err: IndexError) -> ServerError {
    let status = match err {
        // A missing index is a deployment fault; auth means the service key
        // is bad. Both need an operator, neither is retryable here.
        IndexError::Auth(_) | IndexError::IndexNotFound(_) => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    ServerError::upstream(status, SEARCH_UNAVAILABLE, err.to_string())
}

fn map_embedding_error(err: EmbeddingError) -> ServerError {
    ServerError::upstream(
        StatusCode::INTERNAL_SERVER_ERROR,
        SEARCH_UNAVAILABLE,
        err.to_string(),
    )
}

/// POST /api/v1/coach/summary - digest the user's question for the counselor.
pub async fn summarize(
    State(state): State<ServerState>,
    Json(request): Json<SummaryRequest>,
) -> ServerResult<impl IntoResponse> {
    let query = require_query(&request.query)?;
    tracing::info!(query = %query, "summary requested");

    let summary = state
        .chat
        .summarize(query)
        .await
        .map_err(|e| map_chat_error(e, SUMMARY_UNAVAILABLE))?;

    Ok(Json(json!({
        "status_code": 200,
        "data": [ { "summary": summary } ]
    })))
}

/// POST /api/v1/coach/reference - retrieve guide documents for a question.
///
/// Returns 204 when not a single candidate cleared the relevance threshold;
/// otherwise the full rank-ordered reference list, placeholders included.
pub async fn reference(
    State(state): State<ServerState>,
    Json(request): Json<ReferenceRequest>,
) -> ServerResult<Response> {
    let query = require_query(&request.query)?;

    let embedded = state
        .embedder
        .embed_query(query)
        .map_err(map_embedding_error)?;
    let records = state
        .retriever
        .find_guides(&embedded)
        .await
        .map_err(map_index_error)?;

    if no_relevant_guide(&records) {
        tracing::info!(query = %query, "no relevant guide found");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let entries: Vec<ReferenceEntry> = records.iter().map(to_wire_entry).collect();

    Ok(Json(json!({
        "status_code": 200,
        "data": [ { "reference": entries } ]
    }))
    .into_response())
}

/// POST /api/v1/coach/answer - generate the counselor answer from the
/// reference list the client got back from `/reference`.
pub async fn answer(
    State(state): State<ServerState>,
    Json(request): Json<AnswerRequest>,
) -> ServerResult<impl IntoResponse> {
    let query = require_query(&request.query)?;

    let texts: Vec<&str> = request
        .data
        .first()
        .map(|d| {
            d.reference
                .iter()
                .filter(|entry| entry.index.is_some() && !entry.text.is_empty())
                .map(|entry| entry.text.as_str())
                .collect()
        })
        .unwrap_or_default();

    let mut context = assemble_context(&texts, query);
    if context.is_empty() {
        context = NO_REFERENCE_FALLBACK.to_string();
    }

    let answer = state
        .chat
        .answer(query, &context)
        .await
        .map_err(|e| map_chat_error(e, ANSWER_UNAVAILABLE))?;

    Ok(Json(json!({
        "status_code": 200,
        "data": [ { "answer": answer } ]
    })))
}

/// Keywords go out newline-suffixed; the client renders them as lines.
fn to_wire_entry(record: &ReferenceRecord) -> ReferenceEntry {
    ReferenceEntry {
        index: record.id.clone(),
        keyword: record
            .keywords
            .iter()
            .map(|k| format!("{k}\n"))
            .collect(),
        text: record.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{body_json, test_state, test_state_with_matches};
    use retrieval::{GuideMatch, GuideMetadata};

    fn guide(id: &str, score: f32, text: &str) -> GuideMatch {
        GuideMatch {
            id: id.into(),
            score,
            metadata: GuideMetadata {
                text: text.into(),
                keywords: vec!["혈당".into()],
                url: None,
            },
        }
    }

    #[tokio::test]
    async fn summary_rejects_empty_query() {
        let state = test_state(|_| {});
        let result = summarize(
            State(state),
            Json(SummaryRequest {
                query: "   ".into(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ServerError::EmptyQuery)));
    }

    #[tokio::test]
    async fn summary_returns_enveloped_digest() {
        let state = test_state(|_| {});
        let response = summarize(
            State(state),
            Json(SummaryRequest {
                query: "간헐적 단식이 도움이 되나요?".into(),
            }),
        )
        .await
        .unwrap()
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status_code"], 200);
        assert!(body["data"][0]["summary"].is_string());
    }

    #[tokio::test]
    async fn reference_returns_204_when_nothing_clears_threshold() {
        let state = test_state_with_matches(vec![guide("g1", 0.1, "본문"), guide("g2", 0.05, "본문")]);
        let response = reference(
            State(state),
            Json(ReferenceRequest {
                query: "아무 질문".into(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn reference_keeps_placeholders_and_suffixes_keywords() {
        let state = test_state_with_matches(vec![
            guide("g1", 0.9, "혈당 가이드"),
            guide("g2", 0.05, "무관한 가이드"),
        ]);
        let response = reference(
            State(state),
            Json(ReferenceRequest {
                query: "혈당 질문".into(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let reference_list = &body["data"][0]["reference"];
        assert_eq!(reference_list.as_array().unwrap().len(), 2);
        assert_eq!(reference_list[0]["index"], "g1");
        assert_eq!(reference_list[0]["keyword"][0], "혈당\n");
        assert!(reference_list[1]["index"].is_null());
    }

    #[tokio::test]
    async fn answer_uses_kept_reference_texts() {
        let state = test_state(|_| {});
        let response = answer(
            State(state),
            Json(AnswerRequest {
                query: "물을 얼마나 마셔야 하나요?".into(),
                data: vec![AnswerData {
                    reference: vec![
                        ReferenceEntry {
                            index: Some("g1".into()),
                            keyword: vec![],
                            text: "하루 2L 수분 섭취를 추천드려요.".into(),
                        },
                        ReferenceEntry {
                            index: None,
                            keyword: vec![],
                            text: String::new(),
                        },
                    ],
                }],
            }),
        )
        .await
        .unwrap()
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let answer_text = body["data"][0]["answer"].as_str().unwrap();
        // The echo chat double reflects the prompt, so the kept guide text
        // must appear and the fallback must not.
        assert!(answer_text.contains("하루 2L 수분 섭취를 추천드려요."));
        assert!(!answer_text.contains(NO_REFERENCE_FALLBACK));
    }

    #[tokio::test]
    async fn answer_substitutes_fallback_without_references() {
        let state = test_state(|_| {});
        let response = answer(
            State(state),
            Json(AnswerRequest {
                query: "질문".into(),
                data: vec![],
            }),
        )
        .await
        .unwrap()
        .into_response();

        let body = body_json(response).await;
        let answer_text = body["data"][0]["answer"].as_str().unwrap();
        assert!(answer_text.contains(NO_REFERENCE_FALLBACK));
    }

    #[test]
    fn chat_auth_fault_maps_to_403_with_product_copy() {
        let err = map_chat_error(GenerationError::Auth("bad key".into()), SUMMARY_UNAVAILABLE);
        match err {
            ServerError::Upstream {
                status, message, ..
            } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(message, SUMMARY_UNAVAILABLE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn index_not_found_maps_to_403() {
        let err = map_index_error(IndexError::IndexNotFound("coach-guides".into()));
        match err {
            ServerError::Upstream { status, detail, .. } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert!(detail.contains("coach-guides"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn transient_index_fault_maps_to_500() {
        let err = map_index_error(IndexError::Service("HTTP 502".into()));
        match err {
            ServerError::Upstream { status, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
