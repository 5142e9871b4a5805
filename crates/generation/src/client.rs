use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::prompts::{
    answer_user_message, refine_user_message, summary_user_message, ANSWER_SYSTEM_PROMPT,
    REFINE_INSTRUCTION, SUMMARY_SYSTEM_PROMPT,
};

/// Text-generation boundary for the coaching flows.
///
/// Implementors only have to provide [`complete`](ChatGenerator::complete);
/// the coaching flows are default methods on top of it, so test doubles stay
/// one function. The production implementation calls an OpenAI-compatible
/// chat API.
#[async_trait]
pub trait ChatGenerator: Send + Sync {
    /// One-shot completion under an arbitrary system prompt.
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError>;

    /// Policy-constrained counselor answer grounded in `reference`.
    async fn answer(&self, query: &str, reference: &str) -> Result<String, GenerationError> {
        let user = answer_user_message(query, reference);
        self.complete(ANSWER_SYSTEM_PROMPT, &user).await
    }

    /// Counselor-support digest of the user's question(s).
    async fn summarize(&self, query: &str) -> Result<String, GenerationError> {
        let user = summary_user_message(query);
        self.complete(SUMMARY_SYSTEM_PROMPT, &user).await
    }

    /// Light rewrite of the raw query before retrieval.
    async fn refine(&self, query: &str) -> Result<String, GenerationError> {
        let user = refine_user_message(query);
        self.complete(REFINE_INSTRUCTION, &user).await
    }
}

/// Reqwest-backed chat-completions client.
pub struct ChatClient {
    client: reqwest::Client,
    cfg: GenerationConfig,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    frequency_penalty: f32,
    presence_penalty: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Error body shape the provider uses for 4xx/429 responses.
#[derive(Deserialize, Default)]
struct ApiErrorBody {
    #[serde(default)]
    error: ApiErrorDetail,
}

#[derive(Deserialize, Default)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: String,
}

impl ChatClient {
    pub fn new(cfg: GenerationConfig) -> Result<Self, GenerationError> {
        if cfg.api_key.trim().is_empty() {
            return Err(GenerationError::InvalidConfig(
                "chat API key is not configured".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        Ok(Self { client, cfg })
    }

    async fn chat(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        );

        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });

        let body = ChatRequest {
            model: &self.cfg.model,
            messages,
            temperature: self.cfg.temperature,
            max_tokens,
            frequency_penalty: self.cfg.frequency_penalty,
            presence_penalty: self.cfg.presence_penalty,
            top_p: self.cfg.top_p,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.cfg.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &detail));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("response had no choices".into()))
    }
}

#[async_trait]
impl ChatGenerator for ChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let text = self.chat(system, user, self.cfg.max_tokens).await?;
        tracing::debug!(response_chars = text.chars().count(), "completion received");
        Ok(text)
    }

    async fn refine(&self, query: &str) -> Result<String, GenerationError> {
        let user = refine_user_message(query);
        // Refinement is a short rewrite; keep the budget tight.
        self.chat(REFINE_INSTRUCTION, &user, 256).await
    }
}

/// Map a non-2xx status to the error taxonomy, reading the provider's error
/// body for the quota/rate distinction where present.
fn classify_status(status: StatusCode, detail: &str) -> GenerationError {
    let parsed: ApiErrorBody = serde_json::from_str(detail).unwrap_or_default();
    let message = if parsed.error.message.is_empty() {
        detail.to_string()
    } else {
        parsed.error.message
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => {
            // Both the token-quota and request-rate variants land here; the
            // provider distinguishes them in `error.type` but the upstream
            // handling (503 + alert) is the same.
            let kind = if parsed.error.kind.is_empty() {
                message
            } else {
                format!("{}: {message}", parsed.error.kind)
            };
            GenerationError::Quota(kind)
        }
        s => GenerationError::Service(format!("HTTP {s}: {message}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_rejected_at_construction() {
        let err = ChatClient::new(GenerationConfig::default()).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidConfig(_)));
    }

    #[test]
    fn classify_401_as_auth() {
        let err = classify_status(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, GenerationError::Auth(_)));
    }

    #[test]
    fn classify_429_as_quota_with_provider_message() {
        let body = r#"{"error": {"message": "You exceeded your current quota", "type": "tokens"}}"#;
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, body);
        match err {
            GenerationError::Quota(msg) => assert!(msg.contains("exceeded your current quota")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn classify_5xx_as_service() {
        let err = classify_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(err, GenerationError::Service(_)));
        assert!(err.is_operational());
    }

    #[test]
    fn chat_response_parses_first_choice() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": "물을 충분히 드세요."}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "물을 충분히 드세요.");
    }

    #[tokio::test]
    async fn default_flow_methods_route_through_complete() {
        struct EchoChat;

        #[async_trait]
        impl ChatGenerator for EchoChat {
            async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
                Ok(format!("[{}]{user}", system.chars().take(10).collect::<String>()))
            }
        }

        let chat = EchoChat;
        let answer = chat.answer("공복 혈당이 높아요", "혈당 가이드").await.unwrap();
        assert!(answer.contains("질문: 공복 혈당이 높아요"));
        assert!(answer.contains("가이드: 혈당 가이드"));

        let summary = chat.summarize("질문입니다").await.unwrap();
        assert!(summary.contains("요약: "));

        let refined = chat.refine("uhh blood sugar??").await.unwrap();
        assert!(refined.contains("Query: uhh blood sugar??"));
        assert!(refined.contains("Refined query:"));
    }

    #[test]
    fn chat_request_serializes_sampling_parameters() {
        let body = ChatRequest {
            model: "gpt-4o",
            messages: vec![ChatMessage {
                role: "user",
                content: "질문",
            }],
            temperature: 0.1,
            max_tokens: 1500,
            frequency_penalty: 0.25,
            presence_penalty: 0.0,
            top_p: 0.0,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 1500);
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
