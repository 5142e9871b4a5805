use std::time::Duration;

/// Fire-and-forget webhook for operator alerts.
///
/// Used when the chat provider reports auth, quota, or outage trouble - the
/// kinds of faults a human has to act on. Alert delivery failures are logged
/// and swallowed; an unreachable webhook must never take a request down with
/// it.
pub struct AlertWebhook {
    client: reqwest::Client,
    url: Option<String>,
}

impl AlertWebhook {
    pub fn new(url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self { client, url }
    }

    /// Disabled webhook (no URL configured); `notify` becomes a no-op.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Post an alert message. Never fails the caller.
    pub async fn notify(&self, error_text: &str) {
        let Some(url) = self.url.as_deref() else {
            tracing::debug!("alert webhook not configured, skipping");
            return;
        };

        let content = format!("🚨 OpenAI API 오류 발생\n```\n{error_text}\n```");
        let result = self
            .client
            .post(url)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!("alert webhook delivered");
            }
            Ok(response) => {
                tracing::error!(status = %response.status(), "alert webhook rejected");
            }
            Err(err) => {
                tracing::error!(error = %err, "alert webhook failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_webhook_is_a_noop() {
        // Must complete without panicking or making a request.
        AlertWebhook::disabled().notify("boom").await;
    }

    #[tokio::test]
    async fn unreachable_webhook_never_errors() {
        let webhook = AlertWebhook::new(Some("http://127.0.0.1:1/hook".into()));
        webhook.notify("boom").await;
    }
}
