use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types.
///
/// User-facing messages are product copy (Korean); the `detail` strings are
/// for logs and the `error` field of the response body, mirroring what the
/// mobile clients already consume.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("API 키가 유효하지 않습니다")]
    Authentication(String),

    #[error("요청 한도를 초과했습니다. 잠시 후 다시 시도해주세요.")]
    RateLimitExceeded,

    #[error("쿼리를 입력해주세요.")]
    EmptyQuery,

    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    /// A mapped upstream fault (embedding, index, LLM, nutrition flow).
    /// `message` is the route-specific product copy; `detail` names the
    /// actual fault for operators.
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
        detail: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerError {
    /// Build an upstream fault with an explicit status.
    pub fn upstream(
        status: StatusCode,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        ServerError::Upstream {
            status,
            message: message.into(),
            detail: detail.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ServerError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ServerError::EmptyQuery => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Upstream { status, .. } => *status,
            ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            ServerError::Authentication(detail) => Some(detail.clone()),
            ServerError::Upstream { detail, .. } => Some(detail.clone()),
            ServerError::Config(detail) => Some(detail.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, error = ?self.detail(), "{message}");
        } else {
            tracing::warn!(status = %status, error = ?self.detail(), "{message}");
        }

        let mut body = json!({
            "status_code": status.as_u16(),
            "message": message,
        });
        if let Some(detail) = self.detail() {
            body["error"] = json!(detail);
        }

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Config(err.to_string())
    }
}
