use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("notion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("notion returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("unexpected notion response: {0}")]
    Decode(String),

    #[error("notion query still had more results after {pages} pages")]
    Truncated { pages: usize },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "recruit query failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_errors_render_as_bad_gateway_json() {
        let res = ProxyError::Upstream {
            status: 401,
            message: "API token is invalid.".to_string(),
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "notion returned 401: API token is invalid.");
    }

    #[test]
    fn test_truncated_message_names_page_cap() {
        let err = ProxyError::Truncated { pages: 50 };
        assert_eq!(err.to_string(), "notion query still had more results after 50 pages");
    }
}
