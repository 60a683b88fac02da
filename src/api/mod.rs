pub(crate) mod notion;
mod supabase;

pub(crate) use notion::{group_by_select, NotionClient, RecruitmentEntry};
pub(crate) use supabase::SupabaseClient;

use serde::{Deserialize, Serialize};

/// Message shown when the blocker/blocked pair already exists.
pub(crate) const ALREADY_BLACKLISTED_MESSAGE: &str = "이미 블랙리스트에 등록된 유저입니다.";

/// Postgres `unique_violation`.
pub(crate) const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("네트워크 오류: {0}")]
    Network(String),

    #[error("로그인이 필요합니다.")]
    Unauthorized,

    #[error("{}", ALREADY_BLACKLISTED_MESSAGE)]
    AlreadyBlacklisted,

    #[error("{context} ({status}): {message}")]
    Http {
        status: u16,
        code: Option<String>,
        context: String,
        message: String,
    },

    #[error("응답을 해석할 수 없습니다: {0}")]
    Parse(String),

    #[error("{0} 설정이 없습니다.")]
    NotConfigured(&'static str),
}

impl ApiError {
    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self::Parse(e.to_string())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Http { code: Some(c), .. } if c == PG_UNIQUE_VIOLATION)
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Deployment settings injected by the host page as `window.ENV`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    /// Endpoint used when the user has not configured one.
    pub server_url: Option<String>,
}

fn env_string(env: &wasm_bindgen::JsValue, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| js_sys::Reflect::get(env, &(*k).into()).ok())
        .find_map(|v| v.as_string())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl EnvConfig {
    pub fn load() -> Self {
        let Some(env) = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .map(wasm_bindgen::JsValue::from)
            .filter(|env| !env.is_undefined() && env.is_object())
        else {
            return Self::default();
        };

        // Upper-case keys are documented; lower-case ones are accepted too.
        Self {
            supabase_url: env_string(&env, &["SUPABASE_URL", "supabase_url"])
                .map(|u| u.trim_end_matches('/').to_string()),
            supabase_anon_key: env_string(&env, &["SUPABASE_ANON_KEY", "supabase_anon_key"]),
            server_url: env_string(&env, &["SERVER_URL", "server_url"]),
        }
    }
}

/// Body returned by PostgREST (and GoTrue) on failure.
#[derive(Deserialize, Debug, Default)]
struct BackendErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Maps a non-2xx response to an [`ApiError`].
pub(crate) fn error_from_response(status: u16, body: &str, context: &str) -> ApiError {
    let parsed: BackendErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code.and_then(|c| match c {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    // PGRST301: expired/invalid JWT.
    if status == 401 || code.as_deref() == Some("PGRST301") {
        return ApiError::Unauthorized;
    }

    let message = parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().to_string());

    ApiError::Http {
        status,
        code,
        context: context.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_is_detected_from_postgrest_body() {
        let body = r#"{"code":"23505","details":"Key (blocker_id, blocked_id)=(a, b) already exists.","hint":null,"message":"duplicate key value violates unique constraint \"blacklist_pair_key\""}"#;
        let err = error_from_response(409, body, "블랙리스트 추가 실패");
        assert!(err.is_unique_violation());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_401_and_expired_jwt_map_to_unauthorized() {
        assert!(error_from_response(401, "", "x").is_unauthorized());
        let body = r#"{"code":"PGRST301","message":"JWT expired"}"#;
        assert!(error_from_response(400, body, "x").is_unauthorized());
    }

    #[test]
    fn test_http_error_message_prefers_backend_text() {
        let err = error_from_response(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
            "로그인 실패",
        );
        assert_eq!(err.to_string(), "로그인 실패 (400): Invalid login credentials");

        let err = error_from_response(502, "Bad Gateway", "모집글 조회 실패");
        assert_eq!(err.to_string(), "모집글 조회 실패 (502): Bad Gateway");
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_already_blacklisted_message_is_exact() {
        assert_eq!(
            ApiError::AlreadyBlacklisted.to_string(),
            "이미 블랙리스트에 등록된 유저입니다."
        );
    }
}
