//! Error taxonomy for backend calls

/// Fallback message when a rejected login carries no `detail`
pub const UNAUTHORIZED_FALLBACK: &str = "Unauthorized";

/// Errors produced by [`SessionClient`](super::SessionClient) calls
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// 401 on an authenticated call. The session has already been torn down.
    #[error("session expired")]
    AuthExpired,

    /// 401 on the login call (bad credentials). The session is untouched.
    #[error("{0}")]
    AuthRejected(String),

    /// Any other non-2xx response. The message is the raw response body.
    #[error("{body}")]
    RequestFailed { status: u16, body: String },

    /// Login answered 2xx without a token
    #[error("登录返回异常，请重试")]
    MalformedLogin,

    #[error("请求超时")]
    Timeout,

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for an inline status line or toast.
    ///
    /// Empty bodies fall back to `fallback` so the UI never shows a blank error.
    pub fn display_or(&self, fallback: &str) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            fallback.to_string()
        } else {
            msg
        }
    }

    /// True when this error already forced the session back to logged-out
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }
}

/// Extract the user-facing message from a 401 body.
///
/// String `detail` values are used as-is, any other JSON `detail` is
/// serialized, and bodies without one yield [`UNAUTHORIZED_FALLBACK`].
pub fn rejection_message(body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s,
        Some(serde_json::Value::Null) | None => UNAUTHORIZED_FALLBACK.to_string(),
        Some(serde_json::Value::String(_)) => UNAUTHORIZED_FALLBACK.to_string(),
        Some(other) => other.to_string(),
    }
}
