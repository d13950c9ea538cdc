//! Backend API integration
//!
//! This module provides:
//! - The authenticated request pipeline ([`SessionClient`])
//! - Session token ownership and persistence ([`Session`], [`TokenStore`])
//! - The HTTP transport seam ([`Transport`], [`UreqTransport`])
//! - Typed endpoint wrappers for every backend call

mod client;
mod endpoints;
mod error;
mod session;
mod transport;

pub use client::{Body, LOGIN_PATH, RequestOptions, SessionClient};
pub use endpoints::with_query;
pub use error::{ApiError, UNAUTHORIZED_FALLBACK, rejection_message};
pub use session::{FileTokenStore, MemoryTokenStore, Session, SessionEvent, TokenStore};
pub use transport::{HttpRequest, HttpResponse, Method, Transport, UreqTransport};

/// Backend response types
pub mod wire {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    /// Login request payload
    #[derive(Debug, Serialize)]
    pub struct LoginRequest {
        pub username: String,
        pub password: String,
    }

    /// Response from `/api/auth/login`
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct LoginResponse {
        pub token: Option<String>,
        pub username: Option<String>,
    }

    /// Response from `/api/auth/me`
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct MeResponse {
        #[serde(default)]
        pub username: String,
    }

    /// A list response. Only accounts carry `total`/`page`/`page_size`.
    #[derive(Debug, Clone, Deserialize)]
    pub struct Page<T> {
        #[serde(default = "Vec::new")]
        pub items: Vec<T>,
        #[serde(default)]
        pub total: Option<u64>,
        #[serde(default)]
        pub page: Option<u32>,
        #[serde(default)]
        pub page_size: Option<u32>,
    }

    /// Response from the batch-import endpoints
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct AddedResponse {
        #[serde(default)]
        pub added: u64,
    }

    /// Provider balance. The backend passes the provider's value through untouched.
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct BalanceResponse {
        #[serde(default)]
        pub balance: Value,
    }

    /// Response from `/api/email-api/mail-list`
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct MailListResponse {
        #[serde(default)]
        pub list: Vec<Value>,
    }

    /// Response from `/api/email-api/stock`
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct StockResponse {
        #[serde(default)]
        pub stock: Value,
        #[serde(default)]
        pub mail_type: Option<String>,
    }

    /// Response from `/api/email-api/fetch-mail`
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct FetchMailResponse {
        #[serde(default)]
        pub count: u64,
        #[serde(default)]
        pub imported: u64,
        #[serde(default)]
        pub message: Option<String>,
    }

    /// Response from `/api/phones/:id/sms-code`
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct SmsCodeResponse {
        #[serde(default)]
        pub status: Option<String>,
        #[serde(default)]
        pub code: Option<String>,
        #[serde(default)]
        pub message: Option<String>,
    }

    /// Response from `/api/sms-api/openai-availability`
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct OpenAiAvailability {
        #[serde(default)]
        pub balance: Value,
        #[serde(default)]
        pub total_count: Value,
        #[serde(default)]
        pub service_hint: Vec<String>,
        #[serde(default)]
        pub prices_raw: Option<Value>,
    }

    /// Response from `/api/sms-api/services`
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct ServicesResponse {
        #[serde(default)]
        pub services: Vec<Value>,
    }

    /// Response from `/api/sms-api/get-numbers`
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct GetNumbersResponse {
        #[serde(default)]
        pub got: u64,
        #[serde(default)]
        pub errors: Vec<String>,
    }

    /// One line of the operations log
    #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
    pub struct LogEntry {
        #[serde(default)]
        pub created_at: String,
        #[serde(default)]
        pub message: String,
    }

    /// Response from `/api/logs`
    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct LogPage {
        #[serde(default)]
        pub items: Vec<LogEntry>,
    }
}
