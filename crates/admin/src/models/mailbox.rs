//! Provisioned mailbox records

use serde::{Deserialize, Serialize};

/// Separator used by the mailbox import/export line format
pub const LINE_SEPARATOR: &str = "----";

/// A mailbox in the pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mailbox {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    /// Whether an account was registered with this address
    #[serde(default)]
    pub registered: bool,
}

impl Mailbox {
    /// Password column: masked when present
    pub fn masked_password(&self) -> &'static str {
        if self.password.as_deref().is_some_and(|p| !p.is_empty()) {
            "***"
        } else {
            ""
        }
    }

    /// UUID column: first 12 characters
    pub fn short_uuid(&self) -> String {
        self.uuid.as_deref().unwrap_or("").chars().take(12).collect()
    }

    pub fn registered_label(&self) -> &'static str {
        if self.registered { "已注册" } else { "未注册" }
    }

    /// Export line: `email----password----uuid----token`
    pub fn export_line(&self) -> String {
        [
            self.email.as_str(),
            self.password.as_deref().unwrap_or(""),
            self.uuid.as_deref().unwrap_or(""),
            self.token.as_deref().unwrap_or(""),
        ]
        .join(LINE_SEPARATOR)
    }
}

/// Payload for `POST /api/emails`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewMailbox {
    pub email: String,
    pub password: String,
    pub uuid: String,
    pub token: String,
    pub remark: String,
}
