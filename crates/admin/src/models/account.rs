//! Registered account records

use serde::{Deserialize, Serialize};

/// An account produced by the registration workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub has_sora: bool,
    #[serde(default)]
    pub has_plus: bool,
    #[serde(default)]
    pub phone_bound: bool,
    #[serde(default)]
    pub registered_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Account {
    /// Registration time, falling back to the row's creation time
    pub fn registered_display(&self) -> &str {
        self.registered_at
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.created_at.as_deref())
            .unwrap_or("")
    }
}

/// Render a boolean flag as 是/否
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "是" } else { "否" }
}
