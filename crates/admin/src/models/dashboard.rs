//! Registration statistics and provider configuration status

use serde::Deserialize;
use serde_json::Value;

/// Response from `/api/dashboard`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub today_registered: Option<u64>,
    #[serde(default)]
    pub total_registered: Option<u64>,
    #[serde(default)]
    pub phone_bound_count: Option<u64>,
    #[serde(default)]
    pub plus_count: Option<u64>,
    #[serde(default)]
    pub success_count: Option<u64>,
    #[serde(default)]
    pub fail_count: Option<u64>,
    #[serde(default)]
    pub email_api_set: bool,
    #[serde(default)]
    pub sms_api_set: bool,
    #[serde(default)]
    pub bank_api_set: bool,
    #[serde(default)]
    pub captcha_api_set: bool,
    /// Stored as a setting string, occasionally a number
    #[serde(default)]
    pub thread_count: Value,
}

impl DashboardStats {
    pub fn thread_count_display(&self) -> String {
        match &self.thread_count {
            Value::Null => "1".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Render a provider configuration flag
pub fn configured_label(set: bool) -> &'static str {
    if set { "已设置" } else { "未设置" }
}
