//! Backend settings as a flat string map

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Every key the settings form reads and writes, in form order
pub const SETTINGS_KEYS: [&str; 17] = [
    "sms_api_url",
    "sms_api_key",
    "sms_openai_service",
    "sms_max_price",
    "thread_count",
    "proxy_url",
    "proxy_api_url",
    "bank_card_api_url",
    "bank_card_api_key",
    "bank_card_api_platform",
    "email_api_url",
    "email_api_key",
    "email_api_default_type",
    "captcha_api_url",
    "captcha_api_key",
    "card_use_limit",
    "phone_bind_limit",
];

/// Mail types the email provider sells
pub const MAIL_TYPES: [&str; 4] = ["outlook", "hotmail", "hotmail Trusted", "outlook Trusted"];

/// Setting that selects the default mail type on the mailbox panel
pub const DEFAULT_MAIL_TYPE_KEY: &str = "email_api_default_type";

/// Known settings. Keys the backend omitted read as "".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Build from the backend's JSON object, keeping only known keys
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let values = SETTINGS_KEYS
            .iter()
            .map(|key| {
                let value = match map.get(*key) {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                };
                (key.to_string(), value)
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    /// Set a known key. Returns false for keys outside [`SETTINGS_KEYS`].
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        if !SETTINGS_KEYS.contains(&key) {
            return false;
        }
        self.values.insert(key.to_string(), value.into());
        true
    }

    /// Form rows in display order
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        SETTINGS_KEYS.iter().map(|key| (*key, self.get(key)))
    }

    /// PUT payload carrying every key
    pub fn to_payload(&self) -> Value {
        let map: Map<String, Value> = SETTINGS_KEYS
            .iter()
            .map(|key| (key.to_string(), Value::String(self.get(key).to_string())))
            .collect();
        Value::Object(map)
    }

    /// The configured default mail type, if it is one the provider sells
    pub fn default_mail_type(&self) -> Option<&'static str> {
        let configured = self.get(DEFAULT_MAIL_TYPE_KEY);
        MAIL_TYPES.iter().copied().find(|t| *t == configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_read_empty() {
        let map = json!({"sms_api_url": "https://sms.example", "thread_count": 3, "proxy_url": null});
        let settings = Settings::from_map(map.as_object().unwrap());
        assert_eq!(settings.get("sms_api_url"), "https://sms.example");
        assert_eq!(settings.get("thread_count"), "3");
        assert_eq!(settings.get("proxy_url"), "");
        assert_eq!(settings.get("captcha_api_key"), "");
    }

    #[test]
    fn test_payload_sends_every_key() {
        let mut settings = Settings::default();
        assert!(settings.set("email_api_key", "k"));
        assert!(!settings.set("admin_password", "x"));

        let payload = settings.to_payload();
        let obj = payload.as_object().unwrap();
        assert_eq!(obj.len(), SETTINGS_KEYS.len());
        assert_eq!(obj["email_api_key"], "k");
        assert_eq!(obj["sms_api_key"], "");
    }

    #[test]
    fn test_default_mail_type_only_when_known() {
        let mut settings = Settings::default();
        assert_eq!(settings.default_mail_type(), None);
        settings.set(DEFAULT_MAIL_TYPE_KEY, "hotmail Trusted");
        assert_eq!(settings.default_mail_type(), Some("hotmail Trusted"));
        settings.set(DEFAULT_MAIL_TYPE_KEY, "gmail");
        assert_eq!(settings.default_mail_type(), None);
    }
}
