//! Email and SMS provider readers
//!
//! These calls are informational. Failures turn into placeholder or status
//! text on the panel and are never raised as errors.

use serde_json::Value;

use crate::api::ApiError;
use crate::api::wire::{
    BalanceResponse, FetchMailResponse, GetNumbersResponse, OpenAiAvailability, ServicesResponse,
    StockResponse,
};
use crate::actions::AcquireOutcome;
use crate::models::MAIL_TYPES;

/// Shown before a probe completes
pub const PLACEHOLDER: &str = "--";
const GENERIC_ERROR: &str = "请求错误";

fn value_text(value: &Value, null_as: &str) -> String {
    match value {
        Value::Null => null_as.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn failure(e: &ApiError) -> String {
    format!("失败：{}", e.display_or(GENERIC_ERROR))
}

/// Email provider box on the mailbox panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailProviderState {
    pub balance: String,
    /// Status line under the controls
    pub message: String,
    /// Mail type used for stock queries and purchases
    pub mail_type: String,
}

impl Default for EmailProviderState {
    fn default() -> Self {
        Self {
            balance: PLACEHOLDER.to_string(),
            message: String::new(),
            mail_type: MAIL_TYPES[0].to_string(),
        }
    }
}

impl EmailProviderState {
    /// Reset for a fresh balance probe
    pub fn begin_probe(&mut self) {
        self.balance = PLACEHOLDER.to_string();
        self.message.clear();
    }

    pub fn apply_balance(&mut self, result: &Result<BalanceResponse, ApiError>) {
        self.balance = match result {
            Ok(r) => value_text(&r.balance, "null"),
            Err(_) => "未配置或请求失败".to_string(),
        };
    }

    pub fn apply_stock(&mut self, result: &Result<StockResponse, ApiError>) {
        self.message = match result {
            Ok(r) => format!(
                "库存：{}（{}）",
                value_text(&r.stock, "0"),
                r.mail_type.as_deref().filter(|t| !t.is_empty()).unwrap_or("全部")
            ),
            Err(e) => failure(e),
        };
    }

    /// Returns true when mailboxes were imported and the list should reload
    pub fn apply_fetch(&mut self, result: &Result<FetchMailResponse, ApiError>) -> bool {
        match result {
            Ok(r) => {
                self.message = format!("拉取 {} 条，已导入 {} 条", r.count, r.imported);
                r.imported > 0
            }
            Err(e) => {
                self.message = failure(e);
                false
            }
        }
    }

    /// Select a mail type. Only types the provider sells are accepted.
    pub fn select_mail_type(&mut self, mail_type: &str) -> bool {
        match MAIL_TYPES.iter().find(|t| **t == mail_type) {
            Some(t) => {
                self.mail_type = t.to_string();
                true
            }
            None => false,
        }
    }
}

/// SMS provider box on the phones panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsProviderState {
    pub balance: String,
    pub openai_count: String,
    pub message: String,
}

impl Default for SmsProviderState {
    fn default() -> Self {
        Self {
            balance: PLACEHOLDER.to_string(),
            openai_count: PLACEHOLDER.to_string(),
            message: String::new(),
        }
    }
}

impl SmsProviderState {
    pub fn begin_probe(&mut self) {
        *self = Self::default();
    }

    pub fn apply_availability(&mut self, result: &Result<OpenAiAvailability, ApiError>) {
        match result {
            Ok(r) => {
                self.balance = value_text(&r.balance, "0");
                self.openai_count = value_text(&r.total_count, "0");
                if !r.service_hint.is_empty() {
                    self.message = format!(
                        "当前服务代号不被支持。可用代号: {}，请到系统设置修改「OpenAI 服务 ID」",
                        r.service_hint.join(", ")
                    );
                }
            }
            Err(_) => {
                self.balance = "未配置或失败".to_string();
                self.openai_count = PLACEHOLDER.to_string();
            }
        }
    }

    pub fn apply_balance_test(&mut self, result: &Result<BalanceResponse, ApiError>) {
        self.message = match result {
            Ok(r) => format!("接口正常，余额：{}", value_text(&r.balance, "null")),
            Err(e) => failure(e),
        };
    }

    /// Status line for a number purchase
    pub fn apply_acquire(&mut self, result: &Result<GetNumbersResponse, ApiError>) {
        self.message = match result {
            Ok(r) => AcquireOutcome::from(r.clone()).message(),
            Err(e) => failure(e),
        };
    }

    /// Record a failed debug or services call
    pub fn apply_failure(&mut self, e: &ApiError) {
        self.message = failure(e);
    }
}

/// Title and body of the raw price table notice
pub fn prices_notice(availability: &OpenAiAvailability) -> (String, String) {
    let body = match &availability.prices_raw {
        Some(raw) => serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string()),
        None => "(无 prices_raw)".to_string(),
    };
    (
        "接码平台 getPrices 原始返回（当前「OpenAI 服务 ID」下的价格/库存）".to_string(),
        body,
    )
}

/// Title and body of the provider service list notice
pub fn services_notice(country: u32, services: &ServicesResponse) -> (String, String) {
    let body = if services.services.is_empty() {
        "(空)，请检查 API 与 country".to_string()
    } else {
        serde_json::to_string_pretty(&services.services)
            .unwrap_or_else(|_| format!("{:?}", services.services))
    };
    (
        format!(
            "接码平台服务列表（country={}），请找到 OpenAI 对应的 id 或 shortName 填到系统设置「OpenAI 服务 ID」",
            country
        ),
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email_balance_probe() {
        let mut state = EmailProviderState::default();
        assert_eq!(state.balance, PLACEHOLDER);
        state.apply_balance(&Ok(BalanceResponse { balance: json!(12.5) }));
        assert_eq!(state.balance, "12.5");
        state.apply_balance(&Err(ApiError::Timeout));
        assert_eq!(state.balance, "未配置或请求失败");
    }

    #[test]
    fn test_stock_message() {
        let mut state = EmailProviderState::default();
        state.apply_stock(&Ok(StockResponse {
            stock: json!(40),
            mail_type: None,
        }));
        assert_eq!(state.message, "库存：40（全部）");
        state.apply_stock(&Ok(StockResponse {
            stock: json!(3),
            mail_type: Some("hotmail".to_string()),
        }));
        assert_eq!(state.message, "库存：3（hotmail）");
    }

    #[test]
    fn test_fetch_reloads_only_when_imported() {
        let mut state = EmailProviderState::default();
        let reload = state.apply_fetch(&Ok(FetchMailResponse {
            count: 2,
            imported: 0,
            message: None,
        }));
        assert!(!reload);
        assert_eq!(state.message, "拉取 2 条，已导入 0 条");
        assert!(state.apply_fetch(&Ok(FetchMailResponse {
            count: 2,
            imported: 2,
            message: None,
        })));
    }

    #[test]
    fn test_select_mail_type() {
        let mut state = EmailProviderState::default();
        assert!(state.select_mail_type("outlook Trusted"));
        assert!(!state.select_mail_type("yahoo"));
        assert_eq!(state.mail_type, "outlook Trusted");
    }

    #[test]
    fn test_sms_availability() {
        let mut state = SmsProviderState::default();
        state.apply_availability(&Ok(OpenAiAvailability {
            balance: json!("3.2"),
            total_count: Value::Null,
            service_hint: vec!["dr".to_string(), "oi".to_string()],
            prices_raw: None,
        }));
        assert_eq!(state.balance, "3.2");
        assert_eq!(state.openai_count, "0");
        assert!(state.message.contains("dr, oi"));

        state.apply_availability(&Err(ApiError::Timeout));
        assert_eq!(state.balance, "未配置或失败");
        assert_eq!(state.openai_count, PLACEHOLDER);
    }

    #[test]
    fn test_notices() {
        let (_, body) = prices_notice(&OpenAiAvailability::default());
        assert_eq!(body, "(无 prices_raw)");
        let (title, body) = services_notice(0, &ServicesResponse::default());
        assert!(title.contains("country=0"));
        assert_eq!(body, "(空)，请检查 API 与 country");
    }

    #[test]
    fn test_failure_message() {
        let mut state = SmsProviderState::default();
        state.apply_balance_test(&Err(ApiError::RequestFailed {
            status: 400,
            body: String::new(),
        }));
        assert_eq!(state.message, "失败：请求错误");
    }
}
