//! Reading a received SMS code for a phone

use crate::api::wire::SmsCodeResponse;

const WAITING: &str = "等待短信中";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmsCodeOutcome {
    /// A code arrived; shown in a modal
    Code { code: String, message: String },
    /// Nothing yet; shown as an info toast
    Waiting(String),
}

impl From<SmsCodeResponse> for SmsCodeOutcome {
    fn from(response: SmsCodeResponse) -> Self {
        match response.code.filter(|c| !c.is_empty()) {
            Some(code) => SmsCodeOutcome::Code {
                code,
                message: response.message.unwrap_or_default(),
            },
            None => SmsCodeOutcome::Waiting(
                response
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| WAITING.to_string()),
            ),
        }
    }
}
