//! Bulk imports and phone acquisition
//!
//! The backend may skip lines (duplicates, malformed input) without failing
//! the batch, so accepted counts are reported separately from what was
//! submitted. Fewer accepted than submitted is still a success.

use log::info;

use crate::api::wire::GetNumbersResponse;
use crate::api::{ApiError, SessionClient};
use crate::console::Panel;

/// Hint appended when the provider rejects the configured service code
const BAD_SERVICE_HINT: &str = "（请到系统设置将「OpenAI 服务 ID」改为 dr 并保存）";

/// Where a batch import goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportTarget {
    Mailboxes,
    BankCards,
    Phones,
}

impl ImportTarget {
    pub fn panel(&self) -> Panel {
        match self {
            ImportTarget::Mailboxes => Panel::Emails,
            ImportTarget::BankCards => Panel::BankCards,
            ImportTarget::Phones => Panel::Phones,
        }
    }

    /// Line format shown above the import box
    pub fn format_hint(&self) -> &'static str {
        match self {
            ImportTarget::Mailboxes => "每行一条：邮箱----密码----UUID----Token",
            ImportTarget::BankCards => "每行一条卡信息（掩码或后四位），使用次数从系统设置读取",
            ImportTarget::Phones => "每行一个手机号，可绑定次数使用系统设置中的「每个手机号可绑定次数」。",
        }
    }

    pub fn execute(&self, client: &SessionClient, lines: &str) -> Result<ImportOutcome, ApiError> {
        let response = match self {
            ImportTarget::Mailboxes => client.import_mailboxes(lines)?,
            ImportTarget::BankCards => client.import_bank_cards(lines)?,
            ImportTarget::Phones => client.import_phones(lines)?,
        };
        let outcome = ImportOutcome {
            submitted: count_submitted(lines),
            added: response.added,
        };
        info!(
            "Imported {:?}: {} of {} lines accepted",
            self, outcome.added, outcome.submitted
        );
        Ok(outcome)
    }
}

/// Non-blank lines in an import
pub fn count_submitted(lines: &str) -> usize {
    lines.lines().filter(|l| !l.trim().is_empty()).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub submitted: usize,
    pub added: u64,
}

impl ImportOutcome {
    /// Some lines were not accepted
    pub fn is_partial(&self) -> bool {
        self.added < self.submitted as u64
    }

    pub fn message(&self) -> String {
        format!("已导入 {} 条", self.added)
    }
}

/// Result of buying numbers from the SMS provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireOutcome {
    pub got: u64,
    pub errors: Vec<String>,
}

impl From<GetNumbersResponse> for AcquireOutcome {
    fn from(response: GetNumbersResponse) -> Self {
        Self {
            got: response.got,
            errors: response.errors,
        }
    }
}

impl AcquireOutcome {
    /// The provider reported errors for some of the requested numbers
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn message(&self) -> String {
        if self.got > 0 {
            return format!("已获取 {} 个号码并加入列表", self.got);
        }
        match self.errors.first() {
            Some(first) if first == "BAD_SERVICE" => {
                format!("获取失败：{}{}", first, BAD_SERVICE_HINT)
            }
            Some(first) => format!("获取失败：{}", first),
            None => "已获取 0 个号码并加入列表".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_submitted_skips_blank_lines() {
        assert_eq!(count_submitted("a\n\n  \nb\r\nc\n"), 3);
        assert_eq!(count_submitted(""), 0);
    }

    #[test]
    fn test_partial_import_is_not_failure() {
        let outcome = ImportOutcome {
            submitted: 5,
            added: 3,
        };
        assert!(outcome.is_partial());
        assert_eq!(outcome.message(), "已导入 3 条");
    }

    #[test]
    fn test_acquire_messages() {
        let got = AcquireOutcome {
            got: 2,
            errors: vec!["NO_NUMBERS".to_string()],
        };
        assert!(got.is_partial());
        assert_eq!(got.message(), "已获取 2 个号码并加入列表");

        let bad = AcquireOutcome {
            got: 0,
            errors: vec!["BAD_SERVICE".to_string()],
        };
        assert_eq!(
            bad.message(),
            "获取失败：BAD_SERVICE（请到系统设置将「OpenAI 服务 ID」改为 dr 并保存）"
        );

        let none = AcquireOutcome {
            got: 0,
            errors: Vec::new(),
        };
        assert!(!none.is_partial());
        assert_eq!(none.message(), "已获取 0 个号码并加入列表");
    }
}
