//! Dashboard statistics and the operations log

use crate::api::ApiError;
use crate::api::wire::LogPage;
use crate::models::{DashboardStats, configured_label};

/// Shown in every dashboard field when the stats could not be loaded
pub const UNAVAILABLE: &str = "—";
/// The dashboard shows the first page of the log only
pub const LOG_PAGE_SIZE: u32 = 20;

/// Dashboard fields ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub today_registered: String,
    pub total_registered: String,
    pub phone_bound_count: String,
    pub plus_count: String,
    pub success_count: String,
    pub fail_count: String,
    pub email_api: String,
    pub sms_api: String,
    pub bank_api: String,
    pub captcha_api: String,
    pub thread_count: String,
}

impl DashboardView {
    pub fn from_stats(stats: &DashboardStats) -> Self {
        let count = |n: Option<u64>| n.unwrap_or(0).to_string();
        Self {
            today_registered: count(stats.today_registered),
            total_registered: count(stats.total_registered),
            phone_bound_count: count(stats.phone_bound_count),
            plus_count: count(stats.plus_count),
            success_count: count(stats.success_count),
            fail_count: count(stats.fail_count),
            email_api: configured_label(stats.email_api_set).to_string(),
            sms_api: configured_label(stats.sms_api_set).to_string(),
            bank_api: configured_label(stats.bank_api_set).to_string(),
            captcha_api: configured_label(stats.captcha_api_set).to_string(),
            thread_count: stats.thread_count_display(),
        }
    }

    pub fn unavailable() -> Self {
        let dash = || UNAVAILABLE.to_string();
        Self {
            today_registered: dash(),
            total_registered: dash(),
            phone_bound_count: dash(),
            plus_count: dash(),
            success_count: dash(),
            fail_count: dash(),
            email_api: dash(),
            sms_api: dash(),
            bank_api: dash(),
            captcha_api: dash(),
            thread_count: dash(),
        }
    }

    /// Best-effort: failures degrade to [`DashboardView::unavailable`]
    pub fn from_result(result: &Result<DashboardStats, ApiError>) -> Self {
        match result {
            Ok(stats) => Self::from_stats(stats),
            Err(_) => Self::unavailable(),
        }
    }

    /// Labelled rows in display order
    pub fn rows(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("今日注册", self.today_registered.as_str()),
            ("累计注册", self.total_registered.as_str()),
            ("已绑手机", self.phone_bound_count.as_str()),
            ("Plus", self.plus_count.as_str()),
            ("上次成功", self.success_count.as_str()),
            ("上次失败", self.fail_count.as_str()),
            ("邮箱 API", self.email_api.as_str()),
            ("接码 API", self.sms_api.as_str()),
            ("银行卡 API", self.bank_api.as_str()),
            ("验证码 API", self.captcha_api.as_str()),
            ("线程数", self.thread_count.as_str()),
        ]
    }
}

/// The operations log as displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogsView {
    Loading,
    Lines(Vec<String>),
    Empty,
    Failed,
}

impl LogsView {
    pub fn from_result(result: &Result<LogPage, ApiError>) -> Self {
        match result {
            Ok(page) if page.items.is_empty() => LogsView::Empty,
            Ok(page) => LogsView::Lines(
                page.items
                    .iter()
                    .map(|entry| format!("{} {}", entry.created_at, entry.message))
                    .collect(),
            ),
            Err(_) => LogsView::Failed,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            LogsView::Loading => vec!["加载中…".to_string()],
            LogsView::Lines(lines) => lines.clone(),
            LogsView::Empty => vec!["暂无日志".to_string()],
            LogsView::Failed => vec!["加载失败".to_string()],
        }
    }
}

/// Automation workflows whose start buttons are not wired up yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Register,
    BindPhone,
    UpgradePlus,
}

impl Workflow {
    pub fn stub_message(&self) -> &'static str {
        match self {
            Workflow::Register => "开始注册功能开发中",
            Workflow::BindPhone => "开始绑定手机功能开发中",
            Workflow::UpgradePlus => "开始开通 Plus 功能开发中",
        }
    }
}
