//! Dashboard, settings and provider readers
//!
//! Background reads here are best-effort and degrade to placeholder text.

mod dashboard;
mod providers;
mod settings;

pub use dashboard::{DashboardView, LOG_PAGE_SIZE, LogsView, UNAVAILABLE, Workflow};
pub use providers::{
    EmailProviderState, PLACEHOLDER, SmsProviderState, prices_notice, services_notice,
};
pub use settings::{
    LOGIN_FIELDS_REQUIRED, LOGIN_UPDATED, LoginUpdate, SAVE_FAILED, SAVED, SettingsForm,
};
