//! Settings form and login update

use crate::models::Settings;

pub const SAVED: &str = "已保存";
pub const LOGIN_UPDATED: &str = "已修改，请重新登录";
pub const LOGIN_FIELDS_REQUIRED: &str = "账号与密码均不能为空";
pub const SAVE_FAILED: &str = "保存失败";

/// Settings panel state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub values: Settings,
    /// True once the backend values have been loaded
    pub loaded: bool,
}

impl SettingsForm {
    pub fn apply(&mut self, settings: Settings) {
        self.values = settings;
        self.loaded = true;
    }
}

/// New console credentials, validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUpdate {
    pub username: String,
    pub password: String,
}

impl LoginUpdate {
    /// Username is trimmed; both fields must be non-empty
    pub fn new(username: &str, password: &str) -> Result<Self, &'static str> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(LOGIN_FIELDS_REQUIRED);
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}
