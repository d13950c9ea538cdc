//! Settings panel rendering

use admin::query::SettingsForm;

pub fn render_settings(form: &SettingsForm) -> String {
    if !form.loaded {
        return "加载中…".to_string();
    }
    let width = form
        .values
        .entries()
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0);
    let mut lines: Vec<String> = form
        .values
        .entries()
        .map(|(key, value)| format!("{:<width$}  {}", key, value, width = width))
        .collect();
    lines.push(String::new());
    lines.push("set <key> <value> | save | account <user> <pass>".to_string());
    lines.join("\n")
}
