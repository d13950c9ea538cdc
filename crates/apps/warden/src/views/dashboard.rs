//! Dashboard panel rendering

use admin::{DashboardView, LogsView};

pub fn render_dashboard(stats: Option<&DashboardView>, logs: &LogsView) -> String {
    let mut lines = Vec::new();
    match stats {
        Some(stats) => {
            for (label, value) in stats.rows() {
                lines.push(format!("{:<10} {}", label, value));
            }
        }
        None => lines.push("加载中…".to_string()),
    }
    lines.push(String::new());
    lines.push("workflow register | bind | plus".to_string());
    lines.push(String::new());
    lines.push("== 日志 ==".to_string());
    lines.extend(logs.lines());
    lines.join("\n")
}
