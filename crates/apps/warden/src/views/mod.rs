//! Plain-text rendering of the console
//!
//! Every view is a pure function of console state; the app prints the
//! result after each change.

mod dashboard;
mod list;
mod mail_viewer;
mod providers;
mod settings;

use std::time::Instant;

use admin::notify::ToastView;
use admin::{Console, Modal, Panel, ToastKind, View};

pub use dashboard::render_dashboard;
pub use list::render_table;
pub use mail_viewer::render_viewer;
pub use providers::{render_email_provider, render_sms_provider};
pub use settings::render_settings;

fn toast_line(toast: &ToastView) -> String {
    let icon = match toast.kind {
        ToastKind::Success => "✓",
        ToastKind::Info => "i",
        ToastKind::Error => "✗",
    };
    format!("{} {}", icon, toast.message)
}

fn nav_bar(current: Panel) -> String {
    Panel::ALL
        .iter()
        .map(|panel| {
            if *panel == current {
                format!("[{}]", panel.title())
            } else {
                panel.title().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn render_panel(console: &Console) -> String {
    let panel = console.panel();
    match panel {
        Panel::Dashboard => render_dashboard(console.dashboard(), console.logs()),
        Panel::Settings => render_settings(console.settings()),
        Panel::Accounts | Panel::Emails | Panel::BankCards | Panel::Phones => {
            let mut sections = Vec::new();
            match panel {
                Panel::Emails => sections.push(render_email_provider(console.email_provider())),
                Panel::Phones => sections.push(render_sms_provider(console.sms_provider())),
                _ => {}
            }
            if panel == Panel::Accounts && !console.accounts().filters().is_empty() {
                let filters: Vec<String> = console
                    .accounts()
                    .filter_pairs()
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                sections.push(format!("筛选：{}", filters.join(" ")));
            }
            if let Some(view) = console.render_list(panel) {
                sections.push(render_table(&view, console.selection(panel)));
            }
            sections.join("\n\n")
        }
    }
}

fn render_modal(modal: &Modal) -> String {
    match modal {
        Modal::Confirm(dialog) => format!("{} (yes / no)", dialog.message()),
        Modal::MailViewer(viewer) => render_viewer(&viewer.render()),
        Modal::SmsCode { code, message } => {
            let mut text = format!("验证码：{}", code);
            if !message.is_empty() {
                text.push_str(&format!("\n{}", message));
            }
            text
        }
        Modal::Notice { title, body } => format!("{}\n{}", title, body),
    }
}

/// Render the whole screen
pub fn render(console: &Console, now: Instant) -> String {
    let mut sections = Vec::new();

    match console.view() {
        View::Login { error } => {
            sections.push("Warden 登录  (login <user> <pass>)".to_string());
            if console.is_login_pending() {
                sections.push("登录中…".to_string());
            }
            if let Some(error) = error {
                sections.push(format!("✗ {}", error));
            }
        }
        View::Admin => {
            sections.push(format!("{}    {}", nav_bar(console.panel()), console.username()));
            sections.push(render_panel(console));
            if let Some(modal) = console.modal().active() {
                sections.push(format!("┌ 弹窗 (close)\n{}", render_modal(modal)));
            }
        }
    }

    let toasts: Vec<String> = console
        .toasts()
        .visible(now)
        .iter()
        .filter(|t| !t.fading)
        .map(toast_line)
        .collect();
    if !toasts.is_empty() {
        sections.push(toasts.join("\n"));
    }

    sections.join("\n\n")
}
