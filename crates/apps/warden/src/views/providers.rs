//! Provider boxes shown above the mailbox and phone tables

use admin::models::MAIL_TYPES;
use admin::query::{EmailProviderState, SmsProviderState};

pub fn render_email_provider(state: &EmailProviderState) -> String {
    let types: Vec<String> = MAIL_TYPES
        .iter()
        .map(|t| {
            if *t == state.mail_type {
                format!("[{}]", t)
            } else {
                t.to_string()
            }
        })
        .collect();
    let mut lines = vec![
        format!("邮箱平台余额：{}", state.balance),
        format!("类型：{}", types.join(" | ")),
    ];
    if !state.message.is_empty() {
        lines.push(state.message.clone());
    }
    lines.join("\n")
}

pub fn render_sms_provider(state: &SmsProviderState) -> String {
    let mut lines = vec![format!(
        "接码平台余额：{}  OpenAI 可用：{}",
        state.balance, state.openai_count
    )];
    if !state.message.is_empty() {
        lines.push(state.message.clone());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_selected_mail_type() {
        let mut state = EmailProviderState::default();
        state.select_mail_type("hotmail");
        let text = render_email_provider(&state);
        assert!(text.contains("[hotmail]"));
        assert!(!text.contains("[outlook]"));
    }
}
