//! Mail viewer modal rendering

use admin::viewer::{DetailPane, MailTab, MailViewerView, Preview};

pub fn render_viewer(view: &MailViewerView) -> String {
    let mut lines = vec![format!("== 收件箱：{} ==", view.mailbox_email)];

    if let Some(placeholder) = &view.list_placeholder {
        lines.push(format!("  {}", placeholder));
    }
    for entry in &view.list {
        lines.push(format!(
            "{} [{}] {}  {}  {}",
            if entry.active { ">" } else { " " },
            entry.index,
            entry.subject,
            entry.sender,
            entry.date
        ));
    }
    lines.push(String::new());

    match &view.detail {
        DetailPane::Loading(text) | DetailPane::Empty(text) => lines.push(text.clone()),
        DetailPane::Failed(message) => lines.push(format!("加载失败：{}", message)),
        DetailPane::Mail(detail) => {
            lines.push(format!("主题：{}", detail.subject));
            lines.push(format!("发件人：{}", detail.from));
            if let Some(date) = &detail.date {
                lines.push(format!("时间：{}", date));
            }
            let tab = match detail.active_tab {
                MailTab::Preview => "[预览] 源码",
                MailTab::Raw => "预览 [源码]",
            };
            lines.push(tab.to_string());
            lines.push("-".repeat(40));
            match detail.active_tab {
                MailTab::Preview => match &detail.preview {
                    Preview::Html(_) => lines.push("(HTML 邮件，输入 html 在浏览器中查看)".to_string()),
                    Preview::Text(text) | Preview::Dump(text) => lines.push(text.clone()),
                },
                MailTab::Raw => lines.push(detail.raw.clone()),
            }
        }
    }

    lines.push(String::new());
    lines.push(format!("{}：{} (recover)", view.recovery_text, view.recovery_url));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin::viewer::MailViewer;
    use serde_json::json;

    #[test]
    fn test_renders_selected_mail() {
        let mut viewer = MailViewer::open(1, "box@outlook.com", 1);
        viewer.apply(Ok(vec![
            json!({ "subject": "Hello", "from": "a@b.c", "body": "first" }),
            json!({ "subject": "Code", "from": "a@b.c", "body": "123456" }),
        ]));
        viewer.select(1);

        let text = render_viewer(&viewer.render());
        assert!(text.contains("> [1] Code"));
        assert!(text.contains("123456"));
        assert!(text.contains("https://outlook.live.com"));
    }

    #[test]
    fn test_renders_empty_inbox() {
        let mut viewer = MailViewer::open(1, "box@outlook.com", 1);
        viewer.apply(Ok(Vec::new()));
        let text = render_viewer(&viewer.render());
        assert!(text.contains("收件箱暂无邮件"));
    }
}
