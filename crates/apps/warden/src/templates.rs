//! HTML templates for opening mail in the system browser
//!
//! Provider HTML is embedded as-is; everything else is escaped.

use admin::viewer::{NormalizedMail, Preview};
use log::debug;

/// Simple HTML escape for provider-supplied text
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLES: &str = r#"* { box-sizing: border-box; }
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", "PingFang SC", sans-serif;
    margin: 0;
    padding: 24px;
    color: #1f2328;
    background: #ffffff;
}
.warden-header {
    border-bottom: 1px solid #d0d7de;
    padding-bottom: 12px;
    margin-bottom: 16px;
}
.warden-subject { font-size: 18px; font-weight: 600; }
.warden-meta { color: #656d76; font-size: 13px; margin-top: 4px; }
.warden-body-text, .warden-dump {
    white-space: pre-wrap;
    word-break: break-word;
    font-size: 14px;
}
.warden-dump { font-family: ui-monospace, Menlo, monospace; font-size: 12px; }"#;

/// Full HTML document for one mail
pub fn mail_html(mailbox_email: &str, mail: &NormalizedMail) -> String {
    let body = match mail.preview() {
        Preview::Html(html) => {
            debug!("Rendering provider HTML ({} bytes)", html.len());
            html
        }
        Preview::Text(text) => format!(
            r#"<div class="warden-body-text">{}</div>"#,
            html_escape(&text)
        ),
        Preview::Dump(dump) => format!(r#"<pre class="warden-dump">{}</pre>"#, html_escape(&dump)),
    };

    let mut meta = Vec::new();
    if !mail.from.is_empty() {
        meta.push(format!("From: {}", html_escape(&mail.from)));
    }
    if !mail.date.is_empty() {
        meta.push(html_escape(&mail.date));
    }
    meta.push(format!("To: {}", html_escape(mailbox_email)));

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
{styles}
</style>
</head>
<body>
<div class="warden-header">
<div class="warden-subject">{title}</div>
<div class="warden-meta">{meta}</div>
</div>
{body}
</body>
</html>"#,
        title = html_escape(mail.subject_text()),
        styles = STYLES,
        meta = meta.join(" · "),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_body_is_escaped() {
        let mail = NormalizedMail::from_value(&json!({
            "subject": "Code <1>",
            "from": "a@b.c",
            "body": "<script>alert(1)</script>",
        }));
        let html = mail_html("box@outlook.com", &mail);
        assert!(html.contains("<title>Code &lt;1&gt;</title>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_provider_html_is_embedded() {
        let mail = NormalizedMail::from_value(&json!({ "html": "<p>Hello</p>" }));
        let html = mail_html("box@outlook.com", &mail);
        assert!(html.contains("<p>Hello</p>"));
    }
}
