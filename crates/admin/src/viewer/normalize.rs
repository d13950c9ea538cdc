//! Provider mail normalization
//!
//! Upstream mail providers disagree on field names. Each field is projected
//! from an ordered list of candidate keys; the first key present with a
//! non-null value wins. Records that are not JSON objects are opaque.

use serde_json::{Map, Value};

/// Subject candidates, in preference order
pub const SUBJECT_KEYS: &[&str] = &["subject", "title"];
/// Plain-text body candidates, in preference order
pub const BODY_KEYS: &[&str] = &["body", "content", "text", "Text"];
/// HTML body candidates, in preference order
pub const HTML_KEYS: &[&str] = &["html", "Html"];

/// List placeholder for mails without a subject
pub const NO_SUBJECT: &str = "(无主题)";

const SUBJECT_LIMIT: usize = 28;
const SENDER_LIMIT: usize = 20;
const DATE_LIMIT: usize = 12;

/// What the preview tab shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Provider HTML, rendered as-is
    Html(String),
    /// Plain text, preformatted
    Text(String),
    /// Pretty JSON of the record when it has no body at all
    Dump(String),
}

/// A mail record with its fields projected
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMail {
    /// `None` when the record has neither `subject` nor `title`
    pub subject: Option<String>,
    pub body: String,
    pub html: String,
    pub from: String,
    pub date: String,
    /// The record as received
    pub raw: Value,
}

impl NormalizedMail {
    pub fn from_value(raw: &Value) -> Self {
        match raw {
            Value::Object(map) => Self {
                subject: first_present(map, SUBJECT_KEYS),
                body: first_present(map, BODY_KEYS)
                    .or_else(|| case_variant(map, &["body", "content", "text"]))
                    .unwrap_or_default(),
                html: first_present(map, HTML_KEYS)
                    .or_else(|| case_variant(map, &["html"]))
                    .unwrap_or_default(),
                from: first_present(map, &["from"]).unwrap_or_default(),
                date: first_present(map, &["date"]).unwrap_or_default(),
                raw: raw.clone(),
            },
            _ => Self {
                subject: None,
                body: String::new(),
                html: String::new(),
                from: String::new(),
                date: String::new(),
                raw: raw.clone(),
            },
        }
    }

    pub fn is_opaque(&self) -> bool {
        !self.raw.is_object()
    }

    /// Subject for the detail header (blank when missing)
    pub fn subject_text(&self) -> &str {
        self.subject.as_deref().unwrap_or("")
    }

    pub fn preview(&self) -> Preview {
        if !self.html.is_empty() {
            Preview::Html(self.html.clone())
        } else if !self.body.is_empty() {
            Preview::Text(self.body.clone())
        } else if self.is_opaque() {
            Preview::Text(scalar_text(&self.raw))
        } else {
            Preview::Dump(pretty(&self.raw))
        }
    }

    /// Source tab: the whole record as pretty JSON
    pub fn raw_dump(&self) -> String {
        pretty(&self.raw)
    }

    /// Subject as shown in the mail list
    pub fn list_subject(&self) -> String {
        truncate(self.subject.as_deref().unwrap_or(NO_SUBJECT), SUBJECT_LIMIT)
    }

    /// Sender as shown in the mail list
    pub fn list_sender(&self) -> String {
        truncate(&self.from, SENDER_LIMIT)
    }

    /// Date as shown in the mail list (no ellipsis)
    pub fn list_date(&self) -> String {
        self.date.chars().take(DATE_LIMIT).collect()
    }
}

/// Truncate to `limit` characters, marking the cut with "…"
pub fn truncate(s: &str, limit: usize) -> String {
    if s.chars().count() > limit {
        let mut out: String = s.chars().take(limit).collect();
        out.push('…');
        out
    } else {
        s.to_string()
    }
}

fn first_present(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|v| !v.is_null())
        .map(scalar_text)
}

/// Any key equal to one of `names` ignoring ASCII case
fn case_variant(map: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        map.iter()
            .filter(|(k, v)| k.eq_ignore_ascii_case(name) && !v.is_null())
            .map(|(_, v)| scalar_text(v))
            .next()
    })
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
