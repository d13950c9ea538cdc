//! Account and mailbox exports

use chrono::NaiveDate;
use log::info;

use crate::api::{ApiError, SessionClient};
use crate::models::Mailbox;

pub const ACCOUNTS_EXPORT_FILE: &str = "accounts.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Accounts,
    Mailboxes,
}

/// A downloaded export waiting to be written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub kind: ExportKind,
    pub filename: String,
    pub contents: Vec<u8>,
    /// Number of records, when known
    pub count: Option<usize>,
}

impl ExportFile {
    /// Toast shown once the file is saved
    pub fn message(&self) -> Option<String> {
        self.count.map(|n| format!("已导出 {} 条", n))
    }
}

/// File name for a mailbox export made on `date`
pub fn mailbox_export_filename(date: NaiveDate) -> String {
    format!("emails-{}.txt", date.format("%Y-%m-%d"))
}

/// Mailbox export body, one `email----password----uuid----token` line per mailbox
pub fn mailbox_export_contents(mailboxes: &[Mailbox]) -> String {
    mailboxes
        .iter()
        .map(Mailbox::export_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Download the accounts matching `filters` as CSV
pub fn export_accounts(client: &SessionClient, filters: &[(&str, &str)]) -> Result<ExportFile, ApiError> {
    let contents = client.export_accounts(filters)?;
    info!("Exported accounts ({} bytes)", contents.len());
    Ok(ExportFile {
        kind: ExportKind::Accounts,
        filename: ACCOUNTS_EXPORT_FILE.to_string(),
        contents,
        count: None,
    })
}

/// Download every mailbox in the import line format
pub fn export_mailboxes(client: &SessionClient, today: NaiveDate) -> Result<ExportFile, ApiError> {
    let mailboxes = client.export_mailboxes()?;
    info!("Exported {} mailboxes", mailboxes.len());
    Ok(ExportFile {
        kind: ExportKind::Mailboxes,
        filename: mailbox_export_filename(today),
        contents: mailbox_export_contents(&mailboxes).into_bytes(),
        count: Some(mailboxes.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(mailbox_export_filename(date), "emails-2024-03-07.txt");
    }

    #[test]
    fn test_mailbox_export_contents() {
        let boxes = vec![
            Mailbox {
                id: 1,
                email: "a@outlook.com".to_string(),
                password: Some("p".to_string()),
                uuid: Some("u".to_string()),
                token: Some("t".to_string()),
                ..Default::default()
            },
            Mailbox {
                id: 2,
                email: "b@outlook.com".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(
            mailbox_export_contents(&boxes),
            "a@outlook.com----p----u----t\nb@outlook.com------------"
        );
    }
}
