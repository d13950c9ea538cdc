//! Mail viewer state machine
//!
//! A viewer is opened from a mailbox row, fetches the inbox exactly once, and
//! from then on is purely local: selecting a mail or switching tabs never
//! touches the network. The viewer is discarded when its modal closes.

use log::debug;
use serde_json::Value;

use super::normalize::{NormalizedMail, Preview};
use crate::api::ApiError;

/// Manual recovery link shown under every outcome
pub const RECOVERY_URL: &str = "https://outlook.live.com";
pub const RECOVERY_TEXT: &str = "在 Outlook 登录 可查看全部邮件";
pub const LOADING_TEXT: &str = "正在获取邮件列表…";
pub const EMPTY_LIST_TEXT: &str = "收件箱暂无邮件";
pub const EMPTY_DETAIL_TEXT: &str = "收件箱暂无邮件，或该邮箱尚未收到新邮件。";
const FAILED_FALLBACK: &str = "获取失败";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailTab {
    #[default]
    Preview,
    Raw,
}

/// A loaded, non-empty inbox
#[derive(Debug, Clone, PartialEq)]
pub struct MailViewerState {
    mails: Vec<NormalizedMail>,
    selected_index: usize,
    active_tab: MailTab,
}

impl MailViewerState {
    /// `None` for an empty inbox
    pub fn new(records: &[Value]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        Some(Self {
            mails: records.iter().map(NormalizedMail::from_value).collect(),
            selected_index: 0,
            active_tab: MailTab::Preview,
        })
    }

    pub fn mails(&self) -> &[NormalizedMail] {
        &self.mails
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn active_tab(&self) -> MailTab {
        self.active_tab
    }

    pub fn selected(&self) -> &NormalizedMail {
        &self.mails[self.selected_index]
    }

    /// Select a mail and show its preview. Out-of-range indices change
    /// nothing. Returns whether the detail pane changed.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.mails.len() {
            return false;
        }
        let changed = index != self.selected_index || self.active_tab != MailTab::Preview;
        self.selected_index = index;
        self.active_tab = MailTab::Preview;
        changed
    }

    pub fn set_tab(&mut self, tab: MailTab) {
        self.active_tab = tab;
    }
}

/// Viewer lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerState {
    Loading,
    Empty,
    Failed { message: String },
    Ready(MailViewerState),
}

/// One row of the mail list pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailListEntry {
    pub index: usize,
    pub subject: String,
    pub sender: String,
    pub date: String,
    pub active: bool,
}

/// The detail pane for the selected mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailDetail {
    pub from: String,
    pub subject: String,
    /// Omitted from the header when empty
    pub date: Option<String>,
    pub active_tab: MailTab,
    pub preview: Preview,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPane {
    Loading(String),
    Empty(String),
    Failed(String),
    Mail(Box<MailDetail>),
}

/// Rendered viewer. Both panes plus the recovery link, never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailViewerView {
    pub mailbox_email: String,
    pub list: Vec<MailListEntry>,
    /// Shown in the list pane when `list` is empty
    pub list_placeholder: Option<String>,
    pub detail: DetailPane,
    pub recovery_url: &'static str,
    pub recovery_text: &'static str,
}

/// The mail viewer opened for one mailbox
#[derive(Debug, Clone, PartialEq)]
pub struct MailViewer {
    mailbox_id: i64,
    mailbox_email: String,
    generation: u64,
    state: ViewerState,
}

impl MailViewer {
    /// Open a viewer. `generation` identifies this opening so results for a
    /// closed or replaced viewer can be recognised.
    pub fn open(mailbox_id: i64, mailbox_email: impl Into<String>, generation: u64) -> Self {
        Self {
            mailbox_id,
            mailbox_email: mailbox_email.into(),
            generation,
            state: ViewerState::Loading,
        }
    }

    pub fn mailbox_id(&self) -> i64 {
        self.mailbox_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Apply the inbox fetch
    pub fn apply(&mut self, result: Result<Vec<Value>, ApiError>) {
        self.state = match result {
            Ok(records) => match MailViewerState::new(&records) {
                Some(ready) => {
                    debug!("Viewer for mailbox {}: {} mails", self.mailbox_id, records.len());
                    ViewerState::Ready(ready)
                }
                None => ViewerState::Empty,
            },
            Err(e) => ViewerState::Failed {
                message: e.display_or(FAILED_FALLBACK),
            },
        };
    }

    /// Select a mail. Returns whether the detail pane changed.
    pub fn select(&mut self, index: usize) -> bool {
        match &mut self.state {
            ViewerState::Ready(ready) => ready.select(index),
            _ => false,
        }
    }

    pub fn set_tab(&mut self, tab: MailTab) {
        if let ViewerState::Ready(ready) = &mut self.state {
            ready.set_tab(tab);
        }
    }

    /// The selected mail, when the inbox is loaded
    pub fn selected(&self) -> Option<&NormalizedMail> {
        match &self.state {
            ViewerState::Ready(ready) => Some(ready.selected()),
            _ => None,
        }
    }

    pub fn render(&self) -> MailViewerView {
        let (list, list_placeholder, detail) = match &self.state {
            ViewerState::Loading => (
                Vec::new(),
                None,
                DetailPane::Loading(LOADING_TEXT.to_string()),
            ),
            ViewerState::Empty => (
                Vec::new(),
                Some(EMPTY_LIST_TEXT.to_string()),
                DetailPane::Empty(EMPTY_DETAIL_TEXT.to_string()),
            ),
            ViewerState::Failed { message } => {
                (Vec::new(), None, DetailPane::Failed(message.clone()))
            }
            ViewerState::Ready(ready) => {
                let list = ready
                    .mails()
                    .iter()
                    .enumerate()
                    .map(|(index, mail)| MailListEntry {
                        index,
                        subject: mail.list_subject(),
                        sender: mail.list_sender(),
                        date: mail.list_date(),
                        active: index == ready.selected_index(),
                    })
                    .collect();
                let mail = ready.selected();
                let detail = MailDetail {
                    from: mail.from.clone(),
                    subject: mail.subject_text().to_string(),
                    date: (!mail.date.is_empty()).then(|| mail.date.clone()),
                    active_tab: ready.active_tab(),
                    preview: mail.preview(),
                    raw: mail.raw_dump(),
                };
                (list, None, DetailPane::Mail(Box::new(detail)))
            }
        };

        MailViewerView {
            mailbox_email: self.mailbox_email.clone(),
            list,
            list_placeholder,
            detail,
            recovery_url: RECOVERY_URL,
            recovery_text: RECOVERY_TEXT,
        }
    }
}
