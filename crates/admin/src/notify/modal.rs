//! The single modal slot
//!
//! At most one modal is open. Opening another replaces it and the replaced
//! modal's state is discarded; a pending confirmation that gets replaced is
//! treated as declined.

use log::debug;

use super::confirm::{ConfirmChoice, ConfirmDialog};
use crate::actions::PendingAction;
use crate::viewer::MailViewer;

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Confirm(ConfirmDialog<PendingAction>),
    MailViewer(MailViewer),
    /// A received SMS verification code
    SmsCode { code: String, message: String },
    /// Read-only text (provider debug dumps, service lists)
    Notice { title: String, body: String },
}

impl Modal {
    fn kind(&self) -> &'static str {
        match self {
            Modal::Confirm(_) => "confirm",
            Modal::MailViewer(_) => "mail viewer",
            Modal::SmsCode { .. } => "sms code",
            Modal::Notice { .. } => "notice",
        }
    }
}

#[derive(Debug, Default)]
pub struct ModalSlot {
    active: Option<Modal>,
}

impl ModalSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `modal`, returning whatever it replaced
    pub fn open(&mut self, modal: Modal) -> Option<Modal> {
        debug!("Opening {} modal", modal.kind());
        self.active.replace(modal)
    }

    /// Ask for confirmation before running `action`
    pub fn confirm(&mut self, action: PendingAction) -> Option<Modal> {
        let message = action.confirm_message();
        self.open(Modal::Confirm(ConfirmDialog::new(message, action)))
    }

    pub fn close(&mut self) -> Option<Modal> {
        self.active.take()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Modal> {
        self.active.as_ref()
    }

    /// The open mail viewer, if the slot holds one
    pub fn viewer(&self) -> Option<&MailViewer> {
        match &self.active {
            Some(Modal::MailViewer(viewer)) => Some(viewer),
            _ => None,
        }
    }

    pub fn viewer_mut(&mut self) -> Option<&mut MailViewer> {
        match &mut self.active {
            Some(Modal::MailViewer(viewer)) => Some(viewer),
            _ => None,
        }
    }

    /// Resolve an open confirm dialog. The dialog closes whatever the choice;
    /// other modals are left untouched and yield nothing.
    pub fn resolve_confirm(&mut self, choice: ConfirmChoice) -> Option<PendingAction> {
        match self.active.take() {
            Some(Modal::Confirm(dialog)) => dialog.resolve(choice),
            other => {
                self.active = other;
                None
            }
        }
    }
}
