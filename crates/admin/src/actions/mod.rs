//! Detail and batch operators
//!
//! Every mutation follows the same protocol:
//! 1. Collect target ids (a row id or a panel's selection)
//! 2. Destructive actions wait for an explicit confirm
//! 3. Issue the request; on success clear the selection, toast, and reload
//!    the owning list
//!
//! Lists are never patched locally; the reload is the only source of truth.

mod batch;
mod create;
mod export;
mod imports;
mod sms;

pub use batch::{EmptySelection, PendingAction, batch_delete_bank_cards, batch_delete_phones};
pub use create::NewRecord;
pub use export::{
    ACCOUNTS_EXPORT_FILE, ExportFile, ExportKind, export_accounts, export_mailboxes,
    mailbox_export_contents, mailbox_export_filename,
};
pub use imports::{AcquireOutcome, ImportOutcome, ImportTarget, count_submitted};
pub use sms::SmsCodeOutcome;

/// A control that can have one request in flight per panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Control {
    DeleteRow,
    ReleaseRow,
    BatchDelete,
    Import,
    Create,
    SmsCode,
    Export,
    EmailStock,
    FetchMail,
    SmsBalance,
    DebugPrices,
    Services,
    GetNumbers,
    SaveSettings,
    UpdateLogin,
}
