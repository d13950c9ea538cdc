//! Admin crate - Core of the Warden pool console
//!
//! This crate provides the platform-independent console logic including:
//! - Session-aware backend client with centralized 401 handling
//! - Domain models for the pool (accounts, mailboxes, phones, bank cards)
//! - A generic paginated list controller shared by every resource panel
//! - Detail and batch operators (delete, release, import, export)
//! - Toasts, confirm dialogs and a single modal slot
//! - The master-detail mail viewer
//! - Dashboard, settings and provider readers
//!
//! Nothing here draws to a screen. The [`Console`] holds all state and
//! hands out [`Job`]s for the host to run.

pub mod actions;
pub mod api;
pub mod config;
pub mod console;
pub mod list;
pub mod models;
pub mod notify;
pub mod query;
pub mod viewer;

pub use actions::{Control, ExportFile, ImportTarget, NewRecord, PendingAction};
pub use api::{
    ApiError, FileTokenStore, MemoryTokenStore, SessionClient, SessionEvent, TokenStore,
    Transport, UreqTransport,
};
pub use config::ConsoleConfig;
pub use console::{Completion, Console, Job, JobKind, Outcome, Panel, View};
pub use list::{Accounts, BankCards, ListController, ListView, LoadState, Mailboxes, Phones, Resource};
pub use models::{Account, BankCard, Mailbox, NewBankCard, NewMailbox, NewPhone, Phone, SelectionSet, Settings};
pub use notify::{ConfirmChoice, Modal, ModalSlot, Toast, ToastKind, ToastQueue};
pub use query::{DashboardView, LogsView, Workflow};
pub use viewer::{MailTab, MailViewer, NormalizedMail};
