//! Domain models for pool resources

mod account;
mod bank_card;
mod dashboard;
mod mailbox;
mod phone;
mod selection;
mod settings;

pub use account::{Account, yes_no};
pub use bank_card::{BankCard, NewBankCard};
pub use dashboard::{DashboardStats, configured_label};
pub use mailbox::{LINE_SEPARATOR, Mailbox, NewMailbox};
pub use phone::{NO_EXPIRY, NewPhone, Phone, format_expired_at, format_expired_at_in, parse_expired_at};
pub use selection::SelectionSet;
pub use settings::{DEFAULT_MAIL_TYPE_KEY, MAIL_TYPES, SETTINGS_KEYS, Settings};
