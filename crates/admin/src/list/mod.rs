//! Generic paginated list controller
//!
//! The same [`ListController`] drives the accounts, mailboxes, phones and
//! bank cards panels; each resource plugs in through [`Resource`].

mod controller;
pub mod pagination;
mod resource;

pub use controller::{Applied, FetchTicket, ListController, ListRow, ListView, LoadState, PaginationView};
pub use resource::{Accounts, BankCards, DEFAULT_PAGE_SIZE, Mailboxes, Phones, Resource};
