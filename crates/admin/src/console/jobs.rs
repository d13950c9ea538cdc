//! Backend work issued by the console
//!
//! A [`Job`] is a request the console wants run. Running it blocks, so hosts
//! run jobs off their event loop and hand each [`Completion`] back to
//! [`Console::complete`](super::Console::complete). Every job carries the
//! session epoch it was issued under; completions from an earlier epoch are
//! dropped.

use chrono::Local;
use log::debug;
use serde_json::Value;

use crate::actions::{ExportFile, ExportKind, ImportOutcome, ImportTarget, NewRecord, PendingAction};
use crate::api::wire::{
    BalanceResponse, FetchMailResponse, GetNumbersResponse, LogPage, LoginResponse, MeResponse,
    OpenAiAvailability, Page, ServicesResponse, SmsCodeResponse, StockResponse,
};
use crate::api::{ApiError, SessionClient};
use crate::list::{Accounts, BankCards, FetchTicket, ListController, Mailboxes, Phones};
use crate::models::{Account, BankCard, DashboardStats, Mailbox, Phone, Settings};
use crate::query::{LOG_PAGE_SIZE, LoginUpdate};

/// Why the settings are being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPurpose {
    /// Fill the settings form
    Form,
    /// Preselect the provider mail type on the mailbox panel
    MailTypeDefault,
}

/// A unit of backend work
#[derive(Debug, Clone, PartialEq)]
pub enum JobKind {
    Login { username: String, password: String },
    Logout,
    Me,
    LoadAccounts(FetchTicket),
    LoadMailboxes(FetchTicket),
    LoadPhones(FetchTicket),
    LoadBankCards(FetchTicket),
    Mutate(PendingAction),
    Create(NewRecord),
    Import { target: ImportTarget, lines: String },
    SmsCode(i64),
    MailList { mailbox_id: i64, generation: u64 },
    ExportAccounts { filters: Vec<(String, String)> },
    ExportMailboxes,
    Dashboard,
    Logs,
    Settings(SettingsPurpose),
    SaveSettings(Settings),
    UpdateLogin(LoginUpdate),
    EmailBalance,
    EmailStock { mail_type: String },
    FetchMail { mail_type: String, quantity: u32 },
    SmsAvailability,
    SmsBalance,
    DebugPrices,
    Services { country: u32 },
    GetNumbers { country: u32, quantity: u32 },
}

/// Result of a job, tagged with what it was for
#[derive(Debug)]
pub enum Outcome {
    Login(Result<LoginResponse, ApiError>),
    LoggedOut,
    Me(Result<MeResponse, ApiError>),
    Accounts(FetchTicket, Result<Page<Account>, ApiError>),
    Mailboxes(FetchTicket, Result<Page<Mailbox>, ApiError>),
    Phones(FetchTicket, Result<Page<Phone>, ApiError>),
    BankCards(FetchTicket, Result<Page<BankCard>, ApiError>),
    Mutated(PendingAction, Result<(), ApiError>),
    Created(NewRecord, Result<(), ApiError>),
    Imported(ImportTarget, Result<ImportOutcome, ApiError>),
    SmsCode(i64, Result<SmsCodeResponse, ApiError>),
    MailList {
        mailbox_id: i64,
        generation: u64,
        result: Result<Vec<Value>, ApiError>,
    },
    Exported(ExportKind, Result<ExportFile, ApiError>),
    Dashboard(Result<DashboardStats, ApiError>),
    Logs(Result<LogPage, ApiError>),
    Settings(SettingsPurpose, Result<Settings, ApiError>),
    SettingsSaved(Result<(), ApiError>),
    LoginUpdated(Result<(), ApiError>),
    EmailBalance(Result<BalanceResponse, ApiError>),
    EmailStock(Result<StockResponse, ApiError>),
    FetchMail(Result<FetchMailResponse, ApiError>),
    SmsAvailability(Result<OpenAiAvailability, ApiError>),
    SmsBalance(Result<BalanceResponse, ApiError>),
    DebugPrices(Result<OpenAiAvailability, ApiError>),
    Services(u32, Result<ServicesResponse, ApiError>),
    GetNumbers(Result<GetNumbersResponse, ApiError>),
}

/// A job bound to the session epoch it was issued under
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub epoch: u64,
    pub kind: JobKind,
}

/// A finished job
#[derive(Debug)]
pub struct Completion {
    pub epoch: u64,
    pub outcome: Outcome,
}

impl Job {
    /// Run the job against the backend. Blocks for the duration of the request.
    pub fn run(self, client: &SessionClient) -> Completion {
        debug!("Running job {:?} (epoch {})", self.kind, self.epoch);
        let outcome = match self.kind {
            JobKind::Login { username, password } => Outcome::Login(client.login(&username, &password)),
            JobKind::Logout => {
                client.logout();
                Outcome::LoggedOut
            }
            JobKind::Me => Outcome::Me(client.me()),
            JobKind::LoadAccounts(ticket) => {
                let result = ListController::<Accounts>::load(client, &ticket);
                Outcome::Accounts(ticket, result)
            }
            JobKind::LoadMailboxes(ticket) => {
                let result = ListController::<Mailboxes>::load(client, &ticket);
                Outcome::Mailboxes(ticket, result)
            }
            JobKind::LoadPhones(ticket) => {
                let result = ListController::<Phones>::load(client, &ticket);
                Outcome::Phones(ticket, result)
            }
            JobKind::LoadBankCards(ticket) => {
                let result = ListController::<BankCards>::load(client, &ticket);
                Outcome::BankCards(ticket, result)
            }
            JobKind::Mutate(action) => {
                let result = action.execute(client);
                Outcome::Mutated(action, result)
            }
            JobKind::Create(record) => {
                let result = record.execute(client);
                Outcome::Created(record, result)
            }
            JobKind::Import { target, lines } => Outcome::Imported(target, target.execute(client, &lines)),
            JobKind::SmsCode(id) => Outcome::SmsCode(id, client.phone_sms_code(id)),
            JobKind::MailList {
                mailbox_id,
                generation,
            } => Outcome::MailList {
                mailbox_id,
                generation,
                result: client.mail_list(mailbox_id).map(|r| r.list),
            },
            JobKind::ExportAccounts { filters } => {
                let pairs: Vec<(&str, &str)> = filters
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                Outcome::Exported(
                    ExportKind::Accounts,
                    crate::actions::export_accounts(client, &pairs),
                )
            }
            JobKind::ExportMailboxes => Outcome::Exported(
                ExportKind::Mailboxes,
                crate::actions::export_mailboxes(client, Local::now().date_naive()),
            ),
            JobKind::Dashboard => Outcome::Dashboard(client.dashboard()),
            JobKind::Logs => Outcome::Logs(client.logs(1, LOG_PAGE_SIZE)),
            JobKind::Settings(purpose) => Outcome::Settings(purpose, client.settings()),
            JobKind::SaveSettings(settings) => Outcome::SettingsSaved(client.save_settings(&settings)),
            JobKind::UpdateLogin(update) => {
                Outcome::LoginUpdated(client.update_login(&update.username, &update.password))
            }
            JobKind::EmailBalance => Outcome::EmailBalance(client.email_balance()),
            JobKind::EmailStock { mail_type } => Outcome::EmailStock(client.mail_stock(&mail_type)),
            JobKind::FetchMail {
                mail_type,
                quantity,
            } => Outcome::FetchMail(client.fetch_mail(&mail_type, quantity)),
            JobKind::SmsAvailability => Outcome::SmsAvailability(client.openai_availability(false)),
            JobKind::SmsBalance => Outcome::SmsBalance(client.sms_balance()),
            JobKind::DebugPrices => Outcome::DebugPrices(client.openai_availability(true)),
            JobKind::Services { country } => Outcome::Services(country, client.sms_services(country)),
            JobKind::GetNumbers { country, quantity } => {
                Outcome::GetNumbers(client.get_numbers(country, quantity))
            }
        };
        Completion {
            epoch: self.epoch,
            outcome,
        }
    }
}
