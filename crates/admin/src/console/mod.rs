//! The console: one context object holding all UI state
//!
//! The console never talks to the backend itself. Operations mutate state
//! and return the [`Job`]s to run; the host runs them and feeds each
//! [`Completion`] back through [`Console::complete`], which may in turn
//! issue follow-up jobs (reloads, clamp refetches, logout).
//!
//! Two guards keep late results from landing in the wrong place:
//! - the session epoch, bumped on every logout or expiry, invalidates all
//!   in-flight work from the previous session
//! - list generations and viewer generations drop superseded results

mod jobs;
mod panel;

use std::collections::BTreeSet;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use log::{debug, info, warn};

pub use jobs::{Completion, Job, JobKind, Outcome, SettingsPurpose};
pub use panel::{Panel, View};

use crate::actions::{
    Control, ExportFile, ExportKind, ImportTarget, NewRecord, PendingAction, SmsCodeOutcome,
    batch_delete_bank_cards, batch_delete_phones,
};
use crate::api::{SessionClient, SessionEvent};
use crate::list::{Accounts, Applied, BankCards, FetchTicket, ListController, ListView, Mailboxes, Phones, Resource};
use crate::models::SelectionSet;
use crate::notify::{ConfirmChoice, Modal, ModalSlot, ToastKind, ToastQueue};
use crate::query::{
    DashboardView, EmailProviderState, LOGIN_UPDATED, LoginUpdate, LogsView, SAVE_FAILED, SAVED,
    SettingsForm, SmsProviderState, Workflow, prices_notice, services_notice,
};
use crate::viewer::{MailTab, MailViewer};

const LOGIN_FAILED: &str = "登录失败";
const REQUEST_FAILED: &str = "请求错误";
const UNKNOWN_FILTER: &str = "未知筛选项";

/// All console state
pub struct Console {
    view: View,
    username: String,
    panel: Panel,
    epoch: u64,
    events: Receiver<SessionEvent>,
    login_pending: bool,

    accounts: ListController<Accounts>,
    mailboxes: ListController<Mailboxes>,
    phones: ListController<Phones>,
    bank_cards: ListController<BankCards>,
    card_selection: SelectionSet,
    phone_selection: SelectionSet,

    toasts: ToastQueue,
    modal: ModalSlot,
    viewer_generation: u64,
    busy: BTreeSet<(Panel, Control)>,

    dashboard: Option<DashboardView>,
    logs: LogsView,
    email_provider: EmailProviderState,
    sms_provider: SmsProviderState,
    settings: SettingsForm,
    downloads: Vec<ExportFile>,
}

impl Console {
    /// Create the console for `client`, subscribing to its session events
    pub fn new(client: &SessionClient) -> Self {
        Self {
            view: View::Login { error: None },
            username: String::new(),
            panel: Panel::Dashboard,
            epoch: 0,
            events: client.session().subscribe(),
            login_pending: false,
            accounts: ListController::new(),
            mailboxes: ListController::new(),
            phones: ListController::new(),
            bank_cards: ListController::new(),
            card_selection: SelectionSet::new(),
            phone_selection: SelectionSet::new(),
            toasts: ToastQueue::new(),
            modal: ModalSlot::new(),
            viewer_generation: 0,
            busy: BTreeSet::new(),
            dashboard: None,
            logs: LogsView::Loading,
            email_provider: EmailProviderState::default(),
            sms_provider: SmsProviderState::default(),
            settings: SettingsForm::default(),
            downloads: Vec::new(),
        }
    }

    /// Initial screen. A persisted token goes straight to the admin view
    /// and is validated in the background.
    pub fn start(&mut self, client: &SessionClient) -> Vec<Job> {
        if !client.has_token() {
            info!("No stored session, showing login");
            self.view = View::Login { error: None };
            return Vec::new();
        }
        info!("Stored session found, validating");
        self.view = View::Admin;
        let mut jobs = vec![self.job(JobKind::Me)];
        jobs.extend(self.show_panel(Panel::Dashboard));
        jobs
    }

    // Accessors

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_login_pending(&self) -> bool {
        self.login_pending
    }

    pub fn accounts(&self) -> &ListController<Accounts> {
        &self.accounts
    }

    pub fn mailboxes(&self) -> &ListController<Mailboxes> {
        &self.mailboxes
    }

    pub fn phones(&self) -> &ListController<Phones> {
        &self.phones
    }

    pub fn bank_cards(&self) -> &ListController<BankCards> {
        &self.bank_cards
    }

    /// Ticked rows of `panel`, for panels that support batch actions
    pub fn selection(&self, panel: Panel) -> Option<&SelectionSet> {
        match panel {
            Panel::BankCards => Some(&self.card_selection),
            Panel::Phones => Some(&self.phone_selection),
            _ => None,
        }
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn modal(&self) -> &ModalSlot {
        &self.modal
    }

    pub fn dashboard(&self) -> Option<&DashboardView> {
        self.dashboard.as_ref()
    }

    pub fn logs(&self) -> &LogsView {
        &self.logs
    }

    pub fn email_provider(&self) -> &EmailProviderState {
        &self.email_provider
    }

    pub fn sms_provider(&self) -> &SmsProviderState {
        &self.sms_provider
    }

    pub fn settings(&self) -> &SettingsForm {
        &self.settings
    }

    pub fn is_busy(&self, panel: Panel, control: Control) -> bool {
        self.busy.contains(&(panel, control))
    }

    /// Rendered table for a list panel
    pub fn render_list(&self, panel: Panel) -> Option<ListView> {
        match panel {
            Panel::Accounts => Some(self.accounts.render()),
            Panel::Emails => Some(self.mailboxes.render()),
            Panel::BankCards => Some(self.bank_cards.render()),
            Panel::Phones => Some(self.phones.render()),
            Panel::Dashboard | Panel::Settings => None,
        }
    }

    /// Exports downloaded since the last call, for the host to save
    pub fn take_downloads(&mut self) -> Vec<ExportFile> {
        std::mem::take(&mut self.downloads)
    }

    /// Report a host-side failure (e.g. writing a download) as a toast
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.toasts.error(message);
    }

    /// Housekeeping: expire toasts and apply session events
    pub fn tick(&mut self, now: Instant) {
        self.toasts.prune(now);
        self.poll_session();
    }

    // Session

    /// Submit the login form
    pub fn login(&mut self, username: &str, password: &str) -> Vec<Job> {
        if !matches!(self.view, View::Login { .. }) || self.login_pending {
            return Vec::new();
        }
        self.login_pending = true;
        vec![self.job(JobKind::Login {
            username: username.to_string(),
            password: password.to_string(),
        })]
    }

    pub fn logout(&mut self) -> Vec<Job> {
        vec![self.job(JobKind::Logout)]
    }

    /// Apply pending session events. Returns true when the console was reset.
    pub fn poll_session(&mut self) -> bool {
        let mut reset = false;
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::LoggedIn { username } => {
                    debug!("Session established for {}", username);
                    self.username = username;
                }
                SessionEvent::LoggedOut | SessionEvent::Expired => {
                    info!("Session ended ({:?}), returning to login", event);
                    self.reset();
                    reset = true;
                }
            }
        }
        reset
    }

    /// Drop all session-scoped state and show the login form
    fn reset(&mut self) {
        self.epoch += 1;
        self.view = View::Login { error: None };
        self.username.clear();
        self.panel = Panel::Dashboard;
        self.login_pending = false;
        self.accounts = ListController::new();
        self.mailboxes = ListController::new();
        self.phones = ListController::new();
        self.bank_cards = ListController::new();
        self.card_selection.clear();
        self.phone_selection.clear();
        self.modal.close();
        self.busy.clear();
        self.dashboard = None;
        self.logs = LogsView::Loading;
        self.email_provider = EmailProviderState::default();
        self.sms_provider = SmsProviderState::default();
        self.settings = SettingsForm::default();
        self.downloads.clear();
    }

    // Navigation and lists

    /// Switch panels and load what the panel shows
    pub fn show_panel(&mut self, panel: Panel) -> Vec<Job> {
        if self.view != View::Admin {
            return Vec::new();
        }
        if self.panel != panel {
            match self.panel {
                Panel::BankCards => self.card_selection.clear(),
                Panel::Phones => self.phone_selection.clear(),
                _ => {}
            }
        }
        debug!("Showing {:?}", panel);
        self.panel = panel;

        match panel {
            Panel::Dashboard => self.refresh_dashboard(),
            Panel::Accounts => self.reload(Panel::Accounts),
            Panel::Emails => {
                self.email_provider.begin_probe();
                let mut jobs = vec![self.job(JobKind::EmailBalance)];
                jobs.extend(self.reload(Panel::Emails));
                jobs.push(self.job(JobKind::Settings(SettingsPurpose::MailTypeDefault)));
                jobs
            }
            Panel::BankCards => self.reload(Panel::BankCards),
            Panel::Phones => {
                self.sms_provider.begin_probe();
                let mut jobs = vec![self.job(JobKind::SmsAvailability)];
                jobs.extend(self.reload(Panel::Phones));
                jobs
            }
            Panel::Settings => vec![self.job(JobKind::Settings(SettingsPurpose::Form))],
        }
    }

    /// Refetch a panel's list with its current filters and page
    pub fn reload(&mut self, panel: Panel) -> Vec<Job> {
        let kind = match panel {
            Panel::Accounts => JobKind::LoadAccounts(self.accounts.reload()),
            Panel::Emails => JobKind::LoadMailboxes(self.mailboxes.reload()),
            Panel::Phones => JobKind::LoadPhones(self.phones.reload()),
            Panel::BankCards => JobKind::LoadBankCards(self.bank_cards.reload()),
            Panel::Dashboard | Panel::Settings => return Vec::new(),
        };
        vec![self.job(kind)]
    }

    /// Set an account filter. An empty value clears it.
    pub fn set_account_filter(&mut self, key: &str, value: &str) -> Vec<Job> {
        if !Accounts::FILTERS.contains(&key) {
            self.toasts.info(UNKNOWN_FILTER);
            return Vec::new();
        }
        let ticket = self.accounts.set_filter(key, value);
        vec![self.job(JobKind::LoadAccounts(ticket))]
    }

    /// Page the current panel's list by `delta`
    pub fn page(&mut self, delta: i32) -> Vec<Job> {
        let kind = match self.panel {
            Panel::Accounts => self.accounts.set_page(delta).map(JobKind::LoadAccounts),
            Panel::Emails => self.mailboxes.set_page(delta).map(JobKind::LoadMailboxes),
            Panel::Phones => self.phones.set_page(delta).map(JobKind::LoadPhones),
            Panel::BankCards => self.bank_cards.set_page(delta).map(JobKind::LoadBankCards),
            Panel::Dashboard | Panel::Settings => None,
        };
        kind.map(|k| vec![self.job(k)]).unwrap_or_default()
    }

    /// Tick or untick a visible row on the current panel. Returns whether
    /// the row is now ticked; `None` when the row can't be ticked here.
    pub fn toggle_selection(&mut self, id: i64) -> Option<bool> {
        match self.panel {
            Panel::BankCards if self.bank_cards.find(id).is_some() => {
                Some(self.card_selection.toggle(id))
            }
            Panel::Phones if self.phones.find(id).is_some() => Some(self.phone_selection.toggle(id)),
            _ => None,
        }
    }

    // Mutations

    /// Ask to delete a row of the current panel
    pub fn request_delete(&mut self, id: i64) -> Vec<Job> {
        let action = match self.panel {
            Panel::Emails => PendingAction::DeleteMailbox(id),
            Panel::BankCards => PendingAction::DeleteBankCard(id),
            Panel::Phones => PendingAction::DeletePhone(id),
            _ => return Vec::new(),
        };
        self.request_confirm(action);
        Vec::new()
    }

    /// Ask to release a phone number at the provider
    pub fn request_release(&mut self, id: i64) -> Vec<Job> {
        self.request_confirm(PendingAction::ReleasePhone(id));
        Vec::new()
    }

    /// Ask to delete every ticked row of the current panel
    pub fn request_batch_delete(&mut self) -> Vec<Job> {
        let pending = match self.panel {
            Panel::BankCards => batch_delete_bank_cards(&self.card_selection),
            Panel::Phones => batch_delete_phones(&self.phone_selection),
            _ => return Vec::new(),
        };
        match pending {
            Ok(action) => self.request_confirm(action),
            Err(empty) => {
                self.toasts.info(empty.message);
            }
        }
        Vec::new()
    }

    fn request_confirm(&mut self, action: PendingAction) {
        if self.is_busy(action.panel(), action.control()) {
            debug!("{:?} already in flight, ignoring", action.control());
            return;
        }
        self.modal.confirm(action);
    }

    /// Answer the open confirm dialog
    pub fn resolve_confirm(&mut self, choice: ConfirmChoice) -> Vec<Job> {
        let Some(action) = self.modal.resolve_confirm(choice) else {
            return Vec::new();
        };
        if !self.acquire(action.panel(), action.control()) {
            return Vec::new();
        }
        vec![self.job(JobKind::Mutate(action))]
    }

    pub fn create(&mut self, record: NewRecord) -> Vec<Job> {
        if let Err(message) = record.validate() {
            self.toasts.error(message);
            return Vec::new();
        }
        if !self.acquire(record.panel(), Control::Create) {
            return Vec::new();
        }
        vec![self.job(JobKind::Create(record))]
    }

    pub fn import(&mut self, target: ImportTarget, lines: &str) -> Vec<Job> {
        if lines.trim().is_empty() {
            return Vec::new();
        }
        if !self.acquire(target.panel(), Control::Import) {
            return Vec::new();
        }
        vec![self.job(JobKind::Import {
            target,
            lines: lines.to_string(),
        })]
    }

    pub fn read_sms_code(&mut self, phone_id: i64) -> Vec<Job> {
        if !self.acquire(Panel::Phones, Control::SmsCode) {
            return Vec::new();
        }
        vec![self.job(JobKind::SmsCode(phone_id))]
    }

    /// Export accounts matching the current filters
    pub fn export_accounts(&mut self) -> Vec<Job> {
        if !self.acquire(Panel::Accounts, Control::Export) {
            return Vec::new();
        }
        let filters = self
            .accounts
            .filter_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        vec![self.job(JobKind::ExportAccounts { filters })]
    }

    pub fn export_mailboxes(&mut self) -> Vec<Job> {
        if !self.acquire(Panel::Emails, Control::Export) {
            return Vec::new();
        }
        vec![self.job(JobKind::ExportMailboxes)]
    }

    // Mail viewer and modals

    /// Open the inbox of a mailbox. Replaces any open modal.
    pub fn open_viewer(&mut self, mailbox_id: i64) -> Vec<Job> {
        let email = self
            .mailboxes
            .find(mailbox_id)
            .map(|m| m.email.clone())
            .unwrap_or_else(|| format!("#{}", mailbox_id));
        self.viewer_generation += 1;
        let generation = self.viewer_generation;
        self.modal
            .open(Modal::MailViewer(MailViewer::open(mailbox_id, email, generation)));
        vec![self.job(JobKind::MailList {
            mailbox_id,
            generation,
        })]
    }

    /// Select a mail in the open viewer. Never refetches.
    pub fn select_mail(&mut self, index: usize) -> bool {
        self.modal
            .viewer_mut()
            .map(|viewer| viewer.select(index))
            .unwrap_or(false)
    }

    pub fn set_mail_tab(&mut self, tab: MailTab) {
        if let Some(viewer) = self.modal.viewer_mut() {
            viewer.set_tab(tab);
        }
    }

    /// Close whatever modal is open. A pending confirmation is declined.
    pub fn close_modal(&mut self) {
        if let Some(Modal::Confirm(_)) = self.modal.active() {
            self.modal.resolve_confirm(ConfirmChoice::Dismiss);
        } else {
            self.modal.close();
        }
    }

    // Dashboard and settings

    pub fn refresh_dashboard(&mut self) -> Vec<Job> {
        self.logs = LogsView::Loading;
        vec![self.job(JobKind::Dashboard), self.job(JobKind::Logs)]
    }

    pub fn start_workflow(&mut self, workflow: Workflow) {
        self.toasts.info(workflow.stub_message());
    }

    /// Edit a field of the settings form. Unknown keys are ignored.
    pub fn set_setting(&mut self, key: &str, value: &str) -> bool {
        self.settings.values.set(key, value)
    }

    pub fn save_settings(&mut self) -> Vec<Job> {
        if !self.acquire(Panel::Settings, Control::SaveSettings) {
            return Vec::new();
        }
        vec![self.job(JobKind::SaveSettings(self.settings.values.clone()))]
    }

    /// Change the console login. Success ends the session.
    pub fn update_login(&mut self, username: &str, password: &str) -> Vec<Job> {
        let update = match LoginUpdate::new(username, password) {
            Ok(update) => update,
            Err(message) => {
                self.toasts.error(message);
                return Vec::new();
            }
        };
        if !self.acquire(Panel::Settings, Control::UpdateLogin) {
            return Vec::new();
        }
        vec![self.job(JobKind::UpdateLogin(update))]
    }

    // Providers

    pub fn select_mail_type(&mut self, mail_type: &str) -> bool {
        self.email_provider.select_mail_type(mail_type)
    }

    pub fn query_email_stock(&mut self) -> Vec<Job> {
        if !self.acquire(Panel::Emails, Control::EmailStock) {
            return Vec::new();
        }
        self.email_provider.message = "查询中…".to_string();
        let mail_type = self.email_provider.mail_type.clone();
        vec![self.job(JobKind::EmailStock { mail_type })]
    }

    pub fn fetch_mail(&mut self, quantity: u32) -> Vec<Job> {
        if !self.acquire(Panel::Emails, Control::FetchMail) {
            return Vec::new();
        }
        self.email_provider.message = "拉取中…".to_string();
        let mail_type = self.email_provider.mail_type.clone();
        vec![self.job(JobKind::FetchMail {
            mail_type,
            quantity: quantity.max(1),
        })]
    }

    pub fn refresh_sms_summary(&mut self) -> Vec<Job> {
        self.sms_provider.begin_probe();
        vec![self.job(JobKind::SmsAvailability)]
    }

    pub fn test_sms_balance(&mut self) -> Vec<Job> {
        if !self.acquire(Panel::Phones, Control::SmsBalance) {
            return Vec::new();
        }
        self.sms_provider.message = "测试中…".to_string();
        vec![self.job(JobKind::SmsBalance)]
    }

    pub fn debug_prices(&mut self) -> Vec<Job> {
        if !self.acquire(Panel::Phones, Control::DebugPrices) {
            return Vec::new();
        }
        self.sms_provider.message = "加载中…".to_string();
        vec![self.job(JobKind::DebugPrices)]
    }

    pub fn list_services(&mut self, country: u32) -> Vec<Job> {
        if !self.acquire(Panel::Phones, Control::Services) {
            return Vec::new();
        }
        vec![self.job(JobKind::Services { country })]
    }

    pub fn get_numbers(&mut self, country: u32, quantity: u32) -> Vec<Job> {
        if !self.acquire(Panel::Phones, Control::GetNumbers) {
            return Vec::new();
        }
        self.sms_provider.message = "获取中…".to_string();
        vec![self.job(JobKind::GetNumbers {
            country,
            quantity: quantity.max(1),
        })]
    }

    // Completions

    /// Apply a finished job. Returns follow-up jobs.
    pub fn complete(&mut self, completion: Completion) -> Vec<Job> {
        self.poll_session();
        if completion.epoch != self.epoch {
            debug!(
                "Dropping completion from epoch {} (current {})",
                completion.epoch, self.epoch
            );
            return Vec::new();
        }
        let jobs = self.apply(completion.outcome);
        self.poll_session();
        jobs
    }

    fn apply(&mut self, outcome: Outcome) -> Vec<Job> {
        match outcome {
            Outcome::Login(result) => {
                self.login_pending = false;
                match result {
                    Ok(response) => {
                        if let Some(username) = response.username {
                            self.username = username;
                        }
                        self.view = View::Admin;
                        self.show_panel(Panel::Accounts)
                    }
                    Err(e) => {
                        self.view = View::Login {
                            error: Some(e.display_or(LOGIN_FAILED)),
                        };
                        Vec::new()
                    }
                }
            }
            Outcome::LoggedOut => Vec::new(),
            Outcome::Me(result) => match result {
                Ok(me) => {
                    self.username = me.username;
                    Vec::new()
                }
                Err(e) => {
                    warn!("Stored session is not valid ({}), logging out", e);
                    self.logout()
                }
            },
            Outcome::Accounts(ticket, result) => {
                let applied = self.accounts.apply(&ticket, result);
                self.follow(applied, JobKind::LoadAccounts)
            }
            Outcome::Mailboxes(ticket, result) => {
                let applied = self.mailboxes.apply(&ticket, result);
                self.follow(applied, JobKind::LoadMailboxes)
            }
            Outcome::Phones(ticket, result) => {
                let applied = self.phones.apply(&ticket, result);
                self.follow(applied, JobKind::LoadPhones)
            }
            Outcome::BankCards(ticket, result) => {
                let applied = self.bank_cards.apply(&ticket, result);
                self.follow(applied, JobKind::LoadBankCards)
            }
            Outcome::Mutated(action, result) => {
                let panel = action.panel();
                self.release(panel, action.control());
                match result {
                    Ok(()) => {
                        if action.is_batch() {
                            match panel {
                                Panel::BankCards => self.card_selection.clear(),
                                Panel::Phones => self.phone_selection.clear(),
                                _ => {}
                            }
                        }
                        self.toasts.success(action.success_message());
                        self.reload(panel)
                    }
                    Err(e) => {
                        let kind = match action {
                            PendingAction::ReleasePhone(_) => ToastKind::Info,
                            _ => ToastKind::Error,
                        };
                        self.toasts.push(kind, e.display_or(REQUEST_FAILED));
                        Vec::new()
                    }
                }
            }
            Outcome::Created(record, result) => {
                let panel = record.panel();
                self.release(panel, Control::Create);
                match result {
                    Ok(()) => {
                        if let Some(message) = record.success_message() {
                            self.toasts.success(message);
                        }
                        self.reload(panel)
                    }
                    Err(e) => {
                        self.toasts.error(e.display_or(REQUEST_FAILED));
                        Vec::new()
                    }
                }
            }
            Outcome::Imported(target, result) => {
                let panel = target.panel();
                self.release(panel, Control::Import);
                match result {
                    Ok(outcome) => {
                        let kind = if outcome.is_partial() {
                            ToastKind::Info
                        } else {
                            ToastKind::Success
                        };
                        self.toasts.push(kind, outcome.message());
                        self.reload(panel)
                    }
                    Err(e) => {
                        self.toasts.error(e.display_or(REQUEST_FAILED));
                        Vec::new()
                    }
                }
            }
            Outcome::SmsCode(id, result) => {
                self.release(Panel::Phones, Control::SmsCode);
                match result.map(SmsCodeOutcome::from) {
                    Ok(SmsCodeOutcome::Code { code, message }) => {
                        debug!("SMS code received for phone {}", id);
                        self.modal.open(Modal::SmsCode { code, message });
                    }
                    Ok(SmsCodeOutcome::Waiting(message)) => {
                        self.toasts.info(message);
                    }
                    Err(e) => {
                        self.toasts.info(e.display_or(REQUEST_FAILED));
                    }
                }
                Vec::new()
            }
            Outcome::MailList {
                mailbox_id,
                generation,
                result,
            } => {
                match self.modal.viewer_mut() {
                    Some(viewer)
                        if viewer.generation() == generation && viewer.mailbox_id() == mailbox_id =>
                    {
                        viewer.apply(result);
                    }
                    _ => debug!(
                        "Dropping inbox for mailbox {} (viewer generation {} closed or replaced)",
                        mailbox_id, generation
                    ),
                }
                Vec::new()
            }
            Outcome::Exported(kind, result) => {
                let panel = match kind {
                    ExportKind::Accounts => Panel::Accounts,
                    ExportKind::Mailboxes => Panel::Emails,
                };
                self.release(panel, Control::Export);
                match result {
                    Ok(file) => {
                        if let Some(message) = file.message() {
                            self.toasts.success(message);
                        }
                        self.downloads.push(file);
                    }
                    Err(e) => {
                        self.toasts
                            .error(format!("导出失败：{}", e.display_or(REQUEST_FAILED)));
                    }
                }
                Vec::new()
            }
            Outcome::Dashboard(result) => {
                self.dashboard = Some(DashboardView::from_result(&result));
                Vec::new()
            }
            Outcome::Logs(result) => {
                self.logs = LogsView::from_result(&result);
                Vec::new()
            }
            Outcome::Settings(purpose, result) => {
                match (purpose, result) {
                    (SettingsPurpose::Form, Ok(settings)) => self.settings.apply(settings),
                    (SettingsPurpose::MailTypeDefault, Ok(settings)) => {
                        if let Some(mail_type) = settings.default_mail_type() {
                            self.email_provider.select_mail_type(mail_type);
                        }
                    }
                    (_, Err(e)) => warn!("Failed to load settings: {}", e),
                }
                Vec::new()
            }
            Outcome::SettingsSaved(result) => {
                self.release(Panel::Settings, Control::SaveSettings);
                match result {
                    Ok(()) => {
                        self.toasts.success(SAVED);
                    }
                    Err(e) => {
                        self.toasts.error(e.display_or(SAVE_FAILED));
                    }
                }
                Vec::new()
            }
            Outcome::LoginUpdated(result) => {
                self.release(Panel::Settings, Control::UpdateLogin);
                match result {
                    Ok(()) => {
                        self.toasts.success(LOGIN_UPDATED);
                        self.logout()
                    }
                    Err(e) => {
                        self.toasts.error(e.display_or(SAVE_FAILED));
                        Vec::new()
                    }
                }
            }
            Outcome::EmailBalance(result) => {
                self.email_provider.apply_balance(&result);
                Vec::new()
            }
            Outcome::EmailStock(result) => {
                self.release(Panel::Emails, Control::EmailStock);
                self.email_provider.apply_stock(&result);
                Vec::new()
            }
            Outcome::FetchMail(result) => {
                self.release(Panel::Emails, Control::FetchMail);
                if self.email_provider.apply_fetch(&result) {
                    self.reload(Panel::Emails)
                } else {
                    Vec::new()
                }
            }
            Outcome::SmsAvailability(result) => {
                self.sms_provider.apply_availability(&result);
                Vec::new()
            }
            Outcome::SmsBalance(result) => {
                self.release(Panel::Phones, Control::SmsBalance);
                self.sms_provider.apply_balance_test(&result);
                Vec::new()
            }
            Outcome::DebugPrices(result) => {
                self.release(Panel::Phones, Control::DebugPrices);
                match result {
                    Ok(availability) => {
                        self.sms_provider.message.clear();
                        let (title, body) = prices_notice(&availability);
                        self.modal.open(Modal::Notice { title, body });
                    }
                    Err(e) => self.sms_provider.apply_failure(&e),
                }
                Vec::new()
            }
            Outcome::Services(country, result) => {
                self.release(Panel::Phones, Control::Services);
                match result {
                    Ok(services) => {
                        let (title, body) = services_notice(country, &services);
                        self.modal.open(Modal::Notice { title, body });
                    }
                    Err(e) => self.sms_provider.apply_failure(&e),
                }
                Vec::new()
            }
            Outcome::GetNumbers(result) => {
                self.release(Panel::Phones, Control::GetNumbers);
                self.sms_provider.apply_acquire(&result);
                if result.is_ok() {
                    self.reload(Panel::Phones)
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Turn a list apply into follow-up work
    fn follow(&self, applied: Applied, kind: impl FnOnce(FetchTicket) -> JobKind) -> Vec<Job> {
        match applied {
            Applied::Refetch(ticket) => vec![self.job(kind(ticket))],
            Applied::Applied | Applied::Stale => Vec::new(),
        }
    }

    /// Mark a control busy. False when it already has a request in flight.
    fn acquire(&mut self, panel: Panel, control: Control) -> bool {
        if !self.busy.insert((panel, control)) {
            debug!("{:?}/{:?} already in flight, ignoring", panel, control);
            return false;
        }
        true
    }

    fn release(&mut self, panel: Panel, control: Control) {
        self.busy.remove(&(panel, control));
    }

    fn job(&self, kind: JobKind) -> Job {
        Job {
            epoch: self.epoch,
            kind,
        }
    }

    /// Run `jobs` and every follow-up to completion on the calling thread
    pub fn run_to_idle(&mut self, client: &SessionClient, jobs: Vec<Job>) {
        let mut queue: std::collections::VecDeque<Job> = jobs.into();
        while let Some(job) = queue.pop_front() {
            let completion = job.run(client);
            queue.extend(self.complete(completion));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryTokenStore;
    use crate::api::{ApiError, HttpRequest, HttpResponse, Transport};

    /// Transport that fails every request; for tests that never reach the network
    struct Offline;

    impl Transport for Offline {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("offline".to_string()))
        }
    }

    fn console(token: Option<&str>) -> (SessionClient, Console) {
        let store = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        };
        let client = SessionClient::new(Box::new(Offline), Box::new(store));
        let console = Console::new(&client);
        (client, console)
    }

    #[test]
    fn test_start_without_token_shows_login() {
        let (client, mut console) = console(None);
        assert!(console.start(&client).is_empty());
        assert_eq!(console.view(), &View::Login { error: None });
    }

    #[test]
    fn test_start_with_token_validates_and_loads_dashboard() {
        let (client, mut console) = console(Some("t"));
        let jobs = console.start(&client);
        assert_eq!(console.view(), &View::Admin);
        let kinds: Vec<_> = jobs.into_iter().map(|j| j.kind).collect();
        assert_eq!(kinds, vec![JobKind::Me, JobKind::Dashboard, JobKind::Logs]);
    }

    #[test]
    fn test_logout_event_resets_and_bumps_epoch() {
        let (client, mut console) = console(Some("t"));
        let stale = console.start(&client);
        client.logout();

        assert!(console.poll_session());
        assert_eq!(console.epoch(), 1);
        assert_eq!(console.view(), &View::Login { error: None });

        let completion = stale.into_iter().next().map(|j| j.run(&client));
        assert!(console.complete(completion.unwrap()).is_empty());
        assert_eq!(console.view(), &View::Login { error: None });
    }

    #[test]
    fn test_confirm_gates_destructive_actions() {
        let (client, mut console) = console(Some("t"));
        console.start(&client);
        console.show_panel(Panel::Emails);

        assert!(console.request_delete(7).is_empty());
        assert!(console.modal().is_open());

        assert!(console.resolve_confirm(ConfirmChoice::Cancel).is_empty());
        assert!(!console.modal().is_open());

        console.request_delete(7);
        let jobs = console.resolve_confirm(ConfirmChoice::Confirm);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].kind, JobKind::Mutate(PendingAction::DeleteMailbox(7)));
        assert!(console.is_busy(Panel::Emails, Control::DeleteRow));
    }

    #[test]
    fn test_busy_control_ignores_second_trigger() {
        let (client, mut console) = console(Some("t"));
        console.start(&client);
        assert_eq!(console.export_mailboxes().len(), 1);
        assert!(console.export_mailboxes().is_empty());
    }

    #[test]
    fn test_empty_batch_delete_toasts_without_dialog() {
        let (client, mut console) = console(Some("t"));
        console.start(&client);
        console.show_panel(Panel::Phones);

        assert!(console.request_batch_delete().is_empty());
        assert!(!console.modal().is_open());
        assert_eq!(console.toasts().last().unwrap().message, "请先勾选要删除的手机号");
    }

    #[test]
    fn test_update_login_validates_locally() {
        let (client, mut console) = console(Some("t"));
        console.start(&client);
        assert!(console.update_login("  ", "pw").is_empty());
        assert_eq!(console.toasts().last().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn test_unknown_account_filter_is_rejected() {
        let (client, mut console) = console(Some("t"));
        console.start(&client);
        assert!(console.set_account_filter("color", "red").is_empty());
        assert_eq!(console.set_account_filter("status", "active").len(), 1);
    }

    #[test]
    fn test_closing_confirm_declines() {
        let (client, mut console) = console(Some("t"));
        console.start(&client);
        console.request_release(3);
        console.close_modal();
        assert!(!console.modal().is_open());
        assert!(console.resolve_confirm(ConfirmChoice::Confirm).is_empty());
    }
}
