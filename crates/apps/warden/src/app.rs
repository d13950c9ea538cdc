//! Main application loop
//!
//! Reads commands from stdin, runs backend jobs on the blocking pool and
//! feeds their completions back into the console. The screen is redrawn
//! after every change.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use admin::notify::ConfirmChoice;
use admin::viewer::RECOVERY_URL;
use admin::{
    Completion, Console, Job, NewBankCard, NewMailbox, NewPhone, NewRecord, Panel,
    SessionClient,
};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::input::{AddCommand, Command, parse, render_help};
use crate::templates::mail_html;
use crate::views::render;

/// How often toasts are expired and session events checked
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Preview file written for `html`, in the config directory
const PREVIEW_FILE: &str = "preview.html";

pub struct WardenApp {
    client: Arc<SessionClient>,
    console: Console,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: Option<UnboundedReceiver<Completion>>,
    /// Where exports are saved
    download_dir: PathBuf,
}

impl WardenApp {
    pub fn new(client: SessionClient, download_dir: PathBuf) -> Self {
        let console = Console::new(&client);
        let (completions_tx, completions_rx) = unbounded_channel();
        Self {
            client: Arc::new(client),
            console,
            completions_tx,
            completions_rx: Some(completions_rx),
            download_dir,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut completions = self
            .completions_rx
            .take()
            .context("Application loop already running")?;

        let jobs = self.console.start(&self.client);
        self.spawn(jobs);
        self.redraw();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = tokio::time::interval(TICK_INTERVAL);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line.context("Failed to read stdin")? {
                        Some(line) => {
                            if !self.handle_line(&line) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                Some(completion) = completions.recv() => {
                    let jobs = self.console.complete(completion);
                    self.spawn(jobs);
                    self.save_downloads();
                    self.redraw();
                }
                _ = ticker.tick() => {
                    let before = (self.console.toasts().len(), self.console.epoch());
                    self.console.tick(Instant::now());
                    if before != (self.console.toasts().len(), self.console.epoch()) {
                        self.redraw();
                    }
                }
            }
        }

        info!("Warden exiting");
        Ok(())
    }

    /// Run jobs on the blocking pool
    fn spawn(&self, jobs: Vec<Job>) {
        for job in jobs {
            let client = Arc::clone(&self.client);
            let tx = self.completions_tx.clone();
            tokio::task::spawn_blocking(move || {
                let completion = job.run(&client);
                if tx.send(completion).is_err() {
                    debug!("Application loop gone, dropping completion");
                }
            });
        }
    }

    fn redraw(&self) {
        let screen = render(&self.console, Instant::now());
        let mut stdout = std::io::stdout();
        if let Err(e) = write!(stdout, "\n{}\n> ", screen).and_then(|()| stdout.flush()) {
            debug!("Failed to draw screen: {}", e);
        }
    }

    /// Handle one input line. Returns false to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        let command = match parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => {
                self.redraw();
                return true;
            }
            Err(message) => {
                println!("{}", message);
                return true;
            }
        };

        match command {
            Command::Quit => return false,
            Command::Help => {
                println!("{}", render_help());
                return true;
            }
            command => match self.dispatch(command) {
                Ok(jobs) => self.spawn(jobs),
                Err(e) => {
                    warn!("Command failed: {:#}", e);
                    println!("{:#}", e);
                }
            },
        }
        self.redraw();
        true
    }

    fn dispatch(&mut self, command: Command) -> Result<Vec<Job>> {
        let console = &mut self.console;
        let jobs = match command {
            Command::Help | Command::Quit | Command::Show => Vec::new(),

            Command::Login { username, password } => console.login(&username, &password),
            Command::Logout => console.logout(),

            Command::Go(panel) => console.show_panel(panel),
            Command::Reload => match console.panel() {
                Panel::Dashboard => console.refresh_dashboard(),
                panel @ (Panel::Emails | Panel::Phones | Panel::Settings) => console.show_panel(panel),
                panel => console.reload(panel),
            },
            Command::Next => console.page(1),
            Command::Prev => console.page(-1),
            Command::Filter { key, value } => console.set_account_filter(&key, &value),
            Command::Toggle(id) => {
                if console.toggle_selection(id).is_none() {
                    anyhow::bail!("No row {} to tick on this page", id);
                }
                Vec::new()
            }

            Command::Delete(id) => console.request_delete(id),
            Command::Release(id) => console.request_release(id),
            Command::BatchDelete => console.request_batch_delete(),
            Command::Yes => console.resolve_confirm(ConfirmChoice::Confirm),
            Command::No => console.resolve_confirm(ConfirmChoice::Cancel),
            Command::Close => {
                console.close_modal();
                Vec::new()
            }
            Command::Import { target, file } => {
                let lines = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read import file {}", file))?;
                info!("Importing {:?} from {}", target, file);
                console.import(target, &lines)
            }
            Command::Add(add) => console.create(new_record(add)),
            Command::Sms(id) => console.read_sms_code(id),
            Command::Export => match console.panel() {
                Panel::Accounts => console.export_accounts(),
                Panel::Emails => console.export_mailboxes(),
                _ => anyhow::bail!("Export works on the accounts and emails panels"),
            },

            Command::Mails(id) => console.open_viewer(id),
            Command::Mail(index) => {
                console.select_mail(index);
                Vec::new()
            }
            Command::Tab(tab) => {
                console.set_mail_tab(tab);
                Vec::new()
            }
            Command::Html => {
                self.open_selected_mail()?;
                Vec::new()
            }
            Command::Recover => {
                open::that(RECOVERY_URL).context("Failed to open browser")?;
                Vec::new()
            }

            Command::Stock => console.query_email_stock(),
            Command::MailType(mail_type) => {
                if !console.select_mail_type(&mail_type) {
                    anyhow::bail!("Unknown mail type: {}", mail_type);
                }
                Vec::new()
            }
            Command::Fetch(quantity) => console.fetch_mail(quantity),
            Command::Summary => console.refresh_sms_summary(),
            Command::Balance => console.test_sms_balance(),
            Command::Prices => console.debug_prices(),
            Command::Services(country) => console.list_services(country),
            Command::Numbers { country, quantity } => console.get_numbers(country, quantity),

            Command::Workflow(workflow) => {
                console.start_workflow(workflow);
                Vec::new()
            }
            Command::Set { key, value } => {
                if !console.set_setting(&key, &value) {
                    anyhow::bail!("Unknown setting: {}", key);
                }
                Vec::new()
            }
            Command::Save => console.save_settings(),
            Command::Account { username, password } => console.update_login(&username, &password),
        };
        Ok(jobs)
    }

    /// Write the selected mail to an HTML file and open it in the browser
    fn open_selected_mail(&self) -> Result<()> {
        let viewer = self.console.modal().viewer().context("No mailbox is open")?;
        let mail = viewer.selected().context("No mail selected")?;
        let html = mail_html(&viewer.render().mailbox_email, mail);

        let path = config::config_path(PREVIEW_FILE).context("Could not determine config directory")?;
        std::fs::write(&path, html)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        open::that(&path).context("Failed to open browser")?;
        Ok(())
    }

    /// Save finished exports to the download directory
    fn save_downloads(&mut self) {
        for file in self.console.take_downloads() {
            let path = self.download_dir.join(&file.filename);
            match std::fs::write(&path, &file.contents) {
                Ok(()) => info!("Saved {:?} export to {}", file.kind, path.display()),
                Err(e) => {
                    error!("Failed to save {}: {}", path.display(), e);
                    self.console.report_error(format!("导出失败：{}", e));
                }
            }
        }
    }
}

fn new_record(add: AddCommand) -> NewRecord {
    match add {
        AddCommand::Mailbox {
            email,
            password,
            uuid,
            token,
        } => NewRecord::Mailbox(NewMailbox {
            email,
            password,
            uuid,
            token,
            remark: String::new(),
        }),
        AddCommand::Card { masked, max_use } => {
            NewRecord::BankCard(NewBankCard::masked(masked, max_use, ""))
        }
        AddCommand::Phone {
            phone,
            max_use,
            remark,
        } => NewRecord::Phone(NewPhone {
            phone,
            max_use_count: max_use.max(1),
            remark,
        }),
    }
}
