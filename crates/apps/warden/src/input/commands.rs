//! Command-line grammar
//!
//! One command per line; words are separated by whitespace. Commands that
//! act on rows take the row id shown in the first column.

use admin::viewer::MailTab;
use admin::{ImportTarget, Panel, Workflow};

/// What to add with `add`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddCommand {
    Mailbox {
        email: String,
        password: String,
        uuid: String,
        token: String,
    },
    Card {
        masked: String,
        max_use: u32,
    },
    Phone {
        phone: String,
        max_use: u32,
        remark: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Show,

    // Session
    Login { username: String, password: String },
    Logout,

    // Navigation and lists
    Go(Panel),
    Reload,
    Next,
    Prev,
    Filter { key: String, value: String },
    Toggle(i64),

    // Mutations
    Delete(i64),
    Release(i64),
    BatchDelete,
    Yes,
    No,
    Close,
    Import { target: ImportTarget, file: String },
    Add(AddCommand),
    Sms(i64),
    Export,

    // Mail viewer
    Mails(i64),
    Mail(usize),
    Tab(MailTab),
    Html,
    Recover,

    // Providers
    Stock,
    MailType(String),
    Fetch(u32),
    Summary,
    Balance,
    Prices,
    Services(u32),
    Numbers { country: u32, quantity: u32 },

    // Dashboard and settings
    Workflow(Workflow),
    Set { key: String, value: String },
    Save,
    Account { username: String, password: String },
}

/// Default SMS provider country code
const DEFAULT_COUNTRY: u32 = 0;

fn id(arg: Option<&str>) -> Result<i64, String> {
    let arg = arg.ok_or("missing row id")?;
    arg.parse().map_err(|_| format!("not a row id: {}", arg))
}

fn number<T: std::str::FromStr>(arg: Option<&str>, what: &str) -> Result<T, String> {
    let arg = arg.ok_or_else(|| format!("missing {}", what))?;
    arg.parse().map_err(|_| format!("not a valid {}: {}", what, arg))
}

fn word(arg: Option<&str>, what: &str) -> Result<String, String> {
    arg.map(str::to_string).ok_or_else(|| format!("missing {}", what))
}

fn import_target(arg: Option<&str>) -> Result<ImportTarget, String> {
    match arg {
        Some("emails") | Some("mailboxes") => Ok(ImportTarget::Mailboxes),
        Some("cards") => Ok(ImportTarget::BankCards),
        Some("phones") => Ok(ImportTarget::Phones),
        Some(other) => Err(format!("unknown import target: {}", other)),
        None => Err("missing import target (emails, cards, phones)".to_string()),
    }
}

fn add(words: &[&str]) -> Result<AddCommand, String> {
    let arg = |i: usize| words.get(i).copied();
    let rest = |i: usize| words.get(i..).map(|w| w.join(" ")).unwrap_or_default();
    match arg(0) {
        Some("mailbox") | Some("email") => Ok(AddCommand::Mailbox {
            email: word(arg(1), "email")?,
            password: arg(2).unwrap_or_default().to_string(),
            uuid: arg(3).unwrap_or_default().to_string(),
            token: arg(4).unwrap_or_default().to_string(),
        }),
        Some("card") => Ok(AddCommand::Card {
            masked: word(arg(1), "card number")?,
            max_use: arg(2).map(|_| number(arg(2), "use count")).transpose()?.unwrap_or(1),
        }),
        Some("phone") => Ok(AddCommand::Phone {
            phone: word(arg(1), "phone number")?,
            max_use: arg(2).map(|_| number(arg(2), "use count")).transpose()?.unwrap_or(1),
            remark: rest(3),
        }),
        Some(other) => Err(format!("cannot add {}", other)),
        None => Err("add what? (mailbox, card, phone)".to_string()),
    }
}

/// Parse one input line. Blank lines parse to `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Ok(None);
    };
    let arg = |i: usize| args.get(i).copied();

    let command = match head {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "show" | "ls" => Command::Show,

        "login" => Command::Login {
            username: word(arg(0), "username")?,
            password: word(arg(1), "password")?,
        },
        "logout" => Command::Logout,

        "go" => {
            let name = word(arg(0), "panel")?;
            Command::Go(Panel::from_slug(&name).ok_or_else(|| format!("unknown panel: {}", name))?)
        }
        "reload" | "r" => Command::Reload,
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "filter" => Command::Filter {
            key: word(arg(0), "filter key")?,
            value: arg(1).unwrap_or_default().to_string(),
        },
        "toggle" | "x" => Command::Toggle(id(arg(0))?),

        "delete" | "rm" => Command::Delete(id(arg(0))?),
        "release" => Command::Release(id(arg(0))?),
        "batch-delete" => Command::BatchDelete,
        "yes" | "y" => Command::Yes,
        "no" => Command::No,
        "close" | "esc" => Command::Close,
        "import" => Command::Import {
            target: import_target(arg(0))?,
            file: word(arg(1), "file")?,
        },
        "add" => Command::Add(add(args)?),
        "sms" => Command::Sms(id(arg(0))?),
        "export" => Command::Export,

        "mails" => Command::Mails(id(arg(0))?),
        "mail" => Command::Mail(number(arg(0), "mail number")?),
        "tab" => match arg(0) {
            Some("preview") => Command::Tab(MailTab::Preview),
            Some("raw") => Command::Tab(MailTab::Raw),
            _ => return Err("tab preview|raw".to_string()),
        },
        "html" => Command::Html,
        "recover" => Command::Recover,

        "stock" => Command::Stock,
        "type" => Command::MailType(args.join(" ")),
        "fetch" => Command::Fetch(number(arg(0), "quantity")?),
        "summary" => Command::Summary,
        "balance" => Command::Balance,
        "prices" => Command::Prices,
        "services" => Command::Services(
            arg(0).map(|_| number(arg(0), "country")).transpose()?.unwrap_or(DEFAULT_COUNTRY),
        ),
        "numbers" => Command::Numbers {
            country: number(arg(0), "country")?,
            quantity: arg(1).map(|_| number(arg(1), "quantity")).transpose()?.unwrap_or(1),
        },

        "workflow" => match arg(0) {
            Some("register") => Command::Workflow(Workflow::Register),
            Some("bind") => Command::Workflow(Workflow::BindPhone),
            Some("plus") => Command::Workflow(Workflow::UpgradePlus),
            _ => return Err("workflow register|bind|plus".to_string()),
        },
        "set" => Command::Set {
            key: word(arg(0), "setting key")?,
            value: args.get(1..).map(|w| w.join(" ")).unwrap_or_default(),
        },
        "save" => Command::Save,
        "account" => Command::Account {
            username: word(arg(0), "username")?,
            password: word(arg(1), "password")?,
        },

        other => return Err(format!("unknown command: {} (try help)", other)),
    };
    Ok(Some(command))
}
