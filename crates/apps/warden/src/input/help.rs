//! Command reference shown by `help`

/// A group of related commands for display
pub struct CommandCategory {
    pub name: &'static str,
    pub commands: Vec<CommandHelp>,
}

/// A single command for display
pub struct CommandHelp {
    pub usage: &'static str,
    pub description: &'static str,
}

fn cmd(usage: &'static str, description: &'static str) -> CommandHelp {
    CommandHelp { usage, description }
}

pub fn command_help() -> Vec<CommandCategory> {
    vec![
        CommandCategory {
            name: "Session",
            commands: vec![
                cmd("login <user> <pass>", "Sign in"),
                cmd("logout", "Sign out"),
                cmd("quit", "Exit Warden"),
            ],
        },
        CommandCategory {
            name: "Navigation",
            commands: vec![
                cmd("go <dashboard|accounts|emails|cards|phones|settings>", "Switch panel"),
                cmd("reload / r", "Reload the current panel"),
                cmd("next / n, prev / p", "Change page"),
                cmd("filter <key> [value]", "Filter accounts (status, has_sora, has_plus, phone_bound)"),
                cmd("show", "Redraw the screen"),
            ],
        },
        CommandCategory {
            name: "Rows",
            commands: vec![
                cmd("toggle / x <id>", "Tick a card or phone for batch delete"),
                cmd("delete <id>", "Delete a mailbox, card or phone"),
                cmd("release <id>", "Release a phone number at the provider"),
                cmd("batch-delete", "Delete every ticked row"),
                cmd("yes / no", "Answer the confirm dialog"),
                cmd("add mailbox <email> [pass] [uuid] [token]", "Add a mailbox"),
                cmd("add card <number> [max]", "Add a bank card"),
                cmd("add phone <number> [max] [remark]", "Add a phone number"),
                cmd("import <emails|cards|phones> <file>", "Import one record per line"),
                cmd("export", "Export accounts or mailboxes to a file"),
                cmd("sms <id>", "Read the SMS code for a phone"),
            ],
        },
        CommandCategory {
            name: "Mail",
            commands: vec![
                cmd("mails <id>", "Open a mailbox's inbox"),
                cmd("mail <n>", "Select a mail"),
                cmd("tab <preview|raw>", "Switch the detail tab"),
                cmd("html", "Open the selected mail in the browser"),
                cmd("recover", "Open Outlook to see every mail"),
                cmd("close", "Close the open dialog"),
            ],
        },
        CommandCategory {
            name: "Providers",
            commands: vec![
                cmd("type <mail type>", "Choose the mail type to buy"),
                cmd("stock", "Query mail stock"),
                cmd("fetch <n>", "Buy n mailboxes and import them"),
                cmd("summary", "Refresh SMS balance and OpenAI stock"),
                cmd("balance", "Test the SMS provider"),
                cmd("prices", "Show the raw price table"),
                cmd("services [country]", "List provider services"),
                cmd("numbers <country> [n]", "Buy phone numbers"),
            ],
        },
        CommandCategory {
            name: "Settings",
            commands: vec![
                cmd("set <key> <value>", "Edit a setting"),
                cmd("save", "Save settings"),
                cmd("account <user> <pass>", "Change the console login"),
                cmd("workflow <register|bind|plus>", "Start a workflow"),
            ],
        },
    ]
}

/// Help text, one aligned line per command
pub fn render_help() -> String {
    let categories = command_help();
    let width = categories
        .iter()
        .flat_map(|c| c.commands.iter())
        .map(|c| c.usage.len())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for category in &categories {
        lines.push(format!("{}:", category.name));
        for command in &category.commands {
            lines.push(format!(
                "  {:<width$}  {}",
                command.usage,
                command.description,
                width = width
            ));
        }
    }
    lines.join("\n")
}
