//! Blocking confirmation dialog

/// How the user closed a confirm dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    Confirm,
    Cancel,
    /// Closed without choosing (backdrop click, close button, Esc)
    Dismiss,
}

/// A question guarding `action`. Only an explicit confirm releases it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog<A> {
    message: String,
    action: A,
}

impl<A> ConfirmDialog<A> {
    pub fn new(message: impl Into<String>, action: A) -> Self {
        Self {
            message: message.into(),
            action,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    /// Resolve the dialog, consuming it
    pub fn resolve(self, choice: ConfirmChoice) -> Option<A> {
        match choice {
            ConfirmChoice::Confirm => Some(self.action),
            ConfirmChoice::Cancel | ConfirmChoice::Dismiss => None,
        }
    }
}
