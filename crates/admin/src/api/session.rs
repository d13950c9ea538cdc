//! Session token ownership and persistence
//!
//! The session is the client's belief about whether it holds a valid bearer
//! token. It is created from persisted storage at startup, set on login and
//! cleared on logout or any 401 from an authenticated call. Every transition
//! is broadcast to subscribers as a [`SessionEvent`].

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, RwLock};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Session token filename in the Warden config directory
const SESSION_FILE: &str = "session.json";

/// Session lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { username: String },
    /// User-initiated logout
    LoggedOut,
    /// A 401 on an authenticated call tore the session down
    Expired,
}

/// Persistent storage for the bearer token
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// On-disk token format
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// Token store backed by a JSON file (~/.config/warden/session.json)
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Token store at the default location in the Warden config directory
    pub fn default_location() -> Result<Self> {
        let path = config::config_path(SESSION_FILE).context("Could not determine config directory")?;
        Ok(Self::new(path))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let stored: StoredSession = config::load_json_file(&self.path).ok()?;
        if stored.token.is_empty() {
            None
        } else {
            Some(stored.token)
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        config::save_json_file(
            &self.path,
            &StoredSession {
                token: token.to_string(),
            },
        )
    }

    fn clear(&self) -> Result<()> {
        config::remove_file(&self.path)
    }
}

/// In-memory token store, for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
        Ok(())
    }
}

/// The process-wide session: one token, one persistent store, many subscribers
pub struct Session {
    token: RwLock<Option<String>>,
    store: Box<dyn TokenStore>,
    subscribers: Mutex<Vec<Sender<SessionEvent>>>,
}

impl Session {
    /// Restore the session from persistent storage
    pub fn restore(store: Box<dyn TokenStore>) -> Self {
        let token = store.load();
        debug!("Session restored (token present: {})", token.is_some());
        Self {
            token: RwLock::new(token),
            store,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    pub fn has_token(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    /// Store a freshly issued token
    pub(crate) fn establish(&self, token: String, username: String) {
        if let Err(e) = self.store.save(&token) {
            warn!("Failed to persist session token: {}", e);
        }
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
        self.publish(SessionEvent::LoggedIn { username });
    }

    /// Clear the token because the backend rejected it, but only if
    /// `rejected` is still the held token.
    ///
    /// A 401 for a request sent with an older token, or with none, leaves a
    /// newer session alone. Returns whether the session was expired.
    pub(crate) fn expire(&self, rejected: Option<&str>) -> bool {
        let Some(rejected) = rejected else {
            return false;
        };
        {
            let Ok(mut guard) = self.token.write() else {
                return false;
            };
            if guard.as_deref() != Some(rejected) {
                debug!("Ignoring 401 for a token that is no longer held");
                return false;
            }
            *guard = None;
        }
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear persisted session token: {}", e);
        }
        self.publish(SessionEvent::Expired);
        true
    }

    /// Clear the token at the user's request
    pub(crate) fn end(&self) {
        self.clear_token();
        self.publish(SessionEvent::LoggedOut);
    }

    fn clear_token(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear persisted session token: {}", e);
        }
    }

    fn publish(&self, event: SessionEvent) {
        debug!("Session event: {:?}", event);
        if let Ok(mut subs) = self.subscribers.lock() {
            // Receivers that were dropped are pruned here
            subs.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}
