//! Fire-and-forget toasts
//!
//! Toasts stack, never block input, and expire on their own: visible for
//! [`DISPLAY_DURATION`], then fading for [`FADE_DURATION`], then removed.
//! Time is passed in explicitly so expiry is testable.

use std::time::{Duration, Instant};

pub const DISPLAY_DURATION: Duration = Duration::from_millis(2500);
pub const FADE_DURATION: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

/// A toast as drawn at a given instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub fading: bool,
}

#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast as of `now`
    pub fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) -> u64 {
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            kind,
            message: message.into(),
            shown_at: now,
        });
        self.next_id
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.push_at(kind, message, Instant::now())
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    /// Toasts still on screen at `now`, oldest first
    pub fn visible(&self, now: Instant) -> Vec<ToastView> {
        self.toasts
            .iter()
            .filter_map(|toast| {
                let age = now.saturating_duration_since(toast.shown_at);
                if age >= DISPLAY_DURATION + FADE_DURATION {
                    return None;
                }
                Some(ToastView {
                    id: toast.id,
                    kind: toast.kind,
                    message: toast.message.clone(),
                    fading: age >= DISPLAY_DURATION,
                })
            })
            .collect()
    }

    /// Drop toasts that have fully faded. Returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| {
            now.saturating_duration_since(toast.shown_at) < DISPLAY_DURATION + FADE_DURATION
        });
        before - self.toasts.len()
    }

    /// Every toast not yet pruned, oldest first
    pub fn all(&self) -> &[Toast] {
        &self.toasts
    }

    /// The most recent toast
    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}
