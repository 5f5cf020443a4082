//! User-facing notifications.
//!
//! A sink receives progress messages while a run is underway and exactly one
//! outcome message when it ends. Sinks never influence control flow.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Intermediate status while a run is in progress.
    Progress,
    /// Terminal result of a run.
    Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn progress(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Progress,
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn outcome(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Outcome,
            severity,
            message: message.into(),
        }
    }
}

/// Receives notifications. Fire-and-forget.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints notifications to the terminal and mirrors them into the log.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => {
                tracing::info!(kind = ?notification.kind, "{}", notification.message);
                println!("{}", notification.message);
            }
            Severity::Warning => {
                tracing::warn!(kind = ?notification.kind, "{}", notification.message);
                eprintln!("warning: {}", notification.message);
            }
            Severity::Error => {
                tracing::error!(kind = ?notification.kind, "{}", notification.message);
                eprintln!("error: {}", notification.message);
            }
        }
    }
}

/// Keeps every notification in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    received: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Only the terminal notifications.
    pub fn outcomes(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.kind == NotificationKind::Outcome)
            .collect()
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, notification: Notification) {
        if let Ok(mut guard) = self.received.lock() {
            guard.push(notification);
        }
    }
}
