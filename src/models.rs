//! Frontend Models
//!
//! UI-only types. Board data structures come from `board_core`.

use board_core::{DomainError, SyncEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One message in the notice bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u32,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// Text for a sync outcome. Routine saves show nothing.
    pub fn describe(event: &SyncEvent) -> Option<(NoticeLevel, String)> {
        match event {
            SyncEvent::Saved { .. } => None,
            SyncEvent::Created { .. } => Some((NoticeLevel::Info, "Task added".to_string())),
            SyncEvent::Deleted { .. } => Some((NoticeLevel::Info, "Task deleted".to_string())),
            SyncEvent::Restored { applied: 0 } => None,
            SyncEvent::Restored { applied } => Some((
                NoticeLevel::Info,
                format!("Restored {} card position(s) from this browser", applied),
            )),
            SyncEvent::Failed { error, .. } => Some((NoticeLevel::Error, failure_text(error))),
        }
    }
}

fn failure_text(error: &DomainError) -> String {
    match error {
        DomainError::Network(_) => {
            "Could not reach the board server, the change is only on this page".to_string()
        }
        DomainError::NotFound(_) => "That task no longer exists".to_string(),
        DomainError::InvalidInput(msg) => msg.clone(),
        other => other.to_string(),
    }
}
