//! Transient on-screen notifications

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Info,
}

impl NotificationKind {
    pub fn background(&self) -> &'static str {
        match self {
            NotificationKind::Success => "linear-gradient(135deg, #10b981, #059669)",
            NotificationKind::Info => "linear-gradient(135deg, #3b82f6, #1d4ed8)",
        }
    }
}

/// A notification currently on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
}

/// Shows notifications and removes each one after the display time
#[derive(Debug)]
pub struct NotificationCenter {
    view: Arc<dyn View>,
    display_for: Duration,
    next_id: AtomicU64,
    cancel: CancellationToken,
}

impl NotificationCenter {
    pub fn new(view: Arc<dyn View>, display_for: Duration, cancel: CancellationToken) -> Self {
        Self {
            view,
            display_for,
            next_id: AtomicU64::new(1),
            cancel,
        }
    }

    pub fn display_for(&self) -> Duration {
        self.display_for
    }

    /// Show a notification and schedule its removal.
    ///
    /// Must be called from within a Tokio runtime. A cancelled token skips
    /// the removal.
    pub fn show(&self, message: &str, kind: NotificationKind) -> NotificationId {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id,
            message: message.to_string(),
            kind,
        };
        tracing::debug!("Showing notification {:?}: {}", id, message);
        self.view.show_notification(&notification);
        self.view.commit();

        let view = Arc::clone(&self.view);
        let cancel = self.cancel.clone();
        let display_for = self.display_for;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(display_for) => {
                    view.remove_notification(id);
                    view.commit();
                    tracing::debug!("Removed notification {:?}", id);
                }
                _ = cancel.cancelled() => {}
            }
        });

        id
    }
}
