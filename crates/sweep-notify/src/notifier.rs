use std::path::PathBuf;

use tracing::{error, info};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    /// Attached as-is when readable; the mail still goes out without it otherwise.
    pub attachment: Option<PathBuf>,
}

pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Send and swallow any failure. The return value is only for logging and tests.
pub fn notify_best_effort(notifier: &dyn Notifier, notification: &Notification) -> bool {
    match notifier.send(notification) {
        Ok(()) => {
            info!("Notification sent: {}", notification.subject);
            true
        }
        Err(e) => {
            error!("Failed to send notification email: {:#}", e);
            false
        }
    }
}
