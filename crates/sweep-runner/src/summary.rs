use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use sweep_core::{format_size, CleanupStats};
use sweep_notify::Notification;

const JOB_NAME: &str = "File retention cleanup";
const FINISHED_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

#[derive(Clone, Debug)]
pub struct RunSummary {
    pub stats: CleanupStats,
    pub dry_run: bool,
    pub elapsed: Duration,
    pub finished_at: DateTime<Local>,
}

impl RunSummary {
    pub fn subject(&self) -> String {
        let outcome = match (self.dry_run, self.stats.is_clean()) {
            (true, _) => "dry run",
            (false, true) => "success",
            (false, false) => "completed with errors",
        };
        format!("{}: {}", JOB_NAME, outcome)
    }

    pub fn body(&self) -> String {
        let verb = if self.dry_run { "Files that would be deleted" } else { "Deleted files" };
        format!(
            "{} completed at {}{}.\n\n{}: {}\nSpace reclaimed: {}\nErrors: {}\nDuration: {:.2}s\n",
            JOB_NAME,
            self.finished_at.format(FINISHED_FORMAT),
            if self.dry_run { " (dry run, nothing was deleted)" } else { "" },
            verb,
            self.stats.deleted_files,
            format_size(self.stats.total_bytes_reclaimed),
            self.stats.errors,
            self.elapsed.as_secs_f64(),
        )
    }

    pub fn log_line(&self) -> String {
        format!(
            "Cleanup summary: deleted={} reclaimed={} errors={} duration={:.2}s{}",
            self.stats.deleted_files,
            format_size(self.stats.total_bytes_reclaimed),
            self.stats.errors,
            self.elapsed.as_secs_f64(),
            if self.dry_run { " (dry run)" } else { "" },
        )
    }

    pub fn notification(&self, attachment: Option<PathBuf>) -> Notification {
        Notification { subject: self.subject(), body: self.body(), attachment }
    }
}

pub fn failure_notification(error: &anyhow::Error, at: DateTime<Local>, attachment: Option<PathBuf>) -> Notification {
    Notification {
        subject: format!("{}: FAILED", JOB_NAME),
        body: format!(
            "{} failed at {}.\n\nError: {:#}\n\nSee the attached log for details.\n",
            JOB_NAME,
            at.format(FINISHED_FORMAT),
            error
        ),
        attachment,
    }
}
