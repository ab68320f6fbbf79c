use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;
use sweep_config::SweepConfig;
use sweep_core::CleanupStats;
use sweep_notify::{notify_best_effort, Notifier, SmtpNotifier};
use sweep_scan::Scanner;
use tracing::{error, info, warn};

use crate::summary::{failure_notification, RunSummary};

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub config_path: PathBuf,
    /// Attached to every notification.
    pub log_file: Option<PathBuf>,
    pub dry_run: bool,
    pub send_email: bool,
}

impl RunOptions {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self { config_path: config_path.into(), log_file: None, dry_run: false, send_email: true }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(CleanupStats),
    Failed(anyhow::Error),
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Completed(_) => 0,
            RunOutcome::Failed(_) => 1,
        }
    }

    pub fn stats(&self) -> Option<&CleanupStats> {
        match self {
            RunOutcome::Completed(stats) => Some(stats),
            RunOutcome::Failed(_) => None,
        }
    }

    /// Plain `Result` view, for callers that only care about fatal errors.
    pub fn into_result(self) -> Result<CleanupStats> {
        match self {
            RunOutcome::Completed(stats) => Ok(stats),
            RunOutcome::Failed(e) => Err(e),
        }
    }
}

pub struct Runner {
    pub options: RunOptions,
    notifier: Option<Box<dyn Notifier>>,
}

impl Runner {
    pub fn new(options: RunOptions) -> Self {
        Self { options, notifier: None }
    }

    /// Use `notifier` instead of building an SMTP client from the config.
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Write an example config unless one already exists. Returns whether a file was written.
    pub fn init_config(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        SweepConfig::example().save_to(path)?;
        Ok(true)
    }

    /// The whole job: load config, scan and delete, report. Never panics, never returns early
    /// without logging "Execution completed".
    pub fn run(mut self) -> RunOutcome {
        let started = Instant::now();
        info!(
            "Starting file retention cleanup (config: {}, dry run: {})",
            self.options.config_path.display(),
            self.options.dry_run
        );

        let mut notifier: Option<Box<dyn Notifier>> = None;
        let outcome = match self.execute(started, &mut notifier) {
            Ok(stats) => RunOutcome::Completed(stats),
            Err(e) => {
                error!("Cleanup failed: {:?}", e);
                match notifier.as_deref() {
                    Some(n) => {
                        let mail = failure_notification(&e, Local::now(), self.options.log_file.clone());
                        notify_best_effort(n, &mail);
                    }
                    None => warn!("Failure email not sent: no notifier is configured"),
                }
                RunOutcome::Failed(e)
            }
        };

        info!("Execution completed");
        outcome
    }

    fn execute(&mut self, started: Instant, notifier: &mut Option<Box<dyn Notifier>>) -> Result<CleanupStats> {
        let cfg = SweepConfig::load_from(&self.options.config_path).context("load configuration")?;

        if cfg.email.enabled {
            let password = cfg.email.decode_credential().context("decode email credential")?;
            if self.options.send_email {
                let chosen: Box<dyn Notifier> = match self.notifier.take() {
                    Some(n) => n,
                    None => Box::new(SmtpNotifier::new(cfg.email.clone(), password)),
                };
                *notifier = Some(chosen);
            } else {
                info!("Email notification suppressed on the command line");
            }
        } else {
            info!("Email notification disabled in configuration");
        }

        let rules = cfg.rule_set()?;
        let root = cfg.root_path();
        info!("Scanning {} with {} rule(s), default retention {} days", root.display(), rules.len(), rules.default_days());

        let stats = Scanner::new()
            .dry_run(self.options.dry_run)
            .run(&root, &rules)
            .with_context(|| format!("scan {}", root.display()))?;

        let summary = RunSummary {
            stats,
            dry_run: self.options.dry_run,
            elapsed: started.elapsed(),
            finished_at: Local::now(),
        };
        info!("{}", summary.log_line());

        if let Some(n) = notifier.as_deref() {
            notify_best_effort(n, &summary.notification(self.options.log_file.clone()));
        }

        if stats.errors > 0 {
            warn!("{} file(s) could not be deleted", stats.errors);
        }
        Ok(stats)
    }
}
