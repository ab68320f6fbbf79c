use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use anyhow::anyhow;
use sweep_core::CleanupStats;
use sweep_log::{LogFile, LogFileLayer, LogSettings};
use sweep_notify::{Notification, Notifier};
use sweep_runner::{check, RunOptions, RunOutcome, Runner};
use tempfile::{tempdir, TempDir};
use tracing_subscriber::prelude::*;

const DAY: u64 = 24 * 60 * 60;

#[derive(Clone, Default)]
struct Recorder {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl Notifier for Recorder {
    fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(anyhow!("smtp unreachable"));
        }
        Ok(())
    }
}

impl Recorder {
    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let f = Self { dir: tempdir().unwrap() };
        fs::create_dir_all(f.root()).unwrap();
        f
    }

    fn root(&self) -> PathBuf {
        self.dir.path().join("root")
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("sweep.toml")
    }

    fn log(&self) -> PathBuf {
        self.dir.path().join("sweep.log")
    }

    fn write_config(&self, root: &Path, credential: &str, email_enabled: bool) {
        let body = format!(
            r#"root_path = "{}"

[email]
smtp_host = "smtp.example.com"
from = "sweep@example.com"
to = "ops@example.com"
credential = "{}"
enabled = {}

[[rules]]
pattern = "logs/*"
retention_days = 180
"#,
            root.display(),
            credential,
            email_enabled
        );
        fs::write(self.config(), body).unwrap();
    }

    fn touch(&self, rel: &str, body: &[u8], age_days: u64) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        let f = OpenOptions::new().write(true).open(&path).unwrap();
        f.set_modified(SystemTime::now() - Duration::from_secs(age_days * DAY)).unwrap();
        path
    }

    fn options(&self) -> RunOptions {
        let mut o = RunOptions::new(self.config());
        o.log_file = Some(self.log());
        o
    }

    /// Run with the pipe-delimited log layer installed; returns the outcome and the log text.
    fn run_logged(&self, runner: Runner) -> (RunOutcome, String) {
        let file = LogFile::new(LogSettings::new(self.log()));
        file.initialize().unwrap();
        let subscriber = tracing_subscriber::registry().with(LogFileLayer::new(file));
        let outcome = tracing::subscriber::with_default(subscriber, || runner.run());
        (outcome, fs::read_to_string(self.log()).unwrap())
    }
}

#[test]
fn end_to_end_deletes_expired_and_reports() {
    let fx = Fixture::new();
    fx.write_config(&fx.root(), "c2VjcmV0", true);
    let app = fx.touch("logs/app.log", b"application log line\n", 181);
    let keep = fx.touch("data/keep.txt", b"keep me", 10);
    let app_size = fs::metadata(&app).unwrap().len();
    let recorder = Recorder::default();

    let (outcome, log) = fx.run_logged(Runner::new(fx.options()).with_notifier(Box::new(recorder.clone())));

    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(
        outcome.stats(),
        Some(&CleanupStats { deleted_files: 1, total_bytes_reclaimed: app_size, errors: 0 })
    );
    assert!(!app.exists());
    assert!(keep.exists());

    let sent = recorder.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "File retention cleanup: success");
    assert!(sent[0].body.contains("Deleted files: 1"));
    assert_eq!(sent[0].attachment.as_deref(), Some(fx.log().as_path()));

    let deleted = format!("|INFO|Deleted {} (age: 181 days, size: 21 bytes)", app.display());
    assert!(log.contains(&deleted), "missing {deleted:?} in:\n{log}");
    assert!(!log.contains("keep.txt"));
    assert!(log.lines().last().unwrap().ends_with("|INFO|Execution completed"));
}

#[test]
fn dry_run_keeps_everything() {
    let fx = Fixture::new();
    fx.write_config(&fx.root(), "c2VjcmV0", true);
    let app = fx.touch("logs/app.log", b"x", 400);
    let recorder = Recorder::default();

    let mut options = fx.options();
    options.dry_run = true;
    let stats = Runner::new(options)
        .with_notifier(Box::new(recorder.clone()))
        .run()
        .into_result()
        .unwrap();

    assert!(app.exists());
    assert_eq!(stats.deleted_files, 1);
    assert_eq!(recorder.sent()[0].subject, "File retention cleanup: dry run");
}

#[test]
fn missing_config_fails_without_email() {
    let fx = Fixture::new();
    let recorder = Recorder::default();

    let outcome = Runner::new(fx.options()).with_notifier(Box::new(recorder.clone())).run();

    assert_eq!(outcome.exit_code(), 1);
    assert!(matches!(outcome, RunOutcome::Failed(_)));
    assert!(recorder.sent().is_empty());
}

#[test]
fn undecodable_credential_is_fatal() {
    let fx = Fixture::new();
    fx.write_config(&fx.root(), "%%% not base64 %%%", true);
    let app = fx.touch("logs/app.log", b"x", 400);
    let recorder = Recorder::default();

    let outcome = Runner::new(fx.options()).with_notifier(Box::new(recorder.clone())).run();

    assert_eq!(outcome.exit_code(), 1);
    // nothing scanned
    assert!(app.exists());
    let err = outcome.into_result().unwrap_err();
    assert!(format!("{:#}", err).contains("decode email credential"));
}

#[test]
fn missing_root_fails_and_sends_failure_email() {
    let fx = Fixture::new();
    fx.write_config(&fx.dir.path().join("does-not-exist"), "c2VjcmV0", true);
    let recorder = Recorder::default();

    let (outcome, log) = fx.run_logged(Runner::new(fx.options()).with_notifier(Box::new(recorder.clone())));

    assert_eq!(outcome.exit_code(), 1);
    let sent = recorder.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "File retention cleanup: FAILED");
    assert!(sent[0].body.contains("root path does not exist"));

    assert!(log.contains("|ERROR|"));
    assert!(log.lines().last().unwrap().ends_with("|INFO|Execution completed"));
}

#[test]
fn notification_failure_does_not_fail_the_run() {
    let fx = Fixture::new();
    fx.write_config(&fx.root(), "c2VjcmV0", true);
    fx.touch("logs/app.log", b"x", 181);
    let recorder = Recorder { fail: true, ..Recorder::default() };

    let outcome = Runner::new(fx.options()).with_notifier(Box::new(recorder.clone())).run();

    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(recorder.sent().len(), 1);
}

#[test]
fn disabled_email_sends_nothing() {
    let fx = Fixture::new();
    fx.write_config(&fx.root(), "", false);
    let recorder = Recorder::default();

    let outcome = Runner::new(fx.options()).with_notifier(Box::new(recorder.clone())).run();

    assert_eq!(outcome.exit_code(), 0);
    assert!(recorder.sent().is_empty());
}

#[test]
fn no_email_flag_suppresses_sending() {
    let fx = Fixture::new();
    fx.write_config(&fx.root(), "c2VjcmV0", true);
    let recorder = Recorder::default();

    let mut options = fx.options();
    options.send_email = false;
    let outcome = Runner::new(options).with_notifier(Box::new(recorder.clone())).run();

    assert_eq!(outcome.exit_code(), 0);
    assert!(recorder.sent().is_empty());
}

#[test]
fn check_reports_valid_setup() {
    let fx = Fixture::new();
    fx.write_config(&fx.root(), "c2VjcmV0", true);

    let report = check(&fx.config()).unwrap();

    assert_eq!(report.root, fx.root());
    assert_eq!(report.rules, 1);
    assert_eq!(report.default_retention_days, 180);
    assert!(report.email_enabled);
}

#[test]
fn check_rejects_missing_root() {
    let fx = Fixture::new();
    fx.write_config(&fx.dir.path().join("nope"), "c2VjcmV0", true);
    assert!(check(&fx.config()).is_err());
}

#[test]
fn init_writes_example_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sweep.toml");
    assert!(Runner::init_config(&path).unwrap());
    assert!(!Runner::init_config(&path).unwrap());
    let cfg = sweep_config::SweepConfig::load_from(&path).unwrap();
    assert_eq!(cfg.rules.len(), 2);
}
