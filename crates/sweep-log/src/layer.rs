use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::file::LogFile;
use crate::line::format_line;

/// A tracing layer that appends each event to a [`LogFile`] as one pipe-delimited line.
pub struct LogFileLayer {
    file: LogFile,
    stdout: bool,
    write_failed: AtomicBool,
}

impl LogFileLayer {
    pub fn new(file: LogFile) -> Self {
        Self { file, stdout: false, write_failed: AtomicBool::new(false) }
    }

    pub fn with_stdout(mut self, stdout: bool) -> Self {
        self.stdout = stdout;
        self
    }
}

impl<S> Layer<S> for LogFileLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let line = format_line(
            &Local::now(),
            metadata.line().unwrap_or(0),
            metadata.level(),
            &visitor.finish(),
        );

        if self.stdout {
            let _ = writeln!(std::io::stdout().lock(), "{}", line);
        }
        if let Err(e) = self.file.append(&line) {
            if !self.write_failed.swap(true, Ordering::Relaxed) {
                eprintln!("sweep: cannot write log file {}: {}", self.file.path().display(), e);
            }
        }
    }
}

/// Collects the `message` field plus any extra fields as ` key=value`.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
