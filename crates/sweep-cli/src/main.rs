use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sweep_log::{init_logging, LogSettings, DEFAULT_MAX_LOG_BYTES, DEFAULT_RETAINED_ARCHIVES};
use sweep_runner::{check, RunOptions, Runner};

#[derive(Parser)]
#[command(name = "sweep", version, about = "Delete files past their retention period and email a summary")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the configured root, delete expired files, log and email a summary
    Run {
        #[arg(long, default_value = "sweep.toml")]
        config: PathBuf,
        #[command(flatten)]
        log: LogArgs,
        /// Report what would be deleted without removing anything
        #[arg(long)]
        dry_run: bool,
        /// Skip the summary email even when the config enables it
        #[arg(long)]
        no_email: bool,
    },

    /// Validate the config, credential and root path without touching any file
    Check {
        #[arg(long, default_value = "sweep.toml")]
        config: PathBuf,
    },

    /// Write an example config file if none exists
    Init {
        #[arg(long, default_value = "sweep.toml")]
        config: PathBuf,
    },
}

#[derive(Args)]
struct LogArgs {
    /// Live log file; archives are written next to it
    #[arg(long, default_value = "logs/sweep.log")]
    log_file: String,
    /// Rotate the log once it grows past this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LOG_BYTES)]
    log_max_bytes: u64,
    /// Number of rotated archives to keep
    #[arg(long, default_value_t = DEFAULT_RETAINED_ARCHIVES)]
    log_keep: usize,
}

impl LogArgs {
    fn settings(&self) -> LogSettings {
        let mut s = LogSettings::new(shellexpand::tilde(&self.log_file).to_string());
        s.max_size_bytes = self.log_max_bytes;
        s.retained_archives = self.log_keep;
        s
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Run { config, log, dry_run, no_email } => {
            // Rotation happens here, before the first line of this run is written.
            let log_file = match init_logging(&log.settings()) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("sweep: {}", e);
                    return Ok(ExitCode::from(1));
                }
            };
            let options = RunOptions {
                config_path: config,
                log_file: Some(log_file.path().to_path_buf()),
                dry_run,
                send_email: !no_email,
            };
            let outcome = Runner::new(options).run();
            Ok(ExitCode::from(outcome.exit_code()))
        }
        Command::Check { config } => {
            tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
            let report = check(&config)?;
            println!("Config OK: {}", config.display());
            println!("Root: {}", report.root.display());
            println!("Rules: {} (default retention {} days)", report.rules, report.default_retention_days);
            println!("Email: {}", if report.email_enabled { "enabled" } else { "disabled" });
            Ok(ExitCode::SUCCESS)
        }
        Command::Init { config } => {
            if Runner::init_config(&config)? {
                println!("Wrote example config to {}", config.display());
            } else {
                println!("Config already exists at {}", config.display());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
