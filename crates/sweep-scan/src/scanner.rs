use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use sweep_core::{format_size, CleanupStats, DeleteError, RuleSet, ScanError};
use tracing::{debug, error, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::age::{file_age, is_expired, rounded_days};
use crate::remover::{FsRemover, Remover};

pub struct Scanner {
    remover: Box<dyn Remover>,
    dry_run: bool,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self::with_remover(Box::new(FsRemover))
    }

    pub fn with_remover(remover: Box<dyn Remover>) -> Self {
        Self { remover, dry_run: false }
    }

    /// Count and log expired files without removing them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&self, root: &Path, rules: &RuleSet) -> Result<CleanupStats, ScanError> {
        self.run_at(root, rules, SystemTime::now())
    }

    /// One pass over every regular file under `root`, judged against `now`.
    ///
    /// Per-file deletion failures are counted in the stats; only a root that
    /// cannot be enumerated fails the pass.
    pub fn run_at(&self, root: &Path, rules: &RuleSet, now: SystemTime) -> Result<CleanupStats, ScanError> {
        check_root(root)?;

        let mut stats = CleanupStats::default();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ScanError::Enumerate { path: root.to_path_buf(), source: e.into() });
                }
                Err(e) => {
                    let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                    warn!("skipping unreadable entry {}: {}", path, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            self.visit(root, &entry, rules, now, &mut stats);
        }

        debug!(
            deleted = stats.deleted_files,
            bytes = stats.total_bytes_reclaimed,
            errors = stats.errors,
            "scan finished"
        );
        Ok(stats)
    }

    fn visit(&self, root: &Path, entry: &DirEntry, rules: &RuleSet, now: SystemTime, stats: &mut CleanupStats) {
        let path = entry.path();
        let relative = relative_path(root, path);
        let retention = rules.resolve(&relative).retention_days;

        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(e) => {
                warn!("cannot read metadata for {}: {}", path.display(), e);
                return;
            }
        };
        let modified = match meta.modified() {
            Ok(t) => t,
            Err(e) => {
                warn!("cannot read modification time for {}: {}", path.display(), e);
                return;
            }
        };

        let age = file_age(modified, now);
        if !is_expired(age, retention) {
            return;
        }

        let size = meta.len();
        let days = rounded_days(age);
        if self.dry_run {
            stats.record_deleted(size);
            info!("Would delete {} (age: {} days, size: {})", path.display(), days, format_size(size));
            return;
        }

        match self.remover.remove(path) {
            Ok(()) => {
                stats.record_deleted(size);
                info!("Deleted {} (age: {} days, size: {})", path.display(), days, format_size(size));
            }
            Err(source) => {
                stats.record_error();
                let err = DeleteError { path: path.to_path_buf(), source };
                error!("Error deleting file: {}", err);
            }
        }
    }
}

fn check_root(root: &Path) -> Result<(), ScanError> {
    let meta = match fs::metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ScanError::RootMissing(root.to_path_buf()));
        }
        Err(source) => return Err(ScanError::Enumerate { path: root.to_path_buf(), source }),
    };
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(|source| ScanError::Enumerate { path: root.to_path_buf(), source })?;
    Ok(())
}

/// `path` relative to `root`, always `/`-separated.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
