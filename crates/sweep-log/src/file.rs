use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::settings::LogSettings;

const ARCHIVE_STAMP: &str = "%Y%m%d-%H%M%S-%3f";

/// The live log file plus its timestamped archives in the same directory.
///
/// Every append opens the file, writes one line and closes it again.
#[derive(Clone, Debug)]
pub struct LogFile {
    settings: LogSettings,
}

impl LogFile {
    pub fn new(settings: LogSettings) -> Self {
        Self { settings }
    }

    pub fn path(&self) -> &Path {
        &self.settings.path
    }

    /// Create the log if absent, rotate it if oversized, prune old archives.
    pub fn initialize(&self) -> io::Result<()> {
        if let Some(parent) = self.dir() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(self.path())?;
        self.rotate_if_needed()?;
        // Leftovers from a run with a larger keep count go even without a rotation.
        self.prune_archives()?;
        Ok(())
    }

    pub fn append(&self, line: &str) -> io::Result<()> {
        self.rotate_if_needed()?;
        let mut f = OpenOptions::new().create(true).append(true).open(self.path())?;
        writeln!(f, "{}", line)?;
        Ok(())
    }

    /// Returns the archive path when a rotation happened.
    pub fn rotate_if_needed(&self) -> io::Result<Option<PathBuf>> {
        let size = match fs::metadata(self.path()) {
            Ok(m) => m.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if size <= self.settings.max_size_bytes {
            return Ok(None);
        }
        let archive = self.next_archive_path(Local::now());
        fs::rename(self.path(), &archive)?;
        OpenOptions::new().create(true).write(true).truncate(true).open(self.path())?;
        self.prune_archives()?;
        Ok(Some(archive))
    }

    /// Delete all but the newest `retained_archives` archives. Returns what was removed.
    pub fn prune_archives(&self) -> io::Result<Vec<PathBuf>> {
        let mut archives = self.list_archives()?;
        archives.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
        let mut removed = Vec::new();
        for (path, _) in archives.into_iter().skip(self.settings.retained_archives) {
            match fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(e) => eprintln!("sweep: could not prune log archive {}: {}", path.display(), e),
            }
        }
        Ok(removed)
    }

    /// Archives with their modification time, unordered.
    pub fn list_archives(&self) -> io::Result<Vec<(PathBuf, SystemTime)>> {
        let dir = self.dir().unwrap_or_else(|| Path::new("."));
        let mut out = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !self.is_archive_name(name) || !entry.file_type()?.is_file() {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            out.push((entry.path(), modified));
        }
        Ok(out)
    }

    pub fn archive_path(&self, at: DateTime<Local>) -> PathBuf {
        let (stem, ext) = self.name_parts();
        let stamp = at.format(ARCHIVE_STAMP);
        let name = match ext {
            Some(ext) => format!("{}.{}.{}", stem, stamp, ext),
            None => format!("{}.{}", stem, stamp),
        };
        self.path().with_file_name(name)
    }

    fn next_archive_path(&self, at: DateTime<Local>) -> PathBuf {
        let base = self.archive_path(at);
        if !base.exists() {
            return base;
        }
        // Two rotations inside the same millisecond.
        let (stem, ext) = self.name_parts();
        let stamp = at.format(ARCHIVE_STAMP).to_string();
        (1..)
            .map(|n| {
                let name = match ext {
                    Some(ext) => format!("{}.{}-{}.{}", stem, stamp, n, ext),
                    None => format!("{}.{}-{}", stem, stamp, n),
                };
                self.path().with_file_name(name)
            })
            .find(|p| !p.exists())
            .unwrap_or(base)
    }

    fn is_archive_name(&self, name: &str) -> bool {
        let (stem, ext) = self.name_parts();
        let Some(rest) = name.strip_prefix(stem).and_then(|r| r.strip_prefix('.')) else {
            return false;
        };
        let stamp = match ext {
            Some(ext) => match rest.strip_suffix(ext).and_then(|r| r.strip_suffix('.')) {
                Some(s) => s,
                None => return false,
            },
            None => rest,
        };
        // YYYYMMDD-HHMMSS-fff, optionally followed by -N
        stamp.len() >= 19
            && stamp.as_bytes()[8] == b'-'
            && stamp.as_bytes()[15] == b'-'
            && stamp.chars().all(|c| c.is_ascii_digit() || c == '-')
    }

    fn name_parts(&self) -> (&str, Option<&str>) {
        let stem = self.path().file_stem().and_then(|s| s.to_str()).unwrap_or("sweep");
        let ext = self.path().extension().and_then(|s| s.to_str());
        (stem, ext)
    }

    fn dir(&self) -> Option<&Path> {
        self.path().parent().filter(|p| !p.as_os_str().is_empty())
    }
}
