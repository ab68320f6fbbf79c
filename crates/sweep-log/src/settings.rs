use std::path::PathBuf;

pub const DEFAULT_MAX_LOG_BYTES: u64 = 64 * 1024;
pub const DEFAULT_RETAINED_ARCHIVES: usize = 5;

/// Fixed at startup; never changes during a run.
#[derive(Clone, Debug)]
pub struct LogSettings {
    pub path: PathBuf,
    /// The live log is archived once it grows past this size.
    pub max_size_bytes: u64,
    /// Number of archives kept after pruning.
    pub retained_archives: usize,
    /// Mirror every line to stdout.
    pub echo_stdout: bool,
}

impl LogSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size_bytes: DEFAULT_MAX_LOG_BYTES,
            retained_archives: DEFAULT_RETAINED_ARCHIVES,
            echo_stdout: true,
        }
    }
}
