use serde::{Deserialize, Serialize};

/// Retention applied to files that match no rule.
pub const DEFAULT_RETENTION_DAYS: u32 = 180;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionRule {
    /// Glob matched against the path relative to the scan root, `/`-separated.
    pub pattern: String,
    pub retention_days: u32,
}

impl RetentionRule {
    pub fn new(pattern: impl Into<String>, retention_days: u32) -> Self {
        Self { pattern: pattern.into(), retention_days }
    }
}

/// Totals for a single cleanup pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupStats {
    pub deleted_files: u64,
    pub total_bytes_reclaimed: u64,
    pub errors: u64,
}

impl CleanupStats {
    pub fn record_deleted(&mut self, bytes: u64) {
        self.deleted_files += 1;
        self.total_bytes_reclaimed = self.total_bytes_reclaimed.saturating_add(bytes);
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}
