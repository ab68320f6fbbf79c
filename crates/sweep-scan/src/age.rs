use std::time::{Duration, SystemTime};

pub const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Time since `modified`; zero for timestamps in the future.
pub fn file_age(modified: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(modified).unwrap_or_default()
}

/// Expired once the age in whole days is strictly greater than the retention.
pub fn is_expired(age: Duration, retention_days: u32) -> bool {
    age.as_secs() / SECS_PER_DAY > u64::from(retention_days)
}

pub fn rounded_days(age: Duration) -> u64 {
    (age.as_secs_f64() / SECS_PER_DAY as f64).round() as u64
}
