use chrono::{DateTime, TimeZone};
use tracing::Level;

const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S%.3f";

/// `MM/DD/YYYY HH:mm:ss.fff|<source line>|<LEVEL>|<message>`
pub fn format_line<Tz>(at: &DateTime<Tz>, source_line: u32, level: &Level, message: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}|{}|{}|{}", at.format(TIMESTAMP_FORMAT), source_line, level, message)
}
