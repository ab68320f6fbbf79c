const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Human-readable size using 1024-based units, e.g. `1023 bytes`, `1.00 KB`.
///
/// Picks the largest unit whose value is at least 1, capped at TB.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} bytes", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}
