use chrono::{DateTime, Utc};

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size in powers of 1024, at most two decimals.
///
/// `format_bytes(0) == "0 Bytes"`, `format_bytes(1536) == "1.5 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{scaled:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// First `len` characters of a hash followed by `...`
pub fn hash_prefix(hash: &str, len: usize) -> String {
    let prefix: String = hash.chars().take(len).collect();
    format!("{prefix}...")
}

pub fn format_percentage(value: u8) -> String {
    format!("{value}%")
}
