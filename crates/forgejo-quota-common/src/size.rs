//! Human readable byte sizes
//!
//! Quota limits are configured as plain byte counts, `-1` for unlimited, or
//! sizes such as `"500 MB"` and `"1.5GiB"`.

use std::sync::LazyLock;

use crate::error::{QuotaError, Result};
use crate::UNLIMITED;

static SIZE_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^(\d+(?:\.\d+)?)\s*([a-zA-Z]*)$").expect("Invalid regex pattern")
});

const BINARY_UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

fn unit_multiplier(unit: &str) -> Option<u64> {
    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" => 1_000,
        "m" | "mb" => 1_000_000,
        "g" | "gb" => 1_000_000_000,
        "t" | "tb" => 1_000_000_000_000,
        "p" | "pb" => 1_000_000_000_000_000,
        "ki" | "kib" => 1 << 10,
        "mi" | "mib" => 1 << 20,
        "gi" | "gib" => 1 << 30,
        "ti" | "tib" => 1 << 40,
        "pi" | "pib" => 1 << 50,
        _ => return None,
    };
    Some(multiplier)
}

/// Parse a quota size into a byte count
///
/// Returns `-1` for the unlimited sentinel. Decimal fractions are truncated
/// to whole bytes.
///
/// # Examples
///
/// ```
/// use forgejo_quota_common::parse_size;
///
/// assert_eq!(parse_size("-1").unwrap(), -1);
/// assert_eq!(parse_size("2048").unwrap(), 2048);
/// assert_eq!(parse_size("1 KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1.5kb").unwrap(), 1500);
/// assert!(parse_size("ten bytes").is_err());
/// ```
pub fn parse_size(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    if trimmed == UNLIMITED.to_string() {
        return Ok(UNLIMITED);
    }

    let invalid = || QuotaError::InvalidSize(input.to_string());

    let captures = SIZE_PATTERN.captures(trimmed).ok_or_else(invalid)?;
    let number = &captures[1];
    let multiplier = unit_multiplier(&captures[2]).ok_or_else(invalid)?;

    if number.contains('.') {
        let value = number.parse::<f64>().map_err(|_| invalid())? * multiplier as f64;
        if !value.is_finite() || value >= i64::MAX as f64 {
            return Err(invalid());
        }
        return Ok(value as i64);
    }

    number
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .and_then(|n| i64::try_from(n).ok())
        .ok_or_else(invalid)
}

/// Format a byte count with binary units, `unlimited` for `-1`
pub fn format_size(bytes: i64) -> String {
    if bytes == UNLIMITED {
        return "unlimited".to_string();
    }
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BINARY_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{:.1}", value);
    let rendered = rendered.strip_suffix(".0").unwrap_or(&rendered);
    format!("{} {}", rendered, BINARY_UNITS[unit])
}
