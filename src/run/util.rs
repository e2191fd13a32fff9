use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `-1234567.89` → `"-$1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let formatted = format!("{:.2}", val.abs());
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let with_commas = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${with_commas}.{dec_part}")
}

/// Parse a user-typed amount. Accepts `$`, thousands separators and
/// accounting-style `(12.50)` negatives.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s
        .trim()
        .replace(['$', ','], "")
        .replace('(', "-")
        .replace(')', "");
    if cleaned.is_empty() {
        anyhow::bail!("Amount is required");
    }
    Decimal::from_str(&cleaned).with_context(|| format!("Invalid amount '{}'", s.trim()))
}

/// Truncate to `max` visible characters, ending in "…" when cut.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max - 1).collect();
    format!("{truncated}…")
}

#[cfg(test)]
#[path = "util_tests.rs"]
mod tests;
