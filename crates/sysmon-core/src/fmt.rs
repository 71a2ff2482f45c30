//! Formatting helpers for the display layer.
//!
//! All pure functions: no terminal or layout concerns.

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Format whole seconds as `HH:MM:SS`.
///
/// Each field is zero-padded to two digits. Hours are not wrapped at 24 and
/// widen past two digits when needed: `360000` gives `"100:00:00"`.
pub fn format_elapsed_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

/// Format a `[0, 1]` ratio as a percentage with one decimal: `0.5` gives `"50.0%"`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Format an already-scaled percentage: `6.0` gives `"6.0%"`.
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

// ---------------------------------------------------------------------------
// Text normalization
// ---------------------------------------------------------------------------

/// Render a raw command line for single-line display.
///
/// NUL argument separators become spaces and the trailing separator is dropped.
pub fn normalize_command(raw: &str) -> String {
    raw.replace('\0', " ").trim().to_string()
}

/// Truncate string to `max_chars` characters with a unicode ellipsis (`…`).
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}
