//! Display formatting and lenient parsing of numeric form fields

/// Format a second count as `HH:MM:SS`, zero-padding every part to two digits
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parse a numeric input field the way a browser form reads it with integer parsing.
///
/// Leading whitespace is skipped, an optional sign is accepted and the leading
/// run of digits is used. Empty or unparsable text yields 0, and so does a
/// negative number since durations cannot go below zero.
pub fn parse_field(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());

    let value = rest[..digits_end].parse::<u64>().unwrap_or(0);
    if negative { 0 } else { value }
}
