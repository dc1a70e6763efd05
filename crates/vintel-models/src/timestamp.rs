//! Timestamp formatting for labels.

/// Format seconds as `M:SS` (or `H:MM:SS` past an hour).
///
/// # Examples
/// ```
/// use vintel_models::timestamp::format_clock;
/// assert_eq!(format_clock(5.0), "0:05");
/// assert_eq!(format_clock(95.4), "1:35");
/// assert_eq!(format_clock(3725.0), "1:02:05");
/// ```
pub fn format_clock(total_secs: f64) -> String {
    let total = total_secs.max(0.0).floor() as u64;
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Format a span length with one decimal, e.g. `2.5s`.
pub fn format_span(secs: f64) -> String {
    format!("{:.1}s", secs.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(59.9), "0:59");
        assert_eq!(format_clock(60.0), "1:00");
        assert_eq!(format_clock(-3.0), "0:00");
    }

    #[test]
    fn test_format_span() {
        assert_eq!(format_span(2.5), "2.5s");
        assert_eq!(format_span(1.0), "1.0s");
    }
}
