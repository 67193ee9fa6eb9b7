//! Duration formatting for display.
//!
//! The model stores integer milliseconds everywhere; rounding to
//! seconds happens here and nowhere else.

/// `HH:MM:SS` when at least an hour, `MM:SS` otherwise.
pub fn format_clock(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Compact human form: `1d 2h 3m 4s`, omitting zero components.
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_form() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(1_500_000), "25:00");
        assert_eq!(format_clock(3_661_000), "01:01:01");
        // Sub-second remainders truncate, never round up.
        assert_eq!(format_clock(999), "00:00");
    }

    #[test]
    fn human_form() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(61_000), "1m 1s");
        assert_eq!(format_duration(90_061_000), "1d 1h 1m 1s");
        assert_eq!(format_duration(3_600_000), "1h");
    }
}
