//! Clock-style formatting for the progress display.

use std::time::Duration;

/// Format whole seconds as `MM:SS`. Minutes keep counting past 59.
pub fn format_time(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// `current / total` label shown next to the progress bar.
pub fn format_progress(current: Duration, total: Duration) -> String {
    format!("{} / {}", format_time(current), format_time(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Duration::ZERO), "00:00");
        assert_eq!(format_time(Duration::from_secs(59)), "00:59");
        assert_eq!(format_time(Duration::from_secs(61)), "01:01");
        assert_eq!(format_time(Duration::from_secs(3600)), "60:00");
    }

    #[test]
    fn test_format_time_truncates_fraction() {
        assert_eq!(format_time(Duration::from_secs_f32(12.9)), "00:12");
    }

    #[test]
    fn test_format_progress() {
        assert_eq!(
            format_progress(Duration::from_secs(75), Duration::from_secs(200)),
            "01:15 / 03:20"
        );
    }
}
