//! Timecode formatting for playback displays

const SECONDS_PER_MINUTE: u64 = 60;

/// Format a duration in seconds as `MM:SS`.
///
/// Minutes never roll over into hours: 3602 seconds renders as `60:02`, and
/// the minutes field widens past two digits as needed (`100:02`). Fractional
/// seconds are truncated. Negative and non-finite inputs render as `00:00`.
///
/// # Examples
///
/// ```
/// use lexicast_common::timecode::format_mm_ss;
///
/// assert_eq!(format_mm_ss(75.0), "01:15");
/// assert_eq!(format_mm_ss(3602.0), "60:02");
/// ```
pub fn format_mm_ss(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let minutes = total / SECONDS_PER_MINUTE;
    let secs = total % SECONDS_PER_MINUTE;
    format!("{:02}:{:02}", minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(format_mm_ss(0.0), "00:00");
    }

    #[test]
    fn test_format_seconds_only() {
        assert_eq!(format_mm_ss(5.0), "00:05");
        assert_eq!(format_mm_ss(59.0), "00:59");
    }

    #[test]
    fn test_format_minutes_and_seconds() {
        assert_eq!(format_mm_ss(60.0), "01:00");
        assert_eq!(format_mm_ss(75.0), "01:15");
        assert_eq!(format_mm_ss(600.0), "10:00");
    }

    #[test]
    fn test_format_no_hour_rollover() {
        assert_eq!(format_mm_ss(3600.0), "60:00");
        assert_eq!(format_mm_ss(3602.0), "60:02");
        assert_eq!(format_mm_ss(6002.0), "100:02");
    }

    #[test]
    fn test_format_truncates_fractions() {
        assert_eq!(format_mm_ss(59.9), "00:59");
        assert_eq!(format_mm_ss(60.4), "01:00");
    }

    #[test]
    fn test_format_rejects_junk_inputs() {
        assert_eq!(format_mm_ss(-1.0), "00:00");
        assert_eq!(format_mm_ss(-0.5), "00:00");
        assert_eq!(format_mm_ss(f64::NAN), "00:00");
        assert_eq!(format_mm_ss(f64::INFINITY), "00:00");
        assert_eq!(format_mm_ss(f64::NEG_INFINITY), "00:00");
    }
}
