//! Derived signal projection
//!
//! Pure translation from raw engine telemetry to the display-ready frame a
//! UI binds to. No state of its own: the same sample and state always project
//! to the same frame.

use lexicast_common::timecode::format_mm_ss;
use lexicast_common::{DerivedSignals, PlaybackState, TelemetrySample};

/// Project one telemetry sample into a display-ready frame.
///
/// Junk inputs degrade instead of propagating: non-finite or negative times
/// render as zero, and the buffered fraction is clamped into [0.0, 1.0].
pub fn project(sample: &TelemetrySample, state: &PlaybackState) -> DerivedSignals {
    let current_seconds = sanitize_seconds(sample.current_seconds);
    let total_seconds = sanitize_seconds(sample.total_seconds);

    DerivedSignals {
        current_time_text: format_mm_ss(current_seconds),
        total_time_text: format_mm_ss(total_seconds),
        current_seconds,
        total_seconds,
        buffered_fraction: buffered_fraction(sample.buffered_percent),
        speed: state.speed,
    }
}

fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Engine reports buffering as a 0-100 percentage; progress bars want [0, 1].
fn buffered_fraction(percent: f64) -> f64 {
    if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexicast_common::PlaybackPhase;

    fn playing_state(speed: f64) -> PlaybackState {
        PlaybackState {
            loaded_url: Some("https://example.org/ep.mp3".into()),
            phase: PlaybackPhase::Playing,
            speed,
        }
    }

    #[test]
    fn test_projects_formatted_times() {
        let sample = TelemetrySample {
            current_seconds: 75.0,
            total_seconds: 3602.0,
            buffered_percent: 50.0,
        };

        let signals = project(&sample, &playing_state(1.0));
        assert_eq!(signals.current_time_text, "01:15");
        assert_eq!(signals.total_time_text, "60:02");
        assert_eq!(signals.current_seconds, 75.0);
        assert_eq!(signals.total_seconds, 3602.0);
        assert_eq!(signals.buffered_fraction, 0.5);
        assert_eq!(signals.speed, 1.0);
    }

    #[test]
    fn test_buffered_fraction_clamps() {
        let mut sample = TelemetrySample {
            current_seconds: 0.0,
            total_seconds: 0.0,
            buffered_percent: 150.0,
        };
        assert_eq!(project(&sample, &playing_state(1.0)).buffered_fraction, 1.0);

        sample.buffered_percent = -20.0;
        assert_eq!(project(&sample, &playing_state(1.0)).buffered_fraction, 0.0);

        sample.buffered_percent = f64::NAN;
        assert_eq!(project(&sample, &playing_state(1.0)).buffered_fraction, 0.0);
    }

    #[test]
    fn test_junk_times_render_as_zero() {
        let sample = TelemetrySample {
            current_seconds: f64::NAN,
            total_seconds: -3.0,
            buffered_percent: 10.0,
        };

        let signals = project(&sample, &playing_state(1.0));
        assert_eq!(signals.current_time_text, "00:00");
        assert_eq!(signals.total_time_text, "00:00");
        assert_eq!(signals.current_seconds, 0.0);
        assert_eq!(signals.total_seconds, 0.0);
    }

    #[test]
    fn test_speed_carried_from_state() {
        let sample = TelemetrySample {
            current_seconds: 10.0,
            total_seconds: 100.0,
            buffered_percent: 30.0,
        };
        assert_eq!(project(&sample, &playing_state(1.75)).speed, 1.75);
    }
}
