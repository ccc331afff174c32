//! Speed gate
//!
//! Rate changes only apply while audio is playing. A change requested while
//! paused is dropped outright, never queued: by the time playback resumes the
//! user intent has gone stale.

/// What became of a requested rate change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    /// Forward this rate to the engine (already clamped to the allowed band)
    Forward(f64),
    /// Dropped because playback was not active at evaluation time
    DroppedPaused,
    /// Dropped because the rate was non-finite or non-positive
    DroppedMalformed,
}

/// Gate policy for playback rate changes.
#[derive(Debug, Clone, Copy)]
pub struct SpeedGate {
    min: f64,
    max: f64,
}

impl SpeedGate {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Judge a requested rate against playback state at this instant.
    ///
    /// Malformed rates are rejected first, even while paused.
    pub fn evaluate(&self, is_playing: bool, rate: f64) -> GateDecision {
        if !rate.is_finite() || rate <= 0.0 {
            return GateDecision::DroppedMalformed;
        }
        if !is_playing {
            return GateDecision::DroppedPaused;
        }
        GateDecision::Forward(rate.clamp(self.min, self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> SpeedGate {
        SpeedGate::new(0.5, 2.0)
    }

    #[test]
    fn test_forwards_while_playing() {
        assert_eq!(gate().evaluate(true, 1.5), GateDecision::Forward(1.5));
        assert_eq!(gate().evaluate(true, 1.0), GateDecision::Forward(1.0));
    }

    #[test]
    fn test_clamps_to_band() {
        assert_eq!(gate().evaluate(true, 0.1), GateDecision::Forward(0.5));
        assert_eq!(gate().evaluate(true, 8.0), GateDecision::Forward(2.0));
    }

    #[test]
    fn test_drops_while_paused() {
        assert_eq!(gate().evaluate(false, 1.5), GateDecision::DroppedPaused);
    }

    #[test]
    fn test_drops_malformed_rates() {
        assert_eq!(gate().evaluate(true, 0.0), GateDecision::DroppedMalformed);
        assert_eq!(gate().evaluate(true, -1.0), GateDecision::DroppedMalformed);
        assert_eq!(
            gate().evaluate(true, f64::NAN),
            GateDecision::DroppedMalformed
        );
        assert_eq!(
            gate().evaluate(true, f64::INFINITY),
            GateDecision::DroppedMalformed
        );
        // Malformed is checked before the playing gate
        assert_eq!(gate().evaluate(false, -1.0), GateDecision::DroppedMalformed);
    }
}
