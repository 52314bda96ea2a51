//=========================================================================
// Frame Clock
//=========================================================================
//
// Turns the host's repaint timestamps into per-frame deltas.
//
//=========================================================================

//=== Constants ===========================================================

/// Delta reported when no sensible measurement exists (first frame,
/// stalled or backwards clock).
pub const DEFAULT_DELTA_MS: f64 = 16.0;

/// Default ceiling for a single frame's delta.
pub const DEFAULT_MAX_DELTA_MS: f64 = 100.0;

//=== FrameClock ==========================================================

/// Monotonic delta tracker.
///
/// Deltas are clamped to `max_delta` so a window that was dragged or
/// minimized does not advance the simulation by seconds at once.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    max_delta: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_DELTA_MS)
    }

    /// # Panics
    ///
    /// Panics if `max_delta` is not a positive finite number.
    pub fn with_max_delta(max_delta: f64) -> Self {
        assert!(
            max_delta.is_finite() && max_delta > 0.0,
            "Max frame delta must be positive, got {}",
            max_delta
        );
        Self {
            last: None,
            max_delta,
        }
    }

    /// Records `timestamp_ms` and returns the delta since the last tick.
    pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
        let previous = self.last.replace(timestamp_ms);

        let delta = match previous {
            Some(previous) => timestamp_ms - previous,
            None => return DEFAULT_DELTA_MS,
        };

        if !delta.is_finite() || delta <= 0.0 {
            DEFAULT_DELTA_MS
        } else {
            delta.min(self.max_delta)
        }
    }

    /// Forgets the previous timestamp; the next tick reports the default.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_uses_default() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(5_000.0), DEFAULT_DELTA_MS);
    }

    #[test]
    fn measures_elapsed_time() {
        let mut clock = FrameClock::new();
        clock.tick(1_000.0);
        assert_eq!(clock.tick(1_020.0), 20.0);
        assert_eq!(clock.tick(1_028.5), 8.5);
    }

    #[test]
    fn zero_and_backwards_deltas_use_default() {
        let mut clock = FrameClock::new();
        clock.tick(1_000.0);
        assert_eq!(clock.tick(1_000.0), DEFAULT_DELTA_MS);
        assert_eq!(clock.tick(900.0), DEFAULT_DELTA_MS);
        assert_eq!(clock.tick(f64::NAN), DEFAULT_DELTA_MS);
    }

    #[test]
    fn long_stalls_are_clamped() {
        let mut clock = FrameClock::with_max_delta(50.0);
        clock.tick(0.0);
        assert_eq!(clock.tick(3_000.0), 50.0);
    }

    #[test]
    fn reset_forgets_previous_timestamp() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        clock.reset();
        assert_eq!(clock.tick(500.0), DEFAULT_DELTA_MS);
    }

    #[test]
    #[should_panic(expected = "Max frame delta must be positive")]
    fn zero_ceiling_panics() {
        FrameClock::with_max_delta(0.0);
    }
}
