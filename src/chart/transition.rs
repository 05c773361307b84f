//! Declared-duration transitions between circle states.

use std::time::Duration;

use super::CircleAttrs;

/// A move from one circle state to another over a fixed duration.
///
/// Transitions are fire-and-forget: nothing waits for them to finish. A sink
/// that animates samples them; a sink that only draws end states reads `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// State at the start.
    pub from: CircleAttrs,
    /// State at the end.
    pub to: CircleAttrs,
    /// Declared duration.
    pub duration: Duration,
}

impl Transition {
    /// Create a transition.
    #[must_use]
    pub fn new(from: CircleAttrs, to: CircleAttrs, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Eased state `elapsed` after the transition started.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> CircleAttrs {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from.lerp(self.to, ease_cubic_in_out(t))
    }
}

/// Symmetric cubic easing, slow at both ends.
#[must_use]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FROM: CircleAttrs = CircleAttrs { cx: 0.0, cy: 0.0, r: 5.0 };
    const TO: CircleAttrs = CircleAttrs { cx: 100.0, cy: 50.0, r: 10.0 };

    #[test]
    fn test_ease_endpoints_and_midpoint() {
        assert_relative_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_relative_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_relative_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
        assert!(ease_cubic_in_out(0.75) > 0.75);
    }

    #[test]
    fn test_sample_start_middle_end() {
        let t = Transition::new(FROM, TO, Duration::from_millis(100));
        assert_eq!(t.sample(Duration::ZERO), FROM);
        let mid = t.sample(Duration::from_millis(50));
        assert_relative_eq!(mid.cx, 50.0);
        assert_relative_eq!(mid.r, 7.5);
        assert_eq!(t.sample(Duration::from_millis(100)), TO);
        assert_eq!(t.sample(Duration::from_secs(5)), TO);
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let t = Transition::new(FROM, TO, Duration::ZERO);
        assert_eq!(t.sample(Duration::ZERO), TO);
    }
}
