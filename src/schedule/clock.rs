use crate::foundation::error::{SyncError, SyncResult};

/// Single monotonic counter of elapsed composed time, in seconds.
///
/// The clock starts at zero and only moves forward: segment callbacks advance
/// it through [`RenderClock::advance`], and the runner advances it with
/// corrective waits. It is passed explicitly to everything that can move it;
/// there is no ambient time side channel.
#[derive(Debug, Default)]
pub struct RenderClock {
    now: f64,
}

impl RenderClock {
    /// A fresh clock at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed composed time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance the clock by `seconds`. Rejects negative and non-finite
    /// values so the clock stays monotonic.
    pub fn advance(&mut self, seconds: f64) -> SyncResult<()> {
        if !seconds.is_finite() {
            return Err(SyncError::clock(format!(
                "advance must be finite, got {seconds}"
            )));
        }
        if seconds < 0.0 {
            return Err(SyncError::clock(format!(
                "advance must be non-negative, got {seconds}"
            )));
        }
        self.now += seconds;
        Ok(())
    }

    /// Advance the clock to exactly `target` if it is behind it, pinning to
    /// the cue rather than accumulating a relative offset. Returns the
    /// inserted wait (zero when already at or past the target).
    pub(crate) fn wait_until(&mut self, target: f64) -> f64 {
        if target > self.now {
            let wait = target - self.now;
            self.now = target;
            wait
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_accumulates() {
        let mut clock = RenderClock::new();
        assert_eq!(clock.now(), 0.0);
        clock.advance(1.25).unwrap();
        clock.advance(0.0).unwrap();
        clock.advance(2.0).unwrap();
        assert_eq!(clock.now(), 3.25);
    }

    #[test]
    fn rejects_negative_and_non_finite_advances() {
        let mut clock = RenderClock::new();
        assert!(clock.advance(-0.1).is_err());
        assert!(clock.advance(f64::NAN).is_err());
        assert!(clock.advance(f64::INFINITY).is_err());
        assert_eq!(clock.now(), 0.0);
    }

    #[test]
    fn wait_until_pins_to_the_exact_cue() {
        let mut clock = RenderClock::new();
        clock.advance(1.1).unwrap();
        let wait = clock.wait_until(3.52);
        assert!((wait - 2.42).abs() < 1e-12);
        assert_eq!(clock.now(), 3.52);
    }

    #[test]
    fn wait_until_is_a_no_op_when_already_past() {
        let mut clock = RenderClock::new();
        clock.advance(5.0).unwrap();
        assert_eq!(clock.wait_until(4.0), 0.0);
        assert_eq!(clock.now(), 5.0);
    }
}
