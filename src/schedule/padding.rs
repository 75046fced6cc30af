use crate::foundation::error::{SyncError, SyncResult};
use crate::schedule::clock::RenderClock;

/// Guaranteed trailing idle time appended after the last segment.
///
/// The composed output is combined downstream with a separately produced
/// narration track; without a guaranteed trailing interval the video ends on
/// its last meaningful frame and a naive combiner can clip the audio tail.
/// The padding is applied unconditionally, overrun or not.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PaddingPolicy {
    /// Seconds of idle time appended once after the last segment.
    pub min_padding: f64,
}

impl PaddingPolicy {
    /// Default trailing padding in seconds.
    pub const DEFAULT_MIN_PADDING: f64 = 1.5;

    /// Build a policy with an explicit padding amount.
    pub fn new(min_padding: f64) -> SyncResult<Self> {
        if !min_padding.is_finite() || min_padding < 0.0 {
            return Err(SyncError::clock(format!(
                "min_padding must be finite and non-negative, got {min_padding}"
            )));
        }
        Ok(Self { min_padding })
    }

    /// Advance the clock by the guaranteed padding. Returns the seconds
    /// inserted.
    pub fn apply(&self, clock: &mut RenderClock) -> SyncResult<f64> {
        clock.advance(self.min_padding)?;
        Ok(self.min_padding)
    }
}

impl Default for PaddingPolicy {
    fn default() -> Self {
        Self {
            min_padding: Self::DEFAULT_MIN_PADDING,
        }
    }
}
