use crate::foundation::error::{ConfigError, SyncResult};

/// Tolerance used when classifying adjacent window boundaries. Cue values
/// arrive rounded to centiseconds from the narration measurement tool, so
/// anything inside this band is treated as contiguous.
pub(crate) const CUE_EPS: f64 = 1e-9;

/// A named planned time window in seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentWindow {
    /// Unique segment id, e.g. `"03_setup"`.
    pub id: String,
    /// Planned start cue in seconds from the timeline origin.
    pub start: f64,
    /// Planned end cue in seconds. Must not precede `start`.
    pub end: f64,
}

impl SegmentWindow {
    /// Build a window from an id and a pair of cues.
    pub fn new(id: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id: id.into(),
            start,
            end,
        }
    }

    /// Planned duration of this window in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Whether authored idle gaps between windows are legal.
///
/// Gaps are rejected by default; deliberate silence must be opted into
/// explicitly rather than slipping through as a mis-measured timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GapPolicy {
    /// Every window must start exactly where the previous one ends.
    #[default]
    Contiguous,
    /// Windows may start after the previous end; the runner idles across
    /// the gap via its absolute pre-wait.
    AllowAuthored,
}

/// Immutable, ordered table of named time windows.
///
/// Built once before any execution and never mutated; re-validation is
/// idempotent.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineSpec {
    windows: Vec<SegmentWindow>,
    gap_policy: GapPolicy,
}

impl TimelineSpec {
    /// Build a contiguous timeline. Fails if any window overlaps or leaves
    /// a gap against its predecessor.
    pub fn new(windows: Vec<SegmentWindow>) -> SyncResult<Self> {
        Self::with_gap_policy(windows, GapPolicy::Contiguous)
    }

    /// Build a timeline under an explicit gap policy.
    pub fn with_gap_policy(windows: Vec<SegmentWindow>, gap_policy: GapPolicy) -> SyncResult<Self> {
        let spec = Self {
            windows,
            gap_policy,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Re-check every construction invariant. Idempotent.
    pub fn validate(&self) -> SyncResult<()> {
        if self.windows.is_empty() {
            return Err(ConfigError::Empty.into());
        }

        for (i, w) in self.windows.iter().enumerate() {
            if !w.start.is_finite() || !w.end.is_finite() {
                return Err(ConfigError::NonFinite { id: w.id.clone() }.into());
            }
            if w.start < 0.0 {
                return Err(ConfigError::NegativeStart {
                    id: w.id.clone(),
                    start: w.start,
                }
                .into());
            }
            if w.end < w.start {
                return Err(ConfigError::InvertedWindow {
                    id: w.id.clone(),
                    start: w.start,
                    end: w.end,
                }
                .into());
            }
            if self.windows[..i].iter().any(|prev| prev.id == w.id) {
                return Err(ConfigError::DuplicateId { id: w.id.clone() }.into());
            }

            if i == 0 {
                continue;
            }
            let prev_end = self.windows[i - 1].end;
            let delta = w.start - prev_end;
            if delta < -CUE_EPS {
                return Err(ConfigError::Overlap {
                    id: w.id.clone(),
                    overlap: -delta,
                }
                .into());
            }
            if delta > CUE_EPS && self.gap_policy == GapPolicy::Contiguous {
                return Err(ConfigError::Gap {
                    id: w.id.clone(),
                    prev_end,
                    gap: delta,
                }
                .into());
            }
        }

        Ok(())
    }

    /// The ordered windows of this timeline.
    pub fn windows(&self) -> &[SegmentWindow] {
        &self.windows
    }

    /// Look up a window by segment id.
    pub fn get(&self, id: &str) -> Option<&SegmentWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether the timeline holds no segments. Always false for a value
    /// that passed construction.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Planned end of the composition: the last window's end cue.
    pub fn total_duration(&self) -> f64 {
        self.windows.last().map(|w| w.end).unwrap_or(0.0)
    }

    /// The gap policy this timeline was constructed under.
    pub fn gap_policy(&self) -> GapPolicy {
        self.gap_policy
    }
}
