//! Sequential segment execution with local drift correction.
//!
//! Each segment moves through `PENDING -> PRE_WAIT -> RUNNING ->
//! {POST_WAIT | OVERRUN} -> DONE`; the run as a whole is `PENDING ->
//! RUNNING -> FINALIZING -> COMPLETE`. There are no retries: a callback
//! either completes or the whole run aborts.

use std::collections::BTreeMap;

use crate::foundation::error::{ConfigError, SyncError, SyncResult};
use crate::schedule::clock::RenderClock;
use crate::schedule::drift::{DriftAccumulator, DriftRow, ExecutionRecord};
use crate::schedule::padding::PaddingPolicy;
use crate::timeline::spec::{CUE_EPS, TimelineSpec};

/// A segment exceeded its planned window. Non-fatal; the run continues with
/// the clock ahead of plan.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverrunWarning {
    /// Id of the overrunning segment.
    pub id: String,
    /// Seconds consumed beyond the planned window.
    pub excess: f64,
}

/// Boxed segment procedure. Receives the shared clock and issues zero or
/// more time-advancing actions on it, then returns.
pub type SegmentFn<'a> = Box<dyn FnMut(&mut RenderClock) -> SyncResult<()> + 'a>;

/// Explicit, statically assembled mapping from segment id to callback.
///
/// Built by the composing tool before a run; the runner verifies coverage
/// against the timeline before any callback executes.
#[derive(Default)]
pub struct SegmentCallbacks<'a> {
    map: BTreeMap<String, SegmentFn<'a>>,
}

impl<'a> SegmentCallbacks<'a> {
    /// An empty callback table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the callback for a segment id, replacing any previous entry.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        callback: impl FnMut(&mut RenderClock) -> SyncResult<()> + 'a,
    ) -> &mut Self {
        self.map.insert(id.into(), Box::new(callback));
        self
    }

    /// Whether a callback is registered for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut SegmentFn<'a>> {
        self.map.get_mut(id)
    }
}

/// Write-once outcome of one completed run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunReport {
    /// One record per executed segment, in execution order.
    pub records: Vec<ExecutionRecord>,
    /// Every overrun observed during the run, in execution order.
    pub warnings: Vec<OverrunWarning>,
    /// Planned end of the timeline in seconds.
    pub total_planned: f64,
    /// Trailing padding inserted after the last segment.
    pub padding: f64,
    /// Clock position after the final segment and padding.
    pub final_time: f64,
}

impl RunReport {
    /// Ordered diagnostics rows, one per executed segment.
    pub fn summary(&self) -> Vec<DriftRow> {
        self.records.iter().map(DriftRow::from).collect()
    }

    /// Whether every segment stayed inside its planned window.
    pub fn on_plan(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Executes a timeline's segments in order against one [`RenderClock`],
/// absorbing drift locally and appending trailing padding at the end.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentRunner {
    padding: PaddingPolicy,
}

impl SegmentRunner {
    /// A runner with the given trailing-padding policy.
    pub fn new(padding: PaddingPolicy) -> Self {
        Self { padding }
    }

    /// Run every segment of `timeline` in ascending start order.
    ///
    /// For each segment: idle to the absolute start cue if the clock is
    /// behind it, invoke the callback, then pad back to the planned duration
    /// if the callback underran. Overruns insert no wait; time already spent
    /// cannot be recovered. Postcondition per segment: `clock.now() >= end`,
    /// with equality unless that segment overran.
    #[tracing::instrument(skip(self, timeline, callbacks, clock))]
    pub fn run(
        &self,
        timeline: &TimelineSpec,
        callbacks: &mut SegmentCallbacks<'_>,
        clock: &mut RenderClock,
    ) -> SyncResult<RunReport> {
        timeline.validate()?;
        for w in timeline.windows() {
            if !callbacks.contains(&w.id) {
                return Err(ConfigError::MissingCallback { id: w.id.clone() }.into());
            }
        }

        let mut drift = DriftAccumulator::new();
        let mut warnings = Vec::new();

        for window in timeline.windows() {
            // PRE_WAIT: resynchronize to the absolute cue, so an earlier
            // overrun never compounds onto this segment's start.
            let pre_wait = clock.wait_until(window.start);
            if pre_wait > 0.0 {
                tracing::debug!(id = %window.id, wait = pre_wait, "pre-wait to start cue");
            }

            // RUNNING
            let render_start = clock.now();
            let callback = callbacks
                .get_mut(&window.id)
                .ok_or_else(|| ConfigError::MissingCallback {
                    id: window.id.clone(),
                })?;
            callback(clock).map_err(|e| SyncError::callback(&window.id, e))?;

            let actual = clock.now() - render_start;
            let target = window.duration();
            let excess = actual - target;
            let overran = excess > CUE_EPS;

            if overran {
                // OVERRUN: no wait can recover spent time; record and move on.
                tracing::warn!(id = %window.id, excess, "segment overran its window");
                warnings.push(OverrunWarning {
                    id: window.id.clone(),
                    excess,
                });
            } else {
                // POST_WAIT: pin back to the planned duration. When the
                // segment started on cue this lands exactly on `window.end`.
                let wait = clock.wait_until(render_start + target);
                if wait > CUE_EPS {
                    tracing::debug!(id = %window.id, wait, "corrective wait to end cue");
                }
            }

            drift.push(ExecutionRecord {
                id: window.id.clone(),
                target_duration: target,
                actual_duration: actual,
                drift: excess,
                overran,
            });
        }

        // FINALIZING: unconditional trailing padding.
        let padding = self.padding.apply(clock)?;

        Ok(RunReport {
            records: drift.into_records(),
            warnings,
            total_planned: timeline.total_duration(),
            padding,
            final_time: clock.now(),
        })
    }
}
