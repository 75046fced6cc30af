//! Passive per-segment timing diagnostics.
//!
//! The accumulator records what happened; it never feeds back into
//! scheduling decisions. All drift correction is local to the runner.

use crate::timeline::spec::CUE_EPS;

/// How a segment's realized duration related to its planned window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStatus {
    /// Realized duration matched the plan; no corrective wait was needed.
    OnCue,
    /// The segment underran and a corrective wait padded it to plan.
    Padded,
    /// The segment exceeded its window; the clock is ahead of plan.
    Overran,
}

/// Timing record for one executed segment, finalized immediately after its
/// callback returns.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionRecord {
    /// Segment id.
    pub id: String,
    /// Planned window duration in seconds.
    pub target_duration: f64,
    /// Seconds the callback actually consumed.
    pub actual_duration: f64,
    /// `actual_duration - target_duration` (negative when padded).
    pub drift: f64,
    /// Whether the segment exceeded its window.
    pub overran: bool,
}

impl ExecutionRecord {
    /// Classify this record for diagnostics rows. Drift inside the cue
    /// tolerance counts as on-cue.
    pub fn status(&self) -> SegmentStatus {
        if self.overran {
            SegmentStatus::Overran
        } else if self.drift < -CUE_EPS {
            SegmentStatus::Padded
        } else {
            SegmentStatus::OnCue
        }
    }
}

/// One row of [`DriftAccumulator::summary`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DriftRow {
    /// Segment id.
    pub id: String,
    /// Planned duration in seconds.
    pub target: f64,
    /// Realized duration in seconds.
    pub actual: f64,
    /// Signed realized-minus-planned difference.
    pub drift: f64,
    /// Classification of the row.
    pub status: SegmentStatus,
}

impl From<&ExecutionRecord> for DriftRow {
    fn from(r: &ExecutionRecord) -> Self {
        Self {
            id: r.id.clone(),
            target: r.target_duration,
            actual: r.actual_duration,
            drift: r.drift,
            status: r.status(),
        }
    }
}

/// Ordered log of [`ExecutionRecord`]s for one run.
#[derive(Debug, Default)]
pub struct DriftAccumulator {
    records: Vec<ExecutionRecord>,
}

impl DriftAccumulator {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one finalized record.
    pub fn push(&mut self, record: ExecutionRecord) {
        self.records.push(record);
    }

    /// The records in execution order.
    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    /// Ordered diagnostics rows, one per executed segment.
    pub fn summary(&self) -> Vec<DriftRow> {
        self.records.iter().map(DriftRow::from).collect()
    }

    /// Consume the log, yielding the records.
    pub fn into_records(self) -> Vec<ExecutionRecord> {
        self.records
    }
}
