//! JSON boundary types for timelines produced by the narration measurement
//! tool.
//!
//! The tool writes `timing.json` as `{"total": .., "segments": [{id, start,
//! duration, end, text}, ..]}`; older exports are a bare segment array. Both
//! shapes deserialize into [`TimelineDef`] and validate into a
//! [`TimelineSpec`].

use crate::foundation::error::{SyncError, SyncResult};
use crate::timeline::spec::{GapPolicy, SegmentWindow, TimelineSpec};
use crate::validate::script::{NarrationLine, NarrationScript};

/// One measured segment row.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SegmentDef {
    /// Unique segment id.
    pub id: String,
    /// Start cue in seconds.
    pub start: f64,
    /// End cue in seconds (includes the inter-segment pause the tool adds).
    pub end: f64,
    /// Narration text spoken over this segment, when the tool kept it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Raw spoken duration as measured, before the pause was appended.
    /// Informational only; scheduling always uses `start`/`end`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// A deserialized timing document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum TimelineDef {
    /// The measurement tool's full document shape.
    Document {
        /// Total measured duration in seconds, when present.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total: Option<f64>,
        /// Measured segment rows in timeline order.
        segments: Vec<SegmentDef>,
    },
    /// A bare array of segment rows.
    Bare(Vec<SegmentDef>),
}

impl TimelineDef {
    /// Parse a timing document from JSON text.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        serde_json::from_str(json).map_err(|e| SyncError::serde(format!("parse timing JSON: {e}")))
    }

    /// The segment rows, regardless of document shape.
    pub fn segments(&self) -> &[SegmentDef] {
        match self {
            Self::Document { segments, .. } => segments,
            Self::Bare(segments) => segments,
        }
    }

    /// Validate into an executable [`TimelineSpec`].
    pub fn to_spec(&self, gap_policy: GapPolicy) -> SyncResult<TimelineSpec> {
        let windows = self
            .segments()
            .iter()
            .map(|s| SegmentWindow::new(s.id.clone(), s.start, s.end))
            .collect();
        TimelineSpec::with_gap_policy(windows, gap_policy)
    }

    /// Collect the narration lines this document carries, for segments that
    /// kept their `text` field.
    pub fn narration(&self) -> NarrationScript {
        NarrationScript::new(
            self.segments()
                .iter()
                .filter_map(|s| {
                    s.text
                        .as_ref()
                        .map(|t| NarrationLine::new(s.id.clone(), t.clone()))
                })
                .collect(),
        )
    }
}
