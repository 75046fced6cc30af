//! Cuesync schedules a fixed sequence of named, time-boxed segments so that
//! each segment's realized duration lines up with a pre-measured narration
//! timeline.
//!
//! The public API is run-oriented:
//!
//! - Load and validate a [`TimelineSpec`]
//! - Register segment callbacks in a [`SegmentCallbacks`] table
//! - Execute the timeline with a [`SegmentRunner`] against one [`RenderClock`]
//! - Audit the rendered artifacts with a [`CompletionValidator`]
//!
//! Drift correction is local: a segment that underruns its window is padded
//! back to its planned end, a segment that overruns is recorded and left
//! ahead of plan. Later windows are never shifted or renegotiated.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Clock, runner, drift diagnostics and trailing-padding policy.
pub mod schedule;
/// Planned timeline model and its JSON boundary types.
pub mod timeline;
/// Post-render artifact and plan-adequacy validation.
pub mod validate;

pub use crate::foundation::error::{ConfigError, SyncError, SyncResult};

pub use crate::schedule::clock::RenderClock;
pub use crate::schedule::drift::{DriftAccumulator, DriftRow, ExecutionRecord, SegmentStatus};
pub use crate::schedule::padding::PaddingPolicy;
pub use crate::schedule::runner::{OverrunWarning, RunReport, SegmentCallbacks, SegmentRunner};
pub use crate::timeline::def::{SegmentDef, TimelineDef};
pub use crate::timeline::spec::{GapPolicy, SegmentWindow, TimelineSpec};
pub use crate::validate::completion::{
    AdequacyFinding, CompletionReport, CompletionValidator, DurationVerdict,
};
pub use crate::validate::script::{NarrationLine, NarrationScript};
