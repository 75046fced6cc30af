//! Post-render completion checks.
//!
//! A distinct phase run after rendering, against durations probed from the
//! artifacts by an external tool. The checks are advisory: they produce a
//! report for the surrounding tool to act on and never mutate the timeline
//! or re-render. Findings are collected per segment rather than
//! short-circuiting, since timing problems are typically systemic.

use std::collections::BTreeMap;

use crate::timeline::spec::TimelineSpec;

/// Outcome of the rendered-duration comparison.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DurationVerdict {
    /// Video comfortably outlasts the narration.
    Ok,
    /// Video outlasts the narration by less than the safe margin; an abrupt
    /// cut is likely even though nothing is truncated.
    LowPadding {
        /// Seconds of margin actually present.
        margin: f64,
    },
    /// Video is shorter than the narration; a shortest-of-two combiner would
    /// cut the voice track off. Fatal to the finalize step.
    TooShort {
        /// Seconds of narration that would be lost.
        deficit: f64,
    },
}

impl DurationVerdict {
    /// Whether this verdict blocks the finalize/combine step.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TooShort { .. })
    }
}

/// A segment whose authored window cannot fit its narration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AdequacyFinding {
    /// Offending segment id.
    pub id: String,
    /// Words narrated over the segment.
    pub word_count: usize,
    /// Minimum seconds needed to speak them.
    pub minimum_time: f64,
    /// The authored window duration from the timeline plan.
    pub planned: f64,
}

/// Write-once result of the completion phase.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompletionReport {
    /// Probed duration of the rendered video in seconds.
    pub video_duration: f64,
    /// Probed duration of the narration track in seconds.
    pub audio_duration: f64,
    /// `video_duration - audio_duration`.
    pub padding_delta: f64,
    /// Duration comparison outcome.
    pub verdict: DurationVerdict,
    /// Pass/fail per segment that carries a word count.
    pub segment_adequacy: BTreeMap<String, bool>,
    /// Every under-planned segment, in timeline order.
    pub inadequate: Vec<AdequacyFinding>,
}

impl CompletionReport {
    /// Whether the finalize/combine step may proceed.
    pub fn is_ok(&self) -> bool {
        !self.verdict.is_fatal() && self.inadequate.is_empty()
    }
}

/// Checks rendered-artifact durations and per-segment plan adequacy against
/// the original timeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompletionValidator {
    /// Assumed narration pace in words per second.
    pub speech_rate: f64,
    /// Fixed per-segment allowance in seconds on top of the spoken words.
    pub speech_buffer: f64,
    /// Margin under which the duration verdict degrades to low-padding.
    pub low_padding: f64,
}

impl CompletionValidator {
    /// Default narration pace, words per second.
    pub const DEFAULT_SPEECH_RATE: f64 = 2.5;
    /// Default per-segment allowance in seconds.
    pub const DEFAULT_SPEECH_BUFFER: f64 = 0.3;
    /// Default safe video-over-audio margin in seconds.
    pub const DEFAULT_LOW_PADDING: f64 = 1.0;

    /// Compare probed video and audio durations.
    pub fn check_duration(&self, video_duration: f64, audio_duration: f64) -> DurationVerdict {
        let delta = video_duration - audio_duration;
        if delta < 0.0 {
            DurationVerdict::TooShort { deficit: -delta }
        } else if delta < self.low_padding {
            DurationVerdict::LowPadding { margin: delta }
        } else {
            DurationVerdict::Ok
        }
    }

    /// Minimum seconds needed to narrate `word_count` words.
    pub fn minimum_time(&self, word_count: usize) -> f64 {
        word_count as f64 / self.speech_rate + self.speech_buffer
    }

    /// Flag every segment whose *authored* duration is below the minimum
    /// narration time. This is a plan-level check, independent of realized
    /// render drift: a segment can execute without overrun yet still be
    /// under-planned for its narration.
    pub fn check_segment_adequacy(
        &self,
        timeline: &TimelineSpec,
        word_counts: &BTreeMap<String, usize>,
    ) -> Vec<AdequacyFinding> {
        let mut findings = Vec::new();
        for window in timeline.windows() {
            let Some(&words) = word_counts.get(&window.id) else {
                continue;
            };
            let minimum = self.minimum_time(words);
            if window.duration() < minimum {
                findings.push(AdequacyFinding {
                    id: window.id.clone(),
                    word_count: words,
                    minimum_time: minimum,
                    planned: window.duration(),
                });
            }
        }
        findings
    }

    /// Run both checks and assemble the full report.
    pub fn report(
        &self,
        timeline: &TimelineSpec,
        word_counts: &BTreeMap<String, usize>,
        video_duration: f64,
        audio_duration: f64,
    ) -> CompletionReport {
        let verdict = self.check_duration(video_duration, audio_duration);
        let inadequate = self.check_segment_adequacy(timeline, word_counts);

        let mut segment_adequacy = BTreeMap::new();
        for window in timeline.windows() {
            if word_counts.contains_key(&window.id) {
                let pass = !inadequate.iter().any(|f| f.id == window.id);
                segment_adequacy.insert(window.id.clone(), pass);
            }
        }

        CompletionReport {
            video_duration,
            audio_duration,
            padding_delta: video_duration - audio_duration,
            verdict,
            segment_adequacy,
            inadequate,
        }
    }
}

impl Default for CompletionValidator {
    fn default() -> Self {
        Self {
            speech_rate: Self::DEFAULT_SPEECH_RATE,
            speech_buffer: Self::DEFAULT_SPEECH_BUFFER,
            low_padding: Self::DEFAULT_LOW_PADDING,
        }
    }
}
