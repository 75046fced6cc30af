//! Narration script carried alongside a timeline.
//!
//! The measurement tool keeps the spoken text per segment; word counts
//! derived from it drive the plan-adequacy check.

use std::collections::BTreeMap;

/// One segment's narration text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NarrationLine {
    /// Segment id this line is spoken over.
    pub id: String,
    /// The spoken text.
    pub text: String,
}

impl NarrationLine {
    /// Build a line from a segment id and its text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Whitespace-separated word count of the line.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Ordered narration lines for a composition.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NarrationScript {
    lines: Vec<NarrationLine>,
}

impl NarrationScript {
    /// Build a script from its lines.
    pub fn new(lines: Vec<NarrationLine>) -> Self {
        Self { lines }
    }

    /// The lines in timeline order.
    pub fn lines(&self) -> &[NarrationLine] {
        &self.lines
    }

    /// Word counts keyed by segment id. Later duplicates win, matching the
    /// last-entry-wins behavior of the measurement tool's exports.
    pub fn word_counts(&self) -> BTreeMap<String, usize> {
        self.lines
            .iter()
            .map(|l| (l.id.clone(), l.word_count()))
            .collect()
    }
}
