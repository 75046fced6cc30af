/// Convenience result type used across cuesync.
pub type SyncResult<T> = Result<T, SyncError>;

/// Top-level error taxonomy used by scheduler APIs.
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    /// Malformed timeline or callback table. Fatal before any segment runs.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Illegal clock mutation (negative or non-finite advance).
    #[error("clock error: {0}")]
    Clock(String),

    /// A segment callback failed; the whole run is aborted.
    #[error("segment '{id}' aborted the run")]
    Callback {
        /// Id of the segment whose callback failed.
        id: String,
        /// The callback's own failure.
        #[source]
        source: Box<SyncError>,
    },

    /// Errors when serializing or deserializing boundary documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SyncError {
    /// Build a [`SyncError::Clock`] value.
    pub fn clock(msg: impl Into<String>) -> Self {
        Self::Clock(msg.into())
    }

    /// Build a [`SyncError::Callback`] value.
    pub fn callback(id: impl Into<String>, source: SyncError) -> Self {
        Self::Callback {
            id: id.into(),
            source: Box::new(source),
        }
    }

    /// Build a [`SyncError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Timeline construction and callback-table errors.
///
/// All variants are fatal at construction time: a timeline that fails
/// validation never reaches the runner.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The timeline contains no segments.
    #[error("timeline has no segments")]
    Empty,

    /// Two segments share the same id.
    #[error("segment '{id}' duplicates an earlier segment id")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },

    /// A window carries a NaN or infinite boundary.
    #[error("segment '{id}' has a non-finite window boundary")]
    NonFinite {
        /// Offending segment id.
        id: String,
    },

    /// A window starts before zero.
    #[error("segment '{id}' starts at {start}s, before the timeline origin")]
    NegativeStart {
        /// Offending segment id.
        id: String,
        /// The negative start cue.
        start: f64,
    },

    /// A window ends before it starts.
    #[error("segment '{id}' ends at {end}s, before its start at {start}s")]
    InvertedWindow {
        /// Offending segment id.
        id: String,
        /// Window start cue.
        start: f64,
        /// Window end cue.
        end: f64,
    },

    /// A window starts before the previous window ends.
    #[error("segment '{id}' starts {overlap}s before the previous segment ends")]
    Overlap {
        /// Offending segment id.
        id: String,
        /// Seconds of overlap with the previous window.
        overlap: f64,
    },

    /// A window starts strictly after the previous window ends and authored
    /// gaps were not opted into.
    #[error("{gap}s gap before segment '{id}' (previous segment ends at {prev_end}s)")]
    Gap {
        /// Offending segment id.
        id: String,
        /// End cue of the previous window.
        prev_end: f64,
        /// Width of the gap in seconds.
        gap: f64,
    },

    /// A segment in the timeline has no registered callback.
    #[error("segment '{id}' has no registered callback")]
    MissingCallback {
        /// Segment id with no callback table entry.
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages_name_the_segment() {
        let e = ConfigError::Gap {
            id: "07_step2".to_string(),
            prev_end: 29.59,
            gap: 0.4,
        };
        let msg = e.to_string();
        assert!(msg.contains("07_step2"));
        assert!(msg.contains("29.59"));
    }

    #[test]
    fn callback_error_wraps_source() {
        let inner = SyncError::clock("advance must be non-negative");
        let e = SyncError::callback("03_setup", inner);
        assert!(e.to_string().contains("03_setup"));
        let SyncError::Callback { source, .. } = e else {
            panic!("expected callback variant");
        };
        assert!(matches!(*source, SyncError::Clock(_)));
    }

    #[test]
    fn config_error_converts_into_sync_error() {
        let e: SyncError = ConfigError::Empty.into();
        assert!(matches!(e, SyncError::Config(ConfigError::Empty)));
    }
}
