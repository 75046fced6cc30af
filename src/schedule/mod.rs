/// The single monotonic counter of elapsed composed time.
pub mod clock;
/// Passive per-segment timing diagnostics.
pub mod drift;
/// Guaranteed trailing idle time after the last segment.
pub mod padding;
/// Sequential segment execution with local drift correction.
pub mod runner;
