/// Post-render duration and plan-adequacy checks.
pub mod completion;
/// Narration script and word counts.
pub mod script;
