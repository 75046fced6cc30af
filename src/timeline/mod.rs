/// JSON boundary types for measured timing documents.
pub mod def;
/// The immutable planned-window table.
pub mod spec;
