//! Normalization and output: raw check results become canonical Issue
//! records and are appended to thread-safe sinks.

pub mod normalize;
pub mod sink;

pub use normalize::issue_from_result;
pub use sink::{ErrorLog, NdjsonSink};
