//! Core abstractions of the check engine.
//!
//! Fundamental building blocks: the Check trait every probe implements, the
//! target model that turns endpoint strings into structured descriptors, the
//! loose per-invocation result bag, the canonical Issue record, and the
//! per-check warmup store populated once before any target is processed.

pub mod check;
pub mod descriptor;
pub mod issue;
pub mod result;
pub mod severity;
pub mod target;
pub mod warmup;

pub use check::{CancelToken, Check, CheckContext, CheckError, Mode};
pub use descriptor::CheckDescriptor;
pub use issue::Issue;
pub use result::{CheckResult, ResultShapeError};
pub use severity::Severity;
pub use target::{parse_target, CheckTarget, TargetParseError};
pub use warmup::{WarmupScope, WarmupStore};
