//! Odin Checks - Check Execution Engine
//!
//! This crate provides a trait-based system for running independent
//! vulnerability probes against network targets and normalizing their
//! findings into a canonical record stream.

pub mod checks;
pub mod core;
pub mod error;
pub mod report;
pub mod runner;
pub mod task;

pub use crate::core::{
    parse_target, CancelToken, Check, CheckContext, CheckDescriptor, CheckError, CheckResult,
    CheckTarget, Issue, Mode, Severity, WarmupScope, WarmupStore,
};
pub use crate::error::EngineError;
pub use crate::report::{ErrorLog, NdjsonSink};
pub use crate::runner::{CheckRegistry, EngineConfig, RegistryBuilder, ScanEngine};
pub use crate::task::TaskInput;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
