//! Check execution and orchestration.
//!
//! The registry holds the validated check set in a deterministic order; the
//! engine fans each target out over that set on a bounded worker pool,
//! isolating per-check failures. New checks plug in without touching the
//! execution infrastructure.

pub mod engine;
pub mod registry;

pub use engine::{EngineConfig, ScanEngine, CHECK_TIMEOUT_ENV, MAX_WORKERS_ENV, OOB_HOST_ENV};
pub use registry::{CheckRegistry, RegistryBuilder, RegistryEntry};
