//! Check trait and invocation context for pluggable vulnerability probes.
//!
//! ## Design Philosophy: Explicit Registration over Dynamic Loading
//!
//! The original scheme of "drop a file into a folder and the engine finds a
//! `Check` symbol in it" is replaced by an explicit registry of trait
//! objects (see [`crate::runner::registry`]). Every check implements one
//! trait; the compiler performs the contract validation that a dynamic
//! loader would probe for at runtime.
//!
//! ## Why a context instead of per-target construction?
//!
//! Checks are stateless values shared as `Arc<dyn Check>` across worker
//! threads. Everything an invocation needs — the target, the execution mode,
//! the check's warmup data, the out-of-band collaborator host and the
//! cancellation token — travels in a [`CheckContext`] borrowed for that one
//! call. `check` must therefore be safe to call concurrently against
//! different targets, and receives no mutable shared state at all: the
//! warmup view is read-only by the time any target is processed.
//!
//! ## Failure as data
//!
//! `check` returns a `Result`; the scheduler treats an `Err` as "zero
//! results from this check" and records it, so one misbehaving probe never
//! takes down the fan-out. Probes use `?` internally like any other code.

use crate::core::{CheckDescriptor, CheckResult, CheckTarget, WarmupScope};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

const DEFAULT_OOB_HOST: &str = "interactsh.com";

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("deadline exceeded")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

/// Execution mode tag, used only for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Scan,
    Test,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan => write!(f, "scan"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Cooperative cancellation with an optional deadline.
///
/// The scheduler never preempts a running check; a long-running probe is
/// expected to poll [`CancelToken::is_cancelled`] between network calls and
/// bail with [`CheckError::Cancelled`].
#[derive(Debug)]
pub struct CancelToken {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            deadline: timeout.map(|t| Instant::now() + t),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

/// Everything one `check` invocation may read.
pub struct CheckContext<'a> {
    target: &'a CheckTarget,
    mode: Mode,
    warmup: Option<&'a WarmupScope>,
    oob_host: Option<&'a str>,
    cancel: &'a CancelToken,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        target: &'a CheckTarget,
        mode: Mode,
        warmup: Option<&'a WarmupScope>,
        oob_host: Option<&'a str>,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            target,
            mode,
            warmup,
            oob_host,
            cancel,
        }
    }

    pub fn target(&self) -> &CheckTarget {
        self.target
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Warmup value stored by this check's own `warmup` step, if any.
    pub fn warmup_value(&self, key: &str) -> Option<&Value> {
        self.warmup.and_then(|scope| scope.get(key))
    }

    /// Out-of-band collaborator host for XXE/SSRF-style probes. Sourced from
    /// configuration (`ODIN_OOB`) with a fallback default.
    pub fn oob_host(&self) -> &str {
        self.oob_host.unwrap_or(DEFAULT_OOB_HOST)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Bail out with [`CheckError::Cancelled`] once the deadline has passed.
    pub fn ensure_active(&self) -> Result<(), CheckError> {
        if self.is_cancelled() {
            Err(CheckError::Cancelled)
        } else {
            Ok(())
        }
    }
}

pub trait Check: Send + Sync {
    fn descriptor(&self) -> CheckDescriptor;

    fn check(&self, ctx: &CheckContext) -> Result<Vec<CheckResult>, CheckError>;

    /// One-time initialization, run sequentially before any target. The
    /// scope is this check's private slice of the warmup store.
    fn warmup(&self, _scope: &mut WarmupScope) -> Result<(), CheckError> {
        Ok(())
    }
}
