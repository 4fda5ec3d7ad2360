//! Execution scheduler: fan a target out over every registered check.
//!
//! Targets are processed one at a time; for each target every check in the
//! registry runs on a bounded rayon pool sized `min(max_workers, checks)`.
//! Each invocation is isolated: an error (or panic) inside one check is
//! logged with the check and target identity and contributes zero results,
//! never aborting siblings. Shrinking the pool to one worker serializes
//! execution but must yield the same result set.

use crate::core::{
    parse_target, CancelToken, CheckContext, CheckError, CheckTarget, Issue, Mode, WarmupStore,
};
use crate::error::EngineError;
use crate::report::{issue_from_result, ErrorLog};
use crate::runner::registry::{CheckRegistry, RegistryEntry};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;
use tracing::debug;

/// Env override for the worker pool ceiling. Setting it to 1 forces
/// serialized execution.
pub const MAX_WORKERS_ENV: &str = "ODIN_MAX_WORKERS";
/// Env override for the out-of-band collaborator host.
pub const OOB_HOST_ENV: &str = "ODIN_OOB";
/// Env override for the per-invocation deadline, in seconds.
pub const CHECK_TIMEOUT_ENV: &str = "ODIN_CHECK_TIMEOUT";

const DEFAULT_WORKER_CAP: usize = 50;

fn default_max_workers() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    DEFAULT_WORKER_CAP.min(cpus * 2)
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_workers: usize,
    pub check_timeout: Option<Duration>,
    pub oob_host: Option<String>,
    pub scanner_name: String,
    pub mode: Mode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            check_timeout: None,
            oob_host: None,
            scanner_name: "OdinTemplatesScanner".to_string(),
            mode: Mode::Scan,
        }
    }
}

impl EngineConfig {
    /// Defaults plus environment overrides. Invalid override values are
    /// reported as warnings and ignored.
    pub fn from_env(errors: &ErrorLog) -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(MAX_WORKERS_ENV) {
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => config.max_workers = n,
                _ => errors.warning(format!("Invalid {MAX_WORKERS_ENV} value: {raw}")),
            }
        }
        if let Ok(raw) = std::env::var(CHECK_TIMEOUT_ENV) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.check_timeout = Some(Duration::from_secs(secs)),
                _ => errors.warning(format!("Invalid {CHECK_TIMEOUT_ENV} value: {raw}")),
            }
        }
        if let Ok(host) = std::env::var(OOB_HOST_ENV) {
            if !host.is_empty() {
                config.oob_host = Some(host);
            }
        }

        config
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

pub struct ScanEngine {
    registry: CheckRegistry,
    config: EngineConfig,
    warmup: WarmupStore,
    pool: rayon::ThreadPool,
}

impl ScanEngine {
    pub fn new(registry: CheckRegistry, config: EngineConfig) -> Result<Self, EngineError> {
        if registry.is_empty() {
            return Err(EngineError::EmptyRegistry);
        }
        let workers = config.max_workers.min(registry.len()).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("odin-check-{i}"))
            .build()?;

        Ok(Self {
            registry,
            config,
            warmup: WarmupStore::new(),
            pool,
        })
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run every check's warmup once, sequentially, before any target.
    /// A failing warmup is logged; the check stays registered and will run
    /// with whatever warmup data exists.
    pub fn warm_up(&mut self, errors: &ErrorLog) {
        for entry in self.registry.entries() {
            let scope = self.warmup.scope_mut(&entry.descriptor.id);
            if let Err(e) = entry.check.warmup(scope) {
                errors.warning(format!("Warmup failed for check {}: {e}", entry.descriptor.id));
            }
        }
    }

    /// Run every registered check against one target URL and return the
    /// normalized issues. Per-check failures are recorded on the error
    /// stream; only an unusable URL short-circuits to an empty result.
    pub fn scan_target(&self, url: &str, program_id: i64, errors: &ErrorLog) -> Vec<Issue> {
        let target = match parse_target(url) {
            Ok(target) => target,
            Err(e) => {
                errors.error(format!("Error processing URL {url}: {e}"));
                return Vec::new();
            }
        };

        debug!(url, checks = self.registry.len(), "scanning target");

        self.pool.install(|| {
            self.registry
                .entries()
                .par_iter()
                .flat_map_iter(|entry| self.run_one(entry, &target, url, program_id, errors))
                .collect()
        })
    }

    fn run_one(
        &self,
        entry: &RegistryEntry,
        target: &CheckTarget,
        url: &str,
        program_id: i64,
        errors: &ErrorLog,
    ) -> Vec<Issue> {
        let id = entry.descriptor.id.as_str();
        let cancel = CancelToken::new(self.config.check_timeout);
        let ctx = CheckContext::new(
            target,
            self.config.mode,
            self.warmup.scope(id),
            self.config.oob_host.as_deref(),
            &cancel,
        );

        // Checks are arbitrary probe code; contain panics as well as errors.
        let outcome = catch_unwind(AssertUnwindSafe(|| entry.check.check(&ctx)));

        let results = match outcome {
            Ok(Ok(results)) => results,
            Ok(Err(CheckError::Cancelled)) => {
                errors.warning(format!("Check {id} timed out for {url}"));
                return Vec::new();
            }
            Ok(Err(e)) => {
                errors.warning(format!("Error running check {id} for {url}: {e}"));
                return Vec::new();
            }
            Err(_) => {
                errors.warning(format!("Check {id} panicked for {url}"));
                return Vec::new();
            }
        };

        results
            .into_iter()
            .filter_map(|raw| {
                match issue_from_result(
                    raw,
                    &entry.descriptor,
                    url,
                    &self.config.scanner_name,
                    program_id,
                ) {
                    Ok(issue) => Some(issue),
                    Err(e) => {
                        errors.warning(format!("Invalid result in check {id}: {e}"));
                        None
                    }
                }
            })
            .collect()
    }
}
