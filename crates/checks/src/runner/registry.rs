//! Explicit check registry.
//!
//! Replaces dynamic "find a `Check` symbol in every file" discovery with
//! runtime registration: each built-in probe is registered under its source
//! module path, and entries are kept in lexicographic path order so repeated
//! runs over an unchanged check set execute in the same order. A candidate
//! that fails validation is skipped at registration granularity; it never
//! aborts building the registry.

use crate::core::{Check, CheckDescriptor};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct RegistryEntry {
    /// Registration path, the deterministic ordering key.
    pub path: String,
    pub descriptor: CheckDescriptor,
    pub check: Arc<dyn Check>,
}

/// Read-only collection of validated checks, in lexicographic path order.
pub struct CheckRegistry {
    entries: Vec<RegistryEntry>,
}

impl CheckRegistry {
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.descriptor.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.descriptor.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct RegistryBuilder {
    entries: Vec<RegistryEntry>,
    seen_paths: HashSet<String>,
    seen_ids: HashSet<String>,
    skipped: usize,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            seen_paths: HashSet::new(),
            seen_ids: HashSet::new(),
            skipped: 0,
        }
    }

    pub fn register<C: Check + 'static>(&mut self, path: &str, check: C) -> &mut Self {
        self.register_arc(path, Arc::new(check))
    }

    pub fn register_arc(&mut self, path: &str, check: Arc<dyn Check>) -> &mut Self {
        let descriptor = check.descriptor();

        if descriptor.id.is_empty() {
            warn!(path, "skipping check with empty id");
            self.skipped += 1;
            return self;
        }
        if !self.seen_ids.insert(descriptor.id.clone()) {
            warn!(path, id = %descriptor.id, "skipping check with duplicate id");
            self.skipped += 1;
            return self;
        }
        if !self.seen_paths.insert(path.to_string()) {
            warn!(path, "skipping check with duplicate registration path");
            self.skipped += 1;
            return self;
        }

        self.entries.push(RegistryEntry {
            path: path.to_string(),
            descriptor,
            check,
        });
        self
    }

    /// Candidates rejected so far. Rejection is silent apart from log lines,
    /// matching file-granularity failure swallowing during discovery.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn build(mut self) -> CheckRegistry {
        self.entries.sort_by(|a, b| a.path.cmp(&b.path));
        CheckRegistry {
            entries: self.entries,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
