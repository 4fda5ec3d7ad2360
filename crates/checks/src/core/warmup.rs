//! One-time per-check initialization data.
//!
//! Each check gets its own key/value scope, keyed by check id, so two
//! unrelated checks using the same key name can never overwrite each other's
//! warmup data. The store is populated during the sequential warmup phase
//! and frozen before any target is processed; execution only ever reads it.

use serde_json::Value;
use std::collections::HashMap;

/// Key/value scope owned by a single check.
#[derive(Debug, Default, Clone)]
pub struct WarmupScope {
    values: HashMap<String, Value>,
}

impl WarmupScope {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.values.get(key).unwrap_or(default)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// All warmup scopes, keyed by check id.
#[derive(Debug, Default)]
pub struct WarmupStore {
    scopes: HashMap<String, WarmupScope>,
}

impl WarmupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope_mut(&mut self, check_id: &str) -> &mut WarmupScope {
        self.scopes.entry(check_id.to_string()).or_default()
    }

    pub fn scope(&self, check_id: &str) -> Option<&WarmupScope> {
        self.scopes.get(check_id)
    }
}
