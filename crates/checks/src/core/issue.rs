use crate::core::Severity;
use serde::{Deserialize, Serialize};

fn is_empty(s: &str) -> bool {
    s.is_empty()
}

/// Canonical, scanner-agnostic finding record.
///
/// Terminal value: built once by the normalizer, written to the output
/// stream and discarded. Empty fields are omitted from the encoded record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub target: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,

    pub severity: Severity,

    #[serde(skip_serializing_if = "is_empty", default)]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub poc: Option<String>,

    pub scanner: String,

    pub program_id: i64,

    pub discovered_at: String,
}
