use crate::core::Severity;
use serde::{Deserialize, Serialize};

/// Static metadata for one check implementation.
///
/// Fixed when the check is registered and read-only afterwards. Returned by
/// a trait method rather than held as mutable state so two checks can never
/// shadow each other's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDescriptor {
    pub id: String,
    pub severity: Severity,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub poc: Option<String>,
}

impl CheckDescriptor {
    pub fn new(id: impl Into<String>, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity,
            description: description.into(),
            poc: None,
        }
    }

    pub fn with_poc(mut self, poc: impl Into<String>) -> Self {
        self.poc = Some(poc.into());
        self
    }
}
