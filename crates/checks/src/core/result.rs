use crate::core::Severity;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResultShapeError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// One raw finding emitted by a single check invocation.
///
/// Deliberately loose: every field is optional and arbitrary extra key/value
/// pairs ride along. Missing fields are filled in from the check's
/// descriptor during normalization, so a probe only states what it actually
/// observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckResult {
    pub url: Option<String>,
    pub name: Option<String>,
    pub severity: Option<Severity>,
    pub description: Option<String>,
    pub poc: Option<String>,
    pub extra: Map<String, Value>,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_poc(mut self, poc: impl Into<String>) -> Self {
        self.poc = Some(poc.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Build a result from a loose JSON value, for checks that construct
    /// findings out of external tool output. Anything but an object is an
    /// unsupported shape.
    pub fn from_value(value: Value) -> Result<Self, ResultShapeError> {
        let object = match value {
            Value::Object(object) => object,
            Value::Null => return Err(ResultShapeError::NotAnObject("null")),
            Value::Bool(_) => return Err(ResultShapeError::NotAnObject("a boolean")),
            Value::Number(_) => return Err(ResultShapeError::NotAnObject("a number")),
            Value::String(_) => return Err(ResultShapeError::NotAnObject("a string")),
            Value::Array(_) => return Err(ResultShapeError::NotAnObject("an array")),
        };

        let mut result = CheckResult::new();
        for (key, value) in object {
            match (key.as_str(), &value) {
                ("url", Value::String(s)) => result.url = Some(s.clone()),
                ("name", Value::String(s)) => result.name = Some(s.clone()),
                ("severity", Value::String(s)) => result.severity = s.parse().ok(),
                ("description", Value::String(s)) => result.description = Some(s.clone()),
                ("poc", Value::String(s)) => result.poc = Some(s.clone()),
                _ => {
                    result.extra.insert(key, value);
                }
            }
        }
        Ok(result)
    }
}
