//! Result normalizer: raw per-check output into canonical [`Issue`] records.
//!
//! Missing fields fall back to the check's descriptor. The issue is always
//! attributed to the URL that was actually scanned; a check reporting its
//! own URL gets that URL folded into the proof-of-concept payload instead,
//! so a probe can never redirect which target a finding counts against.

use crate::core::{CheckDescriptor, CheckResult, Issue};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Build one [`Issue`] from one [`CheckResult`].
///
/// `scanned_url` is the original input URL for the current target pass, not
/// the canonical projection, so output lines match the task input verbatim.
pub fn issue_from_result(
    result: CheckResult,
    descriptor: &CheckDescriptor,
    scanned_url: &str,
    scanner: &str,
    program_id: i64,
) -> Result<Issue, serde_json::Error> {
    let name = result.name.unwrap_or_else(|| descriptor.id.clone());
    let severity = result.severity.unwrap_or(descriptor.severity);
    let description = result
        .description
        .unwrap_or_else(|| descriptor.description.clone());
    let mut poc = result.poc.or_else(|| descriptor.poc.clone());

    let result_url = result.url.unwrap_or_else(|| scanned_url.to_string());
    if result_url != scanned_url {
        poc = Some(fold_url_into_poc(poc, result_url)?);
    }

    Ok(Issue {
        target: scanned_url.to_string(),
        name: Some(name),
        severity,
        description,
        poc,
        scanner: scanner.to_string(),
        program_id,
        discovered_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}

/// Merge the result's own URL into the POC payload. An existing structured
/// (JSON object) POC keeps its fields; a non-JSON POC is preserved under
/// `original_poc`.
fn fold_url_into_poc(poc: Option<String>, url: String) -> Result<String, serde_json::Error> {
    let mut payload = Map::new();
    payload.insert("url".to_string(), Value::String(url));

    match poc {
        None => serde_json::to_string(&payload),
        Some(existing) => match serde_json::from_str::<Value>(&existing) {
            Ok(Value::Object(object)) => {
                payload.extend(object);
                serde_json::to_string(&payload)
            }
            Ok(_) => serde_json::to_string(&payload),
            Err(_) => {
                payload.insert("original_poc".to_string(), Value::String(existing));
                serde_json::to_string(&payload)
            }
        },
    }
}
