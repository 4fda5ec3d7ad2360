//! Task input: the JSON object read once at startup.
//!
//! `{ "program_id": <int>, "params": { "urls": [...] } }`. A missing file,
//! unparseable JSON, missing `program_id` or empty `urls` are the fatal
//! configuration errors of a run.

use crate::error::EngineError;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawTask {
    program_id: Option<i64>,
    #[serde(default)]
    params: RawParams,
}

#[derive(Debug, Default, Deserialize)]
struct RawParams {
    #[serde(default)]
    urls: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TaskInput {
    pub program_id: i64,
    pub urls: Vec<String>,
}

impl TaskInput {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let data = fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                EngineError::InputNotFound(path.to_path_buf())
            } else {
                EngineError::Io(e)
            }
        })?;
        let raw: RawTask = serde_json::from_str(&data).map_err(EngineError::InvalidInput)?;

        let program_id = raw.program_id.ok_or(EngineError::MissingProgramId)?;
        if raw.params.urls.is_empty() {
            return Err(EngineError::NoUrls);
        }

        Ok(Self {
            program_id,
            urls: raw.params.urls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_task(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_a_well_formed_task() {
        let (_dir, path) =
            write_task(r#"{"program_id": 42, "params": {"urls": ["https://a", "http://b:8080"]}}"#);
        let task = TaskInput::load(&path).unwrap();
        assert_eq!(task.program_id, 42);
        assert_eq!(task.urls.len(), 2);
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = TaskInput::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, EngineError::InputNotFound(_)));
    }

    #[test]
    fn malformed_json_is_fatal() {
        let (_dir, path) = write_task("{not json");
        assert!(matches!(
            TaskInput::load(&path).unwrap_err(),
            EngineError::InvalidInput(_)
        ));
    }

    #[test]
    fn missing_program_id_is_fatal() {
        let (_dir, path) = write_task(r#"{"params": {"urls": ["https://a"]}}"#);
        assert!(matches!(
            TaskInput::load(&path).unwrap_err(),
            EngineError::MissingProgramId
        ));
    }

    #[test]
    fn empty_urls_is_fatal() {
        let (_dir, path) = write_task(r#"{"program_id": 1, "params": {"urls": []}}"#);
        assert!(matches!(TaskInput::load(&path).unwrap_err(), EngineError::NoUrls));

        let (_dir, path) = write_task(r#"{"program_id": 1}"#);
        assert!(matches!(TaskInput::load(&path).unwrap_err(), EngineError::NoUrls));
    }
}
