//! Output sinks: the NDJSON issue stream and the append-only error stream.
//!
//! Both are shared by concurrent check invocations, so every write is
//! serialized behind a mutex and emits exactly one complete line. A failed
//! write affects that one record only.

use crate::core::Issue;
use anyhow::{anyhow, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::error;

/// Newline-delimited JSON stream of [`Issue`] records.
pub struct NdjsonSink {
    writer: Mutex<BufWriter<File>>,
}

impl NdjsonSink {
    /// Create (or truncate) the output file.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Append one encoded record. Atomic with respect to other writers.
    pub fn write(&self, issue: &Issue) -> Result<()> {
        let line = serde_json::to_string(issue)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow!("output sink lock poisoned"))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

enum ErrorStream {
    File(Mutex<File>),
    Stderr,
}

/// Append-only error stream, one `[LEVEL] message` line per event.
pub struct ErrorLog {
    stream: ErrorStream,
}

impl ErrorLog {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            stream: ErrorStream::File(Mutex::new(file)),
        })
    }

    /// Log to stderr instead of a file; used by the local debug runner.
    pub fn stderr() -> Self {
        Self {
            stream: ErrorStream::Stderr,
        }
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.write("ERROR", message.as_ref());
    }

    pub fn warning(&self, message: impl AsRef<str>) {
        self.write("WARNING", message.as_ref());
    }

    fn write(&self, level: &str, message: &str) {
        match &self.stream {
            ErrorStream::File(file) => {
                let Ok(mut file) = file.lock() else {
                    error!(level, message, "error stream lock poisoned");
                    return;
                };
                if let Err(e) = writeln!(file, "[{level}] {message}") {
                    // Last-resort channel; nothing left to report to but the log.
                    error!(level, message, "failed to write error stream: {e}");
                }
            }
            ErrorStream::Stderr => eprintln!("[{level}] {message}"),
        }
    }
}
