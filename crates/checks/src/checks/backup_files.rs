//! Guessing of exposed backup and temporary files on web servers.

use crate::core::{
    Check, CheckContext, CheckDescriptor, CheckError, CheckResult, Severity,
};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use std::time::Duration;

const BACKUP_EXTENSIONS: &[&str] = &[
    ".bak", ".bkp", ".backup", ".old", ".ori", ".original", ".tmp", "~",
];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct BackupFilesCheck;

impl BackupFilesCheck {
    pub fn new() -> Self {
        Self
    }

    fn client(&self) -> Result<Client, CheckError> {
        // Probe endpoints are often behind self-signed certificates.
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(client)
    }

    fn probe(&self, client: &Client, url: &str) -> Option<CheckResult> {
        let response = match client.get(url).send() {
            Ok(response) => response,
            // Connection failures are expected noise, not findings.
            Err(_) => return None,
        };
        if response.status().as_u16() != 200 {
            return None;
        }

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string()
        };

        Some(
            CheckResult::new()
                .with_url(url)
                .with_description(format!("Possible backup file found: {url}"))
                .with_field("status_code", 200)
                .with_field("content_length", header("content-length"))
                .with_field("content_type", header("content-type")),
        )
    }
}

impl Default for BackupFilesCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for BackupFilesCheck {
    fn descriptor(&self) -> CheckDescriptor {
        CheckDescriptor::new(
            "backup_files_check",
            Severity::Medium,
            "Detection of exposed backup files and temporary files on web servers",
        )
    }

    fn check(&self, ctx: &CheckContext) -> Result<Vec<CheckResult>, CheckError> {
        let client = self.client()?;
        let base_url = ctx.target().canonical_url();
        let mut results = Vec::new();

        for ext in BACKUP_EXTENSIONS {
            ctx.ensure_active()?;
            let url = format!("{base_url}/index{ext}");
            if let Some(result) = self.probe(&client, &url) {
                results.push(result);
            }
        }

        Ok(results)
    }
}
