//! Target model: turns an endpoint string into a structured descriptor.
//!
//! A target is an address or a hostname plus a port and a transport-security
//! flag. The address/name split is advisory only; it feeds informational
//! fields on findings and never drives protocol decisions.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("empty host in target URL: {0}")]
    EmptyHost(String),
}

/// Immutable descriptor of one network endpoint under test.
///
/// Invariant: at least one of `address` / `name` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckTarget {
    pub address: String,
    pub port: u16,
    pub name: String,
    pub secure: bool,
}

impl CheckTarget {
    pub fn new(
        address: impl Into<String>,
        port: u16,
        name: impl Into<String>,
        secure: bool,
    ) -> Self {
        let target = Self {
            address: address.into(),
            port,
            name: name.into(),
            secure,
        };
        debug_assert!(
            !target.address.is_empty() || !target.name.is_empty(),
            "target needs an address or a name"
        );
        target
    }

    /// Hostname if known, address otherwise.
    pub fn host(&self) -> &str {
        if self.name.is_empty() {
            &self.address
        } else {
            &self.name
        }
    }

    /// Canonical URL projection. Scheme follows the `secure` flag and the
    /// port suffix is elided when it is the scheme default.
    pub fn canonical_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        let default_port = if self.secure { 443 } else { 80 };
        if self.port == default_port {
            format!("{}://{}", scheme, self.host())
        } else {
            format!("{}://{}:{}", scheme, self.host(), self.port)
        }
    }
}

impl fmt::Display for CheckTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_url())
    }
}

/// Parse a URL-like string (`https://host:port`, `host:port`, `host`) into a
/// [`CheckTarget`]. The scheme defaults to `http`, the port to the scheme
/// default, and an unparseable port falls back to the scheme default too.
pub fn parse_target(url: &str) -> Result<CheckTarget, TargetParseError> {
    let (scheme, rest) = match url.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("http", url),
    };
    let secure = scheme == "https";
    let default_port = if secure { 443 } else { 80 };

    let netloc = rest.split('/').next().unwrap_or("");
    let (host, port) = match netloc.rsplit_once(':') {
        Some((host, port_str)) => {
            let port = port_str.parse::<u16>().unwrap_or(default_port);
            (host, port)
        }
        None => (netloc, default_port),
    };

    if host.is_empty() {
        return Err(TargetParseError::EmptyHost(url.to_string()));
    }

    if is_dotted_quad(host) {
        Ok(CheckTarget::new(host, port, "", secure))
    } else {
        Ok(CheckTarget::new("", port, host, secure))
    }
}

fn is_dotted_quad(host: &str) -> bool {
    let parts: Vec<&str> = host.split('.').collect();
    parts.len() == 4
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}
