//! Detection of Java RMI registries with the remote class loader enabled.
//!
//! Speaks just enough JRMP: negotiate the stream protocol, then send a
//! lookup call carrying a serialized reference to a class the server cannot
//! have. A server with the class loader enabled tries to resolve it and
//! answers `ClassNotFound`; one with the loader disabled says so explicitly.

use crate::core::{
    Check, CheckContext, CheckDescriptor, CheckError, CheckResult, Severity,
};
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const IO_TIMEOUT: Duration = Duration::from_secs(10);

// JRMI magic, version 2, StreamProtocol.
const NEGOTIATION: &[u8] = &[
    0x4a, 0x52, 0x4d, 0x49, 0x00, 0x02, 0x4b, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const PROTOCOL_ACK: u8 = 0x4e;

// JRMP call (0x50) followed by a serialized lookup for a class the server
// cannot know; probe payload as used by metasploit's RMI check.
const CALL_PAYLOAD: &[u8] = &[
    0x50, 0xac, 0xed, 0x00, 0x05, 0x77, 0x22, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0xf6, 0xb6, 0x89, 0x8d, 0x8b, 0xf2, 0x86, 0x43, 0x75, 0x72, 0x00, 0x18, 0x5b,
    0x4c, 0x6a, 0x61, 0x76, 0x61, 0x2e, 0x72, 0x6d, 0x69, 0x2e, 0x73, 0x65, 0x72, 0x76, 0x65,
    0x72, 0x2e, 0x4f, 0x62, 0x6a, 0x49, 0x44, 0x3b, 0x87, 0x13, 0x00, 0xb8, 0xd0, 0x2c, 0x64,
    0x7e, 0x02, 0x00, 0x00, 0x70, 0x78, 0x70, 0x00, 0x00, 0x00, 0x00, 0x77, 0x08, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x73, 0x72, 0x00, 0x14, 0x6d, 0x65, 0x74, 0x61, 0x73,
    0x70, 0x6c, 0x6f, 0x69, 0x74, 0x2e, 0x52, 0x4d, 0x49, 0x4c, 0x6f, 0x61, 0x64, 0x65, 0x72,
    0xa1, 0x65, 0x44, 0xba, 0x26, 0xf9, 0xc2, 0xf4, 0x02, 0x00, 0x00, 0x74, 0x00, 0x28, 0x66,
    0x69, 0x6c, 0x65, 0x3a, 0x52, 0x4d, 0x49, 0x43, 0x6c, 0x61, 0x73, 0x73, 0x4c, 0x6f, 0x61,
    0x64, 0x65, 0x72, 0x53, 0x65, 0x63, 0x75, 0x72, 0x69, 0x74, 0x79, 0x54, 0x65, 0x73, 0x74,
    0x2f, 0x69, 0x71, 0x6e, 0x44, 0x2e, 0x6a, 0x61, 0x72, 0x78, 0x70, 0x77, 0x01, 0x00,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RmiStatus {
    NotExposed,
    NoNegotiation,
    NotVuln,
    Vuln,
}

pub struct RmiClassloaderCheck;

impl RmiClassloaderCheck {
    pub fn new() -> Self {
        Self
    }

    fn do_check(&self, host: &str, port: u16) -> RmiStatus {
        let mut conn = match self.connect(host, port) {
            Some(conn) => conn,
            None => return RmiStatus::NotExposed,
        };

        if !self.negotiate(&mut conn) {
            return RmiStatus::NoNegotiation;
        }

        if self.send_call(&mut conn) {
            RmiStatus::Vuln
        } else {
            RmiStatus::NotVuln
        }
    }

    fn connect(&self, host: &str, port: u16) -> Option<TcpStream> {
        let addr = (host, port).to_socket_addrs().ok()?.next()?;
        let conn = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).ok()?;
        conn.set_read_timeout(Some(IO_TIMEOUT)).ok()?;
        conn.set_write_timeout(Some(IO_TIMEOUT)).ok()?;
        Some(conn)
    }

    fn negotiate(&self, conn: &mut TcpStream) -> bool {
        if conn.write_all(NEGOTIATION).is_err() {
            return false;
        }
        let mut buffer = [0u8; 1024];
        match conn.read(&mut buffer) {
            Ok(n) if n > 0 => buffer[0] == PROTOCOL_ACK,
            _ => false,
        }
    }

    fn send_call(&self, conn: &mut TcpStream) -> bool {
        if conn.write_all(CALL_PAYLOAD).is_err() {
            return false;
        }

        let mut response = Vec::new();
        let mut buffer = [0u8; 1024];
        loop {
            match conn.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => response.extend_from_slice(&buffer[..n]),
                Err(_) => break,
            }
        }

        // Oversimplified but effective: the loader tried (and failed) to
        // resolve our class, rather than refusing to load it at all.
        !contains(&response, b"RMI class loader disabled") && contains(&response, b"ClassNotFound")
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

impl Default for RmiClassloaderCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for RmiClassloaderCheck {
    fn descriptor(&self) -> CheckDescriptor {
        CheckDescriptor::new(
            "detect_RMI_servers",
            Severity::High,
            "Detection of exposed Java RMI servers with class loader enabled",
        )
    }

    fn check(&self, ctx: &CheckContext) -> Result<Vec<CheckResult>, CheckError> {
        ctx.ensure_active()?;
        let target = ctx.target();
        // The probe is a raw socket exchange; prefer the literal address.
        let host = if target.address.is_empty() {
            target.name.as_str()
        } else {
            target.address.as_str()
        };

        let mut results = Vec::new();
        if self.do_check(host, target.port) == RmiStatus::Vuln {
            results.push(CheckResult::new());
        }
        Ok(results)
    }
}
