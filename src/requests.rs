//! Request lists for batch runs.
//!
//! Payloads are written as hex, one block per line:
//!
//! ```text
//! # SELECT
//! 00 40 06 00 12 34 56 01 ca fd
//! 0x00:0x90:0x00:0x90
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.
//!
//! # Example
//! ```rust
//! use t1_bridge::requests::parse_hex;
//!
//! assert_eq!(parse_hex("00 90 00 90").unwrap(), vec![0x00, 0x90, 0x00, 0x90]);
//! ```
use std::{fs, io, path::Path};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read request file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid hex on line {line}: {reason}")]
    InvalidHex { line: usize, reason: String },
}

/// Parses a hex string into bytes.
///
/// Whitespace and `:` separate bytes, each byte may carry a `0x` prefix, and
/// consecutive digits without separators are read in pairs.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();

    for token in text.split(|c: char| c.is_whitespace() || c == ':') {
        let token = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        if token.is_empty() {
            continue;
        }
        if token.len() % 2 != 0 {
            return Err(format!("odd number of digits in '{token}'"));
        }

        let digits = token.as_bytes();
        for pair in digits.chunks(2) {
            let pair = std::str::from_utf8(pair).map_err(|_| format!("non-ascii '{token}'"))?;
            let byte =
                u8::from_str_radix(pair, 16).map_err(|_| format!("invalid digits '{pair}'"))?;
            bytes.push(byte);
        }
    }

    Ok(bytes)
}

/// Reads one request per non-comment line.
pub fn load_requests(path: &Path) -> Result<Vec<Vec<u8>>, RequestError> {
    let content = fs::read_to_string(path)?;
    parse_requests(&content)
}

pub fn parse_requests(content: &str) -> Result<Vec<Vec<u8>>, RequestError> {
    let mut requests = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let payload = parse_hex(line).map_err(|reason| RequestError::InvalidHex {
            line: i + 1,
            reason,
        })?;
        requests.push(payload);
    }

    Ok(requests)
}
