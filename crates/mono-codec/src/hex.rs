//! Hex byte-listing rendering and parsing.
//!
//! The listing format is the one display driver headers expect: each
//! byte as `0xHH, `, a newline before every group of `bytes_per_line`
//! bytes (including the first), and no trailing separator.

use std::fmt::Write;

use crate::{CodecError, Result};

/// Render bytes as a comma-separated `0xHH` listing.
///
/// A newline precedes the first byte of each `bytes_per_line` group,
/// the very first byte included; the trailing `, ` is stripped. Empty
/// input produces an empty string.
///
/// # Panics
/// Panics if `bytes_per_line` is zero.
pub fn format_hex_listing(data: &[u8], bytes_per_line: usize) -> String {
    assert!(bytes_per_line > 0, "bytes_per_line must be positive");

    // "0xHH, " is 6 chars per byte, plus one newline per line group.
    let mut out = String::with_capacity(data.len() * 6 + data.len() / bytes_per_line + 1);
    for (index, byte) in data.iter().enumerate() {
        if index % bytes_per_line == 0 {
            out.push('\n');
        }
        let _ = write!(out, "0x{byte:02X}, ");
    }
    if out.ends_with(", ") {
        out.truncate(out.len() - 2);
    }
    out
}

/// Parse a listing produced by [`format_hex_listing`] back into bytes.
///
/// Tolerates `0x`/`0X` prefixes, commas, and any amount of whitespace
/// between entries, so a round trip through the formatter is exact.
pub fn parse_hex_listing(text: &str) -> Result<Vec<u8>> {
    let tokens = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty());

    let mut data = Vec::new();
    for (index, token) in tokens.enumerate() {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        let value = u8::from_str_radix(digits, 16).map_err(|_| CodecError::Listing {
            index,
            token: token.to_string(),
        })?;
        data.push(value);
    }
    Ok(data)
}
