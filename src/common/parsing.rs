// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::{Address, B256};
use std::str::FromStr;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

pub fn parse_hex_bytes(s: &str) -> Option<Vec<u8>> {
    hex::decode(strip_0x(s)).ok()
}

pub fn parse_b256_hex(s: &str) -> Option<B256> {
    let bytes = parse_hex_bytes(s.trim())?;
    if bytes.len() != 32 {
        return None;
    }
    Some(B256::from_slice(&bytes))
}

/// Checksum is not enforced; mixed-case input is accepted as-is.
pub fn parse_address_hex(s: &str) -> Option<Address> {
    let raw = strip_0x(s.trim());
    if raw.len() != 40 {
        return None;
    }
    Address::from_str(raw).ok()
}

/// Comma or whitespace separated addresses, quotes tolerated. Order and
/// duplicates are preserved. The error carries the first bad token.
pub fn parse_address_list(raw: &str) -> Result<Vec<Address>, String> {
    let cleaned = raw.trim_matches(|c| c == '`' || c == '"' || c == '\'' || c == '[' || c == ']');
    let mut out = Vec::new();
    for part in cleaned.split(|c: char| c == ',' || c.is_whitespace()) {
        let p = part.trim().trim_matches(|c| c == '"' || c == '\'');
        if p.is_empty() {
            continue;
        }
        out.push(parse_address_hex(p).ok_or_else(|| p.to_string())?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsers_accept_lower_and_upper_prefixes() {
        assert_eq!(parse_hex_bytes("0Xabcd"), Some(vec![0xab, 0xcd]));
        assert_eq!(parse_b256_hex(&format!("0X{}", "11".repeat(32))), Some(B256::repeat_byte(0x11)));
        assert_eq!(parse_b256_hex("0x1234"), None);
    }

    #[test]
    fn address_parser_requires_full_length() {
        assert_eq!(
            parse_address_hex("0x1df62f291b2e969fb0849d99d9ce41e2f137006e"),
            Some(Address::from_str("0x1df62f291b2e969fb0849d99d9ce41e2f137006e").expect("addr"))
        );
        assert_eq!(parse_address_hex("0x1df62f"), None);
    }

    #[test]
    fn address_list_keeps_order_and_duplicates() {
        let list = parse_address_list(
            "0x90f8bf6a479f320ead074411a4b0e7944ea8c9c1, 0xffcf8fdee72ac11b5c542428b35eef5769c409f0 0x90f8bf6a479f320ead074411a4b0e7944ea8c9c1",
        )
        .expect("list");
        assert_eq!(list.len(), 3);
        assert_eq!(list[0], list[2]);
        assert_ne!(list[0], list[1]);
        assert_eq!(parse_address_list("  ").expect("empty"), Vec::<Address>::new());
    }

    #[test]
    fn address_list_reports_bad_token() {
        let err = parse_address_list("0x90f8bf6a479f320ead074411a4b0e7944ea8c9c1,0xnope")
            .expect_err("bad");
        assert_eq!(err, "0xnope");
    }
}
