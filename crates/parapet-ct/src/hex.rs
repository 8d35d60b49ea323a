// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use alloc::vec::Vec;

/// Parses a hexadecimal string into bytes.
///
/// ASCII whitespace is ignored so long vectors can be wrapped across lines.
///
/// # Panics
///
/// Panics on odd length or non-hex characters. Test-only helper.
///
/// # Example
///
/// ```
/// use parapet_ct::hex_to_bytes;
///
/// assert_eq!(hex_to_bytes("dead beef"), vec![0xde, 0xad, 0xbe, 0xef]);
/// ```
pub fn hex_to_bytes(hex: &str) -> Vec<u8> {
    let digits: Vec<u8> = hex
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    assert!(digits.len() % 2 == 0, "hex_to_bytes: odd number of digits");

    digits
        .chunks_exact(2)
        .map(|pair| (nibble(pair[0]) << 4) | nibble(pair[1]))
        .collect()
}

fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("hex_to_bytes: invalid hex digit {:?}", c as char),
    }
}
