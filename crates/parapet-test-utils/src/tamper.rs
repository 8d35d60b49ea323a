// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Corruption helpers for authentication tests.

/// Calls `callback` once per bit of `data`, each time with a copy in which
/// exactly that bit is flipped.
///
/// The callback receives `(byte_index, bit_index, corrupted)`.
///
/// # Example
/// ```
/// use parapet_test_utils::for_each_bit_flip;
///
/// let mut n = 0;
/// for_each_bit_flip(&[0u8; 2], |_, _, c| {
///     assert_eq!(c.iter().map(|b| b.count_ones()).sum::<u32>(), 1);
///     n += 1;
/// });
/// assert_eq!(n, 16);
/// ```
pub fn for_each_bit_flip<F>(data: &[u8], mut callback: F)
where
    F: FnMut(usize, u8, &[u8]),
{
    let mut corrupted = data.to_vec();

    for byte in 0..data.len() {
        for bit in 0..8u8 {
            corrupted[byte] ^= 1 << bit;
            callback(byte, bit, &corrupted);
            corrupted[byte] ^= 1 << bit;
        }
    }
}

/// Calls `callback` with every strict prefix of `data`, longest first.
///
/// # Example
/// ```
/// use parapet_test_utils::for_each_truncation;
///
/// let mut lens = Vec::new();
/// for_each_truncation(&[1, 2, 3], |p| lens.push(p.len()));
/// assert_eq!(lens, [2, 1, 0]);
/// ```
pub fn for_each_truncation<F>(data: &[u8], mut callback: F)
where
    F: FnMut(&[u8]),
{
    for len in (0..data.len()).rev() {
        callback(&data[..len]);
    }
}
