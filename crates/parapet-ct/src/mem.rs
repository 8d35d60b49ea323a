// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Constant-time operations over byte buffers.

use crate::mask::Mask;

/// OR-accumulates `a[i] ^ b[i]` over the common prefix.
///
/// Zero iff both slices agree on every compared byte.
#[inline]
fn diff_accumulator(a: &[u8], b: &[u8]) -> u8 {
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
}

/// Mask set iff `a` and `b` hold identical bytes.
///
/// Both slices are expected to have equal length; a length difference
/// yields a cleared mask (lengths are public).
///
/// # Example
///
/// ```
/// use parapet_ct::ct_is_equal;
///
/// assert!(ct_is_equal(&[1, 2, 3], &[1, 2, 3]).as_bool());
/// assert!(!ct_is_equal(&[1, 2, 3], &[1, 2, 4]).as_bool());
/// ```
#[inline]
pub fn ct_is_equal(a: &[u8], b: &[u8]) -> Mask<u8> {
    if a.len() != b.len() {
        return Mask::cleared();
    }

    Mask::is_zero(diff_accumulator(a, b))
}

/// Mask set iff every byte of `buf` is zero.
#[inline]
pub fn ct_is_zero(buf: &[u8]) -> Mask<u8> {
    Mask::is_zero(buf.iter().fold(0u8, |acc, &b| acc | b))
}

/// Constant-time equality for tags and MACs.
///
/// Returns `false` for slices of different length without touching their
/// content. For equal lengths, every byte is visited regardless of where the
/// first difference sits.
///
/// # Example
///
/// ```
/// use parapet_ct::constant_time_compare;
///
/// assert!(constant_time_compare(&[0xAA; 16], &[0xAA; 16]));
/// assert!(!constant_time_compare(&[0xAA; 16], &[0xAA; 15]));
/// ```
#[inline]
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    ct_is_equal(a, b).as_bool()
}

/// Alias of [`constant_time_compare`].
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    constant_time_compare(a, b)
}

/// Copies `src` into `dst` if `mask` is set, leaves `dst` untouched otherwise.
///
/// Every byte of `dst` is written either way.
///
/// # Panics
///
/// Panics if `dst` and `src` differ in length.
#[inline]
pub fn conditional_copy_mem(mask: Mask<u8>, dst: &mut [u8], src: &[u8]) {
    assert_eq!(dst.len(), src.len(), "conditional_copy_mem: length mismatch");

    for (d, &s) in dst.iter_mut().zip(src.iter()) {
        *d = mask.select(s, *d);
    }
}

/// Swaps `a` and `b` if `cond` is set.
///
/// # Panics
///
/// Panics if `a` and `b` differ in length.
#[inline]
pub fn conditional_swap(cond: Mask<u8>, a: &mut [u8], b: &mut [u8]) {
    assert_eq!(a.len(), b.len(), "conditional_swap: length mismatch");

    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        let t = cond.if_set_return(*x ^ *y);
        *x ^= t;
        *y ^= t;
    }
}

/// `dst[i] ^= src[i]` for every index of `dst`.
///
/// # Panics
///
/// Panics if `src` is shorter than `dst`.
#[inline]
pub fn xor_buf(dst: &mut [u8], src: &[u8]) {
    assert!(src.len() >= dst.len(), "xor_buf: source shorter than destination");

    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d ^= s;
    }
}

/// `out[i] = a[i] ^ b[i]` for every index of `out`.
///
/// # Panics
///
/// Panics if either input is shorter than `out`.
#[inline]
pub fn xor_buf_into(out: &mut [u8], a: &[u8], b: &[u8]) {
    assert!(
        a.len() >= out.len() && b.len() >= out.len(),
        "xor_buf_into: input shorter than output"
    );

    for ((o, x), y) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
        *o = x ^ y;
    }
}
