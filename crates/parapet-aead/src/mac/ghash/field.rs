// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! GF(2^128) arithmetic in GCM's bit order.
//!
//! Elements are held as `u128` with bit `i` the coefficient of `x^i`, i.e.
//! the big-endian block value bit-reversed. In that layout carry-less
//! multiplication is the plain polynomial product and reduction by
//! `x^128 + x^7 + x^2 + x + 1` is a handful of shifts.

use parapet_ct::Mask;

#[inline(always)]
pub(crate) fn to_field(block: &[u8; 16]) -> u128 {
    u128::from_be_bytes(*block).reverse_bits()
}

#[inline(always)]
pub(crate) fn from_field(v: u128) -> [u8; 16] {
    v.reverse_bits().to_be_bytes()
}

/// Loads up to 16 bytes, zero-padding on the right.
#[inline(always)]
pub(crate) fn to_field_padded(bytes: &[u8]) -> u128 {
    debug_assert!(bytes.len() <= 16);
    let mut block = [0u8; 16];
    block[..bytes.len()].copy_from_slice(bytes);
    to_field(&block)
}

/// Reduces `hi·x^128 + lo` modulo the GCM polynomial.
#[inline(always)]
pub(crate) fn reduce(hi: u128, lo: u128) -> u128 {
    let overflow = (hi >> 127) ^ (hi >> 126) ^ (hi >> 121);
    lo ^ hi
        ^ (hi << 1)
        ^ (hi << 2)
        ^ (hi << 7)
        ^ overflow
        ^ (overflow << 1)
        ^ (overflow << 2)
        ^ (overflow << 7)
}

/// Multiplication by `x`.
#[inline(always)]
pub(crate) fn mul_x(v: u128) -> u128 {
    let carry = Mask::<u128>::expand_top_bit(v);
    (v << 1) ^ carry.if_set_return(0x87)
}

/// 64×64 carry-less multiply, one masked shift-and-add per bit of `b`.
#[inline(always)]
pub(crate) fn clmul64_portable(a: u64, b: u64) -> u128 {
    let a = u128::from(a);
    let mut r = 0u128;

    for i in 0..64 {
        let bit = Mask::<u128>::expand(u128::from((b >> i) & 1));
        r ^= bit.if_set_return(a << i);
    }

    r
}

/// 128×128 schoolbook carry-less multiply, returned as `(hi, lo)`.
#[inline(always)]
pub(crate) fn clmul128_portable(a: u128, b: u128) -> (u128, u128) {
    let (a0, a1) = (a as u64, (a >> 64) as u64);
    let (b0, b1) = (b as u64, (b >> 64) as u64);

    let lo = clmul64_portable(a0, b0);
    let hi = clmul64_portable(a1, b1);
    let mid = clmul64_portable(a0, b1) ^ clmul64_portable(a1, b0);

    (hi ^ (mid >> 64), lo ^ (mid << 64))
}

#[inline(always)]
pub(crate) fn mul_portable(a: u128, b: u128) -> u128 {
    let (hi, lo) = clmul128_portable(a, b);
    reduce(hi, lo)
}

/// `table[i] = h·x^i` for `i in 0..128`.
pub(crate) fn power_table(h: u128) -> Vec<u128> {
    let mut table = Vec::with_capacity(128);
    let mut p = h;
    for _ in 0..128 {
        table.push(p);
        p = mul_x(p);
    }
    table
}

/// `x·h` from `h`'s power table. Every entry is read for every multiply.
#[inline(always)]
pub(crate) fn mul_table(table: &[u128], x: u128) -> u128 {
    debug_assert_eq!(table.len(), 128);
    let mut r = 0u128;

    for (i, &entry) in table.iter().enumerate() {
        let bit = Mask::<u128>::expand((x >> i) & 1);
        r ^= bit.if_set_return(entry);
    }

    r
}
