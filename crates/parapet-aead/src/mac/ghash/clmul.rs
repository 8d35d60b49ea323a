// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! PCLMULQDQ field multiply for x86_64.
//!
//! Only reachable after the CPU probe confirmed `pclmulqdq` and `sse2`.

use core::arch::x86_64::{
    __m128i, _mm_clmulepi64_si128, _mm_cvtsi128_si64, _mm_set_epi64x, _mm_unpackhi_epi64,
};

use super::field::reduce;

#[inline]
#[target_feature(enable = "pclmulqdq,sse2")]
unsafe fn clmul64(a: __m128i, b: __m128i) -> u128 {
    let r = _mm_clmulepi64_si128(a, b, 0x00);
    let lo = _mm_cvtsi128_si64(r) as u64;
    let hi = _mm_cvtsi128_si64(_mm_unpackhi_epi64(r, r)) as u64;
    (u128::from(hi) << 64) | u128::from(lo)
}

#[inline]
#[target_feature(enable = "pclmulqdq,sse2")]
unsafe fn load(v: u64) -> __m128i {
    _mm_set_epi64x(0, v as i64)
}

/// Field product `a·b`.
///
/// # Safety
///
/// The CPU must support `pclmulqdq` and `sse2`.
#[target_feature(enable = "pclmulqdq,sse2")]
pub(crate) unsafe fn mul(a: u128, b: u128) -> u128 {
    unsafe {
        let (a0, a1) = (load(a as u64), load((a >> 64) as u64));
        let (b0, b1) = (load(b as u64), load((b >> 64) as u64));

        let lo = clmul64(a0, b0);
        let hi = clmul64(a1, b1);
        let mid = clmul64(a0, b1) ^ clmul64(a1, b0);

        reduce(hi ^ (mid >> 64), lo ^ (mid << 64))
    }
}
