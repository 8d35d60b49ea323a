// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Doubling in GF(2^n), the subkey step of CMAC, EAX, SIV and OCB.

use parapet_ct::Mask;
use zeroize::Zeroize;

use crate::error::AeadError;

/// Largest supported block, in 64-bit words.
const MAX_WORDS: usize = 16;

/// Low word of the minimal-weight reduction polynomial for an `n`-byte block.
fn reduction_constant(n: usize) -> Option<u64> {
    match n {
        8 => Some(0x1B),
        16 => Some(0x87),
        24 => Some(0x87),
        32 => Some(0x425),
        64 => Some(0x125),
        128 => Some(0x80043),
        _ => None,
    }
}

/// Whether [`poly_double_n`] handles `n`-byte blocks.
pub fn poly_double_supported_size(n: usize) -> bool {
    reduction_constant(n).is_some()
}

/// Multiplies the big-endian block by `x` in place.
///
/// Shifts left by one bit; if the bit shifted out was set, the reduction
/// constant is XORed into the low end. The carry is applied through a mask.
///
/// # Errors
///
/// [`AeadError::InvalidArgument`] for block sizes other than 8, 16, 24, 32,
/// 64 or 128 bytes.
pub fn poly_double_n(block: &mut [u8]) -> Result<(), AeadError> {
    let poly = reduction_constant(block.len()).ok_or(AeadError::InvalidArgument(
        "poly_double_n: unsupported block size",
    ))?;

    let n = block.len() / 8;
    let mut words = [0u64; MAX_WORDS];

    for (w, chunk) in words.iter_mut().zip(block.chunks_exact(8)) {
        *w = u64::from_be_bytes(
            chunk
                .try_into()
                .expect("infallible: chunks_exact yields 8-byte chunks"),
        );
    }

    let carry = Mask::<u64>::expand_top_bit(words[0]).if_set_return(poly);

    for i in 0..n - 1 {
        words[i] = (words[i] << 1) | (words[i + 1] >> 63);
    }
    words[n - 1] = (words[n - 1] << 1) ^ carry;

    for (chunk, w) in block.chunks_exact_mut(8).zip(words.iter()) {
        chunk.copy_from_slice(&w.to_be_bytes());
    }

    words.zeroize();
    Ok(())
}
