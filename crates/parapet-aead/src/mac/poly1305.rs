// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Poly1305 one-time authenticator (RFC 8439 §2.5), radix 2^26.
//!
//! The key is consumed by [`Poly1305::finalize_into`]; a new one must be set
//! for every message.

use parapet_ct::Mask;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::AeadError;

const KEY_SIZE: usize = 32;
const BLOCK_SIZE: usize = 16;
const TAG_SIZE: usize = 16;
const LIMB: u32 = 0x3ffffff;

#[inline(always)]
fn le32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(
        bytes[at..at + 4]
            .try_into()
            .expect("infallible: slice is exactly 4 bytes"),
    )
}

/// Poly1305 accumulator, clamped `r` and pad `s`.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct Poly1305 {
    r: [u32; 5],
    h: [u32; 5],
    pad: [u32; 4],
    buffer: [u8; BLOCK_SIZE],
    buffer_len: usize,
    keyed: bool,
}

impl Poly1305 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_key(&self) -> bool {
        self.keyed
    }

    /// # Errors
    ///
    /// [`AeadError::InvalidKeyLength`] unless `key` is 32 bytes.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        if key.len() != KEY_SIZE {
            return Err(AeadError::InvalidKeyLength {
                algorithm: "Poly1305",
                length: key.len(),
            });
        }

        self.zeroize();

        self.r[0] = le32(key, 0) & 0x3ffffff;
        self.r[1] = (le32(key, 3) >> 2) & 0x3ffff03;
        self.r[2] = (le32(key, 6) >> 4) & 0x3ffc0ff;
        self.r[3] = (le32(key, 9) >> 6) & 0x3f03fff;
        self.r[4] = (le32(key, 12) >> 8) & 0x00fffff;

        for i in 0..4 {
            self.pad[i] = le32(key, 16 + 4 * i);
        }

        self.keyed = true;
        Ok(())
    }

    fn block(&mut self, m: &[u8], hibit: u32) {
        let [r0, r1, r2, r3, r4] = self.r.map(u64::from);
        let (s1, s2, s3, s4) = (r1 * 5, r2 * 5, r3 * 5, r4 * 5);

        let h0 = u64::from(self.h[0] + (le32(m, 0) & LIMB));
        let h1 = u64::from(self.h[1] + ((le32(m, 3) >> 2) & LIMB));
        let h2 = u64::from(self.h[2] + ((le32(m, 6) >> 4) & LIMB));
        let h3 = u64::from(self.h[3] + ((le32(m, 9) >> 6) & LIMB));
        let h4 = u64::from(self.h[4] + ((le32(m, 12) >> 8) | hibit));

        let d0 = h0 * r0 + h1 * s4 + h2 * s3 + h3 * s2 + h4 * s1;
        let mut d1 = h0 * r1 + h1 * r0 + h2 * s4 + h3 * s3 + h4 * s2;
        let mut d2 = h0 * r2 + h1 * r1 + h2 * r0 + h3 * s4 + h4 * s3;
        let mut d3 = h0 * r3 + h1 * r2 + h2 * r1 + h3 * r0 + h4 * s4;
        let mut d4 = h0 * r4 + h1 * r3 + h2 * r2 + h3 * r1 + h4 * r0;

        d1 += d0 >> 26;
        self.h[0] = d0 as u32 & LIMB;
        d2 += d1 >> 26;
        self.h[1] = d1 as u32 & LIMB;
        d3 += d2 >> 26;
        self.h[2] = d2 as u32 & LIMB;
        d4 += d3 >> 26;
        self.h[3] = d3 as u32 & LIMB;
        self.h[4] = d4 as u32 & LIMB;

        let h0 = u64::from(self.h[0]) + (d4 >> 26) * 5;
        self.h[0] = h0 as u32 & LIMB;
        self.h[1] += (h0 >> 26) as u32;
    }

    /// # Errors
    ///
    /// [`AeadError::InvalidState`] without a key.
    pub fn update(&mut self, data: &[u8]) -> Result<(), AeadError> {
        if !self.keyed {
            return Err(AeadError::KEY_NOT_SET);
        }

        let mut input = data;

        if self.buffer_len > 0 {
            let take = (BLOCK_SIZE - self.buffer_len).min(input.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&input[..take]);
            self.buffer_len += take;
            input = &input[take..];

            if self.buffer_len < BLOCK_SIZE {
                return Ok(());
            }

            let mut block = self.buffer;
            self.block(&block, 1 << 24);
            block.zeroize();
            self.buffer.zeroize();
            self.buffer_len = 0;
        }

        let mut chunks = input.chunks_exact(BLOCK_SIZE);
        for block in &mut chunks {
            self.block(block, 1 << 24);
        }

        let rest = chunks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffer_len = rest.len();
        Ok(())
    }

    /// Writes the tag, then wipes the key.
    pub fn finalize_into(&mut self, out: &mut [u8; TAG_SIZE]) -> Result<(), AeadError> {
        if !self.keyed {
            return Err(AeadError::KEY_NOT_SET);
        }

        if self.buffer_len > 0 {
            let mut last = [0u8; BLOCK_SIZE];
            last[..self.buffer_len].copy_from_slice(&self.buffer[..self.buffer_len]);
            last[self.buffer_len] = 1;
            self.block(&last, 0);
            last.zeroize();
        }

        let mut h = self.h;

        let mut c = h[1] >> 26;
        h[1] &= LIMB;
        h[2] += c;
        c = h[2] >> 26;
        h[2] &= LIMB;
        h[3] += c;
        c = h[3] >> 26;
        h[3] &= LIMB;
        h[4] += c;
        c = h[4] >> 26;
        h[4] &= LIMB;
        h[0] += c * 5;
        c = h[0] >> 26;
        h[0] &= LIMB;
        h[1] += c;

        // g = h + 5 - 2^130
        let mut g = [0u32; 5];
        g[0] = h[0] + 5;
        c = g[0] >> 26;
        g[0] &= LIMB;
        g[1] = h[1] + c;
        c = g[1] >> 26;
        g[1] &= LIMB;
        g[2] = h[2] + c;
        c = g[2] >> 26;
        g[2] &= LIMB;
        g[3] = h[3] + c;
        c = g[3] >> 26;
        g[3] &= LIMB;
        g[4] = (h[4] + c).wrapping_sub(1 << 26);

        // g is the reduced value unless the subtraction borrowed.
        let use_g = !Mask::<u32>::expand_top_bit(g[4]);
        for i in 0..5 {
            h[i] = use_g.select(g[i], h[i]);
        }

        let w0 = h[0] | (h[1] << 26);
        let w1 = (h[1] >> 6) | (h[2] << 20);
        let w2 = (h[2] >> 12) | (h[3] << 14);
        let w3 = (h[3] >> 18) | (h[4] << 8);

        let mut f = u64::from(w0) + u64::from(self.pad[0]);
        out[0..4].copy_from_slice(&(f as u32).to_le_bytes());
        f = u64::from(w1) + u64::from(self.pad[1]) + (f >> 32);
        out[4..8].copy_from_slice(&(f as u32).to_le_bytes());
        f = u64::from(w2) + u64::from(self.pad[2]) + (f >> 32);
        out[8..12].copy_from_slice(&(f as u32).to_le_bytes());
        f = u64::from(w3) + u64::from(self.pad[3]) + (f >> 32);
        out[12..16].copy_from_slice(&(f as u32).to_le_bytes());

        h.zeroize();
        g.zeroize();
        self.zeroize();
        Ok(())
    }
}

impl core::fmt::Debug for Poly1305 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Poly1305 {{ [protected] }}")
    }
}
