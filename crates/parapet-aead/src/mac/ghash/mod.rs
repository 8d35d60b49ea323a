// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! GHASH, GCM's polynomial hash over GF(2^128).
//!
//! The field multiply is a strategy picked once per process:
//!
//! - [`GhashBackend::Clmul`]: x86_64 carry-less multiply instruction
//! - [`GhashBackend::PowerTable`]: per-key table of `H·x^i`, masked lookups
//! - [`GhashBackend::Portable`]: 64-step masked shift-and-add
//!
//! All three share one reduction and produce identical results.

#[cfg(test)]
mod tests;

#[cfg(all(target_arch = "x86_64", not(target_family = "wasm")))]
mod clmul;
pub(crate) mod field;

use std::sync::OnceLock;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::AeadError;
use crate::feature_detector::FeatureDetector;

use field::{from_field, mul_portable, mul_table, power_table, to_field, to_field_padded};

const BLOCK_SIZE: usize = 16;

/// Longest plaintext GCM may process under one nonce: `2^39 − 256` bits.
const MAX_TEXT_BYTES: u64 = (1 << 36) - 32;

/// Field multiply implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhashBackend {
    Clmul,
    PowerTable,
    Portable,
}

impl GhashBackend {
    pub fn name(self) -> &'static str {
        match self {
            GhashBackend::Clmul => "clmul",
            GhashBackend::PowerTable => "power-table",
            GhashBackend::Portable => "portable",
        }
    }

    /// Whether this CPU can run the backend.
    pub fn is_available(self) -> bool {
        match self {
            GhashBackend::Clmul => FeatureDetector::new().has_clmul(),
            GhashBackend::PowerTable | GhashBackend::Portable => true,
        }
    }

    pub(crate) fn select(detector: &FeatureDetector) -> Self {
        if detector.has_clmul() {
            GhashBackend::Clmul
        } else {
            GhashBackend::PowerTable
        }
    }

    /// Process-wide choice, probed on first use.
    pub fn detected() -> Self {
        static BACKEND: OnceLock<GhashBackend> = OnceLock::new();
        *BACKEND.get_or_init(|| {
            let backend = Self::select(&FeatureDetector::new());
            tracing::debug!(backend = backend.name(), "GHASH backend selected");
            backend
        })
    }
}

/// GHASH state: hash subkey, AD digest and the running accumulator.
///
/// Associated data is hashed once when set and the digest is reused as the
/// starting point of every following message.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Ghash {
    #[zeroize(skip)]
    backend: GhashBackend,
    h: u128,
    table: Vec<u128>,
    ad_digest: u128,
    ad_len: u64,
    acc: u128,
    text_len: u64,
    partial: [u8; BLOCK_SIZE],
    partial_len: usize,
    mask: [u8; BLOCK_SIZE],
    keyed: bool,
}

impl Default for Ghash {
    fn default() -> Self {
        Self::new()
    }
}

impl Ghash {
    /// GHASH on the process-wide backend ([`GhashBackend::detected`]).
    pub fn new() -> Self {
        Self::build(GhashBackend::detected())
    }

    /// GHASH on an explicit backend.
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidArgument`] if the CPU cannot run `backend`.
    pub fn with_backend(backend: GhashBackend) -> Result<Self, AeadError> {
        if !backend.is_available() {
            return Err(AeadError::InvalidArgument(
                "GHASH backend not supported on this CPU",
            ));
        }
        Ok(Self::build(backend))
    }

    fn build(backend: GhashBackend) -> Self {
        Self {
            backend,
            h: 0,
            table: Vec::new(),
            ad_digest: 0,
            ad_len: 0,
            acc: 0,
            text_len: 0,
            partial: [0; BLOCK_SIZE],
            partial_len: 0,
            mask: [0; BLOCK_SIZE],
            keyed: false,
        }
    }

    pub fn backend(&self) -> GhashBackend {
        self.backend
    }

    pub fn has_key(&self) -> bool {
        self.keyed
    }

    /// Installs the hash subkey `H` and drops any previous AD and message.
    pub fn set_key(&mut self, h: &[u8; BLOCK_SIZE]) {
        self.clear();
        self.h = to_field(h);
        if self.backend == GhashBackend::PowerTable {
            self.table = power_table(self.h);
        }
        self.keyed = true;
    }

    /// `acc ← acc·H` with the active backend, once per whole block of `data`.
    /// A trailing partial block is zero-padded.
    fn absorb(&self, mut acc: u128, data: &[u8]) -> u128 {
        match self.backend {
            #[cfg(all(target_arch = "x86_64", not(target_family = "wasm")))]
            GhashBackend::Clmul => {
                for block in data.chunks(BLOCK_SIZE) {
                    // SAFETY: `Clmul` is only constructed once the CPU probe succeeded.
                    acc = unsafe { clmul::mul(acc ^ to_field_padded(block), self.h) };
                }
            }
            #[cfg(not(all(target_arch = "x86_64", not(target_family = "wasm"))))]
            GhashBackend::Clmul => {
                for block in data.chunks(BLOCK_SIZE) {
                    acc = mul_portable(acc ^ to_field_padded(block), self.h);
                }
            }
            GhashBackend::PowerTable => {
                for block in data.chunks(BLOCK_SIZE) {
                    acc = mul_table(&self.table, acc ^ to_field_padded(block));
                }
            }
            GhashBackend::Portable => {
                for block in data.chunks(BLOCK_SIZE) {
                    acc = mul_portable(acc ^ to_field_padded(block), self.h);
                }
            }
        }
        acc
    }

    fn lengths_block(ad_len: u64, text_len: u64) -> u128 {
        let mut block = [0u8; BLOCK_SIZE];
        block[..8].copy_from_slice(&(ad_len * 8).to_be_bytes());
        block[8..].copy_from_slice(&(text_len * 8).to_be_bytes());
        to_field(&block)
    }

    fn checked_len(len: usize) -> Result<u64, AeadError> {
        u64::try_from(len)
            .ok()
            .filter(|l| l.checked_mul(8).is_some())
            .ok_or(AeadError::InvalidArgument("GHASH input too long"))
    }

    /// Hashes `ad` and keeps the digest for every following message.
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidState`] without a key, [`AeadError::InvalidArgument`]
    /// if the bit length overflows 64 bits.
    pub fn set_associated_data(&mut self, ad: &[u8]) -> Result<(), AeadError> {
        if !self.keyed {
            return Err(AeadError::KEY_NOT_SET);
        }

        let ad_len = Self::checked_len(ad.len())?;
        self.ad_digest = self.absorb(0, ad);
        self.ad_len = ad_len;
        Ok(())
    }

    /// `GHASH(nonce ‖ pad ‖ 0^64 ‖ [len(nonce)]_64)`, GCM's `Y0` for nonces
    /// other than 96 bits.
    pub fn nonce_hash(&self, nonce: &[u8]) -> Result<[u8; BLOCK_SIZE], AeadError> {
        if !self.keyed {
            return Err(AeadError::KEY_NOT_SET);
        }

        let nonce_len = Self::checked_len(nonce.len())?;
        let mut y = self.absorb(0, nonce);
        y = self.absorb(y, &from_field(Self::lengths_block(0, nonce_len)));
        Ok(from_field(y))
    }

    /// Starts a message: the accumulator resumes from the AD digest and the
    /// final tag will be masked with `mask` (GCM's `E(K, Y0)`).
    pub fn start(&mut self, mask: &[u8; BLOCK_SIZE]) {
        self.acc = self.ad_digest;
        self.text_len = 0;
        self.partial.zeroize();
        self.partial_len = 0;
        self.mask.copy_from_slice(mask);
    }

    fn text_len_after(&self, additional: usize) -> Result<u64, AeadError> {
        self.text_len
            .checked_add(additional as u64)
            .filter(|&l| l <= MAX_TEXT_BYTES)
            .ok_or(AeadError::InvalidArgument(
                "GCM: message exceeds 2^39 - 256 bits",
            ))
    }

    /// Whether `additional` more ciphertext bytes stay within GCM's limit.
    pub fn check_room(&self, additional: usize) -> Result<(), AeadError> {
        self.text_len_after(additional).map(|_| ())
    }

    /// Hashes ciphertext. Partial blocks are buffered across calls.
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidArgument`] past GCM's per-nonce plaintext limit.
    pub fn update(&mut self, data: &[u8]) -> Result<(), AeadError> {
        self.text_len = self.text_len_after(data.len())?;

        let mut input = data;

        if self.partial_len > 0 {
            let take = (BLOCK_SIZE - self.partial_len).min(input.len());
            self.partial[self.partial_len..self.partial_len + take].copy_from_slice(&input[..take]);
            self.partial_len += take;
            input = &input[take..];

            if self.partial_len < BLOCK_SIZE {
                return Ok(());
            }

            self.acc = self.absorb(self.acc, &self.partial);
            self.partial.zeroize();
            self.partial_len = 0;
        }

        let whole = input.len() - input.len() % BLOCK_SIZE;
        self.acc = self.absorb(self.acc, &input[..whole]);

        let rest = &input[whole..];
        self.partial[..rest.len()].copy_from_slice(rest);
        self.partial_len = rest.len();
        Ok(())
    }

    /// Writes the first `out.len()` bytes of the tag and ends the message.
    ///
    /// # Panics
    ///
    /// Panics if `out` is longer than 16 bytes.
    pub fn final_into(&mut self, out: &mut [u8]) {
        assert!(out.len() <= BLOCK_SIZE, "GHASH: tag longer than a block");

        let mut acc = self.absorb(self.acc, &self.partial[..self.partial_len]);
        acc = self.absorb(acc, &from_field(Self::lengths_block(self.ad_len, self.text_len)));

        let mut tag = from_field(acc);
        parapet_ct::xor_buf(&mut tag, &self.mask);
        out.copy_from_slice(&tag[..out.len()]);

        tag.zeroize();
        acc.zeroize();
        self.reset();
    }

    /// Drops the message in flight. Key and AD digest are kept.
    pub fn reset(&mut self) {
        self.acc = 0;
        self.text_len = 0;
        self.partial.zeroize();
        self.partial_len = 0;
        self.mask.zeroize();
    }

    /// Wipes everything including the subkey.
    pub fn clear(&mut self) {
        self.zeroize();
        self.table = Vec::new();
    }
}

impl core::fmt::Debug for Ghash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Ghash {{ backend: {}, [protected] }}", self.backend.name())
    }
}
