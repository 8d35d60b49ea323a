// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Counter-mode keystream over a [`BlockCipher`].
//!
//! The counter occupies the trailing `w` bytes of the block and is
//! incremented big-endian, wrapping inside that field. The leading bytes are
//! the per-message prefix and never change.

use parapet_ct::xor_buf;

use crate::error::AeadError;
use crate::secret::SecretBytes;
use crate::traits::{BlockCipher, KeyLengthSpec, StreamCipher};

/// Blocks encrypted per refill.
const PIPELINE: usize = 8;

/// Adds `n` to the big-endian integer in the last `width` bytes of `block`.
fn add_counter(block: &mut [u8], width: usize, mut n: u64) {
    let bs = block.len();
    let mut carry = 0u16;

    for byte in block[bs - width..].iter_mut().rev() {
        let sum = u16::from(*byte) + (n & 0xFF) as u16 + carry;
        *byte = sum as u8;
        carry = sum >> 8;
        n >>= 8;
    }
}

/// CTR keystream generator.
pub struct Ctr<C: BlockCipher> {
    cipher: C,
    width: usize,
    iv: SecretBytes,
    counters: SecretBytes,
    pad: SecretBytes,
    pad_pos: usize,
    iv_set: bool,
}

impl<C: BlockCipher> Ctr<C> {
    /// Counter spanning the whole block.
    pub fn new(cipher: C) -> Self {
        let bs = cipher.block_size();
        Self::build(cipher, bs)
    }

    /// Counter in the trailing `width` bytes: 4, 8, 16 or the full block.
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidArgument`] for any other width.
    pub fn with_counter_width(cipher: C, width: usize) -> Result<Self, AeadError> {
        let bs = cipher.block_size();
        if width != bs && !(matches!(width, 4 | 8 | 16) && width <= bs) {
            return Err(AeadError::InvalidArgument("CTR: unsupported counter width"));
        }
        Ok(Self::build(cipher, width))
    }

    fn build(cipher: C, width: usize) -> Self {
        let bs = cipher.block_size();
        Self {
            cipher,
            width,
            iv: SecretBytes::zeroed(bs),
            counters: SecretBytes::zeroed(bs * PIPELINE),
            pad: SecretBytes::zeroed(bs * PIPELINE),
            pad_pos: bs * PIPELINE,
            iv_set: false,
        }
    }

    pub fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    pub fn counter_width(&self) -> usize {
        self.width
    }

    /// The wrapped cipher (keyed together with the generator).
    pub fn block_cipher(&self) -> &C {
        &self.cipher
    }

    /// Encrypts the counter blocks into the pad, then steps every counter
    /// forward by one pipeline.
    fn generate(&mut self) {
        self.pad.copy_from_slice(&self.counters);
        self.cipher.encrypt_blocks(&mut self.pad);

        let bs = self.cipher.block_size();
        for block in self.counters.chunks_exact_mut(bs) {
            add_counter(block, self.width, PIPELINE as u64);
        }
        self.pad_pos = 0;
    }

    fn check_ready(&self) -> Result<(), AeadError> {
        if !self.cipher.has_key() {
            return Err(AeadError::KEY_NOT_SET);
        }
        if !self.iv_set {
            return Err(AeadError::InvalidState("CTR: IV not set"));
        }
        Ok(())
    }
}

impl<C: BlockCipher> StreamCipher for Ctr<C> {
    fn name(&self) -> &'static str {
        "CTR-BE"
    }

    fn key_spec(&self) -> KeyLengthSpec {
        self.cipher.key_spec()
    }

    fn has_key(&self) -> bool {
        self.cipher.has_key()
    }

    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        self.cipher.set_key(key)?;
        self.iv.fill(0);
        self.iv_set = false;
        Ok(())
    }

    fn valid_iv_length(&self, length: usize) -> bool {
        length <= self.cipher.block_size()
    }

    fn default_iv_length(&self) -> usize {
        self.cipher.block_size()
    }

    /// Zero-pads `iv` to one block and rewinds to its first counter value.
    fn set_iv(&mut self, iv: &[u8]) -> Result<(), AeadError> {
        if !self.cipher.has_key() {
            return Err(AeadError::KEY_NOT_SET);
        }
        if !self.valid_iv_length(iv.len()) {
            return Err(AeadError::InvalidNonceLength {
                algorithm: "CTR",
                length: iv.len(),
            });
        }

        self.iv.fill(0);
        self.iv[..iv.len()].copy_from_slice(iv);
        self.iv_set = true;
        self.seek(0)
    }

    fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<(), AeadError> {
        self.check_ready()?;

        let mut done = 0;
        while done < buf.len() {
            if self.pad_pos == self.pad.len() {
                self.generate();
            }

            let n = (self.pad.len() - self.pad_pos).min(buf.len() - done);
            xor_buf(&mut buf[done..done + n], &self.pad[self.pad_pos..self.pad_pos + n]);
            self.pad_pos += n;
            done += n;
        }

        Ok(())
    }

    fn seek(&mut self, offset: u64) -> Result<(), AeadError> {
        self.check_ready()?;

        let bs = self.cipher.block_size();
        let span = (bs * PIPELINE) as u64;
        let first_block = (offset / span) * PIPELINE as u64;

        for (i, block) in self.counters.chunks_exact_mut(bs).enumerate() {
            block.copy_from_slice(&self.iv);
            add_counter(block, self.width, first_block.wrapping_add(i as u64));
        }

        self.generate();
        self.pad_pos = (offset % span) as usize;
        Ok(())
    }

    fn clear(&mut self) {
        self.cipher.clear();
        self.iv.fill(0);
        self.counters.fill(0);
        self.pad.fill(0);
        self.pad_pos = self.pad.len();
        self.iv_set = false;
    }
}

impl<C: BlockCipher> core::fmt::Debug for Ctr<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Ctr<{}> {{ width: {}, [protected] }}", self.cipher.name(), self.width)
    }
}
