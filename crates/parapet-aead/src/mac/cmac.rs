// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! CMAC / OMAC1 (NIST SP 800-38B) over any [`BlockCipher`].

use parapet_ct::xor_buf;

use crate::error::AeadError;
use crate::mac::poly_dbl::{poly_double_n, poly_double_supported_size};
use crate::secret::SecretBytes;
use crate::traits::{BlockCipher, KeyLengthSpec};

/// CMAC with subkeys `K1 = 2·E(0)` and `K2 = 4·E(0)`.
///
/// The last block of input is always held back until [`Cmac::finalize_into`]
/// because its padding depends on whether more data follows.
pub struct Cmac<C: BlockCipher> {
    cipher: C,
    k1: SecretBytes,
    k2: SecretBytes,
    state: SecretBytes,
    buffer: SecretBytes,
    position: usize,
}

impl<C: BlockCipher> Cmac<C> {
    /// # Errors
    ///
    /// [`AeadError::InvalidArgument`] if the cipher's block size has no
    /// doubling polynomial.
    pub fn new(cipher: C) -> Result<Self, AeadError> {
        let bs = cipher.block_size();
        if !poly_double_supported_size(bs) {
            return Err(AeadError::InvalidArgument("CMAC: unsupported block size"));
        }

        Ok(Self {
            cipher,
            k1: SecretBytes::zeroed(bs),
            k2: SecretBytes::zeroed(bs),
            state: SecretBytes::zeroed(bs),
            buffer: SecretBytes::zeroed(bs),
            position: 0,
        })
    }

    pub fn output_length(&self) -> usize {
        self.cipher.block_size()
    }

    pub fn key_spec(&self) -> KeyLengthSpec {
        self.cipher.key_spec()
    }

    pub fn has_key(&self) -> bool {
        self.cipher.has_key()
    }

    pub fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        self.cipher.set_key(key)?;
        self.reset();

        self.k1.fill(0);
        self.cipher.encrypt_block(&mut self.k1);
        poly_double_n(&mut self.k1)?;

        self.k2.copy_from_slice(&self.k1);
        poly_double_n(&mut self.k2)?;
        Ok(())
    }

    /// # Errors
    ///
    /// [`AeadError::InvalidState`] without a key.
    pub fn update(&mut self, data: &[u8]) -> Result<(), AeadError> {
        if !self.has_key() {
            return Err(AeadError::KEY_NOT_SET);
        }

        let bs = self.cipher.block_size();
        let mut input = data;

        let fill = (bs - self.position).min(input.len());
        self.buffer[self.position..self.position + fill].copy_from_slice(&input[..fill]);

        if self.position + input.len() <= bs {
            self.position += input.len();
            return Ok(());
        }

        xor_buf(&mut self.state, &self.buffer);
        self.cipher.encrypt_block(&mut self.state);
        input = &input[fill..];

        while input.len() > bs {
            xor_buf(&mut self.state, &input[..bs]);
            self.cipher.encrypt_block(&mut self.state);
            input = &input[bs..];
        }

        self.buffer[..input.len()].copy_from_slice(input);
        self.position = input.len();
        Ok(())
    }

    /// Writes the MAC into `out` (exactly one block) and resets for the next
    /// message under the same key.
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidState`] without a key, [`AeadError::InvalidArgument`]
    /// if `out` is not one block long.
    pub fn finalize_into(&mut self, out: &mut [u8]) -> Result<(), AeadError> {
        if !self.has_key() {
            return Err(AeadError::KEY_NOT_SET);
        }
        if out.len() != self.cipher.block_size() {
            return Err(AeadError::InvalidArgument("CMAC: output must be one block"));
        }

        let bs = self.cipher.block_size();

        if self.position == bs {
            xor_buf(&mut self.buffer, &self.k1);
        } else {
            self.buffer[self.position] = 0x80;
            self.buffer[self.position + 1..].fill(0);
            xor_buf(&mut self.buffer, &self.k2);
        }

        xor_buf(&mut self.state, &self.buffer);
        self.cipher.encrypt_block(&mut self.state);
        out.copy_from_slice(&self.state);

        self.reset();
        Ok(())
    }

    /// One-shot MAC of `data` into `out`.
    pub fn process(&mut self, data: &[u8], out: &mut [u8]) -> Result<(), AeadError> {
        self.update(data)?;
        self.finalize_into(out)
    }

    /// Drops partial input. Key and subkeys are kept.
    pub fn reset(&mut self) {
        self.state.fill(0);
        self.buffer.fill(0);
        self.position = 0;
    }

    pub fn clear(&mut self) {
        self.cipher.clear();
        self.k1.fill(0);
        self.k2.fill(0);
        self.reset();
    }
}

impl<C: BlockCipher> core::fmt::Debug for Cmac<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Cmac<{}> {{ [protected] }}", self.cipher.name())
    }
}
