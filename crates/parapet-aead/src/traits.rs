// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Primitive and engine trait definitions.

use crate::error::AeadError;

/// Whether an engine seals or opens. Fixed for the lifetime of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encryption,
    Decryption,
}

impl Direction {
    #[inline(always)]
    pub fn is_encryption(self) -> bool {
        matches!(self, Direction::Encryption)
    }
}

/// Accepted key lengths: every multiple of `multiple` in `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLengthSpec {
    min: usize,
    max: usize,
    multiple: usize,
}

impl KeyLengthSpec {
    pub const fn fixed(length: usize) -> Self {
        Self {
            min: length,
            max: length,
            multiple: 1,
        }
    }

    pub const fn range(min: usize, max: usize, multiple: usize) -> Self {
        Self { min, max, multiple }
    }

    /// Same spec with every bound scaled by `factor` (SIV, which needs two keys).
    pub const fn multiplied(self, factor: usize) -> Self {
        Self {
            min: self.min * factor,
            max: self.max * factor,
            multiple: self.multiple * factor,
        }
    }

    pub fn minimum(&self) -> usize {
        self.min
    }

    pub fn maximum(&self) -> usize {
        self.max
    }

    pub fn valid(&self, length: usize) -> bool {
        length >= self.min && length <= self.max && length % self.multiple == 0
    }
}

/// A keyed block permutation.
///
/// `Clone` lets an engine hand independent copies to its MAC and its CTR
/// layer, so each half can be keyed separately (SIV, EAX).
pub trait BlockCipher: Clone + Send {
    /// Name including key size once keyed (e.g. `"AES-128"`).
    fn name(&self) -> &'static str;
    fn block_size(&self) -> usize;
    fn key_spec(&self) -> KeyLengthSpec;
    fn has_key(&self) -> bool;

    /// # Errors
    ///
    /// [`AeadError::InvalidKeyLength`] if `key` is outside [`BlockCipher::key_spec`].
    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError>;

    /// Encrypts exactly one block in place.
    fn encrypt_block(&self, block: &mut [u8]);

    /// Decrypts exactly one block in place.
    fn decrypt_block(&self, block: &mut [u8]);

    /// Encrypts a whole number of consecutive blocks in place.
    fn encrypt_blocks(&self, blocks: &mut [u8]) {
        debug_assert_eq!(blocks.len() % self.block_size(), 0);
        for block in blocks.chunks_exact_mut(self.block_size()) {
            self.encrypt_block(block);
        }
    }

    fn clear(&mut self);
}

/// A keyed, seekable keystream generator.
pub trait StreamCipher: Send {
    fn name(&self) -> &'static str;
    fn key_spec(&self) -> KeyLengthSpec;
    fn has_key(&self) -> bool;

    /// # Errors
    ///
    /// [`AeadError::InvalidKeyLength`] if `key` is outside [`StreamCipher::key_spec`].
    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError>;

    fn valid_iv_length(&self, length: usize) -> bool;
    fn default_iv_length(&self) -> usize;

    /// Positions the keystream at the start of `iv`'s stream.
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidState`] without a key, [`AeadError::InvalidNonceLength`]
    /// if `iv` has an unsupported length.
    fn set_iv(&mut self, iv: &[u8]) -> Result<(), AeadError>;

    /// XORs the next `buf.len()` keystream bytes into `buf`.
    fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<(), AeadError>;

    /// Jumps to byte `offset` of the current IV's keystream.
    fn seek(&mut self, offset: u64) -> Result<(), AeadError>;

    fn clear(&mut self);

    /// `output = input ^ keystream`.
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidArgument`] if the slices differ in length.
    fn cipher(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), AeadError> {
        if input.len() != output.len() {
            return Err(AeadError::InvalidArgument("cipher: length mismatch"));
        }
        output.copy_from_slice(input);
        self.apply_keystream(output)
    }

    /// Writes raw keystream into `output`.
    fn write_keystream(&mut self, output: &mut [u8]) -> Result<(), AeadError> {
        output.fill(0);
        self.apply_keystream(output)
    }
}

/// The call surface every AEAD engine exposes.
///
/// Lifecycle: `set_key` → (`set_associated_data`)* → `start_msg` →
/// (`process` | `update`)* → `finish`, then back to `start_msg` for the next
/// message. `reset` abandons the message in flight but keeps key and AD.
///
/// Associated data persists across messages until replaced or until the key
/// changes.
pub trait AeadMode {
    fn name(&self) -> &'static str;
    fn direction(&self) -> Direction;
    fn key_spec(&self) -> KeyLengthSpec;
    fn valid_nonce_length(&self, length: usize) -> bool;
    fn tag_size(&self) -> usize;

    /// `process` only accepts whole multiples of this many bytes.
    fn update_granularity(&self) -> usize;

    fn has_keying_material(&self) -> bool;

    /// # Errors
    ///
    /// [`AeadError::InvalidKeyLength`] if `key` is outside [`AeadMode::key_spec`].
    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError>;

    /// Sets associated-data slot `index`.
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidState`] without a key or mid-message,
    /// [`AeadError::InvalidArgument`] if `index` is out of range.
    fn set_associated_data_n(&mut self, index: usize, ad: &[u8]) -> Result<(), AeadError>;

    /// Begins a message under `nonce`.
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidState`] without a key or while another message is in
    /// flight, [`AeadError::InvalidNonceLength`] for a bad nonce.
    fn start_msg(&mut self, nonce: &[u8]) -> Result<(), AeadError>;

    /// Transforms `buf` in place and returns how many bytes at its front are
    /// ready for the caller. Engines that must see the whole message first
    /// (SIV, CCM) absorb the input and return 0.
    ///
    /// Decrypting engines that stream (GCM, EAX, OCB, ChaCha20-Poly1305)
    /// release plaintext here before the tag has been checked. Callers that
    /// must never act on unauthenticated data pass everything to `finish`.
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidState`] outside a message,
    /// [`AeadError::InvalidArgument`] if `buf.len()` is not a multiple of
    /// [`AeadMode::update_granularity`].
    fn process(&mut self, buf: &mut [u8]) -> Result<usize, AeadError>;

    /// Completes the message with the bytes in `buffer[offset..]`.
    ///
    /// Encryption appends the tag (or, for SIV, prepends the synthetic IV).
    /// Decryption strips and verifies it. Returns the new buffer length.
    ///
    /// # Errors
    ///
    /// [`AeadError::DecodingFailure`] if fewer than `tag_size()` bytes are
    /// present when decrypting, [`AeadError::InvalidAuthenticationTag`] on a
    /// mismatch, after `buffer[offset..]` has been wiped and truncated away.
    fn finish(&mut self, buffer: &mut Vec<u8>, offset: usize) -> Result<usize, AeadError>;

    /// Abandons any message in flight. Key and associated data are kept.
    fn reset(&mut self);

    /// Wipes key, associated data and message state.
    fn clear(&mut self);

    fn set_associated_data(&mut self, ad: &[u8]) -> Result<(), AeadError> {
        self.set_associated_data_n(0, ad)
    }

    /// How many AD slots [`AeadMode::set_associated_data_n`] accepts.
    fn maximum_associated_data_inputs(&self) -> usize {
        1
    }

    fn default_nonce_length(&self) -> usize {
        12
    }

    /// Bytes `finish` needs at minimum.
    fn minimum_final_size(&self) -> usize {
        match self.direction() {
            Direction::Encryption => 0,
            Direction::Decryption => self.tag_size(),
        }
    }

    /// Size of the output for an input of `input_length` bytes.
    fn output_length(&self, input_length: usize) -> usize {
        match self.direction() {
            Direction::Encryption => input_length + self.tag_size(),
            Direction::Decryption => input_length.saturating_sub(self.tag_size()),
        }
    }

    /// [`AeadMode::process`] over `buffer[offset..]`, then truncates the
    /// buffer to what was released. Returns the new buffer length.
    fn update(&mut self, buffer: &mut Vec<u8>, offset: usize) -> Result<usize, AeadError> {
        if offset > buffer.len() {
            return Err(AeadError::InvalidArgument("offset past end of buffer"));
        }

        let written = self.process(&mut buffer[offset..])?;
        buffer.truncate(offset + written);
        Ok(buffer.len())
    }
}
