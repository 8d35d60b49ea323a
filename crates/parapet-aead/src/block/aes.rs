// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! AES over the RustCrypto `aes` crate.
//!
//! The key size is picked by the key handed to `set_key` (16, 24 or 32 bytes).
//! The `aes` key schedules zeroize themselves on drop.

use ::aes::cipher::generic_array::GenericArray;
use ::aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

use crate::error::AeadError;
use crate::traits::{BlockCipher, KeyLengthSpec};

const BLOCK_SIZE: usize = 16;

#[derive(Clone)]
enum Schedule {
    Unkeyed,
    Aes128(::aes::Aes128),
    Aes192(::aes::Aes192),
    Aes256(::aes::Aes256),
}

/// AES-128/192/256 as a [`BlockCipher`].
#[derive(Clone)]
pub struct Aes {
    schedule: Schedule,
}

impl Default for Aes {
    fn default() -> Self {
        Self::new()
    }
}

impl Aes {
    pub fn new() -> Self {
        Self {
            schedule: Schedule::Unkeyed,
        }
    }
}

impl BlockCipher for Aes {
    fn name(&self) -> &'static str {
        match self.schedule {
            Schedule::Unkeyed => "AES",
            Schedule::Aes128(_) => "AES-128",
            Schedule::Aes192(_) => "AES-192",
            Schedule::Aes256(_) => "AES-256",
        }
    }

    #[inline(always)]
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn key_spec(&self) -> KeyLengthSpec {
        KeyLengthSpec::range(16, 32, 8)
    }

    fn has_key(&self) -> bool {
        !matches!(self.schedule, Schedule::Unkeyed)
    }

    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        let invalid = AeadError::InvalidKeyLength {
            algorithm: "AES",
            length: key.len(),
        };

        self.schedule = match key.len() {
            16 => Schedule::Aes128(::aes::Aes128::new_from_slice(key).map_err(|_| invalid)?),
            24 => Schedule::Aes192(::aes::Aes192::new_from_slice(key).map_err(|_| invalid)?),
            32 => Schedule::Aes256(::aes::Aes256::new_from_slice(key).map_err(|_| invalid)?),
            _ => return Err(invalid),
        };

        Ok(())
    }

    /// An unkeyed cipher wipes the block instead of encrypting it.
    #[inline]
    fn encrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), BLOCK_SIZE);
        let block: &mut ::aes::Block = GenericArray::from_mut_slice(block);

        match &self.schedule {
            Schedule::Unkeyed => block.fill(0),
            Schedule::Aes128(c) => c.encrypt_block(block),
            Schedule::Aes192(c) => c.encrypt_block(block),
            Schedule::Aes256(c) => c.encrypt_block(block),
        }
    }

    #[inline]
    fn decrypt_block(&self, block: &mut [u8]) {
        debug_assert_eq!(block.len(), BLOCK_SIZE);
        let block: &mut ::aes::Block = GenericArray::from_mut_slice(block);

        match &self.schedule {
            Schedule::Unkeyed => block.fill(0),
            Schedule::Aes128(c) => c.decrypt_block(block),
            Schedule::Aes192(c) => c.decrypt_block(block),
            Schedule::Aes256(c) => c.decrypt_block(block),
        }
    }

    fn clear(&mut self) {
        // Dropping the old schedule zeroizes it.
        self.schedule = Schedule::Unkeyed;
    }
}

impl core::fmt::Debug for Aes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {{ [protected] }}", self.name())
    }
}
