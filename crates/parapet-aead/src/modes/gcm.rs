// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Galois/Counter Mode (NIST SP 800-38D).
//!
//! `H = E(K, 0^128)`. A 96-bit nonce gives `Y0 = N ‖ 0^31 ‖ 1`; any other
//! length is hashed to `Y0` with GHASH. `E(K, Y0)` masks the tag and the
//! payload is encrypted from `Y0 + 1` with a 32-bit counter.

use parapet_ct::constant_time_compare;
use tracing::instrument;
use zeroize::Zeroize;

use crate::ctr::Ctr;
use crate::error::AeadError;
use crate::mac::Ghash;
use crate::modes::{body_len, check_granularity, check_offset, reject};
use crate::state::Lifecycle;
use crate::traits::{AeadMode, BlockCipher, Direction, KeyLengthSpec, StreamCipher};

const BLOCK_SIZE: usize = 16;
const CANONICAL_NONCE_SIZE: usize = 12;
const MIN_TAG_SIZE: usize = 8;

/// GCM parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcmConfig {
    /// 8..=16 bytes.
    pub tag_size: usize,
}

impl Default for GcmConfig {
    fn default() -> Self {
        Self { tag_size: 16 }
    }
}

/// GCM over a 128-bit block cipher.
pub struct Gcm<C: BlockCipher> {
    direction: Direction,
    tag_size: usize,
    ctr: Ctr<C>,
    ghash: Ghash,
    state: Lifecycle,
}

impl<C: BlockCipher> Gcm<C> {
    /// # Errors
    ///
    /// [`AeadError::InvalidArgument`] if the cipher block is not 16 bytes or
    /// the tag size is outside 8..=16.
    pub fn new(cipher: C, direction: Direction, config: GcmConfig) -> Result<Self, AeadError> {
        Self::with_ghash(cipher, direction, config, Ghash::new())
    }

    /// Same as [`Gcm::new`] with an explicit GHASH instance (e.g. a forced
    /// backend).
    pub fn with_ghash(
        cipher: C,
        direction: Direction,
        config: GcmConfig,
        ghash: Ghash,
    ) -> Result<Self, AeadError> {
        if cipher.block_size() != BLOCK_SIZE {
            return Err(AeadError::InvalidArgument(
                "GCM requires a 128-bit block cipher",
            ));
        }
        if !(MIN_TAG_SIZE..=BLOCK_SIZE).contains(&config.tag_size) {
            return Err(AeadError::InvalidArgument("GCM: tag size must be 8..=16"));
        }

        Ok(Self {
            direction,
            tag_size: config.tag_size,
            ctr: Ctr::with_counter_width(cipher, 4)?,
            ghash,
            state: Lifecycle::default(),
        })
    }

    pub fn ghash_backend(&self) -> crate::mac::GhashBackend {
        self.ghash.backend()
    }

    fn compute_tag(&mut self, tag: &mut [u8; BLOCK_SIZE]) {
        self.ghash.final_into(&mut tag[..self.tag_size]);
    }
}

impl<C: BlockCipher> AeadMode for Gcm<C> {
    fn name(&self) -> &'static str {
        "GCM"
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn key_spec(&self) -> KeyLengthSpec {
        self.ctr.key_spec()
    }

    fn valid_nonce_length(&self, length: usize) -> bool {
        length > 0
    }

    fn tag_size(&self) -> usize {
        self.tag_size
    }

    fn update_granularity(&self) -> usize {
        BLOCK_SIZE
    }

    fn has_keying_material(&self) -> bool {
        self.state.has_key()
    }

    #[instrument(level = "debug", skip(self, key), fields(algorithm = "GCM", key_len = key.len()))]
    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        self.state.unkeyed();
        self.ctr.set_key(key)?;

        let mut h = [0u8; BLOCK_SIZE];
        self.ctr.set_iv(&[0u8; BLOCK_SIZE])?;
        self.ctr.write_keystream(&mut h)?;
        self.ghash.set_key(&h);
        h.zeroize();

        self.state.keyed();
        Ok(())
    }

    fn set_associated_data_n(&mut self, index: usize, ad: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;
        if index != 0 {
            return Err(AeadError::InvalidArgument(
                "GCM: only one associated data input",
            ));
        }
        self.ghash.set_associated_data(ad)
    }

    fn start_msg(&mut self, nonce: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;
        if !self.valid_nonce_length(nonce.len()) {
            return Err(AeadError::InvalidNonceLength {
                algorithm: "GCM",
                length: nonce.len(),
            });
        }

        let mut y0 = [0u8; BLOCK_SIZE];
        if nonce.len() == CANONICAL_NONCE_SIZE {
            y0[..CANONICAL_NONCE_SIZE].copy_from_slice(nonce);
            y0[BLOCK_SIZE - 1] = 1;
        } else {
            y0 = self.ghash.nonce_hash(nonce)?;
        }

        self.ctr.set_iv(&y0)?;

        // First keystream block is E(K, Y0); the payload starts at Y0 + 1.
        let mut mask = [0u8; BLOCK_SIZE];
        self.ctr.write_keystream(&mut mask)?;
        self.ghash.start(&mask);

        y0.zeroize();
        mask.zeroize();
        self.state.begin_message()
    }

    fn process(&mut self, buf: &mut [u8]) -> Result<usize, AeadError> {
        self.state.check_in_message()?;
        check_granularity(buf.len(), BLOCK_SIZE)?;
        self.ghash.check_room(buf.len())?;

        match self.direction {
            Direction::Encryption => {
                self.ctr.apply_keystream(buf)?;
                self.ghash.update(buf)?;
            }
            Direction::Decryption => {
                self.ghash.update(buf)?;
                self.ctr.apply_keystream(buf)?;
            }
        }

        Ok(buf.len())
    }

    #[instrument(level = "debug", skip(self, buffer), fields(algorithm = "GCM", direction = ?self.direction, len = buffer.len()))]
    fn finish(&mut self, buffer: &mut Vec<u8>, offset: usize) -> Result<usize, AeadError> {
        self.state.check_in_message()?;
        if let Err(e) = check_offset(buffer, offset) {
            self.reset();
            return Err(e);
        }
        let mut tag = [0u8; BLOCK_SIZE];

        let result = match self.direction {
            Direction::Encryption => {
                self.ghash.check_room(buffer.len() - offset)?;

                self.ctr.apply_keystream(&mut buffer[offset..])?;
                self.ghash.update(&buffer[offset..])?;
                self.compute_tag(&mut tag);

                buffer.extend_from_slice(&tag[..self.tag_size]);
                Ok(buffer.len())
            }
            Direction::Decryption => {
                let body = match body_len(buffer, offset, self.tag_size) {
                    Ok(body) => body,
                    Err(e) => {
                        self.reset();
                        return Err(e);
                    }
                };
                let (ct, received) = buffer[offset..].split_at(body);

                self.ghash.update(ct)?;
                self.compute_tag(&mut tag);

                if !constant_time_compare(&tag[..self.tag_size], received) {
                    Err(reject(buffer, offset, "GCM"))
                } else {
                    self.ctr.apply_keystream(&mut buffer[offset..offset + body])?;
                    buffer.truncate(offset + body);
                    Ok(buffer.len())
                }
            }
        };

        tag.zeroize();
        self.state.end_message();
        result
    }

    fn reset(&mut self) {
        self.ghash.reset();
        self.state.end_message();
    }

    fn clear(&mut self) {
        self.ctr.clear();
        self.ghash.clear();
        self.state.unkeyed();
    }
}

impl<C: BlockCipher> core::fmt::Debug for Gcm<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Gcm {{ direction: {:?}, tag_size: {}, [protected] }}",
            self.direction, self.tag_size
        )
    }
}
