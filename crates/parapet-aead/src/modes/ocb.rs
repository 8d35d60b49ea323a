// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Offset Codebook mode, OCB3 (RFC 7253).

use parapet_ct::{constant_time_compare, xor_buf};
use tracing::instrument;
use zeroize::Zeroize;

use crate::error::AeadError;
use crate::mac::poly_double_n;
use crate::modes::{body_len, check_granularity, check_offset, reject};
use crate::secret::{SecretArray, SecretBytes};
use crate::state::Lifecycle;
use crate::traits::{AeadMode, BlockCipher, Direction, KeyLengthSpec};

const BLOCK_SIZE: usize = 16;
const MAX_NONCE_SIZE: usize = 15;

/// `L_i` for every `i` a 64-bit block index can have as trailing-zero count.
const L_TABLE_ENTRIES: usize = 64;

type Block = SecretArray<BLOCK_SIZE>;

/// OCB parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OcbConfig {
    /// 8, 12 or 16.
    pub tag_size: usize,
}

impl Default for OcbConfig {
    fn default() -> Self {
        Self { tag_size: 16 }
    }
}

/// OCB over a 128-bit block cipher.
pub struct Ocb<C: BlockCipher> {
    direction: Direction,
    tag_size: usize,
    cipher: C,
    l_star: Block,
    l_dollar: Block,
    l_table: SecretBytes,
    ad_hash: Block,
    offset: Block,
    checksum: Block,
    block_index: u64,
    state: Lifecycle,
}

impl<C: BlockCipher> Ocb<C> {
    /// # Errors
    ///
    /// [`AeadError::InvalidArgument`] for a non-128-bit cipher or a tag size
    /// other than 8, 12 or 16.
    pub fn new(cipher: C, direction: Direction, config: OcbConfig) -> Result<Self, AeadError> {
        if cipher.block_size() != BLOCK_SIZE {
            return Err(AeadError::InvalidArgument(
                "OCB requires a 128-bit block cipher",
            ));
        }
        if !matches!(config.tag_size, 8 | 12 | 16) {
            return Err(AeadError::InvalidArgument("OCB: tag size must be 8, 12 or 16"));
        }

        Ok(Self {
            direction,
            tag_size: config.tag_size,
            cipher,
            l_star: Block::new(),
            l_dollar: Block::new(),
            l_table: SecretBytes::zeroed(L_TABLE_ENTRIES * BLOCK_SIZE),
            ad_hash: Block::new(),
            offset: Block::new(),
            checksum: Block::new(),
            block_index: 0,
            state: Lifecycle::default(),
        })
    }

    /// `L_{ntz(i)}` for block index `i >= 1`.
    fn l_for(&self, index: u64) -> &[u8] {
        let ntz = index.trailing_zeros() as usize;
        &self.l_table[ntz * BLOCK_SIZE..(ntz + 1) * BLOCK_SIZE]
    }

    /// `HASH(K, A)`.
    fn hash_ad(&self, ad: &[u8]) -> Block {
        let mut sum = Block::new();
        let mut offset = Block::new();
        let mut tmp = Block::new();

        let mut blocks = ad.chunks_exact(BLOCK_SIZE);
        let mut index = 0u64;
        for block in &mut blocks {
            index += 1;
            xor_buf(&mut offset[..], self.l_for(index));
            tmp.copy_from_slice(block);
            xor_buf(&mut tmp[..], &offset[..]);
            self.cipher.encrypt_block(&mut tmp[..]);
            xor_buf(&mut sum[..], &tmp[..]);
        }

        let rest = blocks.remainder();
        if !rest.is_empty() {
            xor_buf(&mut offset[..], &self.l_star[..]);
            tmp.fill(0);
            tmp[..rest.len()].copy_from_slice(rest);
            tmp[rest.len()] = 0x80;
            xor_buf(&mut tmp[..], &offset[..]);
            self.cipher.encrypt_block(&mut tmp[..]);
            xor_buf(&mut sum[..], &tmp[..]);
        }

        sum
    }

    /// `Offset_0` from the nonce: encrypt the formatted nonce with its low six
    /// bits cleared, stretch to 192 bits and take 128 bits starting at
    /// `bottom`.
    fn initial_offset(&self, nonce: &[u8]) -> Block {
        let mut formatted = [0u8; BLOCK_SIZE];
        formatted[0] = (((self.tag_size * 8) % 128) << 1) as u8;
        formatted[BLOCK_SIZE - 1 - nonce.len()] |= 1;
        formatted[BLOCK_SIZE - nonce.len()..].copy_from_slice(nonce);

        let bottom = usize::from(formatted[BLOCK_SIZE - 1] & 0x3F);
        formatted[BLOCK_SIZE - 1] &= 0xC0;

        let mut stretch = [0u8; BLOCK_SIZE + 8];
        stretch[..BLOCK_SIZE].copy_from_slice(&formatted);
        self.cipher.encrypt_block(&mut stretch[..BLOCK_SIZE]);
        for i in 0..8 {
            stretch[BLOCK_SIZE + i] = stretch[i] ^ stretch[i + 1];
        }

        let (shift_bytes, shift_bits) = (bottom / 8, bottom % 8);
        let mut offset = Block::new();
        for (i, byte) in offset.iter_mut().enumerate() {
            let hi = stretch[shift_bytes + i];
            *byte = if shift_bits == 0 {
                hi
            } else {
                (hi << shift_bits) | (stretch[shift_bytes + i + 1] >> (8 - shift_bits))
            };
        }

        stretch.zeroize();
        formatted.zeroize();
        offset
    }

    /// Full blocks only.
    fn crypt_blocks(&mut self, buf: &mut [u8]) {
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            self.block_index += 1;
            let ntz = self.block_index.trailing_zeros() as usize;
            xor_buf(
                &mut self.offset[..],
                &self.l_table[ntz * BLOCK_SIZE..(ntz + 1) * BLOCK_SIZE],
            );

            match self.direction {
                Direction::Encryption => {
                    xor_buf(&mut self.checksum[..], block);
                    xor_buf(block, &self.offset[..]);
                    self.cipher.encrypt_block(block);
                    xor_buf(block, &self.offset[..]);
                }
                Direction::Decryption => {
                    xor_buf(block, &self.offset[..]);
                    self.cipher.decrypt_block(block);
                    xor_buf(block, &self.offset[..]);
                    xor_buf(&mut self.checksum[..], block);
                }
            }
        }
    }

    /// Handles the trailing partial block, then writes the full tag.
    fn final_block(&mut self, rest: &mut [u8], tag: &mut Block) {
        if !rest.is_empty() {
            xor_buf(&mut self.offset[..], &self.l_star[..]);
            let mut pad = self.offset.clone();
            self.cipher.encrypt_block(&mut pad[..]);

            let mut padded = Block::new();
            match self.direction {
                Direction::Encryption => {
                    padded[..rest.len()].copy_from_slice(rest);
                    xor_buf(rest, &pad[..]);
                }
                Direction::Decryption => {
                    xor_buf(rest, &pad[..]);
                    padded[..rest.len()].copy_from_slice(rest);
                }
            }
            padded[rest.len()] = 0x80;
            xor_buf(&mut self.checksum[..], &padded[..]);
        }

        tag.copy_from_slice(&self.checksum[..]);
        xor_buf(&mut tag[..], &self.offset[..]);
        xor_buf(&mut tag[..], &self.l_dollar[..]);
        self.cipher.encrypt_block(&mut tag[..]);
        xor_buf(&mut tag[..], &self.ad_hash[..]);
    }

    fn wipe_message(&mut self) {
        self.offset.zeroize();
        self.checksum.zeroize();
        self.block_index = 0;
    }
}

impl<C: BlockCipher> AeadMode for Ocb<C> {
    fn name(&self) -> &'static str {
        "OCB"
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn key_spec(&self) -> KeyLengthSpec {
        self.cipher.key_spec()
    }

    fn valid_nonce_length(&self, length: usize) -> bool {
        (1..=MAX_NONCE_SIZE).contains(&length)
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

    #[instrument(level = "debug", skip(self, key), fields(algorithm = "OCB", key_len = key.len()))]
    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        self.state.unkeyed();
        self.cipher.set_key(key)?;

        self.l_star.zeroize();
        self.cipher.encrypt_block(&mut self.l_star[..]);

        self.l_dollar.copy_from_slice(&self.l_star[..]);
        poly_double_n(&mut self.l_dollar[..])?;

        let mut l = self.l_dollar.clone();
        for entry in self.l_table.chunks_exact_mut(BLOCK_SIZE) {
            poly_double_n(&mut l[..])?;
            entry.copy_from_slice(&l[..]);
        }

        self.ad_hash.zeroize();
        self.wipe_message();
        self.state.keyed();
        Ok(())
    }

    fn set_associated_data_n(&mut self, index: usize, ad: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;
        if index != 0 {
            return Err(AeadError::InvalidArgument(
                "OCB: only one associated data input",
            ));
        }

        self.ad_hash = self.hash_ad(ad);
        Ok(())
    }

    fn start_msg(&mut self, nonce: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;
        if !self.valid_nonce_length(nonce.len()) {
            return Err(AeadError::InvalidNonceLength {
                algorithm: "OCB",
                length: nonce.len(),
            });
        }

        self.wipe_message();
        self.offset = self.initial_offset(nonce);
        self.state.begin_message()
    }

    fn process(&mut self, buf: &mut [u8]) -> Result<usize, AeadError> {
        self.state.check_in_message()?;
        check_granularity(buf.len(), BLOCK_SIZE)?;
        self.crypt_blocks(buf);
        Ok(buf.len())
    }

    #[instrument(level = "debug", skip(self, buffer), fields(algorithm = "OCB", direction = ?self.direction, len = buffer.len()))]
    fn finish(&mut self, buffer: &mut Vec<u8>, offset: usize) -> Result<usize, AeadError> {
        self.state.check_in_message()?;
        if let Err(e) = check_offset(buffer, offset) {
            self.reset();
            return Err(e);
        }
        let mut tag = Block::new();

        let result = match self.direction {
            Direction::Encryption => {
                let full = (buffer.len() - offset) / BLOCK_SIZE * BLOCK_SIZE;
                let (blocks, rest) = buffer[offset..].split_at_mut(full);

                self.crypt_blocks(blocks);
                self.final_block(rest, &mut tag);

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
                let full = body / BLOCK_SIZE * BLOCK_SIZE;
                let (text, received) = buffer[offset..].split_at_mut(body);
                let (blocks, rest) = text.split_at_mut(full);

                self.crypt_blocks(blocks);
                self.final_block(rest, &mut tag);

                if !constant_time_compare(&tag[..self.tag_size], received) {
                    Err(reject(buffer, offset, "OCB"))
                } else {
                    buffer.truncate(offset + body);
                    Ok(buffer.len())
                }
            }
        };

        self.wipe_message();
        self.state.end_message();
        result
    }

    fn reset(&mut self) {
        self.wipe_message();
        self.state.end_message();
    }

    fn clear(&mut self) {
        self.cipher.clear();
        self.l_star.zeroize();
        self.l_dollar.zeroize();
        self.l_table.fill(0);
        self.ad_hash.zeroize();
        self.wipe_message();
        self.state.unkeyed();
    }
}

impl<C: BlockCipher> core::fmt::Debug for Ocb<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Ocb {{ direction: {:?}, tag_size: {}, [protected] }}",
            self.direction, self.tag_size
        )
    }
}
