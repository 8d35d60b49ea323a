// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! ChaCha20-Poly1305 (RFC 8439), its 64-bit-nonce predecessor and XChaCha20.
//!
//! The one-time Poly1305 key is the first 32 bytes of keystream block 0;
//! the rest of that block is discarded and the payload starts at block 1.

#[cfg(test)]
mod tests;

use parapet_ct::constant_time_compare;
use tracing::instrument;
use zeroize::Zeroize;

use crate::error::AeadError;
use crate::mac::Poly1305;
use crate::modes::{body_len, check_offset, reject};
use crate::state::Lifecycle;
use crate::stream::ChaCha20;
use crate::traits::{AeadMode, Direction, KeyLengthSpec, StreamCipher};

const KEY_SIZE: usize = 32;
const TAG_SIZE: usize = 16;
const CHACHA_BLOCK: usize = 64;
const POLY_PAD: [u8; 16] = [0u8; 16];

/// RFC 8439 §2.8: block 0 keys Poly1305, so a 32-bit counter leaves
/// `2^38 − 64` bytes of payload.
const NARROW_MAX_TEXT: u64 = (1 << 38) - 64;

/// How the Poly1305 input is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Poly1305Framing {
    /// RFC 8439: `AD ‖ pad16 ‖ C ‖ pad16 ‖ len(AD) ‖ len(C)`.
    Cfrg,
    /// draft-agl-tls-chacha20poly1305: `AD ‖ len(AD) ‖ C ‖ len(C)`.
    Legacy,
    /// Legacy for 8-byte nonces, CFRG for 12- and 24-byte ones.
    #[default]
    ByNonceLength,
}

impl Poly1305Framing {
    fn resolve(self, nonce_len: usize) -> Self {
        match self {
            Self::ByNonceLength if nonce_len == 8 => Self::Legacy,
            Self::ByNonceLength => Self::Cfrg,
            fixed => fixed,
        }
    }
}

/// ChaCha20-Poly1305 AEAD.
pub struct ChaCha20Poly1305 {
    direction: Direction,
    framing: Poly1305Framing,
    active_framing: Poly1305Framing,
    chacha: ChaCha20,
    poly: Poly1305,
    ad: Vec<u8>,
    text_len: u64,
    max_text: u64,
    state: Lifecycle,
}

impl ChaCha20Poly1305 {
    pub fn new(direction: Direction, framing: Poly1305Framing) -> Self {
        Self {
            direction,
            framing,
            active_framing: Poly1305Framing::Cfrg,
            chacha: ChaCha20::new(),
            poly: Poly1305::new(),
            ad: Vec::new(),
            text_len: 0,
            max_text: NARROW_MAX_TEXT,
            state: Lifecycle::default(),
        }
    }

    pub fn framing(&self) -> Poly1305Framing {
        self.framing
    }

    fn update_len(&mut self, len: u64) -> Result<(), AeadError> {
        self.poly.update(&len.to_le_bytes())
    }

    fn pad16(&mut self, len: u64) -> Result<(), AeadError> {
        let rem = (len % 16) as usize;
        if rem != 0 {
            self.poly.update(&POLY_PAD[..16 - rem])?;
        }
        Ok(())
    }

    fn absorb_ad(&mut self, ad: &[u8]) -> Result<(), AeadError> {
        self.poly.update(ad)?;
        match self.active_framing {
            Poly1305Framing::Legacy => self.update_len(ad.len() as u64),
            _ => self.pad16(ad.len() as u64),
        }
    }

    /// Whether `additional` more payload bytes fit under this nonce's counter.
    fn check_room(&self, additional: usize) -> Result<(), AeadError> {
        self.text_len
            .checked_add(additional as u64)
            .filter(|&len| len <= self.max_text)
            .map(|_| ())
            .ok_or(AeadError::InvalidArgument(
                "ChaCha20Poly1305: message exceeds the keystream for this nonce",
            ))
    }

    fn mac_text(&mut self, data: &[u8]) -> Result<(), AeadError> {
        self.poly.update(data)?;
        self.text_len += data.len() as u64;
        Ok(())
    }

    fn compute_tag(&mut self, tag: &mut [u8; TAG_SIZE]) -> Result<(), AeadError> {
        let ad_len = self.ad.len() as u64;
        match self.active_framing {
            Poly1305Framing::Legacy => {
                self.update_len(self.text_len)?;
            }
            _ => {
                self.pad16(self.text_len)?;
                self.update_len(ad_len)?;
                self.update_len(self.text_len)?;
            }
        }
        self.poly.finalize_into(tag)
    }
}

impl Default for ChaCha20Poly1305 {
    fn default() -> Self {
        Self::new(Direction::Encryption, Poly1305Framing::default())
    }
}

impl AeadMode for ChaCha20Poly1305 {
    fn name(&self) -> &'static str {
        "ChaCha20Poly1305"
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn key_spec(&self) -> KeyLengthSpec {
        KeyLengthSpec::fixed(KEY_SIZE)
    }

    fn valid_nonce_length(&self, length: usize) -> bool {
        matches!(length, 8 | 12 | 24)
    }

    fn tag_size(&self) -> usize {
        TAG_SIZE
    }

    fn update_granularity(&self) -> usize {
        1
    }

    fn has_keying_material(&self) -> bool {
        self.state.has_key()
    }

    #[instrument(level = "debug", skip(self, key), fields(algorithm = "ChaCha20Poly1305", key_len = key.len()))]
    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        self.state.unkeyed();
        if key.len() != KEY_SIZE {
            return Err(AeadError::InvalidKeyLength {
                algorithm: "ChaCha20Poly1305",
                length: key.len(),
            });
        }

        self.chacha.set_key(key)?;
        self.poly.zeroize();
        self.ad.clear();
        self.state.keyed();
        Ok(())
    }

    fn set_associated_data_n(&mut self, index: usize, ad: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;
        if index != 0 {
            return Err(AeadError::InvalidArgument(
                "ChaCha20Poly1305: only one associated data input",
            ));
        }

        self.ad.clear();
        self.ad.extend_from_slice(ad);
        Ok(())
    }

    fn start_msg(&mut self, nonce: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;
        if !self.valid_nonce_length(nonce.len()) {
            return Err(AeadError::InvalidNonceLength {
                algorithm: "ChaCha20Poly1305",
                length: nonce.len(),
            });
        }

        self.chacha.set_iv(nonce)?;

        let mut first_block = [0u8; CHACHA_BLOCK];
        self.chacha.write_keystream(&mut first_block)?;
        let keyed = self.poly.set_key(&first_block[..KEY_SIZE]);
        first_block.zeroize();
        keyed?;

        self.active_framing = self.framing.resolve(nonce.len());
        self.text_len = 0;
        self.max_text = match nonce.len() {
            12 => NARROW_MAX_TEXT,
            _ => u64::MAX,
        };

        let ad = core::mem::take(&mut self.ad);
        let absorbed = self.absorb_ad(&ad);
        self.ad = ad;
        absorbed?;

        self.state.begin_message()
    }

    fn process(&mut self, buf: &mut [u8]) -> Result<usize, AeadError> {
        self.state.check_in_message()?;
        self.check_room(buf.len())?;

        match self.direction {
            Direction::Encryption => {
                self.chacha.apply_keystream(buf)?;
                self.mac_text(buf)?;
            }
            Direction::Decryption => {
                self.mac_text(buf)?;
                self.chacha.apply_keystream(buf)?;
            }
        }

        Ok(buf.len())
    }

    #[instrument(level = "debug", skip(self, buffer), fields(algorithm = "ChaCha20Poly1305", direction = ?self.direction, len = buffer.len()))]
    fn finish(&mut self, buffer: &mut Vec<u8>, offset: usize) -> Result<usize, AeadError> {
        self.state.check_in_message()?;
        if let Err(e) = check_offset(buffer, offset) {
            self.reset();
            return Err(e);
        }
        let mut tag = [0u8; TAG_SIZE];

        let result = match self.direction {
            Direction::Encryption => {
                self.process(&mut buffer[offset..])?;
                self.compute_tag(&mut tag)?;

                buffer.extend_from_slice(&tag);
                Ok(buffer.len())
            }
            Direction::Decryption => {
                let body = match body_len(buffer, offset, TAG_SIZE) {
                    Ok(body) => body,
                    Err(e) => {
                        self.reset();
                        return Err(e);
                    }
                };
                if let Err(e) = self.check_room(body) {
                    self.reset();
                    return Err(e);
                }
                let (ct, received) = buffer[offset..].split_at(body);

                self.mac_text(ct)?;
                self.compute_tag(&mut tag)?;

                if !constant_time_compare(&tag, received) {
                    Err(reject(buffer, offset, "ChaCha20Poly1305"))
                } else {
                    self.chacha.apply_keystream(&mut buffer[offset..offset + body])?;
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
        self.poly.zeroize();
        self.text_len = 0;
        self.state.end_message();
    }

    fn clear(&mut self) {
        self.chacha.clear();
        self.poly.zeroize();
        self.ad.clear();
        self.text_len = 0;
        self.state.unkeyed();
    }
}

impl core::fmt::Debug for ChaCha20Poly1305 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "ChaCha20Poly1305 {{ direction: {:?}, framing: {:?}, [protected] }}",
            self.direction, self.framing
        )
    }
}
