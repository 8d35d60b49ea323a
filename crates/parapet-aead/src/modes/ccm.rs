// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Counter with CBC-MAC (NIST SP 800-38C, RFC 3610).
//!
//! The CBC-MAC runs over `B0 ‖ encoded AD ‖ P`, so the plaintext length must
//! be known up front. Everything is buffered until `finish`.

use parapet_ct::{constant_time_compare, xor_buf};
use tracing::instrument;
use zeroize::Zeroize;

use crate::error::AeadError;
use crate::modes::{check_offset, reject};
use crate::secret::SecretBytes;
use crate::state::Lifecycle;
use crate::traits::{AeadMode, BlockCipher, Direction, KeyLengthSpec};

const BLOCK_SIZE: usize = 16;

/// CCM parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcmConfig {
    /// 4..=16, even.
    pub tag_size: usize,
    /// Width `L` of the message-length field, 2..=8. The nonce is `15 - L`
    /// bytes.
    pub length_bytes: usize,
}

impl Default for CcmConfig {
    fn default() -> Self {
        Self {
            tag_size: 16,
            length_bytes: 3,
        }
    }
}

/// CCM over a 128-bit block cipher.
pub struct Ccm<C: BlockCipher> {
    direction: Direction,
    tag_size: usize,
    length_bytes: usize,
    cipher: C,
    ad: Vec<u8>,
    nonce: [u8; BLOCK_SIZE],
    msg: SecretBytes,
    state: Lifecycle,
}

/// `len` big-endian in `out`.
///
/// # Errors
///
/// [`AeadError::InvalidArgument`] if `len` does not fit.
fn encode_length(len: usize, out: &mut [u8]) -> Result<(), AeadError> {
    let len = len as u64;
    if out.len() < 8 && len >> (8 * out.len()) != 0 {
        return Err(AeadError::InvalidArgument(
            "CCM: message too long for the length field",
        ));
    }

    let bytes = len.to_be_bytes();
    out.copy_from_slice(&bytes[8 - out.len()..]);
    Ok(())
}

fn increment(block: &mut [u8; BLOCK_SIZE], width: usize) {
    for byte in block[BLOCK_SIZE - width..].iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

impl<C: BlockCipher> Ccm<C> {
    /// # Errors
    ///
    /// [`AeadError::InvalidArgument`] for a non-128-bit cipher, an odd tag or
    /// one outside 4..=16, or `L` outside 2..=8.
    pub fn new(cipher: C, direction: Direction, config: CcmConfig) -> Result<Self, AeadError> {
        if cipher.block_size() != BLOCK_SIZE {
            return Err(AeadError::InvalidArgument(
                "CCM requires a 128-bit block cipher",
            ));
        }
        if !(4..=16).contains(&config.tag_size) || config.tag_size % 2 != 0 {
            return Err(AeadError::InvalidArgument(
                "CCM: tag size must be even and 4..=16",
            ));
        }
        if !(2..=8).contains(&config.length_bytes) {
            return Err(AeadError::InvalidArgument("CCM: L must be 2..=8"));
        }

        Ok(Self {
            direction,
            tag_size: config.tag_size,
            length_bytes: config.length_bytes,
            cipher,
            ad: Vec::new(),
            nonce: [0u8; BLOCK_SIZE],
            msg: SecretBytes::new(),
            state: Lifecycle::default(),
        })
    }

    fn nonce_size(&self) -> usize {
        15 - self.length_bytes
    }

    /// `flags ‖ N ‖ Q` where `Q` is the message length.
    fn format_b0(&self, msg_len: usize) -> Result<[u8; BLOCK_SIZE], AeadError> {
        let mut b0 = [0u8; BLOCK_SIZE];
        let ad_flag = if self.ad.is_empty() { 0 } else { 0x40 };
        let m = ((self.tag_size - 2) / 2) as u8;

        b0[0] = ad_flag | (m << 3) | (self.length_bytes - 1) as u8;
        b0[1..=self.nonce_size()].copy_from_slice(&self.nonce[..self.nonce_size()]);
        encode_length(msg_len, &mut b0[BLOCK_SIZE - self.length_bytes..])?;
        Ok(b0)
    }

    /// `A_0 = (L - 1) ‖ N ‖ 0`.
    fn format_a0(&self) -> [u8; BLOCK_SIZE] {
        let mut a0 = [0u8; BLOCK_SIZE];
        a0[0] = (self.length_bytes - 1) as u8;
        a0[1..=self.nonce_size()].copy_from_slice(&self.nonce[..self.nonce_size()]);
        a0
    }

    /// CBC-MAC over `B0 ‖ AD ‖ P`, returned unmasked.
    fn cbc_mac(&self, plaintext: &[u8]) -> Result<[u8; BLOCK_SIZE], AeadError> {
        let mut t = self.format_b0(plaintext.len())?;
        self.cipher.encrypt_block(&mut t);

        // `ad` is already length-prefixed and zero-padded to whole blocks.
        for block in self.ad.chunks(BLOCK_SIZE) {
            xor_buf(&mut t, block);
            self.cipher.encrypt_block(&mut t);
        }

        for block in plaintext.chunks(BLOCK_SIZE) {
            xor_buf(&mut t[..block.len()], block);
            self.cipher.encrypt_block(&mut t);
        }

        Ok(t)
    }

    /// XORs `E(A_1), E(A_2), ..` into `data` and returns `E(A_0)`.
    fn ctr_crypt(&self, data: &mut [u8]) -> [u8; BLOCK_SIZE] {
        let mut counter = self.format_a0();
        let mut s0 = counter;
        self.cipher.encrypt_block(&mut s0);

        let mut pad = [0u8; BLOCK_SIZE];
        for block in data.chunks_mut(BLOCK_SIZE) {
            increment(&mut counter, self.length_bytes);
            pad.copy_from_slice(&counter);
            self.cipher.encrypt_block(&mut pad);
            xor_buf(block, &pad);
        }

        pad.zeroize();
        s0
    }

    fn seal_buffered(
        &self,
        msg: &mut SecretBytes,
        buffer: &mut Vec<u8>,
        offset: usize,
    ) -> Result<usize, AeadError> {
        let mut tag = self.cbc_mac(msg)?;
        let mut s0 = self.ctr_crypt(msg);
        xor_buf(&mut tag, &s0);

        buffer[offset..].zeroize();
        buffer.truncate(offset);
        buffer.extend_from_slice(msg);
        buffer.extend_from_slice(&tag[..self.tag_size]);

        tag.zeroize();
        s0.zeroize();
        Ok(buffer.len())
    }

    fn open_buffered(
        &self,
        msg: &mut SecretBytes,
        buffer: &mut Vec<u8>,
        offset: usize,
    ) -> Result<usize, AeadError> {
        let body = msg.len() - self.tag_size;
        let (text, received) = msg.split_at_mut(body);

        // Reject oversize input before producing any plaintext.
        encode_length(body, &mut [0u8; 8][..self.length_bytes])?;

        let mut s0 = self.ctr_crypt(text);
        let mut tag = self.cbc_mac(text)?;
        xor_buf(&mut tag, &s0);
        s0.zeroize();

        let ok = constant_time_compare(&tag[..self.tag_size], received);
        tag.zeroize();
        if !ok {
            return Err(reject(buffer, offset, "CCM"));
        }

        buffer.truncate(offset);
        buffer.extend_from_slice(text);
        Ok(buffer.len())
    }
}

impl<C: BlockCipher> AeadMode for Ccm<C> {
    fn name(&self) -> &'static str {
        "CCM"
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn key_spec(&self) -> KeyLengthSpec {
        self.cipher.key_spec()
    }

    fn valid_nonce_length(&self, length: usize) -> bool {
        length == self.nonce_size()
    }

    fn tag_size(&self) -> usize {
        self.tag_size
    }

    fn update_granularity(&self) -> usize {
        1
    }

    fn has_keying_material(&self) -> bool {
        self.state.has_key()
    }

    fn default_nonce_length(&self) -> usize {
        self.nonce_size()
    }

    #[instrument(level = "debug", skip(self, key), fields(algorithm = "CCM", key_len = key.len()))]
    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        self.state.unkeyed();
        self.cipher.set_key(key)?;
        self.ad.clear();
        self.state.keyed();
        Ok(())
    }

    /// Stores `AD` already framed for the CBC-MAC: a 2-byte length
    /// (below `0xFF00`) or `0xFF 0xFE` plus a 4-byte length, then zero padding
    /// to a block boundary.
    fn set_associated_data_n(&mut self, index: usize, ad: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;
        if index != 0 {
            return Err(AeadError::InvalidArgument(
                "CCM: only one associated data input",
            ));
        }

        self.ad.clear();
        if ad.is_empty() {
            return Ok(());
        }

        if ad.len() < 0xFF00 {
            self.ad.extend_from_slice(&(ad.len() as u16).to_be_bytes());
        } else {
            let len = u32::try_from(ad.len())
                .map_err(|_| AeadError::InvalidArgument("CCM: associated data too long"))?;
            self.ad.extend_from_slice(&[0xFF, 0xFE]);
            self.ad.extend_from_slice(&len.to_be_bytes());
        }

        self.ad.extend_from_slice(ad);
        let padded = self.ad.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        self.ad.resize(padded, 0);
        Ok(())
    }

    fn start_msg(&mut self, nonce: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;
        if !self.valid_nonce_length(nonce.len()) {
            return Err(AeadError::InvalidNonceLength {
                algorithm: "CCM",
                length: nonce.len(),
            });
        }

        self.nonce.fill(0);
        self.nonce[..nonce.len()].copy_from_slice(nonce);
        self.msg.clear();

        self.state.begin_message()
    }

    fn process(&mut self, buf: &mut [u8]) -> Result<usize, AeadError> {
        self.state.check_in_message()?;
        self.msg.extend_from_slice(buf);
        buf.fill(0);
        Ok(0)
    }

    #[instrument(level = "debug", skip(self, buffer), fields(algorithm = "CCM", direction = ?self.direction, len = buffer.len()))]
    fn finish(&mut self, buffer: &mut Vec<u8>, offset: usize) -> Result<usize, AeadError> {
        self.state.check_in_message()?;
        if let Err(e) = check_offset(buffer, offset) {
            self.reset();
            return Err(e);
        }

        self.msg.extend_from_slice(&buffer[offset..]);
        let mut msg = core::mem::take(&mut self.msg);

        let result = match self.direction {
            Direction::Encryption => self.seal_buffered(&mut msg, buffer, offset),
            Direction::Decryption => {
                if msg.len() < self.tag_size {
                    Err(AeadError::DecodingFailure("input shorter than the tag"))
                } else {
                    self.open_buffered(&mut msg, buffer, offset)
                }
            }
        };

        msg.clear();
        self.msg = msg;
        self.state.end_message();
        result
    }

    fn reset(&mut self) {
        self.msg.clear();
        self.nonce.fill(0);
        self.state.end_message();
    }

    fn clear(&mut self) {
        self.cipher.clear();
        self.ad.clear();
        self.reset();
        self.state.unkeyed();
    }
}

impl<C: BlockCipher> core::fmt::Debug for Ccm<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Ccm {{ direction: {:?}, tag_size: {}, L: {}, [protected] }}",
            self.direction, self.tag_size, self.length_bytes
        )
    }
}
