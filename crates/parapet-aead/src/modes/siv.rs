// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Synthetic IV mode (RFC 5297) over a 128-bit block cipher.
//!
//! The key is split in half: the first half keys CMAC for S2V, the second
//! keys CTR. The synthetic IV `V = S2V(AD_1, .., AD_n, nonce, P)` is both the
//! tag and (with two bits cleared) the CTR IV. Output is `V ‖ C`.
//!
//! Decryption has to recover the plaintext before S2V can recompute `V`, so
//! the whole message is buffered and nothing is released unless the tags
//! match.

use parapet_ct::{constant_time_compare, xor_buf};
use tracing::instrument;
use zeroize::Zeroize;

use crate::ctr::Ctr;
use crate::error::AeadError;
use crate::mac::{Cmac, poly_double_n};
use crate::modes::{check_offset, reject};
use crate::secret::SecretBytes;
use crate::state::Lifecycle;
use crate::traits::{AeadMode, BlockCipher, Direction, KeyLengthSpec, StreamCipher};

const BLOCK_SIZE: usize = 16;

/// SIV over a 128-bit block cipher.
pub struct Siv<C: BlockCipher> {
    direction: Direction,
    cmac: Cmac<C>,
    ctr: Ctr<C>,
    ad_macs: Vec<SecretBytes>,
    nonce_mac: Option<SecretBytes>,
    msg: SecretBytes,
    state: Lifecycle,
}

impl<C: BlockCipher> Siv<C> {
    /// # Errors
    ///
    /// [`AeadError::InvalidArgument`] unless the cipher has a 128-bit block.
    pub fn new(cipher: C, direction: Direction) -> Result<Self, AeadError> {
        if cipher.block_size() != BLOCK_SIZE {
            return Err(AeadError::InvalidArgument(
                "SIV requires a 128-bit block cipher",
            ));
        }

        Ok(Self {
            direction,
            ctr: Ctr::new(cipher.clone()),
            cmac: Cmac::new(cipher)?,
            ad_macs: Vec::new(),
            nonce_mac: None,
            msg: SecretBytes::new(),
            state: Lifecycle::default(),
        })
    }

    fn block_size(&self) -> usize {
        self.cmac.output_length()
    }

    fn mac(&mut self, data: &[u8]) -> Result<SecretBytes, AeadError> {
        let mut out = SecretBytes::zeroed(self.block_size());
        self.cmac.process(data, &mut out)?;
        Ok(out)
    }

    /// S2V over the stored AD MACs, the nonce MAC and `text`.
    fn s2v(&mut self, text: &[u8]) -> Result<SecretBytes, AeadError> {
        let bs = self.block_size();
        let zero = vec![0u8; bs];
        let mut v = self.mac(&zero)?;

        // Unset slots below the highest one hold a zero block: doubled, no XOR.
        for ad_mac in &self.ad_macs {
            poly_double_n(&mut v)?;
            xor_buf(&mut v, ad_mac);
        }

        if let Some(nonce_mac) = &self.nonce_mac {
            poly_double_n(&mut v)?;
            xor_buf(&mut v, nonce_mac);
        }

        if text.len() < bs {
            poly_double_n(&mut v)?;
            xor_buf(&mut v[..text.len()], text);
            v[text.len()] ^= 0x80;
            let t = self.mac(&v)?;
            return Ok(t);
        }

        // xorend: only the last block of the text is combined with V.
        let (head, tail) = text.split_at(text.len() - bs);
        xor_buf(&mut v, tail);
        self.cmac.update(head)?;
        self.cmac.update(&v)?;
        self.cmac.finalize_into(&mut v)?;
        Ok(v)
    }

    /// Clears the top bit of the last two 32-bit words of `v` and seeds CTR.
    fn set_ctr_iv(&mut self, v: &[u8]) -> Result<(), AeadError> {
        let bs = self.block_size();
        let mut iv = SecretBytes::from_slice(v);
        iv[bs - 8] &= 0x7F;
        iv[bs - 4] &= 0x7F;
        self.ctr.set_iv(&iv)
    }
}

impl<C: BlockCipher> AeadMode for Siv<C> {
    fn name(&self) -> &'static str {
        "SIV"
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn key_spec(&self) -> KeyLengthSpec {
        self.cmac.key_spec().multiplied(2)
    }

    fn valid_nonce_length(&self, _length: usize) -> bool {
        true
    }

    fn tag_size(&self) -> usize {
        self.block_size()
    }

    fn update_granularity(&self) -> usize {
        1
    }

    fn has_keying_material(&self) -> bool {
        self.state.has_key()
    }

    fn maximum_associated_data_inputs(&self) -> usize {
        self.block_size() * 8 - 2
    }

    fn default_nonce_length(&self) -> usize {
        self.block_size()
    }

    #[instrument(level = "debug", skip(self, key), fields(algorithm = "SIV", key_len = key.len()))]
    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        if !self.key_spec().valid(key.len()) {
            return Err(AeadError::InvalidKeyLength {
                algorithm: "SIV",
                length: key.len(),
            });
        }

        self.state.unkeyed();
        let (mac_key, ctr_key) = key.split_at(key.len() / 2);
        self.cmac.set_key(mac_key)?;
        self.ctr.set_key(ctr_key)?;
        self.ad_macs.clear();
        self.state.keyed();
        Ok(())
    }

    fn set_associated_data_n(&mut self, index: usize, ad: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;
        if index >= self.maximum_associated_data_inputs() {
            return Err(AeadError::InvalidArgument(
                "SIV: associated data index out of range",
            ));
        }

        let bs = self.block_size();
        while self.ad_macs.len() <= index {
            self.ad_macs.push(SecretBytes::zeroed(bs));
        }
        self.ad_macs[index] = self.mac(ad)?;
        Ok(())
    }

    fn start_msg(&mut self, nonce: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;

        self.nonce_mac = if nonce.is_empty() {
            None
        } else {
            Some(self.mac(nonce)?)
        };
        self.msg.clear();

        self.state.begin_message()
    }

    fn process(&mut self, buf: &mut [u8]) -> Result<usize, AeadError> {
        self.state.check_in_message()?;
        self.msg.extend_from_slice(buf);
        buf.fill(0);
        Ok(0)
    }

    #[instrument(level = "debug", skip(self, buffer), fields(algorithm = "SIV", direction = ?self.direction, len = buffer.len()))]
    fn finish(&mut self, buffer: &mut Vec<u8>, offset: usize) -> Result<usize, AeadError> {
        self.state.check_in_message()?;
        if let Err(e) = check_offset(buffer, offset) {
            self.reset();
            return Err(e);
        }

        self.msg.extend_from_slice(&buffer[offset..]);
        let mut msg = core::mem::take(&mut self.msg);
        let bs = self.block_size();

        let result = match self.direction {
            Direction::Encryption => self.seal_buffered(&mut msg, buffer, offset),
            Direction::Decryption => {
                if msg.len() < bs {
                    Err(AeadError::DecodingFailure("input shorter than the tag"))
                } else {
                    self.open_buffered(&mut msg, buffer, offset)
                }
            }
        };

        msg.clear();
        self.msg = msg;
        self.nonce_mac = None;
        self.state.end_message();
        result
    }

    fn reset(&mut self) {
        self.msg.clear();
        self.nonce_mac = None;
        self.state.end_message();
    }

    fn clear(&mut self) {
        self.cmac.clear();
        self.ctr.clear();
        self.ad_macs.clear();
        self.reset();
        self.state.unkeyed();
    }
}

impl<C: BlockCipher> Siv<C> {
    /// `msg` holds the plaintext; `buffer[offset..]` becomes `V ‖ C`.
    fn seal_buffered(
        &mut self,
        msg: &mut SecretBytes,
        buffer: &mut Vec<u8>,
        offset: usize,
    ) -> Result<usize, AeadError> {
        let v = self.s2v(msg)?;
        self.set_ctr_iv(&v)?;
        self.ctr.apply_keystream(msg)?;

        buffer[offset..].zeroize();
        buffer.truncate(offset);
        buffer.extend_from_slice(&v);
        buffer.extend_from_slice(msg);
        Ok(buffer.len())
    }

    /// `msg` holds `V ‖ C`; on success `buffer[offset..]` becomes `P`.
    fn open_buffered(
        &mut self,
        msg: &mut SecretBytes,
        buffer: &mut Vec<u8>,
        offset: usize,
    ) -> Result<usize, AeadError> {
        let bs = self.block_size();
        let (v, text) = msg.split_at_mut(bs);

        self.set_ctr_iv(v)?;
        self.ctr.apply_keystream(text)?;
        let t = self.s2v(text)?;

        if !constant_time_compare(&t, v) {
            return Err(reject(buffer, offset, "SIV"));
        }

        buffer.truncate(offset);
        buffer.extend_from_slice(text);
        Ok(buffer.len())
    }
}

impl<C: BlockCipher> core::fmt::Debug for Siv<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Siv {{ direction: {:?}, ad_slots: {}, [protected] }}",
            self.direction,
            self.ad_macs.len()
        )
    }
}
