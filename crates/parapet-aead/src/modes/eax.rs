// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! EAX mode (Bellare, Rogaway, Wagner).
//!
//! Three CMACs, each keyed alike and domain-separated by a one-block prefix
//! `0^(n-8) ‖ t`: `t = 0` over the nonce (also the CTR IV), `t = 1` over
//! the AD, `t = 2` over the ciphertext. The tag is their XOR.

use parapet_ct::{constant_time_compare, xor_buf};
use tracing::instrument;

use crate::ctr::Ctr;
use crate::error::AeadError;
use crate::mac::Cmac;
use crate::modes::{body_len, check_offset, reject};
use crate::secret::SecretBytes;
use crate::state::Lifecycle;
use crate::traits::{AeadMode, BlockCipher, Direction, KeyLengthSpec, StreamCipher};

const NONCE_DOMAIN: u8 = 0;
const AD_DOMAIN: u8 = 1;
const TEXT_DOMAIN: u8 = 2;

/// EAX parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EaxConfig {
    /// 1..=block size; `None` means a full block.
    pub tag_size: Option<usize>,
}

/// `CMAC(0^(n-8) ‖ domain ‖ data)` into `out`.
fn eax_prf<C: BlockCipher>(
    cmac: &mut Cmac<C>,
    domain: u8,
    data: &[u8],
    out: &mut [u8],
) -> Result<(), AeadError> {
    start_domain(cmac, domain)?;
    cmac.update(data)?;
    cmac.finalize_into(out)
}

fn start_domain<C: BlockCipher>(cmac: &mut Cmac<C>, domain: u8) -> Result<(), AeadError> {
    let bs = cmac.output_length();
    let mut prefix = [0u8; 128];
    prefix[bs - 1] = domain;
    cmac.update(&prefix[..bs])
}

/// EAX over any block cipher with a CMAC doubling polynomial.
pub struct Eax<C: BlockCipher> {
    direction: Direction,
    tag_size: usize,
    ctr: Ctr<C>,
    cmac: Cmac<C>,
    ad_mac: Option<SecretBytes>,
    nonce_mac: SecretBytes,
    state: Lifecycle,
}

impl<C: BlockCipher> Eax<C> {
    /// # Errors
    ///
    /// [`AeadError::InvalidArgument`] if the tag size is outside 1..=block size
    /// or the block size has no doubling polynomial.
    pub fn new(cipher: C, direction: Direction, config: EaxConfig) -> Result<Self, AeadError> {
        let bs = cipher.block_size();
        let tag_size = config.tag_size.unwrap_or(bs);
        if tag_size == 0 || tag_size > bs {
            return Err(AeadError::InvalidArgument(
                "EAX: tag size must be 1..=block size",
            ));
        }

        Ok(Self {
            direction,
            tag_size,
            ctr: Ctr::new(cipher.clone()),
            cmac: Cmac::new(cipher)?,
            ad_mac: None,
            nonce_mac: SecretBytes::zeroed(bs),
            state: Lifecycle::default(),
        })
    }

    fn block_size(&self) -> usize {
        self.cmac.output_length()
    }

    /// `data_mac ^ nonce_mac ^ ad_mac`, the AD MAC being computed here if no
    /// AD was ever set.
    fn compute_tag(&mut self, tag: &mut SecretBytes) -> Result<(), AeadError> {
        self.cmac.finalize_into(tag)?;
        xor_buf(tag, &self.nonce_mac);

        if self.ad_mac.is_none() {
            let mut empty = SecretBytes::zeroed(self.block_size());
            eax_prf(&mut self.cmac, AD_DOMAIN, &[], &mut empty)?;
            self.ad_mac = Some(empty);
        }
        if let Some(ad_mac) = &self.ad_mac {
            xor_buf(tag, ad_mac);
        }

        Ok(())
    }
}

impl<C: BlockCipher> AeadMode for Eax<C> {
    fn name(&self) -> &'static str {
        "EAX"
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn key_spec(&self) -> KeyLengthSpec {
        self.cmac.key_spec()
    }

    fn valid_nonce_length(&self, _length: usize) -> bool {
        true
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
        self.block_size()
    }

    #[instrument(level = "debug", skip(self, key), fields(algorithm = "EAX", key_len = key.len()))]
    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        self.state.unkeyed();
        self.ctr.set_key(key)?;
        self.cmac.set_key(key)?;
        self.ad_mac = None;
        self.state.keyed();
        Ok(())
    }

    fn set_associated_data_n(&mut self, index: usize, ad: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;
        if index != 0 {
            return Err(AeadError::InvalidArgument(
                "EAX: only one associated data input",
            ));
        }

        let mut mac = SecretBytes::zeroed(self.block_size());
        eax_prf(&mut self.cmac, AD_DOMAIN, ad, &mut mac)?;
        self.ad_mac = Some(mac);
        Ok(())
    }

    fn start_msg(&mut self, nonce: &[u8]) -> Result<(), AeadError> {
        self.state.check_idle()?;

        eax_prf(&mut self.cmac, NONCE_DOMAIN, nonce, &mut self.nonce_mac)?;
        self.ctr.set_iv(&self.nonce_mac)?;
        start_domain(&mut self.cmac, TEXT_DOMAIN)?;

        self.state.begin_message()
    }

    fn process(&mut self, buf: &mut [u8]) -> Result<usize, AeadError> {
        self.state.check_in_message()?;

        match self.direction {
            Direction::Encryption => {
                self.ctr.apply_keystream(buf)?;
                self.cmac.update(buf)?;
            }
            Direction::Decryption => {
                self.cmac.update(buf)?;
                self.ctr.apply_keystream(buf)?;
            }
        }

        Ok(buf.len())
    }

    #[instrument(level = "debug", skip(self, buffer), fields(algorithm = "EAX", direction = ?self.direction, len = buffer.len()))]
    fn finish(&mut self, buffer: &mut Vec<u8>, offset: usize) -> Result<usize, AeadError> {
        self.state.check_in_message()?;
        if let Err(e) = check_offset(buffer, offset) {
            self.reset();
            return Err(e);
        }
        let mut tag = SecretBytes::zeroed(self.block_size());

        let result = match self.direction {
            Direction::Encryption => {
                self.process(&mut buffer[offset..])?;
                self.compute_tag(&mut tag)?;

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

                self.cmac.update(ct)?;
                self.compute_tag(&mut tag)?;

                if !constant_time_compare(&tag[..self.tag_size], received) {
                    Err(reject(buffer, offset, "EAX"))
                } else {
                    self.ctr.apply_keystream(&mut buffer[offset..offset + body])?;
                    buffer.truncate(offset + body);
                    Ok(buffer.len())
                }
            }
        };

        self.nonce_mac.fill(0);
        self.state.end_message();
        result
    }

    fn reset(&mut self) {
        self.cmac.reset();
        self.nonce_mac.fill(0);
        self.state.end_message();
    }

    fn clear(&mut self) {
        self.ctr.clear();
        self.cmac.clear();
        self.ad_mac = None;
        self.nonce_mac.fill(0);
        self.state.unkeyed();
    }
}

impl<C: BlockCipher> core::fmt::Debug for Eax<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Eax {{ direction: {:?}, tag_size: {}, [protected] }}",
            self.direction, self.tag_size
        )
    }
}
