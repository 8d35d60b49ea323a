// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! ChaCha20 keystream generator (RFC 8439) with XChaCha20 nonce extension.
//!
//! Nonce layouts:
//!
//! | Nonce | Words 12..16 | Counter |
//! |---|---|---|
//! | 8 bytes | `ctr_lo, ctr_hi, n0, n1` | 64-bit |
//! | 12 bytes | `ctr, n0, n1, n2` | 32-bit |
//! | 24 bytes | `ctr_lo, ctr_hi, n4, n5` under `HChaCha20(key, n[0..16])` | 64-bit |

use parapet_ct::xor_buf;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::AeadError;
use crate::traits::{KeyLengthSpec, StreamCipher};

const KEY_SIZE: usize = 32;
const BLOCK_SIZE: usize = 64;
const HCHACHA20_NONCE_SIZE: usize = 16;
const PIPELINE: usize = 4;

/// Keystream bytes under a 32-bit block counter: `2^32` blocks of 64 bytes.
const NARROW_STREAM_BYTES: u64 = 1 << 38;

const SIGMA: [u32; 4] = [0x61707865, 0x3320646e, 0x79622d32, 0x6b206574];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counter {
    Wide,
    Narrow,
}

impl Counter {
    /// Bytes of keystream available before the counter would wrap.
    fn stream_limit(self) -> u64 {
        match self {
            Counter::Wide => u64::MAX,
            Counter::Narrow => NARROW_STREAM_BYTES,
        }
    }
}

#[inline(always)]
fn quarter_round(s: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    s[a] = s[a].wrapping_add(s[b]);
    s[d] = (s[d] ^ s[a]).rotate_left(16);

    s[c] = s[c].wrapping_add(s[d]);
    s[b] = (s[b] ^ s[c]).rotate_left(12);

    s[a] = s[a].wrapping_add(s[b]);
    s[d] = (s[d] ^ s[a]).rotate_left(8);

    s[c] = s[c].wrapping_add(s[d]);
    s[b] = (s[b] ^ s[c]).rotate_left(7);
}

#[inline(always)]
fn double_rounds(s: &mut [u32; 16]) {
    for _ in 0..10 {
        quarter_round(s, 0, 4, 8, 12);
        quarter_round(s, 1, 5, 9, 13);
        quarter_round(s, 2, 6, 10, 14);
        quarter_round(s, 3, 7, 11, 15);

        quarter_round(s, 0, 5, 10, 15);
        quarter_round(s, 1, 6, 11, 12);
        quarter_round(s, 2, 7, 8, 13);
        quarter_round(s, 3, 4, 9, 14);
    }
}

#[inline(always)]
fn load_le(words: &mut [u32], bytes: &[u8]) {
    for (w, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *w = u32::from_le_bytes(
            chunk
                .try_into()
                .expect("infallible: chunks_exact yields 4-byte chunks"),
        );
    }
}

/// HChaCha20 subkey derivation (draft-irtf-cfrg-xchacha §2.2).
pub fn hchacha20(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; HCHACHA20_NONCE_SIZE],
    output: &mut [u8; KEY_SIZE],
) {
    let mut state = [0u32; 16];
    state[0..4].copy_from_slice(&SIGMA);
    load_le(&mut state[4..12], key);
    load_le(&mut state[12..16], nonce);

    double_rounds(&mut state);

    for (i, &w) in state[0..4].iter().chain(state[12..16].iter()).enumerate() {
        output[i * 4..i * 4 + 4].copy_from_slice(&w.to_le_bytes());
    }

    state.zeroize();
}

/// ChaCha20 / XChaCha20 as a [`StreamCipher`].
///
/// Keystream is generated four blocks at a time and buffered. Running past
/// the end of the block counter is an error, never a wrap back to block 0.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ChaCha20 {
    key: [u8; KEY_SIZE],
    state: [u32; 16],
    working: [u32; 16],
    buffer: [u8; BLOCK_SIZE * PIPELINE],
    position: usize,
    stream_offset: u64,
    keyed: bool,
    iv_set: bool,
    #[zeroize(skip)]
    counter: Counter,
}

impl Default for ChaCha20 {
    fn default() -> Self {
        Self::new()
    }
}

impl ChaCha20 {
    pub fn new() -> Self {
        Self {
            key: [0; KEY_SIZE],
            state: [0; 16],
            working: [0; 16],
            buffer: [0; BLOCK_SIZE * PIPELINE],
            position: BLOCK_SIZE * PIPELINE,
            stream_offset: 0,
            keyed: false,
            iv_set: false,
            counter: Counter::Narrow,
        }
    }

    fn set_block_counter(&mut self, block: u64) {
        self.state[12] = block as u32;
        if self.counter == Counter::Wide {
            self.state[13] = (block >> 32) as u32;
        }
    }

    fn refill(&mut self) {
        for block in self.buffer.chunks_exact_mut(BLOCK_SIZE) {
            self.working = self.state;
            double_rounds(&mut self.working);

            for (i, out) in block.chunks_exact_mut(4).enumerate() {
                out.copy_from_slice(&self.working[i].wrapping_add(self.state[i]).to_le_bytes());
            }

            self.state[12] = self.state[12].wrapping_add(1);
            if self.counter == Counter::Wide && self.state[12] == 0 {
                self.state[13] = self.state[13].wrapping_add(1);
            }
        }

        self.working.zeroize();
        self.position = 0;
    }

    fn check_ready(&self) -> Result<(), AeadError> {
        if !self.keyed {
            return Err(AeadError::KEY_NOT_SET);
        }
        if !self.iv_set {
            return Err(AeadError::InvalidState("ChaCha20: nonce not set"));
        }
        Ok(())
    }
}

impl StreamCipher for ChaCha20 {
    fn name(&self) -> &'static str {
        "ChaCha20"
    }

    fn key_spec(&self) -> KeyLengthSpec {
        KeyLengthSpec::fixed(KEY_SIZE)
    }

    fn has_key(&self) -> bool {
        self.keyed
    }

    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        if key.len() != KEY_SIZE {
            return Err(AeadError::InvalidKeyLength {
                algorithm: "ChaCha20",
                length: key.len(),
            });
        }

        self.zeroize();
        self.key.copy_from_slice(key);
        self.position = self.buffer.len();
        self.keyed = true;
        Ok(())
    }

    fn valid_iv_length(&self, length: usize) -> bool {
        matches!(length, 8 | 12 | 24)
    }

    fn default_iv_length(&self) -> usize {
        12
    }

    fn set_iv(&mut self, iv: &[u8]) -> Result<(), AeadError> {
        if !self.keyed {
            return Err(AeadError::KEY_NOT_SET);
        }

        self.state[0..4].copy_from_slice(&SIGMA);
        self.state[12] = 0;
        self.state[13] = 0;

        match iv.len() {
            8 => {
                load_le(&mut self.state[4..12], &self.key);
                load_le(&mut self.state[14..16], iv);
                self.counter = Counter::Wide;
            }
            12 => {
                load_le(&mut self.state[4..12], &self.key);
                load_le(&mut self.state[13..16], iv);
                self.counter = Counter::Narrow;
            }
            24 => {
                let mut subkey = [0u8; KEY_SIZE];
                hchacha20(
                    &self.key,
                    iv[..HCHACHA20_NONCE_SIZE]
                        .try_into()
                        .expect("infallible: iv[..16] is exactly 16 bytes"),
                    &mut subkey,
                );
                load_le(&mut self.state[4..12], &subkey);
                subkey.zeroize();

                load_le(&mut self.state[14..16], &iv[HCHACHA20_NONCE_SIZE..]);
                self.counter = Counter::Wide;
            }
            length => {
                return Err(AeadError::InvalidNonceLength {
                    algorithm: "ChaCha20",
                    length,
                });
            }
        }

        self.iv_set = true;
        self.stream_offset = 0;
        self.refill();
        Ok(())
    }

    fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<(), AeadError> {
        self.check_ready()?;

        let end = self
            .stream_offset
            .checked_add(buf.len() as u64)
            .filter(|&end| end <= self.counter.stream_limit())
            .ok_or(AeadError::InvalidArgument(
                "ChaCha20: keystream exhausted for this nonce",
            ))?;

        let mut done = 0;
        while done < buf.len() {
            if self.position == self.buffer.len() {
                self.refill();
            }

            let n = (self.buffer.len() - self.position).min(buf.len() - done);
            xor_buf(
                &mut buf[done..done + n],
                &self.buffer[self.position..self.position + n],
            );
            self.position += n;
            done += n;
        }

        self.stream_offset = end;
        Ok(())
    }

    fn seek(&mut self, offset: u64) -> Result<(), AeadError> {
        self.check_ready()?;

        let block = offset / BLOCK_SIZE as u64;
        if self.counter == Counter::Narrow && block > u64::from(u32::MAX) {
            return Err(AeadError::InvalidArgument(
                "ChaCha20: seek past 32-bit block counter",
            ));
        }

        self.set_block_counter(block);
        self.refill();
        self.position = (offset % BLOCK_SIZE as u64) as usize;
        self.stream_offset = offset;
        Ok(())
    }

    fn clear(&mut self) {
        self.zeroize();
        self.position = self.buffer.len();
    }
}

impl core::fmt::Debug for ChaCha20 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ChaCha20 {{ [protected] }}")
    }
}
