// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Runtime algorithm selection over a closed set of engines.
//!
//! [`Aead`] owns exactly one engine and forwards every [`AeadMode`] call to
//! it. The one-shot [`Aead::seal`] / [`Aead::open`] helpers drive the full
//! lifecycle for callers that have the whole message in memory.

use crate::block::Aes;
use crate::error::AeadError;
use crate::modes::{
    Ccm, CcmConfig, ChaCha20Poly1305, Eax, EaxConfig, Gcm, GcmConfig, Ocb, OcbConfig,
    Poly1305Framing, Siv,
};
use crate::traits::{AeadMode, Direction, KeyLengthSpec};

/// Algorithms [`Aead`] can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AeadAlgorithm {
    AesGcm,
    AesEax,
    AesSiv,
    AesCcm,
    AesOcb,
    ChaCha20Poly1305,
}

impl AeadAlgorithm {
    pub const ALL: [Self; 6] = [
        Self::AesGcm,
        Self::AesEax,
        Self::AesSiv,
        Self::AesCcm,
        Self::AesOcb,
        Self::ChaCha20Poly1305,
    ];
}

enum AeadBackendImpl {
    Gcm(Gcm<Aes>),
    Eax(Eax<Aes>),
    Siv(Siv<Aes>),
    Ccm(Ccm<Aes>),
    Ocb(Ocb<Aes>),
    ChaCha20Poly1305(ChaCha20Poly1305),
}

macro_rules! dispatch {
    ($backend:expr, $engine:ident => $call:expr) => {
        match $backend {
            AeadBackendImpl::Gcm($engine) => $call,
            AeadBackendImpl::Eax($engine) => $call,
            AeadBackendImpl::Siv($engine) => $call,
            AeadBackendImpl::Ccm($engine) => $call,
            AeadBackendImpl::Ocb($engine) => $call,
            AeadBackendImpl::ChaCha20Poly1305($engine) => $call,
        }
    };
}

/// An AEAD engine picked at runtime.
pub struct Aead {
    algorithm: AeadAlgorithm,
    backend: AeadBackendImpl,
}

impl Aead {
    /// Engine for `algorithm` with its default parameters: 16-byte tags,
    /// CCM with `L = 3`, ChaCha20-Poly1305 framed by nonce length.
    pub fn new(algorithm: AeadAlgorithm, direction: Direction) -> Self {
        let backend = match algorithm {
            AeadAlgorithm::AesGcm => AeadBackendImpl::Gcm(
                Gcm::new(Aes::new(), direction, GcmConfig::default())
                    .expect("infallible: AES has a 128-bit block and the default tag is 16"),
            ),
            AeadAlgorithm::AesEax => AeadBackendImpl::Eax(
                Eax::new(Aes::new(), direction, EaxConfig::default())
                    .expect("infallible: AES block size has a doubling polynomial"),
            ),
            AeadAlgorithm::AesSiv => AeadBackendImpl::Siv(
                Siv::new(Aes::new(), direction)
                    .expect("infallible: AES has a 128-bit block"),
            ),
            AeadAlgorithm::AesCcm => AeadBackendImpl::Ccm(
                Ccm::new(Aes::new(), direction, CcmConfig::default())
                    .expect("infallible: default CCM parameters are in range"),
            ),
            AeadAlgorithm::AesOcb => AeadBackendImpl::Ocb(
                Ocb::new(Aes::new(), direction, OcbConfig::default())
                    .expect("infallible: AES has a 128-bit block and the default tag is 16"),
            ),
            AeadAlgorithm::ChaCha20Poly1305 => AeadBackendImpl::ChaCha20Poly1305(
                ChaCha20Poly1305::new(direction, Poly1305Framing::default()),
            ),
        };

        Self { algorithm, backend }
    }

    pub fn aes_gcm(direction: Direction) -> Self {
        Self::new(AeadAlgorithm::AesGcm, direction)
    }

    pub fn aes_eax(direction: Direction) -> Self {
        Self::new(AeadAlgorithm::AesEax, direction)
    }

    pub fn aes_siv(direction: Direction) -> Self {
        Self::new(AeadAlgorithm::AesSiv, direction)
    }

    pub fn aes_ccm(direction: Direction) -> Self {
        Self::new(AeadAlgorithm::AesCcm, direction)
    }

    pub fn aes_ocb(direction: Direction) -> Self {
        Self::new(AeadAlgorithm::AesOcb, direction)
    }

    pub fn chacha20_poly1305(direction: Direction) -> Self {
        Self::new(AeadAlgorithm::ChaCha20Poly1305, direction)
    }

    pub fn algorithm(&self) -> AeadAlgorithm {
        self.algorithm
    }

    /// Human-readable engine name, e.g. `"GCM"`.
    pub fn backend_name(&self) -> &'static str {
        self.name()
    }

    fn prepare(&mut self, key: &[u8], nonce: &[u8], ad: &[u8]) -> Result<(), AeadError> {
        self.set_key(key)?;
        self.set_associated_data(ad)?;
        self.start_msg(nonce)
    }

    /// Keys the engine, encrypts `plaintext` as one message and returns the
    /// wire format (`ct ‖ tag`, or `V ‖ ct` for SIV).
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidState`] on a decrypting instance, plus any key,
    /// nonce or length error of the engine.
    pub fn seal(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        ad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, AeadError> {
        if self.direction() != Direction::Encryption {
            return Err(AeadError::InvalidState("seal requires an encrypting engine"));
        }

        self.prepare(key, nonce, ad)?;
        let mut buffer = Vec::with_capacity(self.output_length(plaintext.len()));
        buffer.extend_from_slice(plaintext);
        self.finish(&mut buffer, 0)?;
        Ok(buffer)
    }

    /// Keys the engine, verifies and decrypts `ciphertext` as one message.
    ///
    /// Nothing is returned unless the tag verifies.
    ///
    /// # Errors
    ///
    /// [`AeadError::InvalidState`] on an encrypting instance,
    /// [`AeadError::DecodingFailure`] for input shorter than the tag,
    /// [`AeadError::InvalidAuthenticationTag`] on a mismatch.
    pub fn open(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        ad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, AeadError> {
        if self.direction() != Direction::Decryption {
            return Err(AeadError::InvalidState("open requires a decrypting engine"));
        }

        self.prepare(key, nonce, ad)?;
        let mut buffer = ciphertext.to_vec();
        self.finish(&mut buffer, 0)?;
        Ok(buffer)
    }
}

impl AeadMode for Aead {
    fn name(&self) -> &'static str {
        dispatch!(&self.backend, e => e.name())
    }

    fn direction(&self) -> Direction {
        dispatch!(&self.backend, e => e.direction())
    }

    fn key_spec(&self) -> KeyLengthSpec {
        dispatch!(&self.backend, e => e.key_spec())
    }

    fn valid_nonce_length(&self, length: usize) -> bool {
        dispatch!(&self.backend, e => e.valid_nonce_length(length))
    }

    fn tag_size(&self) -> usize {
        dispatch!(&self.backend, e => e.tag_size())
    }

    fn update_granularity(&self) -> usize {
        dispatch!(&self.backend, e => e.update_granularity())
    }

    fn has_keying_material(&self) -> bool {
        dispatch!(&self.backend, e => e.has_keying_material())
    }

    fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
        dispatch!(&mut self.backend, e => e.set_key(key))
    }

    fn set_associated_data_n(&mut self, index: usize, ad: &[u8]) -> Result<(), AeadError> {
        dispatch!(&mut self.backend, e => e.set_associated_data_n(index, ad))
    }

    fn start_msg(&mut self, nonce: &[u8]) -> Result<(), AeadError> {
        dispatch!(&mut self.backend, e => e.start_msg(nonce))
    }

    fn process(&mut self, buf: &mut [u8]) -> Result<usize, AeadError> {
        dispatch!(&mut self.backend, e => e.process(buf))
    }

    fn finish(&mut self, buffer: &mut Vec<u8>, offset: usize) -> Result<usize, AeadError> {
        dispatch!(&mut self.backend, e => e.finish(buffer, offset))
    }

    fn reset(&mut self) {
        dispatch!(&mut self.backend, e => e.reset())
    }

    fn clear(&mut self) {
        dispatch!(&mut self.backend, e => e.clear())
    }

    fn maximum_associated_data_inputs(&self) -> usize {
        dispatch!(&self.backend, e => e.maximum_associated_data_inputs())
    }

    fn default_nonce_length(&self) -> usize {
        dispatch!(&self.backend, e => e.default_nonce_length())
    }

    fn output_length(&self, input_length: usize) -> usize {
        dispatch!(&self.backend, e => e.output_length(input_length))
    }
}

impl core::fmt::Debug for Aead {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Aead {{ algorithm: {:?}, direction: {:?}, [protected] }}",
            self.algorithm,
            self.direction()
        )
    }
}
