// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Authenticated encryption with associated data.
//!
//! Six engines share one state machine ([`AeadMode`]):
//!
//! | Engine | Primitive | Wire format |
//! |---|---|---|
//! | [`Gcm`] | 128-bit block cipher + GHASH | `ct ‖ tag` |
//! | [`Eax`] | block cipher + CMAC | `ct ‖ tag` |
//! | [`Siv`] | 128-bit block cipher + S2V | `V ‖ ct` |
//! | [`Ccm`] | 128-bit block cipher + CBC-MAC | `ct ‖ tag` |
//! | [`Ocb`] | 128-bit block cipher | `ct ‖ tag` |
//! | [`ChaCha20Poly1305`] | ChaCha20 + Poly1305 | `ct ‖ tag` |
//!
//! [`Aead`] wraps all of them behind a closed enum for callers that pick the
//! algorithm at runtime.
//!
//! Tag checks go through [`parapet_ct::constant_time_compare`]. On a mismatch
//! `finish` wipes and truncates the caller's buffer back to `offset`, so no
//! byte of unauthenticated plaintext from the final call is left behind.
//!
//! ## Nonces
//!
//! Nonce uniqueness per key is the caller's responsibility. Nothing here
//! tracks nonce history; reusing one under GCM, CCM, OCB or ChaCha20-Poly1305
//! destroys confidentiality and authenticity for both messages.
//!
//! ## Example
//!
//! ```
//! use parapet_aead::{Aead, AeadMode, Direction};
//!
//! let key = [0x42u8; 16];
//! let nonce = [0x24u8; 12];
//!
//! let mut enc = Aead::aes_gcm(Direction::Encryption);
//! let sealed = enc.seal(&key, &nonce, b"header", b"attack at dawn").unwrap();
//!
//! let mut dec = Aead::aes_gcm(Direction::Decryption);
//! let opened = dec.open(&key, &nonce, b"header", &sealed).unwrap();
//! assert_eq!(opened, b"attack at dawn");
//! ```
//!
//! ## License
//!
//! GPL-3.0-only

#[cfg(test)]
mod tests;

mod aead;
mod ctr;
mod error;
mod feature_detector;
mod secret;
mod state;
mod traits;

pub mod block;
pub mod mac;
pub mod modes;
pub mod stream;

#[cfg(any(test, feature = "test-utils"))]
pub mod support;

pub use aead::{Aead, AeadAlgorithm};
pub use ctr::Ctr;
pub use error::AeadError;
pub use modes::{
    Ccm, CcmConfig, ChaCha20Poly1305, Eax, EaxConfig, Gcm, GcmConfig, Ocb, OcbConfig,
    Poly1305Framing, Siv,
};
pub use secret::{SecretArray, SecretBytes};
pub use traits::{AeadMode, BlockCipher, Direction, KeyLengthSpec, StreamCipher};
