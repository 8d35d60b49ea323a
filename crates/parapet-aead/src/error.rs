// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Common AEAD error types.

/// Errors that can occur during AEAD operations.
///
/// Every variant is raised synchronously by the call that detects the
/// problem. Nothing is retried or recovered internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AeadError {
    #[error("{algorithm}: invalid key length {length}")]
    InvalidKeyLength {
        algorithm: &'static str,
        length: usize,
    },

    #[error("{algorithm}: invalid nonce length {length}")]
    InvalidNonceLength {
        algorithm: &'static str,
        length: usize,
    },

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("decoding failure: {0}")]
    DecodingFailure(&'static str),

    #[error("authentication failed: tag mismatch")]
    InvalidAuthenticationTag,
}

impl AeadError {
    pub(crate) const KEY_NOT_SET: Self = Self::InvalidState("key not set");
}
