// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! AEAD engines.

mod ccm;
mod chacha20poly1305;
mod eax;
mod gcm;
mod ocb;
mod siv;

pub use ccm::{Ccm, CcmConfig};
pub use chacha20poly1305::{ChaCha20Poly1305, Poly1305Framing};
pub use eax::{Eax, EaxConfig};
pub use gcm::{Gcm, GcmConfig};
pub use ocb::{Ocb, OcbConfig};
pub use siv::Siv;

use zeroize::Zeroize;

use crate::error::AeadError;

/// `offset` must lie inside the buffer.
pub(crate) fn check_offset(buffer: &[u8], offset: usize) -> Result<(), AeadError> {
    if offset > buffer.len() {
        return Err(AeadError::InvalidArgument("offset past end of buffer"));
    }
    Ok(())
}

/// Length of the ciphertext body in `buffer[offset..]` once the trailing
/// `tag_size` bytes are set aside.
pub(crate) fn body_len(buffer: &[u8], offset: usize, tag_size: usize) -> Result<usize, AeadError> {
    check_offset(buffer, offset)?;
    (buffer.len() - offset)
        .checked_sub(tag_size)
        .ok_or(AeadError::DecodingFailure("input shorter than the tag"))
}

/// Wipes and drops everything from `offset` on and reports the mismatch.
pub(crate) fn reject(buffer: &mut Vec<u8>, offset: usize, algorithm: &'static str) -> AeadError {
    buffer[offset..].zeroize();
    buffer.truncate(offset);
    tracing::debug!(algorithm, "authentication tag mismatch, output discarded");
    AeadError::InvalidAuthenticationTag
}

/// `process` input must be a whole number of `granularity`-byte units.
pub(crate) fn check_granularity(len: usize, granularity: usize) -> Result<(), AeadError> {
    if len % granularity != 0 {
        return Err(AeadError::InvalidArgument(
            "input is not a multiple of the update granularity",
        ));
    }
    Ok(())
}
