// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::error::AeadError;
use crate::traits::{AeadMode, Direction};

fn begin<M: AeadMode + ?Sized>(
    engine: &mut M,
    key: &[u8],
    nonce: &[u8],
    ads: &[&[u8]],
) -> Result<(), AeadError> {
    engine.set_key(key)?;
    for (index, ad) in ads.iter().enumerate() {
        engine.set_associated_data_n(index, ad)?;
    }
    engine.start_msg(nonce)
}

/// One full message: key, every AD slot in order, nonce, then `input`
/// through a single `finish`.
pub fn run_message<M: AeadMode + ?Sized>(
    engine: &mut M,
    key: &[u8],
    nonce: &[u8],
    ads: &[&[u8]],
    input: &[u8],
) -> Result<Vec<u8>, AeadError> {
    begin(engine, key, nonce, ads)?;
    let mut buffer = input.to_vec();
    engine.finish(&mut buffer, 0)?;
    Ok(buffer)
}

/// Same as [`run_message`] but streams the body through `process` in chunks
/// of `granules × update_granularity()` bytes. The tag of a decryption and
/// whatever does not fill a chunk go to `finish`.
pub fn run_message_chunked<M: AeadMode + ?Sized>(
    engine: &mut M,
    key: &[u8],
    nonce: &[u8],
    ads: &[&[u8]],
    input: &[u8],
    granules: usize,
) -> Result<Vec<u8>, AeadError> {
    begin(engine, key, nonce, ads)?;

    let chunk = engine.update_granularity() * granules.max(1);
    let body = match engine.direction() {
        Direction::Encryption => input.len(),
        Direction::Decryption => input.len().saturating_sub(engine.tag_size()),
    };
    let streamed = body / chunk * chunk;

    let mut out = Vec::with_capacity(input.len() + engine.tag_size());
    for piece in input[..streamed].chunks(chunk) {
        let mut buf = piece.to_vec();
        let released = engine.process(&mut buf)?;
        out.extend_from_slice(&buf[..released]);
    }

    let mut rest = input[streamed..].to_vec();
    engine.finish(&mut rest, 0)?;
    out.extend_from_slice(&rest);
    Ok(out)
}
