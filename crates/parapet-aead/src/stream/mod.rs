// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Stream cipher primitives.

mod chacha20;

pub use chacha20::{ChaCha20, hchacha20};
