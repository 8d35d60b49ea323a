// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Universal hashes and MACs the engines are built from.

mod cmac;
mod ghash;
mod poly1305;
mod poly_dbl;

pub use cmac::Cmac;
pub use ghash::{Ghash, GhashBackend};
pub use poly1305::Poly1305;
pub use poly_dbl::{poly_double_n, poly_double_supported_size};
