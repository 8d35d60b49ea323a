// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Engine drivers and backend listings shared by unit and integration tests.

mod backends;
mod drive;

pub use backends::available_ghash_backends;
pub use drive::{run_message, run_message_chunked};
