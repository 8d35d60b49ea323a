// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::mac::GhashBackend;

/// Every GHASH backend this CPU can run, the portable ones first.
pub fn available_ghash_backends() -> Vec<GhashBackend> {
    [
        GhashBackend::Portable,
        GhashBackend::PowerTable,
        GhashBackend::Clmul,
    ]
    .into_iter()
    .filter(|backend| backend.is_available())
    .collect()
}
