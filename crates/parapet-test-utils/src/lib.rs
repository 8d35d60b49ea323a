// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for Parapet crates.
//!
//! - [`for_each_bit_flip`]: visit every single-bit corruption of a buffer
//! - [`index_permutations`] / [`permuted`]: reorder associated-data lists
//!
//! ## License
//!
//! GPL-3.0-only

mod permutations;
mod tamper;

pub use permutations::{index_permutations, permuted};
pub use tamper::{for_each_bit_flip, for_each_truncation};
