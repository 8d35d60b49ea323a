// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Constant-time building blocks.
//!
//! Everything here is computed with arithmetic and bitwise identities only, so
//! control flow and memory access never depend on the (secret) operands.
//!
//! - [`Mask`]: a word that is either all-zero or all-one bits
//! - [`constant_time_compare`]: the only sanctioned way to compare tags/MACs
//! - [`conditional_copy_mem`], [`conditional_swap`], [`xor_buf`]: masked data movement
//!
//! ```
//! use parapet_ct::{Mask, constant_time_compare};
//!
//! let m = Mask::<u32>::is_lt(3, 7);
//! assert_eq!(m.select(10, 20), 10);
//!
//! assert!(constant_time_compare(b"tag!", b"tag!"));
//! assert!(!constant_time_compare(b"tag!", b"tag?"));
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[cfg(test)]
mod tests;

#[cfg(feature = "test-utils")]
mod hex;
mod mask;
mod mem;
mod word;

#[cfg(feature = "test-utils")]
pub use hex::hex_to_bytes;
pub use mask::Mask;
pub use mem::{
    conditional_copy_mem, conditional_swap, constant_time_compare, constant_time_eq, ct_is_equal,
    ct_is_zero, xor_buf, xor_buf_into,
};
pub use word::CtWord;
