// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Owned secret buffers that wipe themselves on drop.
//!
//! Key material, subkeys and buffered plaintext live in these types so
//! every exit path (including `?` and panics) scrubs them.

use core::ops::{Deref, DerefMut};

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Fixed-size secret array, zeroed on drop.
#[derive(Clone)]
pub struct SecretArray<const N: usize>([u8; N]);

impl<const N: usize> SecretArray<N> {
    #[inline]
    pub fn new() -> Self {
        Self([0u8; N])
    }

    #[inline]
    pub fn from_array(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn is_zeroed(&self) -> bool {
        parapet_ct::ct_is_zero(&self.0).as_bool()
    }
}

impl<const N: usize> Zeroize for SecretArray<N> {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl<const N: usize> Drop for SecretArray<N> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> ZeroizeOnDrop for SecretArray<N> {}

impl<const N: usize> Default for SecretArray<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Deref for SecretArray<N> {
    type Target = [u8; N];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> DerefMut for SecretArray<N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<const N: usize> core::fmt::Debug for SecretArray<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SecretArray<{}> {{ [protected] }}", N)
    }
}

/// Growable secret buffer, zeroed on drop.
///
/// Growth never leaves a stale copy behind: when the capacity is exhausted
/// the contents move to a fresh allocation and the old one is wiped.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// `len` zero bytes.
    pub fn zeroed(len: usize) -> Self {
        Self(vec![0u8; len])
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut out = Self(Vec::with_capacity(bytes.len()));
        out.0.extend_from_slice(bytes);
        out
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        let needed = self.0.len() + bytes.len();

        if needed > self.0.capacity() {
            let mut grown = Vec::with_capacity(needed.max(self.0.capacity() * 2));
            grown.extend_from_slice(&self.0);
            self.0.zeroize();
            self.0 = grown;
        }

        self.0.extend_from_slice(bytes);
    }

    /// Wipes bytes past `len`, then shortens.
    pub fn truncate(&mut self, len: usize) {
        if len < self.0.len() {
            self.0[len..].zeroize();
            self.0.truncate(len);
        }
    }

    /// Wipes the contents and empties the buffer, keeping the allocation.
    pub fn clear(&mut self) {
        self.truncate(0);
    }
}

impl Deref for SecretBytes {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SecretBytes {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl core::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SecretBytes {{ len: {}, [protected] }}", self.0.len())
    }
}
