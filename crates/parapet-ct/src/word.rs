// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Unsigned word bound for [`Mask`](crate::Mask).

use core::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

mod sealed {
    pub trait Sealed {}
}

/// Unsigned integer types a [`Mask`](crate::Mask) can be built over.
///
/// Sealed: signed types would break the top-bit identities, so only the
/// unsigned primitives implement it.
pub trait CtWord:
    sealed::Sealed
    + Copy
    + Eq
    + core::fmt::Debug
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    const BITS: u32;
    const ZERO: Self;
    const ONE: Self;
    const ALL_ONES: Self;

    fn wrapping_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_ct_word {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl CtWord for $ty {
                const BITS: u32 = <$ty>::BITS;
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const ALL_ONES: Self = <$ty>::MAX;

                #[inline(always)]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$ty>::wrapping_sub(self, rhs)
                }
            }
        )*
    };
}

impl_ct_word!(u8, u16, u32, u64, u128, usize);
