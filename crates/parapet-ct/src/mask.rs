// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Branch-free boolean masks.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::word::CtWord;

/// A word whose value is always `0` or `T::ALL_ONES`.
///
/// Represents a boolean without ever materialising one, so it can steer
/// selection and masking of secret data without conditional branches.
/// The only exit to a real `bool` is [`Mask::as_bool`], which should be called
/// once, at the point where the result is allowed to become public.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Mask<T: CtWord> {
    value: T,
}

impl<T: CtWord> Mask<T> {
    /// All bits set.
    #[inline(always)]
    pub fn set() -> Self {
        Self { value: T::ALL_ONES }
    }

    /// All bits clear.
    #[inline(always)]
    pub fn cleared() -> Self {
        Self { value: T::ZERO }
    }

    /// Spreads the top bit of `v` over the whole word.
    #[inline(always)]
    pub fn expand_top_bit(v: T) -> Self {
        Self {
            value: T::ZERO.wrapping_sub(v >> (T::BITS - 1)),
        }
    }

    /// Set iff `v != 0`.
    #[inline(always)]
    pub fn expand(v: T) -> Self {
        !Self::is_zero(v)
    }

    /// Set iff `b` is true. The bool itself must already be public.
    #[inline(always)]
    pub fn from_bool(b: bool) -> Self {
        Self::expand_top_bit(T::ZERO.wrapping_sub(if b { T::ONE } else { T::ZERO }))
    }

    /// Set iff `x == 0`.
    #[inline(always)]
    pub fn is_zero(x: T) -> Self {
        Self::expand_top_bit(!x & x.wrapping_sub(T::ONE))
    }

    /// Set iff `x == y`.
    #[inline(always)]
    pub fn is_equal(x: T, y: T) -> Self {
        Self::is_zero(x ^ y)
    }

    /// Set iff `x < y`.
    #[inline(always)]
    pub fn is_lt(x: T, y: T) -> Self {
        Self::expand_top_bit(x ^ ((x ^ y) | (x.wrapping_sub(y) ^ x)))
    }

    /// Set iff `x > y`.
    #[inline(always)]
    pub fn is_gt(x: T, y: T) -> Self {
        Self::is_lt(y, x)
    }

    /// Set iff `x <= y`.
    #[inline(always)]
    pub fn is_lte(x: T, y: T) -> Self {
        !Self::is_gt(x, y)
    }

    /// Set iff `x >= y`.
    #[inline(always)]
    pub fn is_gte(x: T, y: T) -> Self {
        !Self::is_lt(x, y)
    }

    /// Set iff `lower <= v <= upper`.
    #[inline(always)]
    pub fn is_within_range(v: T, lower: T, upper: T) -> Self {
        !(Self::is_lt(v, lower) | Self::is_lt(upper, v))
    }

    /// Set iff `v` equals any element of `accepted`.
    ///
    /// Every element is visited regardless of where (or whether) a match occurs.
    #[inline]
    pub fn is_any_of(v: T, accepted: &[T]) -> Self {
        accepted
            .iter()
            .fold(Self::cleared(), |acc, &a| acc | Self::is_equal(v, a))
    }

    /// Returns `x` if set, else `y`.
    #[inline(always)]
    pub fn select(&self, x: T, y: T) -> T {
        y ^ (self.value & (x ^ y))
    }

    /// Returns `x` if set, else `y`, as masks.
    #[inline(always)]
    pub fn select_mask(&self, x: Self, y: Self) -> Self {
        Self {
            value: self.select(x.value, y.value),
        }
    }

    /// Returns `x` if set, else zero.
    #[inline(always)]
    pub fn if_set_return(&self, x: T) -> T {
        self.value & x
    }

    /// Returns `x` if clear, else zero.
    #[inline(always)]
    pub fn if_not_set_return(&self, x: T) -> T {
        !self.value & x
    }

    /// Zeroes every element of `buf` if set.
    #[inline]
    pub fn if_set_zero_out(&self, buf: &mut [T]) {
        for w in buf.iter_mut() {
            *w = self.if_not_set_return(*w);
        }
    }

    /// Writes `select(x[i], y[i])` into `out[i]`.
    ///
    /// All three slices must have the same length.
    #[inline]
    pub fn select_n(&self, out: &mut [T], x: &[T], y: &[T]) {
        debug_assert_eq!(out.len(), x.len());
        debug_assert_eq!(out.len(), y.len());

        for ((o, &a), &b) in out.iter_mut().zip(x.iter()).zip(y.iter()) {
            *o = self.select(a, b);
        }
    }

    /// Raw word value (`0` or `ALL_ONES`).
    #[inline(always)]
    pub fn value(&self) -> T {
        self.value
    }

    /// Declassifies the mask.
    #[inline(always)]
    pub fn as_bool(&self) -> bool {
        core::hint::black_box(self.value) != T::ZERO
    }
}

impl<T: CtWord> BitAnd for Mask<T> {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self {
            value: self.value & rhs.value,
        }
    }
}

impl<T: CtWord> BitOr for Mask<T> {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self {
            value: self.value | rhs.value,
        }
    }
}

impl<T: CtWord> BitXor for Mask<T> {
    type Output = Self;

    /// XOR of two masks is again a mask ("exactly one set").
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self {
            value: self.value ^ rhs.value,
        }
    }
}

impl<T: CtWord> Not for Mask<T> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self { value: !self.value }
    }
}

impl<T: CtWord> BitAndAssign for Mask<T> {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        self.value = self.value & rhs.value;
    }
}

impl<T: CtWord> BitOrAssign for Mask<T> {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.value = self.value | rhs.value;
    }
}

impl<T: CtWord> BitXorAssign for Mask<T> {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.value = self.value ^ rhs.value;
    }
}

impl<T: CtWord> core::fmt::Debug for Mask<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Mask {{ [opaque] }}")
    }
}
