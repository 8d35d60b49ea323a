// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

#[cfg(test)]
mod constant_time_compare_tests {
    use parapet_ct::{constant_time_compare, constant_time_eq};
    use proptest::prelude::*;

    #[test]
    fn test_equal_tags() {
        let tag = [0x5Au8; 16];
        assert!(constant_time_compare(&tag, &tag));
        assert!(constant_time_eq(&tag, &tag));
    }

    #[test]
    fn test_empty_slices_are_equal() {
        assert!(constant_time_compare(&[], &[]));
    }

    #[test]
    fn test_length_mismatch_is_unequal() {
        assert!(!constant_time_compare(&[0u8; 16], &[0u8; 12]));
    }

    #[test]
    fn test_difference_at_every_position() {
        let base = [0x11u8; 16];
        for i in 0..base.len() {
            let mut other = base;
            other[i] ^= 0x01;
            assert!(!constant_time_compare(&base, &other), "byte {i}");
        }
    }

    proptest! {
        #[test]
        fn prop_matches_slice_equality(a in proptest::collection::vec(any::<u8>(), 0..64),
                                       b in proptest::collection::vec(any::<u8>(), 0..64)) {
            prop_assert_eq!(constant_time_compare(&a, &b), a == b);
        }

        #[test]
        fn prop_single_bit_flip_detected(a in proptest::collection::vec(any::<u8>(), 1..64),
                                         idx in any::<usize>(), bit in 0u8..8) {
            let mut b = a.clone();
            let i = idx % b.len();
            b[i] ^= 1 << bit;
            prop_assert!(!constant_time_compare(&a, &b));
        }
    }
}
