// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Permutation utilities for order-sensitivity tests.

/// Rearranges `indices` into the next lexicographic permutation.
///
/// Returns `false` once the last permutation (descending order) is reached.
fn next_permutation(indices: &mut [usize]) -> bool {
    let n = indices.len();
    if n < 2 {
        return false;
    }

    let mut i = n - 1;
    while i > 0 && indices[i - 1] >= indices[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }

    let mut j = n - 1;
    while indices[j] <= indices[i - 1] {
        j -= 1;
    }

    indices.swap(i - 1, j);
    indices[i..].reverse();
    true
}

/// Calls `callback` with every permutation of `[0, 1, ..., len-1]`, in
/// lexicographic order starting from the identity.
///
/// # Example
/// ```
/// use parapet_test_utils::index_permutations;
///
/// let mut seen = Vec::new();
/// index_permutations(3, |p| seen.push(p.to_vec()));
/// assert_eq!(seen.len(), 6);
/// assert_eq!(seen[0], [0, 1, 2]);
/// assert_eq!(seen[5], [2, 1, 0]);
/// ```
pub fn index_permutations<F>(len: usize, mut callback: F)
where
    F: FnMut(&[usize]),
{
    if len == 0 {
        return;
    }

    let mut indices: Vec<usize> = (0..len).collect();
    loop {
        callback(&indices);
        if !next_permutation(&mut indices) {
            break;
        }
    }
}

/// Returns a copy of `items` reordered so that position `i` holds
/// `items[perm[i]]`.
///
/// # Panics
///
/// Panics if `perm` is not the same length as `items`.
///
/// # Example
/// ```
/// use parapet_test_utils::permuted;
///
/// assert_eq!(permuted(&['a', 'b', 'c'], &[2, 0, 1]), ['c', 'a', 'b']);
/// ```
pub fn permuted<T: Clone>(items: &[T], perm: &[usize]) -> Vec<T> {
    assert_eq!(items.len(), perm.len(), "permuted: length mismatch");
    perm.iter().map(|&i| items[i].clone()).collect()
}
