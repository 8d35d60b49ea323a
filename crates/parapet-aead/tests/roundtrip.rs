// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Seal/open round trips over every algorithm with random inputs.

use parapet_aead::support::test_utils::{run_message, run_message_chunked};
use parapet_aead::{Aead, AeadAlgorithm, AeadMode, Direction};
use proptest::prelude::*;

fn key_length(engine: &Aead, selector: usize) -> usize {
    let spec = engine.key_spec();
    let lengths: Vec<usize> = (spec.minimum()..=spec.maximum())
        .filter(|&l| spec.valid(l))
        .collect();
    lengths[selector % lengths.len()]
}

fn algorithm() -> impl Strategy<Value = AeadAlgorithm> {
    (0..AeadAlgorithm::ALL.len()).prop_map(|i| AeadAlgorithm::ALL[i])
}

proptest! {
    #[test]
    fn roundtrip_one_shot(
        algorithm in algorithm(),
        key_seed in proptest::collection::vec(any::<u8>(), 64),
        key_selector in 0..8usize,
        nonce_seed in proptest::collection::vec(any::<u8>(), 24),
        ad in proptest::collection::vec(any::<u8>(), 0..64),
        pt in proptest::collection::vec(any::<u8>(), 0..300),
    ) {
        let mut enc = Aead::new(algorithm, Direction::Encryption);
        let key = &key_seed[..key_length(&enc, key_selector)];
        let nonce = &nonce_seed[..enc.default_nonce_length()];

        let sealed = run_message(&mut enc, key, nonce, &[&ad[..]], &pt)
            .expect("Failed to run_message(..)");
        prop_assert_eq!(sealed.len(), enc.output_length(pt.len()));

        let mut dec = Aead::new(algorithm, Direction::Decryption);
        let opened = run_message(&mut dec, key, nonce, &[&ad[..]], &sealed)
            .expect("Failed to run_message(..)");
        prop_assert_eq!(opened, pt);
    }

    #[test]
    fn roundtrip_streamed_matches_one_shot(
        algorithm in algorithm(),
        key_seed in proptest::collection::vec(any::<u8>(), 64),
        nonce_seed in proptest::collection::vec(any::<u8>(), 24),
        ad in proptest::collection::vec(any::<u8>(), 0..64),
        pt in proptest::collection::vec(any::<u8>(), 0..300),
        granules in 1..5usize,
    ) {
        let mut enc = Aead::new(algorithm, Direction::Encryption);
        let key = &key_seed[..key_length(&enc, 0)];
        let nonce = &nonce_seed[..enc.default_nonce_length()];

        let one_shot = run_message(&mut enc, key, nonce, &[&ad[..]], &pt)
            .expect("Failed to run_message(..)");
        let streamed = run_message_chunked(&mut enc, key, nonce, &[&ad[..]], &pt, granules)
            .expect("Failed to run_message_chunked(..)");
        prop_assert_eq!(&streamed, &one_shot);

        let mut dec = Aead::new(algorithm, Direction::Decryption);
        let opened = run_message_chunked(&mut dec, key, nonce, &[&ad[..]], &one_shot, granules)
            .expect("Failed to run_message_chunked(..)");
        prop_assert_eq!(opened, pt);
    }

    #[test]
    fn associated_data_persists_between_messages(
        algorithm in algorithm(),
        ad in proptest::collection::vec(any::<u8>(), 0..64),
        first in proptest::collection::vec(any::<u8>(), 0..100),
        second in proptest::collection::vec(any::<u8>(), 0..100),
    ) {
        let mut enc = Aead::new(algorithm, Direction::Encryption);
        let key = vec![0x5Au8; key_length(&enc, 0)];
        let nonce = vec![0xA5u8; enc.default_nonce_length()];

        enc.set_key(&key).expect("Failed to set_key(..)");
        enc.set_associated_data(&ad).expect("Failed to set_associated_data(..)");

        for pt in [&first, &second] {
            enc.start_msg(&nonce).expect("Failed to start_msg(..)");
            let mut buffer = pt.clone();
            enc.finish(&mut buffer, 0).expect("Failed to finish(..)");

            let fresh = run_message(
                &mut Aead::new(algorithm, Direction::Encryption),
                &key,
                &nonce,
                &[&ad[..]],
                pt,
            )
            .expect("Failed to run_message(..)");
            prop_assert_eq!(buffer, fresh);
        }
    }

    #[test]
    fn distinct_nonces_give_distinct_output(
        algorithm in algorithm(),
        pt in proptest::collection::vec(any::<u8>(), 1..100),
    ) {
        let mut enc = Aead::new(algorithm, Direction::Encryption);
        let key = vec![0x11u8; key_length(&enc, 0)];
        let len = enc.default_nonce_length();

        let a = run_message(&mut enc, &key, &vec![0u8; len], &[], &pt)
            .expect("Failed to run_message(..)");
        let b = run_message(&mut enc, &key, &vec![1u8; len], &[], &pt)
            .expect("Failed to run_message(..)");
        prop_assert_ne!(a, b);
    }
}
