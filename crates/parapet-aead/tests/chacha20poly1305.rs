// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! ChaCha20-Poly1305 in its three nonce shapes.

#[cfg(test)]
mod chacha20poly1305_tests {
    use parapet_aead::support::test_utils::{run_message, run_message_chunked};
    use parapet_aead::{AeadError, AeadMode, ChaCha20Poly1305, Direction, Poly1305Framing};
    use parapet_ct::hex_to_bytes;

    const SUNSCREEN: &[u8] = b"Ladies and Gentlemen of the class of '99: \
        If I could offer you only one tip for the future, sunscreen would be it.";
    const KEY: &str = "808182838485868788898a8b8c8d8e8f909192939495969798999a9b9c9d9e9f";
    const AD: &str = "50515253c0c1c2c3c4c5c6c7";

    fn engine(direction: Direction, framing: Poly1305Framing) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(direction, framing)
    }

    fn roundtrip(
        framing: Poly1305Framing,
        key: &[u8],
        nonce: &[u8],
        ad: &[u8],
        pt: &[u8],
        expected: &[u8],
    ) {
        let mut enc = engine(Direction::Encryption, framing);
        let out = run_message(&mut enc, key, nonce, &[ad], pt).expect("Failed to run_message(..)");
        assert_eq!(out, expected);

        let mut dec = engine(Direction::Decryption, framing);
        let back = run_message_chunked(&mut dec, key, nonce, &[ad], &out, 7)
            .expect("Failed to run_message_chunked(..)");
        assert_eq!(back, pt);
    }

    #[test]
    fn test_rfc8439_aead() {
        let expected = hex_to_bytes(
            "d31a8d34648e60db7b86afbc53ef7ec2a4aded51296e08fea9e2b5a736ee62d6
             3dbea45e8ca9671282fafb69da92728b1a71de0a9e060b2905d6a5b67ecd3b36
             92ddbd7f2d778b8c9803aee328091b58fab324e4fad675945585808b4831d7bc
             3ff4def08e4b7a9de576d26586cec64b6116
             1ae10b594f09e26a7e902ecbd0600691",
        );

        for framing in [Poly1305Framing::ByNonceLength, Poly1305Framing::Cfrg] {
            roundtrip(
                framing,
                &hex_to_bytes(KEY),
                &hex_to_bytes("070000004041424344454647"),
                &hex_to_bytes(AD),
                SUNSCREEN,
                &expected,
            );
        }
    }

    #[test]
    fn test_xchacha20poly1305() {
        let expected = hex_to_bytes(
            "bd6d179d3e83d43b9576579493c0e939572a1700252bfaccbed2902c21396cbb
             731c7f1b0b4aa6440bf3a82f4eda7e39ae64c6708c54c216cb96b72e1213b452
             2f8c9ba40db5d945b11b69b982c1bb9e3f3fac2bc369488f76b2383565d3fff9
             21f9664c97637da9768812f615c68b13b52e
             c0875924c1c7987947deafd8780acf49",
        );

        roundtrip(
            Poly1305Framing::ByNonceLength,
            &hex_to_bytes(KEY),
            &hex_to_bytes("404142434445464748494a4b4c4d4e4f5051525354555657"),
            &hex_to_bytes(AD),
            SUNSCREEN,
            &expected,
        );
    }

    #[test]
    fn test_legacy_64_bit_nonce() {
        let key = hex_to_bytes("4290bcb154173531f314af57f3be3b5006da371ece272afa1b5dbdd1100a1007");
        let nonce = hex_to_bytes("cd7cf67be39c794a");
        let ad = hex_to_bytes("87e229d4500845a079c0");
        let pt = hex_to_bytes("86d09974840bded2a5ca");
        let expected = hex_to_bytes("e3e446f7ede9a19b62a4677dabf4e3d24b876bb284753896e1d6");

        for framing in [Poly1305Framing::ByNonceLength, Poly1305Framing::Legacy] {
            roundtrip(framing, &key, &nonce, &ad, &pt, &expected);
        }

        let cfrg = run_message(
            &mut engine(Direction::Encryption, Poly1305Framing::Cfrg),
            &key,
            &nonce,
            &[&ad[..]],
            &pt,
        )
        .expect("Failed to run_message(..)");
        assert_eq!(cfrg[..pt.len()], expected[..pt.len()]);
        assert_ne!(cfrg[pt.len()..], expected[pt.len()..]);
    }

    #[test]
    fn test_framing_accessor_and_default() {
        let engine = ChaCha20Poly1305::default();
        assert_eq!(engine.framing(), Poly1305Framing::ByNonceLength);
        assert_eq!(engine.direction(), Direction::Encryption);
        assert_eq!(engine.default_nonce_length(), 12);
    }

    #[test]
    fn test_errors() {
        let mut engine = engine(Direction::Encryption, Poly1305Framing::default());

        assert_eq!(
            engine.set_key(&[0u8; 16]),
            Err(AeadError::InvalidKeyLength {
                algorithm: "ChaCha20Poly1305",
                length: 16
            })
        );
        assert!(!engine.has_keying_material());

        engine.set_key(&[0u8; 32]).expect("Failed to set_key(..)");
        for len in [0usize, 16, 32] {
            assert_eq!(
                engine.start_msg(&vec![0u8; len]),
                Err(AeadError::InvalidNonceLength {
                    algorithm: "ChaCha20Poly1305",
                    length: len
                })
            );
        }
        assert!(matches!(
            engine.set_associated_data_n(1, b"x"),
            Err(AeadError::InvalidArgument(_))
        ));
    }
}
