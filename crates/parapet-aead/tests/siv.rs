// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! AES-SIV against RFC 5297 Appendix A.

#[cfg(test)]
mod siv_tests {
    use parapet_aead::block::Aes;
    use parapet_aead::support::test_utils::{run_message, run_message_chunked};
    use parapet_aead::{AeadError, AeadMode, BlockCipher, Direction, KeyLengthSpec, Siv};
    use parapet_ct::hex_to_bytes;
    use parapet_test_utils::{index_permutations, permuted};

    const A1_KEY: &str = "fffefdfcfbfaf9f8f7f6f5f4f3f2f1f0 f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff";
    const A1_AD: &str = "101112131415161718191a1b1c1d1e1f2021222324252627";
    const A1_PT: &str = "112233445566778899aabbccddee";
    const A1_OUT: &str = "85632d07c6e8f37f950acd320a2ecc93 40c02b9690c4dc04daef7f6afe5c";

    const A2_KEY: &str = "7f7e7d7c7b7a79787776757473727170 404142434445464748494a4b4c4d4e4f";
    const A2_AD1: &str = "00112233445566778899aabbccddeeff deaddadadeaddadaffeeddccbbaa9988
                          7766554433221100";
    const A2_AD2: &str = "102030405060708090a0";
    const A2_NONCE: &str = "09f911029d74e35bd84156c5635688c0";
    const A2_PT: &str = "7468697320697320736f6d6520706c61 696e7465787420746f20656e63727970
                         74207573696e67205349562d414553";
    const A2_OUT: &str = "7bdb6e3b432667eb06f4d14bff2fbd0f cb900f2fddbe404326601965c889bf17
                          dba77ceb094fa663b7a3f748ba8af829 ea64ad544a272e9c485b62a3fd5c0d";

    fn siv(direction: Direction) -> Siv<Aes> {
        Siv::new(Aes::new(), direction).expect("Failed to Siv::new(..)")
    }

    #[test]
    fn test_rfc5297_deterministic() {
        let ad = hex_to_bytes(A1_AD);
        let out = run_message(
            &mut siv(Direction::Encryption),
            &hex_to_bytes(A1_KEY),
            &[],
            &[&ad[..]],
            &hex_to_bytes(A1_PT),
        )
        .expect("Failed to run_message(..)");
        assert_eq!(out, hex_to_bytes(A1_OUT));

        let back = run_message(
            &mut siv(Direction::Decryption),
            &hex_to_bytes(A1_KEY),
            &[],
            &[&ad[..]],
            &out,
        )
        .expect("Failed to run_message(..)");
        assert_eq!(back, hex_to_bytes(A1_PT));
    }

    #[test]
    fn test_rfc5297_nonce_based() {
        let (ad1, ad2) = (hex_to_bytes(A2_AD1), hex_to_bytes(A2_AD2));
        let out = run_message(
            &mut siv(Direction::Encryption),
            &hex_to_bytes(A2_KEY),
            &hex_to_bytes(A2_NONCE),
            &[&ad1[..], &ad2[..]],
            &hex_to_bytes(A2_PT),
        )
        .expect("Failed to run_message(..)");
        assert_eq!(out, hex_to_bytes(A2_OUT));

        let back = run_message(
            &mut siv(Direction::Decryption),
            &hex_to_bytes(A2_KEY),
            &hex_to_bytes(A2_NONCE),
            &[&ad1[..], &ad2[..]],
            &out,
        )
        .expect("Failed to run_message(..)");
        assert_eq!(back, hex_to_bytes(A2_PT));
    }

    #[test]
    fn test_process_buffers_everything() {
        let ad = hex_to_bytes(A1_AD);
        let mut engine = siv(Direction::Encryption);
        engine.set_key(&hex_to_bytes(A1_KEY)).expect("Failed to set_key(..)");
        engine.set_associated_data(&ad).expect("Failed to set_associated_data(..)");
        engine.start_msg(&[]).expect("Failed to start_msg(..)");

        let mut head = hex_to_bytes(A1_PT)[..5].to_vec();
        assert_eq!(engine.process(&mut head), Ok(0));
        assert!(head.iter().all(|&b| b == 0));

        let mut tail = hex_to_bytes(A1_PT)[5..].to_vec();
        engine.finish(&mut tail, 0).expect("Failed to finish(..)");
        assert_eq!(tail, hex_to_bytes(A1_OUT));

        let chunked = run_message_chunked(
            &mut siv(Direction::Decryption),
            &hex_to_bytes(A1_KEY),
            &[],
            &[&ad[..]],
            &tail,
            3,
        )
        .expect("Failed to run_message_chunked(..)");
        assert_eq!(chunked, hex_to_bytes(A1_PT));
    }

    #[test]
    fn test_associated_data_order_matters() {
        let key = hex_to_bytes(A2_KEY);
        let ads: Vec<Vec<u8>> = vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()];
        let mut outputs = Vec::new();

        index_permutations(ads.len(), |perm| {
            let ordered = permuted(&ads, perm);
            let slices: Vec<&[u8]> = ordered.iter().map(Vec::as_slice).collect();
            let out = run_message(
                &mut siv(Direction::Encryption),
                &key,
                b"nonce",
                &slices,
                b"same plaintext",
            )
            .expect("Failed to run_message(..)");

            let back = run_message(&mut siv(Direction::Decryption), &key, b"nonce", &slices, &out)
                .expect("Failed to run_message(..)");
            assert_eq!(back, b"same plaintext");
            outputs.push(out);
        });

        let count = outputs.len();
        outputs.sort();
        outputs.dedup();
        assert_eq!(outputs.len(), count);
    }

    #[test]
    fn test_sparse_associated_data_slots() {
        let key = hex_to_bytes(A1_KEY);
        let mut enc = siv(Direction::Encryption);
        enc.set_key(&key).expect("Failed to set_key(..)");
        enc.set_associated_data_n(4, b"fifth").expect("Failed to set_associated_data_n(..)");
        enc.start_msg(b"n").expect("Failed to start_msg(..)");
        let mut buffer = b"sparse".to_vec();
        enc.finish(&mut buffer, 0).expect("Failed to finish(..)");

        let mut dec = siv(Direction::Decryption);
        dec.set_key(&key).expect("Failed to set_key(..)");
        dec.set_associated_data_n(4, b"fifth").expect("Failed to set_associated_data_n(..)");
        dec.start_msg(b"n").expect("Failed to start_msg(..)");
        dec.finish(&mut buffer, 0).expect("Failed to finish(..)");
        assert_eq!(buffer, b"sparse");
    }

    #[test]
    fn test_key_and_slot_limits() {
        let mut engine = siv(Direction::Encryption);
        assert_eq!(engine.tag_size(), 16);
        assert_eq!(engine.maximum_associated_data_inputs(), 126);

        for len in [32usize, 48, 64] {
            assert!(engine.key_spec().valid(len));
            engine.set_key(&vec![0u8; len]).expect("Failed to set_key(..)");
        }
        for len in [16usize, 40, 128] {
            assert_eq!(
                engine.set_key(&vec![0u8; len]),
                Err(AeadError::InvalidKeyLength {
                    algorithm: "SIV",
                    length: len
                })
            );
        }

        engine.set_key(&[0u8; 32]).expect("Failed to set_key(..)");
        engine.set_associated_data_n(125, b"last").expect("Failed to set_associated_data_n(..)");
        assert!(matches!(
            engine.set_associated_data_n(126, b"too many"),
            Err(AeadError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_short_decryption_input() {
        let mut engine = siv(Direction::Decryption);
        engine.set_key(&[0u8; 32]).expect("Failed to set_key(..)");
        engine.start_msg(&[]).expect("Failed to start_msg(..)");

        let mut buffer = vec![0u8; 15];
        assert!(matches!(
            engine.finish(&mut buffer, 0),
            Err(AeadError::DecodingFailure(_))
        ));
        engine.start_msg(&[]).expect("Failed to start_msg(..)");
    }

    /// XOR-with-key permutation over 64-bit blocks.
    #[derive(Clone, Default)]
    struct Xor64 {
        key: [u8; 8],
        keyed: bool,
    }

    impl BlockCipher for Xor64 {
        fn name(&self) -> &'static str {
            "XOR-64"
        }

        fn block_size(&self) -> usize {
            8
        }

        fn key_spec(&self) -> KeyLengthSpec {
            KeyLengthSpec::fixed(8)
        }

        fn has_key(&self) -> bool {
            self.keyed
        }

        fn set_key(&mut self, key: &[u8]) -> Result<(), AeadError> {
            self.key.copy_from_slice(key);
            self.keyed = true;
            Ok(())
        }

        fn encrypt_block(&self, block: &mut [u8]) {
            for (b, k) in block.iter_mut().zip(self.key) {
                *b ^= k;
            }
        }

        fn decrypt_block(&self, block: &mut [u8]) {
            self.encrypt_block(block);
        }

        fn clear(&mut self) {
            *self = Self::default();
        }
    }

    #[test]
    fn test_rejects_64_bit_block_cipher() {
        for direction in [Direction::Encryption, Direction::Decryption] {
            assert!(matches!(
                Siv::new(Xor64::default(), direction),
                Err(AeadError::InvalidArgument(_))
            ));
        }
    }
}
