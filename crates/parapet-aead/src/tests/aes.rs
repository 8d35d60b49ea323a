// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! FIPS-197 Appendix C known answers.

#[cfg(test)]
mod aes_tests {
    use parapet_ct::hex_to_bytes;

    use crate::block::Aes;
    use crate::error::AeadError;
    use crate::traits::BlockCipher;

    const PLAINTEXT: &str = "00112233445566778899aabbccddeeff";

    fn check(key: &str, expected: &str, name: &str) {
        let mut aes = Aes::new();
        aes.set_key(&hex_to_bytes(key)).expect("Failed to set_key(..)");
        assert_eq!(aes.name(), name);

        let mut block = hex_to_bytes(PLAINTEXT);
        aes.encrypt_block(&mut block);
        assert_eq!(block, hex_to_bytes(expected));

        aes.decrypt_block(&mut block);
        assert_eq!(block, hex_to_bytes(PLAINTEXT));
    }

    #[test]
    fn test_fips197_aes128() {
        check(
            "000102030405060708090a0b0c0d0e0f",
            "69c4e0d86a7b0430d8cdb78070b4c55a",
            "AES-128",
        );
    }

    #[test]
    fn test_fips197_aes192() {
        check(
            "000102030405060708090a0b0c0d0e0f1011121314151617",
            "dda97ca4864cdfe06eaf70a0ec0d7191",
            "AES-192",
        );
    }

    #[test]
    fn test_fips197_aes256() {
        check(
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
            "8ea2b7ca516745bfeafc49904b496089",
            "AES-256",
        );
    }

    #[test]
    fn test_encrypt_blocks_matches_single_blocks() {
        let mut aes = Aes::new();
        aes.set_key(&[7u8; 16]).expect("Failed to set_key(..)");

        let mut batch: Vec<u8> = (0u8..64).collect();
        let mut single = batch.clone();

        aes.encrypt_blocks(&mut batch);
        for block in single.chunks_exact_mut(16) {
            aes.encrypt_block(block);
        }

        assert_eq!(batch, single);
    }

    #[test]
    fn test_rejects_invalid_key_lengths() {
        let mut aes = Aes::new();

        for len in [0, 8, 15, 17, 20, 31, 33, 64] {
            assert_eq!(
                aes.set_key(&vec![0u8; len]),
                Err(AeadError::InvalidKeyLength {
                    algorithm: "AES",
                    length: len
                })
            );
        }
        assert!(!aes.has_key());
        assert!(aes.key_spec().valid(24));
        assert!(!aes.key_spec().valid(20));
    }

    #[test]
    fn test_clear_forgets_key() {
        let mut aes = Aes::new();
        aes.set_key(&[1u8; 32]).expect("Failed to set_key(..)");
        assert!(aes.has_key());

        aes.clear();
        assert!(!aes.has_key());
        assert_eq!(aes.name(), "AES");

        let mut block = [0xAAu8; 16];
        aes.encrypt_block(&mut block);
        assert_eq!(block, [0u8; 16]);
    }

    #[test]
    fn test_debug_is_redacted() {
        let mut aes = Aes::new();
        aes.set_key(&[1u8; 16]).expect("Failed to set_key(..)");
        assert_eq!(format!("{:?}", aes), "AES-128 { [protected] }");
    }
}
