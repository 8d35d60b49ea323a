// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! AES-OCB3 against RFC 7253 Appendix A.

#[cfg(test)]
mod ocb_tests {
    use parapet_aead::block::Aes;
    use parapet_aead::support::test_utils::{run_message, run_message_chunked};
    use parapet_aead::{AeadError, AeadMode, Direction, Ocb, OcbConfig};
    use parapet_ct::hex_to_bytes;

    const KEY: &str = "000102030405060708090A0B0C0D0E0F";

    struct Vector {
        nonce: &'static str,
        ad: &'static str,
        pt: &'static str,
        out: &'static str,
    }

    const VECTORS: &[Vector] = &[
        Vector {
            nonce: "BBAA99887766554433221100",
            ad: "",
            pt: "",
            out: "785407BFFFC8AD9EDCC5520AC9111EE6",
        },
        Vector {
            nonce: "BBAA99887766554433221101",
            ad: "0001020304050607",
            pt: "0001020304050607",
            out: "6820B3657B6F615A5725BDA0D3B4EB3A257C9AF1F8F03009",
        },
        Vector {
            nonce: "BBAA99887766554433221102",
            ad: "0001020304050607",
            pt: "",
            out: "81017F8203F081277152FADE694A0A00",
        },
        Vector {
            nonce: "BBAA99887766554433221103",
            ad: "",
            pt: "0001020304050607",
            out: "45DD69F8F5AAE72414054CD1F35D82760B2CD00D2F99BFA9",
        },
        Vector {
            nonce: "BBAA99887766554433221104",
            ad: "000102030405060708090A0B0C0D0E0F",
            pt: "000102030405060708090A0B0C0D0E0F",
            out: "571D535B60B277188BE5147170A9A22C3AD7A4FF3835B8C5701C1CCEC8FC3358",
        },
        Vector {
            nonce: "BBAA99887766554433221105",
            ad: "000102030405060708090A0B0C0D0E0F",
            pt: "",
            out: "8CF761B6902EF764462AD86498CA6B97",
        },
        Vector {
            nonce: "BBAA99887766554433221106",
            ad: "",
            pt: "000102030405060708090A0B0C0D0E0F",
            out: "5CE88EC2E0692706A915C00AEB8B2396F40E1C743F52436BDF06D8FA1ECA343D",
        },
    ];

    fn ocb(direction: Direction, tag_size: usize) -> Ocb<Aes> {
        Ocb::new(Aes::new(), direction, OcbConfig { tag_size }).expect("Failed to Ocb::new(..)")
    }

    #[test]
    fn test_rfc7253_vectors() {
        let key = hex_to_bytes(KEY);

        for (i, v) in VECTORS.iter().enumerate() {
            let (nonce, ad) = (hex_to_bytes(v.nonce), hex_to_bytes(v.ad));

            let out = run_message(
                &mut ocb(Direction::Encryption, 16),
                &key,
                &nonce,
                &[&ad[..]],
                &hex_to_bytes(v.pt),
            )
            .expect("Failed to run_message(..)");
            assert_eq!(out, hex_to_bytes(v.out), "vector {i}");

            let back = run_message(&mut ocb(Direction::Decryption, 16), &key, &nonce, &[&ad[..]], &out)
                .expect("Failed to run_message(..)");
            assert_eq!(back, hex_to_bytes(v.pt), "vector {i}");
        }
    }

    #[test]
    fn test_rfc7253_96_bit_tag() {
        let key = hex_to_bytes("0F0E0D0C0B0A09080706050403020100");
        let nonce = hex_to_bytes("BBAA9988776655443322110D");
        let data = hex_to_bytes(
            "000102030405060708090A0B0C0D0E0F101112131415161718191A1B1C1D1E1F
             2021222324252627",
        );
        let expected = hex_to_bytes(
            "1792A4E31E0755FB03E31B22116E6C2DDF9EFD6E33D536F1A0124B0A55BAE884
             ED93481529C76B6AD0C515F4D1CDD4FDAC4F02AA",
        );

        let out = run_message(&mut ocb(Direction::Encryption, 12), &key, &nonce, &[&data[..]], &data)
            .expect("Failed to run_message(..)");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let key = [0x42u8; 32];
        let nonce = [0x24u8; 12];
        let ad = b"header".as_slice();
        let pt: Vec<u8> = (0..200u16).map(|i| i as u8).collect();

        let expected = run_message(&mut ocb(Direction::Encryption, 16), &key, &nonce, &[ad], &pt)
            .expect("Failed to run_message(..)");

        for granules in [1usize, 2, 5] {
            let out = run_message_chunked(
                &mut ocb(Direction::Encryption, 16),
                &key,
                &nonce,
                &[ad],
                &pt,
                granules,
            )
            .expect("Failed to run_message_chunked(..)");
            assert_eq!(out, expected, "granules {granules}");

            let back = run_message_chunked(
                &mut ocb(Direction::Decryption, 16),
                &key,
                &nonce,
                &[ad],
                &out,
                granules,
            )
            .expect("Failed to run_message_chunked(..)");
            assert_eq!(back, pt, "granules {granules}");
        }
    }

    #[test]
    fn test_errors() {
        for tag_size in [4usize, 10, 20] {
            assert!(matches!(
                Ocb::new(Aes::new(), Direction::Encryption, OcbConfig { tag_size }),
                Err(AeadError::InvalidArgument(_))
            ));
        }

        let mut engine = ocb(Direction::Encryption, 16);
        engine.set_key(&[0u8; 16]).expect("Failed to set_key(..)");
        for len in [0usize, 16] {
            assert_eq!(
                engine.start_msg(&vec![0u8; len]),
                Err(AeadError::InvalidNonceLength {
                    algorithm: "OCB",
                    length: len
                })
            );
        }

        engine.start_msg(&[0u8; 15]).expect("Failed to start_msg(..)");
        assert!(matches!(
            engine.process(&mut [0u8; 8]),
            Err(AeadError::InvalidArgument(_))
        ));
    }
}
