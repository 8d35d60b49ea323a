// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! AES-GCM against the NIST SP 800-38D / McGrew-Viega test cases.

#[cfg(test)]
mod gcm_tests {
    use parapet_aead::block::Aes;
    use parapet_aead::mac::Ghash;
    use parapet_aead::support::test_utils::{
        available_ghash_backends, run_message, run_message_chunked,
    };
    use parapet_aead::{AeadError, AeadMode, Direction, Gcm, GcmConfig};
    use parapet_ct::hex_to_bytes;

    struct Vector {
        key: &'static str,
        nonce: &'static str,
        ad: &'static str,
        pt: &'static str,
        ct: &'static str,
        tag: &'static str,
    }

    const K2: &str = "feffe9928665731c6d6a8f9467308308";
    const N2: &str = "cafebabefacedbaddecaf888";
    const P60: &str = "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a72
                       1c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b39";
    const A20: &str = "feedfacedeadbeeffeedfacedeadbeefabaddad2";

    const VECTORS: &[Vector] = &[
        Vector {
            key: "00000000000000000000000000000000",
            nonce: "000000000000000000000000",
            ad: "",
            pt: "",
            ct: "",
            tag: "58e2fccefa7e3061367f1d57a4e7455a",
        },
        Vector {
            key: "00000000000000000000000000000000",
            nonce: "000000000000000000000000",
            ad: "",
            pt: "00000000000000000000000000000000",
            ct: "0388dace60b6a392f328c2b971b2fe78",
            tag: "ab6e47d42cec13bdf53a67b21257bddf",
        },
        Vector {
            key: K2,
            nonce: N2,
            ad: "",
            pt: "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a72
                 1c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b391aafd255",
            ct: "42831ec2217774244b7221b784d0d49ce3aa212f2c02a4e035c17e2329aca12e
                 21d514b25466931c7d8f6a5aac84aa051ba30b396a0aac973d58e091473f5985",
            tag: "4d5c2af327cd64a62cf35abd2ba6fab4",
        },
        Vector {
            key: K2,
            nonce: N2,
            ad: A20,
            pt: P60,
            ct: "42831ec2217774244b7221b784d0d49ce3aa212f2c02a4e035c17e2329aca12e
                 21d514b25466931c7d8f6a5aac84aa051ba30b396a0aac973d58e091",
            tag: "5bc94fbc3221a5db94fae95ae7121a47",
        },
        // 64-bit nonce: Y0 comes from GHASH.
        Vector {
            key: K2,
            nonce: "cafebabefacedbad",
            ad: A20,
            pt: P60,
            ct: "61353b4c2806934a777ff51fa22a4755699b2a714fcdc6f83766e5f97b6c7423
                 73806900e49f24b22b097544d4896b424989b5e1ebac0f07c23f4598",
            tag: "3612d2e79e3b0785561be14aaca2fccb",
        },
        // 480-bit nonce.
        Vector {
            key: K2,
            nonce: "9313225df88406e555909c5aff5269aa6a7a9538534f7da1e4c303d2a318a728
                    c3c0c95156809539fcf0e2429a6b525416aedbf5a0de6a57a637b39b",
            ad: A20,
            pt: P60,
            ct: "8ce24998625615b603a033aca13fb894be9112a5c3a211a8ba262a3cca7e2ca7
                 01e4a9a4fba43c90ccdcb281d48c7c6fd62875d2aca417034c34aee5",
            tag: "619cc5aefffe0bfa462af43c1699d050",
        },
        // AES-256.
        Vector {
            key: "0000000000000000000000000000000000000000000000000000000000000000",
            nonce: "000000000000000000000000",
            ad: "",
            pt: "00000000000000000000000000000000",
            ct: "cea7403d4d606b6e074ec5d3baf39d18",
            tag: "d0d1c8a799996bf0265b98b5d48ab919",
        },
        Vector {
            key: "feffe9928665731c6d6a8f9467308308feffe9928665731c6d6a8f9467308308",
            nonce: N2,
            ad: "",
            pt: "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a72
                 1c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b391aafd255",
            ct: "522dc1f099567d07f47f37a32a84427d643a8cdcbfe5c0c97598a2bd2555d1aa
                 8cb08e48590dbb3da7b08b1056828838c5f61e6393ba7a0abcc9f662898015ad",
            tag: "b094dac5d93471bdec1a502270e3cc6c",
        },
    ];

    fn gcm(direction: Direction) -> Gcm<Aes> {
        Gcm::new(Aes::new(), direction, GcmConfig::default()).expect("Failed to Gcm::new(..)")
    }

    fn sealed(v: &Vector) -> Vec<u8> {
        let mut out = hex_to_bytes(v.ct);
        out.extend_from_slice(&hex_to_bytes(v.tag));
        out
    }

    #[test]
    fn test_vectors_seal() {
        for (i, v) in VECTORS.iter().enumerate() {
            let ad = hex_to_bytes(v.ad);
            let out = run_message(
                &mut gcm(Direction::Encryption),
                &hex_to_bytes(v.key),
                &hex_to_bytes(v.nonce),
                &[&ad[..]],
                &hex_to_bytes(v.pt),
            )
            .expect("Failed to run_message(..)");

            assert_eq!(out, sealed(v), "vector {i}");
        }
    }

    #[test]
    fn test_vectors_open() {
        for (i, v) in VECTORS.iter().enumerate() {
            let ad = hex_to_bytes(v.ad);
            let out = run_message(
                &mut gcm(Direction::Decryption),
                &hex_to_bytes(v.key),
                &hex_to_bytes(v.nonce),
                &[&ad[..]],
                &sealed(v),
            )
            .expect("Failed to run_message(..)");

            assert_eq!(out, hex_to_bytes(v.pt), "vector {i}");
        }
    }

    #[test]
    fn test_vectors_streamed() {
        for (i, v) in VECTORS.iter().enumerate() {
            let ad = hex_to_bytes(v.ad);
            for granules in [1usize, 2, 3] {
                let out = run_message_chunked(
                    &mut gcm(Direction::Encryption),
                    &hex_to_bytes(v.key),
                    &hex_to_bytes(v.nonce),
                    &[&ad[..]],
                    &hex_to_bytes(v.pt),
                    granules,
                )
                .expect("Failed to run_message_chunked(..)");
                assert_eq!(out, sealed(v), "vector {i}, granules {granules}");

                let back = run_message_chunked(
                    &mut gcm(Direction::Decryption),
                    &hex_to_bytes(v.key),
                    &hex_to_bytes(v.nonce),
                    &[&ad[..]],
                    &sealed(v),
                    granules,
                )
                .expect("Failed to run_message_chunked(..)");
                assert_eq!(back, hex_to_bytes(v.pt), "vector {i}, granules {granules}");
            }
        }
    }

    #[test]
    fn test_every_ghash_backend() {
        for backend in available_ghash_backends() {
            for (i, v) in VECTORS.iter().enumerate() {
                let ghash = Ghash::with_backend(backend).expect("Failed to Ghash::with_backend(..)");
                let mut engine =
                    Gcm::with_ghash(Aes::new(), Direction::Encryption, GcmConfig::default(), ghash)
                        .expect("Failed to Gcm::with_ghash(..)");
                assert_eq!(engine.ghash_backend(), backend);

                let ad = hex_to_bytes(v.ad);
                let out = run_message(
                    &mut engine,
                    &hex_to_bytes(v.key),
                    &hex_to_bytes(v.nonce),
                    &[&ad[..]],
                    &hex_to_bytes(v.pt),
                )
                .expect("Failed to run_message(..)");
                assert_eq!(out, sealed(v), "{backend:?}, vector {i}");
            }
        }
    }

    #[test]
    fn test_truncated_tag() {
        let v = &VECTORS[3];
        let ad = hex_to_bytes(v.ad);
        let config = GcmConfig { tag_size: 12 };

        let mut enc = Gcm::new(Aes::new(), Direction::Encryption, config)
            .expect("Failed to Gcm::new(..)");
        assert_eq!(enc.tag_size(), 12);
        let out = run_message(
            &mut enc,
            &hex_to_bytes(v.key),
            &hex_to_bytes(v.nonce),
            &[&ad[..]],
            &hex_to_bytes(v.pt),
        )
        .expect("Failed to run_message(..)");

        let full = sealed(v);
        assert_eq!(out, full[..full.len() - 4]);

        let mut dec = Gcm::new(Aes::new(), Direction::Decryption, config)
            .expect("Failed to Gcm::new(..)");
        let back = run_message(
            &mut dec,
            &hex_to_bytes(v.key),
            &hex_to_bytes(v.nonce),
            &[&ad[..]],
            &out,
        )
        .expect("Failed to run_message(..)");
        assert_eq!(back, hex_to_bytes(v.pt));
    }

    #[test]
    fn test_associated_data_persists_across_messages() {
        let v = &VECTORS[3];
        let mut engine = gcm(Direction::Encryption);
        engine.set_key(&hex_to_bytes(v.key)).expect("Failed to set_key(..)");
        engine
            .set_associated_data(&hex_to_bytes(v.ad))
            .expect("Failed to set_associated_data(..)");

        for _ in 0..3 {
            engine.start_msg(&hex_to_bytes(v.nonce)).expect("Failed to start_msg(..)");
            let mut buffer = hex_to_bytes(v.pt);
            engine.finish(&mut buffer, 0).expect("Failed to finish(..)");
            assert_eq!(buffer, sealed(v));
        }
    }

    #[test]
    fn test_config_errors() {
        for tag_size in [0usize, 7, 17] {
            assert!(matches!(
                Gcm::new(Aes::new(), Direction::Encryption, GcmConfig { tag_size }),
                Err(AeadError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_usage_errors() {
        let mut engine = gcm(Direction::Encryption);
        engine.set_key(&[0u8; 16]).expect("Failed to set_key(..)");

        assert_eq!(
            engine.start_msg(&[]),
            Err(AeadError::InvalidNonceLength {
                algorithm: "GCM",
                length: 0
            })
        );
        assert!(matches!(
            engine.set_associated_data_n(1, b"second"),
            Err(AeadError::InvalidArgument(_))
        ));

        engine.start_msg(&[0u8; 12]).expect("Failed to start_msg(..)");
        assert!(matches!(
            engine.process(&mut [0u8; 15]),
            Err(AeadError::InvalidArgument(_))
        ));
        assert_eq!(engine.process(&mut [0u8; 32]), Ok(32));

        assert_eq!(engine.update_granularity(), 16);
        assert_eq!(engine.default_nonce_length(), 12);
        assert!(engine.valid_nonce_length(1) && engine.valid_nonce_length(64));
    }
}
