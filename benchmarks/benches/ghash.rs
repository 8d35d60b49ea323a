// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use parapet_aead::mac::{Ghash, GhashBackend};

fn benchmark_ghash_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghash");

    for backend in [
        GhashBackend::Clmul,
        GhashBackend::PowerTable,
        GhashBackend::Portable,
    ] {
        let Ok(mut ghash) = Ghash::with_backend(backend) else {
            continue;
        };
        ghash.set_key(&[0x42u8; 16]);

        for size in [256, 4096].iter() {
            group.throughput(Throughput::Bytes(*size as u64));
            group.bench_with_input(
                format!("{} {} bytes", backend.name(), size),
                size,
                |b, &size| {
                    let data = vec![0u8; size];
                    let mut tag = [0u8; 16];

                    b.iter(|| {
                        ghash.start(&[0u8; 16]);
                        ghash.update(black_box(&data)).expect("update failed");
                        ghash.final_into(black_box(&mut tag));
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, benchmark_ghash_backends);
criterion_main!(benches);
