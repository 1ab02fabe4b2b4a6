//! Benchmarks for atomic_swap_vc digest, proving and verification.
//!
//! Run with: cargo bench --bench atomic_swap_vc

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use swap_vc_snark::{
    CircuitParams, CircuitShape, MimcParams, ZKP_MIMC_COUNT, ZkFr, ZkPk, ZkVk, ZkpItem,
    generate_zk_proof_with_rng, mimc3, setup, verify_zk_proof,
};

/// Benchmark the native 1024-round digest.
fn bench_mimc3(c: &mut Criterion) {
    let params = MimcParams::<ZkFr>::new(ZKP_MIMC_COUNT).unwrap();
    let seed = ZkFr::from(123u64);
    let seed_rand = ZkFr::from(456u64);

    c.bench_function("mimc3_1024", |b| {
        b.iter(|| mimc3(&params, black_box(&seed), black_box(&seed_rand)));
    });
}

/// Benchmark proof generation and verification for a 2-element item.
fn bench_prove_verify(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let shape = CircuitShape::new(2);
    let (pk, vk): (ZkPk, ZkVk) = setup(&shape, &mut rng).unwrap();
    let params = CircuitParams::new(shape).unwrap();
    let item = ZkpItem::new(
        &params,
        vec![ZkFr::from(3u64), ZkFr::from(5u64)],
        vec![ZkFr::from(2u64), ZkFr::from(7u64)],
        ZkFr::from(11u64),
        ZkFr::from(13u64),
    )
    .unwrap();

    let mut group = c.benchmark_group("atomic_swap_vc");
    group.sample_size(10);

    group.bench_function("prove", |b| {
        b.iter(|| generate_zk_proof_with_rng(&pk, black_box(&item), None, &mut rng).unwrap());
    });

    let proof = generate_zk_proof_with_rng(&pk, &item, None, &mut rng).unwrap();
    let public = item.public();
    group.bench_function("verify", |b| {
        b.iter(|| verify_zk_proof(black_box(&proof), &vk, black_box(&public)));
    });

    group.finish();
}

criterion_group!(benches, bench_mimc3, bench_prove_verify);
criterion_main!(benches);
