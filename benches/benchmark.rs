use criterion::{criterion_group, criterion_main, Criterion};

use kyber_kem::traits::{Decaps, Encaps, KeyGen};
use kyber_kem::{kyber1024, kyber512, kyber768};

#[allow(clippy::redundant_closure)]
pub fn criterion_benchmark(c: &mut Criterion) {
    let (pk_512, sk_512) = kyber512::KG::try_keygen().unwrap();
    let (_, ct_512) = pk_512.try_encaps().unwrap();
    let (pk_768, sk_768) = kyber768::KG::try_keygen().unwrap();
    let (_, ct_768) = pk_768.try_encaps().unwrap();
    let (pk_1024, sk_1024) = kyber1024::KG::try_keygen().unwrap();
    let (_, ct_1024) = pk_1024.try_encaps().unwrap();

    c.bench_function("kyber512 KeyGen", |b| b.iter(|| kyber512::KG::try_keygen()));
    c.bench_function("kyber512 Encaps", |b| b.iter(|| pk_512.try_encaps()));
    c.bench_function("kyber512 Decaps", |b| b.iter(|| sk_512.try_decaps(&ct_512)));

    c.bench_function("kyber768 KeyGen", |b| b.iter(|| kyber768::KG::try_keygen()));
    c.bench_function("kyber768 Encaps", |b| b.iter(|| pk_768.try_encaps()));
    c.bench_function("kyber768 Decaps", |b| b.iter(|| sk_768.try_decaps(&ct_768)));

    c.bench_function("kyber1024 KeyGen", |b| b.iter(|| kyber1024::KG::try_keygen()));
    c.bench_function("kyber1024 Encaps", |b| b.iter(|| pk_1024.try_encaps()));
    c.bench_function("kyber1024 Decaps", |b| b.iter(|| sk_1024.try_decaps(&ct_1024)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
