use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use sparse_trie::SparseMerkleTrie;

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn build_trie(size: usize) -> SparseMerkleTrie {
    let mut trie = SparseMerkleTrie::new();
    trie.insert_all((0..size).map(|i| format!("value {}", i)))
        .expect("values are distinct");
    trie
}

fn insert_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for size in SIZES {
        let base = build_trie(size);
        group.bench_with_input(BenchmarkId::new("single", size), &base, |b, base| {
            b.iter_batched(
                || base.clone(),
                |mut trie| {
                    trie.insert("fresh value").expect("value is new");
                    black_box(trie.root_hash())
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.bench_function("build_1000", |b| b.iter(|| black_box(build_trie(1_000))));
    group.finish();
}

fn proof_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("proofs");
    for size in SIZES {
        let trie = build_trie(size);
        let present = format!("value {}", size / 2);

        group.bench_with_input(BenchmarkId::new("membership", size), &trie, |b, trie| {
            b.iter(|| black_box(trie.prove_membership(&present).expect("present")));
        });
        group.bench_with_input(BenchmarkId::new("modification", size), &trie, |b, trie| {
            b.iter(|| black_box(trie.prove_modification("absent").expect("absent")));
        });
        group.bench_with_input(BenchmarkId::new("encode", size), &trie, |b, trie| {
            let proof = trie.prove_modification("absent").expect("absent");
            b.iter(|| black_box(proof.to_bytes()));
        });
    }
    group.finish();
}

criterion_group!(benches, insert_benches, proof_benches);
criterion_main!(benches);
