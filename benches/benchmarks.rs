use bloomkit::BloomFilter;
use criterion::Criterion;

fn populate(bf: &mut BloomFilter, rng: &fastrand::Rng, n: usize) {
    for _ in 0..n {
        bf.set(rng.i64(..)).unwrap();
    }
}

fn bench_bloom_filter_set(c: &mut Criterion) {
    c.bench_function("set-1000", |b| {
        let rng = fastrand::Rng::new();
        let mut bf = BloomFilter::with_sip_hashes(1000, 0.01).unwrap();

        b.iter(|| bf.set(rng.i64(..)).unwrap());
    });

    c.bench_function("set-10000-0.001", |b| {
        let rng = fastrand::Rng::new();
        let mut bf = BloomFilter::with_sip_hashes(10000, 0.001).unwrap();

        b.iter(|| bf.set(rng.i64(..)).unwrap());
    });
}

fn bench_bloom_filter_is_set(c: &mut Criterion) {
    c.bench_function("is-set-1000", |b| {
        let n = 1000;
        let rng = fastrand::Rng::new();
        let mut bf = BloomFilter::with_sip_hashes(n, 0.01).unwrap();
        populate(&mut bf, &rng, n);

        b.iter(|| bf.is_set(rng.i64(..)).unwrap());
    });

    c.bench_function("is-set-10000-0.001", |b| {
        let n = 10000;
        let rng = fastrand::Rng::new();
        let mut bf = BloomFilter::with_sip_hashes(n, 0.001).unwrap();
        populate(&mut bf, &rng, n);

        b.iter(|| bf.is_set(rng.i64(..)).unwrap());
    });
}

criterion::criterion_group!(benches, bench_bloom_filter_set, bench_bloom_filter_is_set);
criterion::criterion_main!(benches);
