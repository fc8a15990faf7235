use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pipeline::{ItemOutcome, Partition, dedup_by_key, fan_out_partitioned};

fn bench_dedup(c: &mut Criterion) {
    // 400 search hits, each url reported by four queries
    let urls: Vec<String> = (0..400)
        .map(|i| format!("https://recipes.example/{}", i % 100))
        .collect();

    c.bench_function("dedup_400_urls", |b| {
        b.iter(|| dedup_by_key(black_box(urls.clone()), |url| url.clone()))
    });
}

fn bench_partition(c: &mut Criterion) {
    c.bench_function("partition_1000_outcomes", |b| {
        b.iter(|| {
            let partition: Partition<usize> = (0..1000)
                .map(|i| {
                    if i % 7 == 0 {
                        ItemOutcome::dropped(i.to_string(), "dropped")
                    } else {
                        ItemOutcome::Kept(i)
                    }
                })
                .collect();
            black_box(partition)
        })
    });
}

fn bench_fan_out(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to build runtime");

    c.bench_function("fan_out_200_ready_items", |b| {
        b.iter(|| {
            runtime.block_on(fan_out_partitioned(0..200, 8, |i| async move {
                ItemOutcome::<usize>::Kept(black_box(i))
            }))
        })
    });
}

criterion_group!(benches, bench_dedup, bench_partition, bench_fan_out);
criterion_main!(benches);
