use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use spatio_dynamic::{Instant, PositionResolver, SampleContext};

const EPOCH: &str = "2012-03-15T10:00:00Z";

fn packet(spans: i64) -> Value {
    let epoch: Instant = EPOCH.parse().unwrap();
    let samples: Vec<Value> = (0..spans)
        .map(|i| {
            let from = epoch.add_seconds((i * 60) as f64);
            let to = epoch.add_seconds(((i + 1) * 60) as f64);
            let x = 6_378_137.0 + i as f64;
            if i % 2 == 0 {
                json!({
                    "interval": format!("{}/{}", from, to),
                    "epoch": from.to_string(),
                    "cartesian": [0, x, 0.0, 0.0, 60, x + 60.0, 0.0, 0.0]
                })
            } else {
                json!({
                    "interval": format!("{}/{}", from, to),
                    "cartographicDegrees": [i as f64 * 0.01, 0.0, 1000.0]
                })
            }
        })
        .collect();
    Value::Array(samples)
}

fn benchmark_ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingestion");

    for spans in [10, 100, 1000] {
        let data = packet(spans);
        group.bench_with_input(BenchmarkId::new("process_packet", spans), &data, |b, data| {
            b.iter(|| {
                let mut resolver = PositionResolver::new();
                resolver.process_packet(black_box(data), SampleContext::default())
            })
        });
    }

    group.finish();
}

fn benchmark_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    let mut resolver = PositionResolver::new();
    resolver.process_packet(&packet(1000), SampleContext::default());
    let epoch: Instant = EPOCH.parse().unwrap();

    // Same instant every frame: memo hit
    let fixed = epoch.add_seconds(30_000.0);
    group.bench_function("repeated_instant", |b| {
        b.iter(|| resolver.cartesian_at(black_box(fixed)))
    });

    // Advancing clock: span reuse with occasional index search
    group.bench_function("advancing_clock", |b| {
        let mut step = 0u64;
        b.iter(|| {
            step = (step + 1) % 60_000;
            resolver.cartographic_at(black_box(epoch.add_seconds(step as f64)))
        })
    });

    // Random access: index search every call
    group.bench_function("scattered_instants", |b| {
        let mut step = 0u64;
        b.iter(|| {
            step = (step + 7919) % 60_000;
            resolver.cartesian_at(black_box(epoch.add_seconds(step as f64)))
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_ingestion, benchmark_queries);
criterion_main!(benches);
