use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fleet_health_core::{process_data, ExclusionSet, FixedClock};
use serde_json::{json, Value};

fn fleet(size: usize) -> Vec<Vec<Value>> {
    (0..size)
        .map(|i| {
            vec![
                json!(format!("acme/customer{}/prod", i % 17)),
                json!(format!("SN{:06}", i)),
                json!("Mac14,2"),
                json!("MacBook Air"),
                json!(format!("host{}", i)),
                json!("Jane Doe"),
                json!(if i % 5 == 0 { "/Volumes/Data" } else { "/" }),
                json!((i as i64 * 1_000_000_000).to_string()),
                json!((i % 3).to_string()),
                json!((60 + i % 40).to_string()),
                json!((1_690_000_000 - (i as i64 % 200) * 86_400).to_string()),
                json!(if i % 11 == 0 { "1" } else { "0" }),
                json!(if i % 7 == 0 { "Disabled" } else { "Enabled" }),
                json!("Normal"),
                json!((i % 1000).to_string()),
                json!(if i % 4 == 0 { "ack-storage ack-battery" } else { "" }),
            ]
        })
        .collect()
}

fn bench_process_data(c: &mut Criterion) {
    let clock = FixedClock::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    let excluded: ExclusionSet = ["customer3".to_string()].into_iter().collect();

    let mut group = c.benchmark_group("process_data");
    for size in [100usize, 1_000, 10_000] {
        let rows = fleet(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| process_data(black_box(rows), &excluded, &clock).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_process_data);
criterion_main!(benches);
