use chrono::{Duration, NaiveDate, NaiveTime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sleeplog::{advice, stats, upsert, SleepQuality, SleepRecord};

/// Benchmarks for the record merge and advice rules
///
/// Collections grow by a night per day; these check that upsert and trend
/// evaluation stay cheap for multi-year journals.

fn create_records(nights: usize) -> Vec<SleepRecord> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..nights)
        .map(|i| {
            SleepRecord::new(
                start + Duration::days(i as i64),
                NaiveTime::from_hms_opt(21 + (i % 3) as u32, 15, 0).unwrap(),
                NaiveTime::from_hms_opt(5 + (i % 3) as u32, 45, 0).unwrap(),
                SleepQuality::new(1 + (i % 5) as i64).unwrap(),
            )
        })
        .collect()
}

fn bench_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("Upsert");

    for &nights in &[7, 365, 3650] {
        let records = create_records(nights);
        let replacement = records[nights / 2].clone();
        let appended = create_records(nights + 1).pop().unwrap();

        group.throughput(Throughput::Elements(nights as u64));
        group.bench_with_input(BenchmarkId::new("replace", nights), &records, |b, records| {
            b.iter(|| upsert(black_box(records.clone()), black_box(replacement.clone())));
        });
        group.bench_with_input(BenchmarkId::new("insert", nights), &records, |b, records| {
            b.iter(|| upsert(black_box(records.clone()), black_box(appended.clone())));
        });
    }

    group.finish();
}

fn bench_advice(c: &mut Criterion) {
    let mut group = c.benchmark_group("Advice");
    let quality = SleepQuality::new(2).unwrap();

    group.bench_function("advise_for_record", |b| {
        b.iter(|| advice::advise_for_record(black_box(quality), black_box(5.5), black_box(1)));
    });

    for &nights in &[7, 365, 3650] {
        let records = create_records(nights);
        group.bench_with_input(BenchmarkId::new("trend_window_7", nights), &records, |b, records| {
            b.iter(|| {
                let window = stats::recent_window(black_box(records), 7);
                advice::advise_for_trend(&window)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_upsert, bench_advice);
criterion_main!(benches);
