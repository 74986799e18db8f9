use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use cabscore::engine::state::{DupeScope, ScoreState};
use cabscore::record::ContactRecord;
use cabscore::types::Band;

fn contact(call: &str, minute: i64) -> ContactRecord {
    ContactRecord {
        call: call.to_string(),
        band: Band::B20m,
        mode: "CW".to_string(),
        freq_mhz: 14.040,
        ts: NaiveDate::from_ymd_opt(2022, 11, 26)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(minute),
        srx_string: None,
        stx_string: None,
        srx: None,
        stx: None,
        name: None,
        qth: None,
        state: None,
        gridsquare: None,
        country: None,
        arrl_sect: None,
        class: None,
        station_callsign: None,
    }
}

fn log_with_repeats(n: usize) -> Vec<ContactRecord> {
    // Every tenth contact repeats an earlier call.
    (0..n)
        .map(|i| {
            let idx = if i % 10 == 9 { i / 2 } else { i };
            contact(&format!("K{idx}AA"), i as i64)
        })
        .collect()
}

fn bench_dupe_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("dupe_scan");
    for size in [500usize, 2_000, 5_000] {
        let qsos = log_with_repeats(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &qsos, |b, qsos| {
            b.iter(|| {
                let mut state = ScoreState::new();
                for i in 0..qsos.len() {
                    let _ = state.check_dupes(DupeScope::CallBand, qsos, i, 0);
                }
                state.raw_qsos
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dupe_scan);
criterion_main!(benches);
