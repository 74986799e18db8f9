use std::fs;
use std::io::Write;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use cabscore::contest::{build, BuildOptions, ContestKind};
use cabscore::history::History;
use cabscore::run::{self, RunError, RunOptions};
use cabscore::score::ErrorPolicy;
use cabscore::settings::StationSettings;

fn settings() -> StationSettings {
    StationSettings {
        my_call: "AA2IL".to_string(),
        my_name: "JOE".to_string(),
        my_state: "CA".to_string(),
        my_section: "SDG".to_string(),
        my_cq_zone: 3,
        my_power: "LOW".to_string(),
        address: vec!["123 Main St".to_string()],
        city: "San Diego".to_string(),
        email: "aa2il@example.com".to_string(),
        ..StationSettings::default()
    }
}

fn window_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 1, 15)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

fn adif_record(call: &str, time: &str, name: &str, qth: &str) -> String {
    format!(
        "<CALL:{}>{call} <BAND:3>20m <MODE:2>CW <FREQ:6>14.040 \
         <QSO_DATE:8>20220115 <TIME_ON:6>{time} \
         <NAME:{}>{name} <QTH:{}>{qth} <EOR>\n",
        call.len(),
        name.len(),
        qth.len(),
    )
}

fn run_naqp(
    adif: &str,
    policy: ErrorPolicy,
) -> (TempDir, std::path::PathBuf, Result<run::RunReport, RunError>) {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("log.adi");
    let mut f = fs::File::create(&input).expect("create input");
    f.write_all(adif.as_bytes()).expect("write input");

    let output = dir.path().join("naqp.cbr");
    let mut scorer = build(
        &ContestKind::NaqpCw,
        &settings(),
        &BuildOptions {
            now: window_start(),
            policy,
            window_override: Some((window_start(), 12)),
        },
    );
    let opts = RunOptions {
        inputs: vec![input],
        output: output.clone(),
        history: History::empty(),
    };
    let result = run::run(scorer.as_mut(), &settings(), &opts);
    (dir, output, result)
}

#[test]
fn full_run_writes_a_complete_cabrillo_file() {
    let adif = [
        adif_record("N6XYZ", "183000", "BOB", "AZ"),
        adif_record("W7QQ", "184500", "SAM", "NM"),
        // Out of window, dropped before scoring.
        adif_record("K0OLD", "120000", "ED", "CO"),
    ]
    .concat();
    let (_dir, output, result) = run_naqp(&adif, ErrorPolicy::Strict);
    let report = result.expect("clean run");

    assert_eq!(report.summary.raw_qsos, 2);
    assert_eq!(report.summary.unique_qsos, 2);
    assert_eq!(report.summary.claimed_score, 4);
    assert!(report.inconsistencies.is_empty());
    assert!(!report.operating.is_empty());

    let text = fs::read_to_string(&output).expect("output exists");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "START-OF-LOG:3.0");
    assert_eq!(lines[1], "CONTEST: NAQP-CW");
    assert!(lines.contains(&"LOCATION: CA"));
    assert!(lines.contains(&"CALLSIGN: AA2IL"));
    assert!(lines.contains(&"CATEGORY-MODE: CW"));
    assert!(lines.contains(&"NAME: JOE"));
    assert!(lines.contains(&"ADDRESS: 123 Main St"));
    assert_eq!(lines.last(), Some(&"END-OF-LOG:"));
    assert_eq!(text.lines().filter(|l| l.starts_with("QSO: ")).count(), 2);
}

#[test]
fn rapid_dupes_are_dropped_and_slow_dupes_kept() {
    let adif = [
        adif_record("N6XYZ", "183000", "BOB", "AZ"),
        // Immediate re-log: silently skipped.
        adif_record("N6XYZ", "183100", "BOB", "AZ"),
        adif_record("W7QQ", "184500", "SAM", "NM"),
        adif_record("K5AAA", "190000", "TED", "TX"),
        adif_record("W6BBB", "191500", "ANN", "CA"),
        // Far from the original: flagged, still printed.
        adif_record("N6XYZ", "210000", "BOB", "AZ"),
    ]
    .concat();
    let (_dir, output, result) = run_naqp(&adif, ErrorPolicy::Strict);
    let report = result.expect("clean run");

    assert_eq!(report.summary.raw_qsos, 6);
    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.summary.dupes, 2);
    assert_eq!(report.summary.unique_qsos, 4);

    let text = fs::read_to_string(&output).expect("output exists");
    // 6 records, one rapid dupe dropped, one dupe line is byte-identical to
    // the original apart from the time column so it still prints.
    assert_eq!(text.lines().filter(|l| l.starts_with("QSO: ")).count(), 5);
}

#[test]
fn strict_abort_leaves_partial_output() {
    let adif = [
        adif_record("N6XYZ", "183000", "BOB", "AZ"),
        // ZZ is not a NAQP multiplier.
        adif_record("W7QQ", "184500", "SAM", "ZZ"),
        adif_record("K5AAA", "190000", "TED", "TX"),
    ]
    .concat();
    let (_dir, output, result) = run_naqp(&adif, ErrorPolicy::Strict);
    assert!(matches!(result, Err(RunError::Score(_))));

    // The lines scored before the abort are on disk.
    let text = fs::read_to_string(&output).expect("partial output exists");
    assert_eq!(text.lines().filter(|l| l.starts_with("QSO: ")).count(), 1);
    assert_eq!(text.lines().last(), Some("END-OF-LOG:"));
}

#[test]
fn lenient_run_skips_bad_records_and_completes() {
    let adif = [
        adif_record("N6XYZ", "183000", "BOB", "AZ"),
        adif_record("W7QQ", "184500", "SAM", "ZZ"),
        adif_record("K5AAA", "190000", "TED", "TX"),
    ]
    .concat();
    let (_dir, output, result) = run_naqp(&adif, ErrorPolicy::Lenient);
    let report = result.expect("lenient run completes");

    assert_eq!(report.summary.unique_qsos, 2);
    // AZ and TX only; ZZ earned no credit.
    assert_eq!(report.summary.multipliers, 2);
    let text = fs::read_to_string(&output).expect("output exists");
    assert_eq!(text.lines().filter(|l| l.starts_with("QSO: ")).count(), 2);
}

#[test]
fn audit_mode_lists_exact_and_similar_calls() {
    let adif = [
        adif_record("N6XYZ", "183000", "BOB", "AZ"),
        adif_record("N6XYZ", "190000", "BOB", "AZ"),
        adif_record("N6XYA", "191500", "BOB", "AZ"),
        adif_record("W1AW", "192000", "ED", "CT"),
    ]
    .concat();

    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("log.adi");
    fs::write(&input, adif).expect("write input");

    let mut scorer = build(
        &ContestKind::NaqpCw,
        &settings(),
        &BuildOptions {
            now: window_start(),
            policy: ErrorPolicy::Strict,
            window_override: Some((window_start(), 12)),
        },
    );
    let opts = RunOptions {
        inputs: vec![input],
        output: dir.path().join("unused.cbr"),
        history: History::empty(),
    };
    let lines = run::audit_call("N6XYZ", scorer.as_mut(), &opts).expect("audit");

    let exact = lines.iter().filter(|l| l.contains("call=N6XYZ")).count();
    assert_eq!(exact, 2);
    assert!(lines.iter().any(|l| l.contains("call=N6XYA")));
    assert!(!lines.iter().any(|l| l.contains("call=W1AW")));
}

#[test]
fn simplified_log_format_loads() {
    let simple = "\
QSO_DATE_OFF,TIME_OFF,CALL,FREQ,BAND,MODE,SRX_STRING
20220115,1830,N6XYZ,14040,20m,CW,\"BOB,AZ\"
20220115,1845,W7QQ,14.043,20m,CW,\"SAM,NM\"
";
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("simple.log");
    fs::write(&input, simple).expect("write input");

    let records = cabscore::adif::load_records(&input).expect("simple log parses");
    assert_eq!(records.len(), 2);
    // Legacy kHz column normalized to MHz.
    assert!((records[0].freq_mhz - 14.040).abs() < 1e-9);
    assert!((records[1].freq_mhz - 14.043).abs() < 1e-9);
    assert_eq!(records[0].srx_string.as_deref(), Some("BOB,AZ"));
}
