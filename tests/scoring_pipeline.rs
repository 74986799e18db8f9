use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

use cabscore::contest::{build, last_full_weekend_sat, nth_saturday, BuildOptions, ContestKind};
use cabscore::history::History;
use cabscore::record::ContactRecord;
use cabscore::score::{ContestScorer, ErrorPolicy, QsoContext, ScoreError};
use cabscore::settings::StationSettings;
use cabscore::types::Band;

fn settings() -> StationSettings {
    StationSettings {
        my_call: "AA2IL".to_string(),
        my_name: "JOE".to_string(),
        my_state: "CA".to_string(),
        my_section: "SDG".to_string(),
        my_county: "SDIE".to_string(),
        my_grid: "DM12ax".to_string(),
        my_cq_zone: 3,
        my_itu_zone: 6,
        my_prec: "A".to_string(),
        my_check: "72".to_string(),
        my_fd_class: "1E".to_string(),
        ..StationSettings::default()
    }
}

fn base_ts() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 1, 15)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

fn rec(call: &str, band: Band, mode: &str, freq: f64, minute: i64) -> ContactRecord {
    ContactRecord {
        call: call.to_string(),
        band,
        mode: mode.to_string(),
        freq_mhz: freq,
        ts: base_ts() + Duration::minutes(minute),
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

fn scorer_for(kind: ContestKind, policy: ErrorPolicy) -> Box<dyn ContestScorer> {
    let now = base_ts();
    build(
        &kind,
        &settings(),
        &BuildOptions {
            now,
            policy,
            window_override: Some((base_ts(), 48)),
        },
    )
}

/// Runs records through the scorer the way the driver does, without files.
fn score_all(
    scorer: &mut Box<dyn ContestScorer>,
    qsos: &[ContactRecord],
) -> Result<Vec<String>, ScoreError> {
    let history = History::empty();
    let mut lines = Vec::new();
    for (i, rec) in qsos.iter().enumerate() {
        let scope = scorer.dupe_scope();
        let check = scorer.state_mut().check_dupes(scope, qsos, i, 0);
        if check.rapid {
            scorer.state_mut().skipped += 1;
            continue;
        }
        let ctx = QsoContext {
            rec,
            index: i,
            dupe: check.duplicate,
            log: qsos,
            history: &history,
        };
        if let Some(line) = scorer.score_qso(&ctx)?.line {
            lines.push(line);
        }
    }
    Ok(lines)
}

#[test]
fn naqp_points_mults_and_line_format() {
    let mut a = rec("N6XYZ", Band::B20m, "CW", 14.0401, 30);
    a.name = Some("BOB".to_string());
    a.qth = Some("AZ".to_string());
    let mut b = rec("W7QQ", Band::B20m, "CW", 14.043, 40);
    b.name = Some("SAM".to_string());
    b.qth = Some("AZ".to_string());
    let mut c = rec("N6XYZ", Band::B40m, "CW", 7.038, 200);
    c.name = Some("BOB".to_string());
    c.qth = Some("AZ".to_string());

    let mut scorer = scorer_for(ContestKind::NaqpCw, ErrorPolicy::Strict);
    let lines = score_all(&mut scorer, &[a, b, c]).expect("clean log");
    assert_eq!(lines.len(), 3);

    let expected = concat!(
        "QSO: 14040 CW 2022-01-15 1830 ",
        "AA2IL     ",
        "      ",
        "JOE       ",
        " ",
        "CA ",
        " ",
        "N6XYZ     ",
        "      ",
        "BOB       ",
        " ",
        "AZ ",
    );
    assert_eq!(lines[0], expected);

    let summary = scorer.summary();
    assert_eq!(summary.unique_qsos, 3);
    assert_eq!(summary.total_points, 3);
    // AZ on 20m and AZ on 40m are separate multipliers.
    assert_eq!(summary.multipliers, 2);
    assert_eq!(summary.claimed_score, 6);
}

#[test]
fn cqww_point_ladder_and_mults() {
    let mut own = rec("K6AAA", Band::B20m, "CW", 14.025, 10);
    own.qth = Some("3".to_string());
    let mut continent = rec("XE2X", Band::B20m, "CW", 14.026, 20);
    continent.qth = Some("6".to_string());
    let mut dx = rec("JA1ABC", Band::B20m, "CW", 14.027, 30);
    dx.qth = Some("25".to_string());

    let mut scorer = scorer_for(ContestKind::CqWwCw, ErrorPolicy::Strict);
    score_all(&mut scorer, &[own, continent, dx]).expect("clean log");

    let summary = scorer.summary();
    // 0 + 2 + 3 points.
    assert_eq!(summary.total_points, 5);
    // Zones 3/6/25 plus countries United States/Mexico/Japan, all on 20m.
    assert_eq!(summary.multipliers, 6);
    assert_eq!(summary.claimed_score, 30);
}

#[test]
fn cqww_zone_falls_back_to_prefix_table() {
    let mut scorer = scorer_for(ContestKind::CqWwCw, ErrorPolicy::Strict);
    let bare = rec("JA1ABC", Band::B15m, "CW", 21.025, 10);
    let lines = score_all(&mut scorer, &[bare]).expect("prefix zone fallback");
    assert!(lines[0].ends_with("599 25  0"));
}

#[test]
fn cqww_line_format() {
    let mut dx = rec("JA1ABC", Band::B20m, "CW", 14.0251, 65);
    dx.qth = Some("25".to_string());
    let mut scorer = scorer_for(ContestKind::CqWwCw, ErrorPolicy::Strict);
    let lines = score_all(&mut scorer, &[dx]).expect("clean log");

    let expected = concat!(
        "QSO: 14025 CW 2022-01-15 1905 ",
        "AA2IL        ",
        " 599 03 ",
        "JA1ABC       ",
        " 599 25",
        "  0",
    );
    assert_eq!(lines[0], expected);
}

#[test]
fn sweepstakes_dupes_ignore_band_and_track_sections() {
    let mut a = rec("K7ABC", Band::B20m, "CW", 14.040, 10);
    a.srx_string = Some("12 A 68 AZ".to_string());
    a.stx = Some("1".to_string());
    let mut b = rec("W1DEF", Band::B20m, "CW", 14.041, 20);
    b.srx_string = Some("4 U 99 EMA".to_string());
    b.stx = Some("2".to_string());
    // Same call again on another band: still a dupe in Sweepstakes.
    let mut c = rec("K7ABC", Band::B40m, "CW", 7.040, 120);
    c.srx_string = Some("40 A 68 AZ".to_string());
    c.stx = Some("3".to_string());

    let mut scorer = scorer_for(ContestKind::SweepstakesCw, ErrorPolicy::Strict);
    score_all(&mut scorer, &[a, b, c]).expect("clean log");

    let summary = scorer.summary();
    assert_eq!(summary.unique_qsos, 2);
    assert_eq!(summary.dupes, 1);
    assert_eq!(summary.total_points, 4);
    assert_eq!(summary.multipliers, 2);
    assert_eq!(summary.claimed_score, 8);
    assert!(summary.detail.iter().any(|l| l.contains("sections worked: 2")));
}

#[test]
fn sweepstakes_rejects_bad_section() {
    let mut a = rec("K7ABC", Band::B20m, "CW", 14.040, 10);
    a.srx_string = Some("12 A 68 ZZZ".to_string());

    let mut scorer = scorer_for(ContestKind::SweepstakesCw, ErrorPolicy::Strict);
    let err = score_all(&mut scorer, &[a]).expect_err("ZZZ is not a section");
    assert!(matches!(err, ScoreError::Validation { .. }));
}

#[test]
fn sweepstakes_decodes_cut_numbers_and_pei() {
    let mut a = rec("VY2ZM", Band::B20m, "CW", 14.040, 10);
    a.srx_string = Some("ATT A 5N PEI".to_string());
    a.stx = Some("7".to_string());

    let mut scorer = scorer_for(ContestKind::SweepstakesCw, ErrorPolicy::Strict);
    let lines = score_all(&mut scorer, &[a]).expect("cut numbers decode");
    // serial ATT -> 100, check 5N -> 59, PEI -> PE.
    assert!(lines[0].contains(" 100 A 59 PE "));
}

#[test]
fn cqp_collapses_counties_and_maritimes() {
    let mut county = rec("K6AAA", Band::B20m, "CW", 14.040, 10);
    county.srx_string = Some("1,ORAN".to_string());
    county.stx = Some("1".to_string());
    let mut maritime = rec("VE1ZZ", Band::B20m, "CW", 14.041, 20);
    maritime.srx_string = Some("2,NS".to_string());
    maritime.stx = Some("2".to_string());
    let mut state = rec("W7QQ", Band::B20m, "USB", 14.300, 30);
    state.srx_string = Some("3,AZ".to_string());
    state.stx = Some("3".to_string());

    let mut scorer = scorer_for(ContestKind::Cqp, ErrorPolicy::Strict);
    score_all(&mut scorer, &[county, maritime, state]).expect("clean log");

    let summary = scorer.summary();
    // CW 3+3, phone 2.
    assert_eq!(summary.total_points, 8);
    // CA, MR, AZ.
    assert_eq!(summary.multipliers, 3);
    assert_eq!(summary.claimed_score, 24);
}

#[test]
fn cqp_rejects_unknown_qth_strict_and_skips_lenient() {
    let mut bad = rec("K6AAA", Band::B20m, "CW", 14.040, 10);
    bad.srx_string = Some("1,NOPE".to_string());
    let mut good = rec("W7QQ", Band::B20m, "CW", 14.041, 20);
    good.srx_string = Some("2,AZ".to_string());

    let mut strict = scorer_for(ContestKind::Cqp, ErrorPolicy::Strict);
    let err = score_all(&mut strict, &[bad.clone(), good.clone()]).expect_err("NOPE rejected");
    assert!(matches!(
        err,
        ScoreError::Validation { ref value, .. } if value == "NOPE"
    ));

    // Lenient mode is the driver's decision; here the module still reports
    // the error but the remaining records score.
    let mut lenient = scorer_for(ContestKind::Cqp, ErrorPolicy::Lenient);
    let history = History::empty();
    let qsos = [bad, good];
    for (i, r) in qsos.iter().enumerate() {
        let scope = lenient.dupe_scope();
        let check = lenient.state_mut().check_dupes(scope, &qsos, i, 0);
        let ctx = QsoContext {
            rec: r,
            index: i,
            dupe: check.duplicate,
            log: &qsos,
            history: &history,
        };
        let _ = lenient.score_qso(&ctx);
    }
    let summary = lenient.summary();
    assert_eq!(summary.unique_qsos, 1);
    assert_eq!(summary.multipliers, 1);
}

#[test]
fn wpx_prefix_mults_and_serials() {
    let mut a = rec("JA1ABC", Band::B20m, "CW", 14.025, 10);
    a.srx_string = Some("599 TT5".to_string());
    a.stx = Some("1".to_string());
    let mut b = rec("JA1XYZ", Band::B15m, "CW", 21.025, 20);
    b.srx_string = Some("599 12".to_string());
    b.stx = Some("2".to_string());

    let mut scorer = scorer_for(ContestKind::WpxCw, ErrorPolicy::Strict);
    let lines = score_all(&mut scorer, &[a, b]).expect("clean log");
    // TT5 decodes to 5.
    assert!(lines[0].contains(" 599 5 "));

    let summary = scorer.summary();
    assert_eq!(summary.unique_qsos, 2);
    // Both calls share the JA1 prefix.
    assert_eq!(summary.multipliers, 1);
    assert_eq!(summary.claimed_score, 2);
}

#[test]
fn iaru_points_by_zone_and_continent() {
    let mut same_zone = rec("K6AAA", Band::B20m, "CW", 14.025, 10);
    same_zone.srx_string = Some("599 6".to_string());
    let mut hq = rec("DA0HQ", Band::B20m, "CW", 14.026, 20);
    hq.srx_string = Some("599 DARC".to_string());
    let mut other_continent = rec("JA1ABC", Band::B20m, "CW", 14.027, 30);
    other_continent.srx_string = Some("599 45".to_string());
    let mut same_continent = rec("XE2X", Band::B20m, "CW", 14.028, 40);
    same_continent.srx_string = Some("599 10".to_string());

    let mut scorer = scorer_for(ContestKind::IaruHf, ErrorPolicy::Strict);
    score_all(&mut scorer, &[same_zone, hq, other_continent, same_continent]).expect("clean log");

    let summary = scorer.summary();
    // 1 + 1 + 5 + 3.
    assert_eq!(summary.total_points, 10);
    // Mults: 6, DARC, 45, 10 on 20m.
    assert_eq!(summary.multipliers, 4);
}

#[test]
fn field_day_points_per_mode_and_class_check() {
    let mut cw = rec("K6AAA", Band::B20m, "CW", 14.040, 10);
    cw.class = Some("2A".to_string());
    cw.arrl_sect = Some("SDG".to_string());
    let mut ph = rec("W7QQ", Band::B20m, "USB", 14.300, 20);
    ph.class = Some("1D".to_string());
    ph.arrl_sect = Some("AZ".to_string());
    let mut dg = rec("N0DEF", Band::B6m, "FT8", 50.313, 30);
    dg.class = Some("1E".to_string());
    dg.arrl_sect = Some("CO".to_string());

    let mut scorer = scorer_for(ContestKind::FieldDay, ErrorPolicy::Strict);
    let lines = score_all(&mut scorer, &[cw, ph, dg]).expect("clean log");
    // 6m rows carry the band constant.
    assert!(lines[2].starts_with("QSO:    50 DG"));

    let summary = scorer.summary();
    // 2 + 1 + 2 points, power multiplier 2.
    assert_eq!(summary.total_points, 5);
    assert_eq!(summary.claimed_score, 10);

    let mut bad = rec("K6BAD", Band::B20m, "CW", 14.041, 40);
    bad.class = Some("1G".to_string());
    bad.arrl_sect = Some("SDG".to_string());
    let mut strict = scorer_for(ContestKind::FieldDay, ErrorPolicy::Strict);
    let err = score_all(&mut strict, &[bad]).expect_err("1G is not a class");
    assert!(matches!(err, ScoreError::Structural { .. }));
}

#[test]
fn vhf_grids_per_band_and_uhf_points() {
    let mut a = rec("K6AAA", Band::B6m, "FT8", 50.313, 10);
    a.gridsquare = Some("DM13".to_string());
    let mut b = rec("K6AAA", Band::B2m, "FM", 146.52, 20);
    b.gridsquare = Some("DM13".to_string());
    let mut c = rec("W6UHF", Band::B70cm, "CW", 432.1, 30);
    c.gridsquare = Some("DM12jv".to_string());

    let mut scorer = scorer_for(ContestKind::ArrlVhf, ErrorPolicy::Strict);
    let lines = score_all(&mut scorer, &[a, b, c]).expect("clean log");
    assert!(lines[1].starts_with("QSO:   144 PH"));

    let summary = scorer.summary();
    // 1 + 1 + 2 points; DM13 counts on both bands, DM12 on 70cm.
    assert_eq!(summary.total_points, 4);
    assert_eq!(summary.multipliers, 3);

    let mut bad = rec("K6BAD", Band::B6m, "FT8", 50.313, 40);
    bad.gridsquare = Some("D13".to_string());
    let mut strict = scorer_for(ContestKind::ArrlVhf, ErrorPolicy::Strict);
    let err = score_all(&mut strict, &[bad]).expect_err("malformed grid");
    assert!(matches!(err, ScoreError::Structural { .. }));
}

#[test]
fn cwt_member_numbers_and_unique_call_mults() {
    let mut member = rec("K6AAA", Band::B20m, "CW", 14.030, 10);
    member.name = Some("RICH".to_string());
    member.qth = Some("A2T".to_string());
    let mut nonmember = rec("W7QQ", Band::B20m, "CW", 14.031, 20);
    nonmember.name = Some("SAM".to_string());
    nonmember.qth = Some("AZ".to_string());
    let mut again = rec("K6AAA", Band::B40m, "CW", 7.030, 30);
    again.name = Some("RICH".to_string());
    again.qth = Some("A2T".to_string());

    let mut scorer = scorer_for(ContestKind::Cwt(None), ErrorPolicy::Strict);
    let lines = score_all(&mut scorer, &[member, nonmember, again]).expect("clean log");
    // A2T decodes to member number 120.
    assert!(lines[0].ends_with(" 120"));

    let summary = scorer.summary();
    assert_eq!(summary.unique_qsos, 3);
    assert_eq!(summary.total_points, 3);
    // K6AAA counts once as a mult despite two contacts.
    assert_eq!(summary.multipliers, 2);
    assert_eq!(summary.claimed_score, 6);
}

#[test]
fn wwdigi_distance_points_and_field_mults() {
    let mut near = rec("K6AAA", Band::B20m, "FT8", 14.074, 10);
    near.gridsquare = Some("DM13".to_string());
    let mut far = rec("JA1ABC", Band::B20m, "FT8", 14.074, 20);
    far.gridsquare = Some("PM95".to_string());

    let mut scorer = scorer_for(ContestKind::WwDigi, ErrorPolicy::Strict);
    let lines = score_all(&mut scorer, &[near, far]).expect("clean log");
    assert!(lines[0].starts_with("QSO: 14074 DG"));
    assert!(lines[0].ends_with("     0"));

    let summary = scorer.summary();
    // DM13 is next door (1 point); PM95 is ~8900 km (1 + 2 points).
    assert_eq!(summary.total_points, 4);
    // Fields DM and PM on 20m.
    assert_eq!(summary.multipliers, 2);
    assert!(summary.detail.iter().any(|l| l.starts_with("best DX: JA1ABC")));

    // A grid with a multibyte character is rejected, not a slice panic.
    let mut bad = rec("K6BAD", Band::B20m, "FT8", 14.074, 40);
    bad.gridsquare = Some("aéé3".to_string());
    let mut strict = scorer_for(ContestKind::WwDigi, ErrorPolicy::Strict);
    let err = score_all(&mut strict, &[bad]).expect_err("malformed grid");
    assert!(matches!(err, ScoreError::Structural { .. }));
}

#[test]
fn window_rules_land_on_the_right_saturdays() {
    assert_eq!(
        nth_saturday(2022, 11, 1),
        NaiveDate::from_ymd_opt(2022, 11, 5).unwrap()
    );
    assert_eq!(
        last_full_weekend_sat(2022, 11),
        NaiveDate::from_ymd_opt(2022, 11, 26).unwrap()
    );
    // August 2024 ends on a Saturday; the last full weekend steps back.
    assert_eq!(
        last_full_weekend_sat(2024, 8),
        NaiveDate::from_ymd_opt(2024, 8, 24).unwrap()
    );
    for month in 1..=12 {
        assert_eq!(last_full_weekend_sat(2023, month).weekday(), Weekday::Sat);
    }
}

#[test]
fn default_windows_use_now() {
    let now = NaiveDate::from_ymd_opt(2022, 11, 28)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let scorer = build(
        &ContestKind::CqWwCw,
        &settings(),
        &BuildOptions {
            now,
            policy: ErrorPolicy::Strict,
            window_override: None,
        },
    );
    let (start, end) = scorer.window();
    assert_eq!(start.date(), NaiveDate::from_ymd_opt(2022, 11, 26).unwrap());
    assert_eq!(end - start, Duration::hours(48));
}
