//! Contest rule sets and the registry that instantiates them.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

use crate::score::{ContestScorer, ErrorPolicy};
use crate::settings::StationSettings;

/// CQ WW contests.
pub mod cqww;
/// California QSO Party.
pub mod cqp;
/// CWops mini-test.
pub mod cwt;
/// ARRL Field Day.
pub mod fieldday;
/// IARU HF Championship.
pub mod iaru;
/// North American QSO Party.
pub mod naqp;
/// ARRL Sweepstakes.
pub mod sweepstakes;
/// ARRL / CQ WW VHF contests.
pub mod vhf;
/// World Wide Digi DX.
pub mod wwdigi;
/// CQ WPX.
pub mod wpx;

/// Which contest the run scores. Exactly one is selected on the command
/// line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContestKind {
    /// CQ WW CW.
    CqWwCw,
    /// CQ WW SSB.
    CqWwSsb,
    /// CQ WW RTTY.
    CqWwRtty,
    /// CQ WPX (CW).
    WpxCw,
    /// CQ WPX (RTTY).
    WpxRtty,
    /// ARRL CW Sweepstakes.
    SweepstakesCw,
    /// IARU HF Championship.
    IaruHf,
    /// ARRL Field Day.
    FieldDay,
    /// California QSO Party.
    Cqp,
    /// NAQP CW.
    NaqpCw,
    /// NAQP RTTY.
    NaqpRtty,
    /// ARRL VHF contest.
    ArrlVhf,
    /// CQ WW VHF contest.
    CqVhf,
    /// CWops mini-test, with optional session start hour.
    Cwt(Option<u32>),
    /// World Wide Digi DX.
    WwDigi,
}

/// Run-time knobs the registry applies when building a scorer.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// "Now", used by the default window rules. Injected for testability.
    pub now: NaiveDateTime,
    /// Error policy override for every module.
    pub policy: ErrorPolicy,
    /// Manual window override: start plus duration in hours.
    pub window_override: Option<(NaiveDateTime, i64)>,
}

/// Builds the selected contest's scorer with its window resolved.
pub fn build(
    kind: &ContestKind,
    settings: &StationSettings,
    opts: &BuildOptions,
) -> Box<dyn ContestScorer> {
    let year = opts.now.date().year();
    let default_window = match kind {
        ContestKind::CqWwCw => weekend_window(last_full_weekend_sat(year, 11), 0, 48),
        ContestKind::CqWwSsb => weekend_window(last_full_weekend_sat(year, 10), 0, 48),
        ContestKind::CqWwRtty => weekend_window(last_full_weekend_sat(year, 9), 0, 48),
        ContestKind::WpxCw => weekend_window(last_full_weekend_sat(year, 5), 0, 48),
        ContestKind::WpxRtty => weekend_window(nth_saturday(year, 2, 2), 0, 48),
        ContestKind::SweepstakesCw => weekend_window(nth_saturday(year, 11, 1), 21, 30),
        ContestKind::IaruHf => weekend_window(nth_saturday(year, 7, 2), 12, 24),
        ContestKind::FieldDay => weekend_window(nth_saturday(year, 6, 4), 18, 27),
        ContestKind::Cqp => weekend_window(nth_saturday(year, 10, 1), 16, 30),
        ContestKind::NaqpCw | ContestKind::NaqpRtty => {
            // January running; the August running when scored mid-year.
            if opts.now.date().month() >= 7 {
                weekend_window(nth_saturday(year, 8, 1), 18, 12)
            } else {
                weekend_window(nth_saturday(year, 1, 3), 18, 12)
            }
        }
        ContestKind::ArrlVhf | ContestKind::CqVhf => {
            weekend_window(nth_saturday(year, 6, 2), 18, 33)
        }
        ContestKind::Cwt(session) => cwt::session_window(opts.now, *session),
        ContestKind::WwDigi => weekend_window(last_full_weekend_sat(year, 8), 12, 24),
    };
    let window = match opts.window_override {
        Some((start, hours)) => (start, start + Duration::hours(hours)),
        None => default_window,
    };

    match kind {
        ContestKind::CqWwCw => Box::new(cqww::CqWw::new(
            cqww::CqWwVariant::Cw,
            settings,
            window,
            opts.policy,
        )),
        ContestKind::CqWwSsb => Box::new(cqww::CqWw::new(
            cqww::CqWwVariant::Ssb,
            settings,
            window,
            opts.policy,
        )),
        ContestKind::CqWwRtty => Box::new(cqww::CqWw::new(
            cqww::CqWwVariant::Rtty,
            settings,
            window,
            opts.policy,
        )),
        ContestKind::WpxCw => Box::new(wpx::CqWpx::new(false, settings, window, opts.policy)),
        ContestKind::WpxRtty => Box::new(wpx::CqWpx::new(true, settings, window, opts.policy)),
        ContestKind::SweepstakesCw => {
            Box::new(sweepstakes::Sweepstakes::new(settings, window, opts.policy))
        }
        ContestKind::IaruHf => Box::new(iaru::IaruHf::new(settings, window, opts.policy)),
        ContestKind::FieldDay => Box::new(fieldday::FieldDay::new(settings, window, opts.policy)),
        ContestKind::Cqp => Box::new(cqp::Cqp::new(settings, window, opts.policy)),
        ContestKind::NaqpCw => Box::new(naqp::Naqp::new(false, settings, window, opts.policy)),
        ContestKind::NaqpRtty => Box::new(naqp::Naqp::new(true, settings, window, opts.policy)),
        ContestKind::ArrlVhf => Box::new(vhf::VhfContest::new(
            vhf::VhfOrganizer::Arrl,
            settings,
            window,
            opts.policy,
        )),
        ContestKind::CqVhf => Box::new(vhf::VhfContest::new(
            vhf::VhfOrganizer::Cq,
            settings,
            window,
            opts.policy,
        )),
        ContestKind::Cwt(_) => Box::new(cwt::Cwt::new(settings, window, opts.policy)),
        ContestKind::WwDigi => Box::new(wwdigi::WwDigi::new(settings, window, opts.policy)),
    }
}

/// Start/end for a weekend contest: Saturday date, start hour UTC, length.
fn weekend_window(saturday: NaiveDate, start_hour: u32, hours: i64) -> (NaiveDateTime, NaiveDateTime) {
    let start = saturday
        .and_hms_opt(start_hour, 0, 0)
        .expect("static start hour");
    (start, start + Duration::hours(hours))
}

/// The n-th Saturday of a month (1-based).
pub fn nth_saturday(year: i32, month: u32, n: u8) -> NaiveDate {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sat, n)
        .expect("every month has four Saturdays")
}

/// Saturday of the last full (Saturday + Sunday) weekend of a month.
pub fn last_full_weekend_sat(year: i32, month: u32) -> NaiveDate {
    let mut sat = match NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sat, 5) {
        Some(d) => d,
        None => nth_saturday(year, month, 4),
    };
    // Step back when the following Sunday spills into the next month.
    if (sat + Duration::days(1)).month() != month {
        sat -= Duration::days(7);
    }
    sat
}
