//! CWops mini-test rules: name + member-number/QTH, hourly sessions.

use chrono::{Datelike, Duration, NaiveDateTime, Weekday};
use log::warn;

use crate::engine::exchange::{reverse_cut_numbers, split_exchange};
use crate::engine::state::{DupeScope, ScoreState};
use crate::score::{ContestScorer, ErrorPolicy, QsoContext, Scored, ScoreError, Summary};
use crate::settings::StationSettings;

/// Session start hours (UTC) on the mini-test Wednesday.
const SESSION_HOURS: [u32; 4] = [13, 19, 3, 7];

/// One-hour window for the most recent Wednesday session. `session` picks
/// the start hour; anything unrecognized falls back to the 1900Z session.
pub fn session_window(now: NaiveDateTime, session: Option<u32>) -> (NaiveDateTime, NaiveDateTime) {
    let hour = match session {
        Some(h) if SESSION_HOURS.contains(&h) => h,
        _ => 19,
    };
    let mut date = now.date();
    while date.weekday() != Weekday::Wed {
        date -= Duration::days(1);
    }
    let start = date.and_hms_opt(hour, 0, 0).expect("static session hour");
    (start, start + Duration::hours(1))
}

/// CWT scorer. Members send name + member number, non-members name + QTH;
/// multipliers are unique calls over the session.
pub struct Cwt {
    window: (NaiveDateTime, NaiveDateTime),
    policy: ErrorPolicy,
    my_call: String,
    my_name: String,
    my_state: String,
    state: ScoreState,
}

impl Cwt {
    /// Builds the scorer with its window resolved.
    pub fn new(
        settings: &StationSettings,
        window: (NaiveDateTime, NaiveDateTime),
        policy: ErrorPolicy,
    ) -> Cwt {
        Cwt {
            window,
            policy,
            my_call: settings.my_call.clone(),
            my_name: settings.my_name.clone(),
            my_state: settings.my_state.clone(),
            state: ScoreState::new(),
        }
    }

    /// Name plus member-number-or-QTH. Member numbers arrive with cut
    /// digits; anything longer than two characters goes through the decoder.
    fn name_and_number(&self, ctx: &QsoContext<'_>) -> Result<(String, String), ScoreError> {
        let rec = ctx.rec;
        let (name, raw_qth) = match (&rec.name, rec.qth.as_ref().or(rec.state.as_ref())) {
            (Some(n), Some(q)) => (n.to_ascii_uppercase(), q.to_ascii_uppercase()),
            _ => {
                let raw = rec.srx_string.as_deref().unwrap_or_default();
                let tokens = split_exchange(raw, if raw.contains(',') { ',' } else { ' ' });
                if tokens.len() != 2 {
                    return Err(ScoreError::Structural {
                        index: ctx.index,
                        problem: format!("exchange {raw:?} is not name + number/QTH"),
                        dump: rec.dump(),
                    });
                }
                (tokens[0].clone(), tokens[1].clone())
            }
        };
        let qth = if raw_qth.len() > 2 {
            reverse_cut_numbers(&raw_qth)
        } else {
            raw_qth
        };
        Ok((name, qth))
    }
}

impl ContestScorer for Cwt {
    fn contest(&self) -> &'static str {
        "CW-OPS"
    }

    fn category_mode(&self) -> &'static str {
        "CW"
    }

    fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.window
    }

    fn dupe_scope(&self) -> DupeScope {
        DupeScope::CallBand
    }

    fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    fn header_fields(&self) -> Vec<(&'static str, String)> {
        vec![("LOCATION", self.my_state.clone())]
    }

    fn score_qso(&mut self, ctx: &QsoContext<'_>) -> Result<Scored, ScoreError> {
        let rec = ctx.rec;
        let (name, qth) = self.name_and_number(ctx)?;

        if let Some(entry) = ctx.history.get(&rec.call) {
            if !entry.name.is_empty() && entry.name != name {
                warn!("{}: name {name} disagrees with history ({})", rec.call, entry.name);
                self.state.warnings += 1;
            }
            let known = if entry.cwops.is_empty() { &entry.state } else { &entry.cwops };
            if !known.is_empty() && *known != qth {
                warn!("{}: number/QTH {qth} disagrees with history ({known})", rec.call);
                self.state.warnings += 1;
            }
        }
        self.state.note_exchange(&rec.call, format!("{name} {qth}"));

        if !ctx.dupe {
            self.state.unique_qsos += 1;
            self.state.total_points += 1;
            self.state.mults.credit_overall(rec.call.clone());
        }

        let freq = crate::engine::exchange::convert_freq(rec.freq_mhz, rec.band);
        let line = format!(
            "QSO: {:>5} CW {:>10} {:>4} {:<10}      {:<10} {:<3} {:<10}      {:<10} {:<3}",
            freq,
            rec.date_str(),
            rec.time_str(),
            self.my_call,
            self.my_name,
            self.my_state,
            rec.call,
            name,
            qth
        );
        Ok(Scored { line: Some(line) })
    }

    fn state(&self) -> &ScoreState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ScoreState {
        &mut self.state
    }

    fn summary(&self) -> Summary {
        let mults = self.state.mults.total() as u64;
        let claimed = self.state.total_points * mults;
        Summary::from_state(&self.state, mults, claimed)
    }
}
