//! North American QSO Party rules: name + QTH exchange, per-band mults.

use chrono::NaiveDateTime;
use log::warn;

use crate::dx;
use crate::engine::exchange::split_exchange;
use crate::engine::state::{DupeScope, ScoreState};
use crate::score::{ContestScorer, ErrorPolicy, QsoContext, Scored, ScoreError, Summary};
use crate::settings::StationSettings;
use crate::tables::naqp_mults;

/// NAQP scorer (CW or RTTY running). Every contact is one point;
/// multipliers are states/provinces/DX counted per band.
pub struct Naqp {
    rtty: bool,
    window: (NaiveDateTime, NaiveDateTime),
    policy: ErrorPolicy,
    my_call: String,
    my_name: String,
    my_state: String,
    state: ScoreState,
}

impl Naqp {
    /// Builds a scorer; `rtty` selects the RTTY running.
    pub fn new(
        rtty: bool,
        settings: &StationSettings,
        window: (NaiveDateTime, NaiveDateTime),
        policy: ErrorPolicy,
    ) -> Naqp {
        Naqp {
            rtty,
            window,
            policy,
            my_call: settings.my_call.clone(),
            my_name: settings.my_name.clone(),
            my_state: settings.my_state.clone(),
            state: ScoreState::new(),
        }
    }

    fn mode_label(&self) -> &'static str {
        if self.rtty { "RY" } else { "CW" }
    }

    /// Name + QTH from the dedicated fields or the exchange string.
    /// Loggers sometimes swap the two; a 2-letter "name" next to a longer
    /// "QTH" gets swapped back.
    fn name_and_qth(&self, ctx: &QsoContext<'_>) -> Result<(String, String), ScoreError> {
        let rec = ctx.rec;
        let (mut name, mut qth) = match (&rec.name, rec.qth.as_ref().or(rec.state.as_ref())) {
            (Some(n), Some(q)) => (n.to_ascii_uppercase(), q.to_ascii_uppercase()),
            _ => {
                let raw = rec.srx_string.as_deref().unwrap_or_default();
                let tokens = split_exchange(raw, if raw.contains(',') { ',' } else { ' ' });
                if tokens.len() != 2 {
                    return Err(ScoreError::Structural {
                        index: ctx.index,
                        problem: format!("exchange {raw:?} is not name + QTH"),
                        dump: rec.dump(),
                    });
                }
                (tokens[0].clone(), tokens[1].clone())
            }
        };

        let table = naqp_mults();
        if qth.len() > 2 && name.len() == 2 && table.contains(&name.as_str()) {
            std::mem::swap(&mut name, &mut qth);
        }
        Ok((name, qth))
    }
}

impl ContestScorer for Naqp {
    fn contest(&self) -> &'static str {
        if self.rtty { "NAQP-RTTY" } else { "NAQP-CW" }
    }

    fn category_mode(&self) -> &'static str {
        if self.rtty { "RTTY" } else { "CW" }
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
        let (name, mut qth) = self.name_and_qth(ctx)?;
        if name.contains('?') || qth.contains('?') {
            warn!("{}: uncertain copy name={name:?} qth={qth:?}", rec.call);
            self.state.warnings += 1;
        }

        let info = dx::resolve(&rec.call);
        let domestic = matches!(info.continent, "NA");
        if !domestic {
            qth = "DX".to_string();
        }
        if !naqp_mults().contains(&qth.as_str()) {
            return Err(ScoreError::Validation {
                index: ctx.index,
                value: qth,
                table: "NAQP multipliers",
                dump: rec.dump(),
            });
        }

        if let Some(entry) = ctx.history.get(&rec.call) {
            if !entry.name.is_empty() && entry.name != name {
                warn!("{}: name {name} disagrees with history ({})", rec.call, entry.name);
                self.state.warnings += 1;
            }
            if !entry.state.is_empty() && entry.state != qth {
                warn!("{}: QTH {qth} disagrees with history ({})", rec.call, entry.state);
                self.state.warnings += 1;
            }
        }
        self.state.note_exchange(&rec.call, format!("{name} {qth}"));

        if !ctx.dupe {
            self.state.unique_qsos += 1;
            self.state.total_points += 1;
            self.state.mults.credit(rec.band, qth.clone());
        }

        let freq = crate::engine::exchange::convert_freq(rec.freq_mhz, rec.band);
        let line = format!(
            "QSO: {:>5} {:>2} {:>10} {:>4} {:<10}      {:<10} {:<3} {:<10}      {:<10} {:<3}",
            freq,
            self.mode_label(),
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
        let claimed = self.state.unique_qsos * mults;
        let mut summary = Summary::from_state(&self.state, mults, claimed);
        for (band, values) in self.state.mults.by_band_sorted() {
            summary
                .detail
                .push(format!("{band}: {} mults: {}", values.len(), values.join(" ")));
        }
        summary
    }
}
