//! IARU HF Championship rules: ITU-zone exchange with HQ-station mults.

use chrono::NaiveDateTime;
use log::warn;

use crate::dx;
use crate::engine::exchange::{reverse_cut_numbers, split_exchange};
use crate::engine::state::{DupeScope, ScoreState};
use crate::score::{ContestScorer, ErrorPolicy, QsoContext, Scored, ScoreError, Summary};
use crate::settings::StationSettings;

/// IARU HF scorer. Stations send their ITU zone; IARU member-society HQ
/// stations send an abbreviation instead, which counts as its own mult.
pub struct IaruHf {
    window: (NaiveDateTime, NaiveDateTime),
    policy: ErrorPolicy,
    my_call: String,
    my_section: String,
    my_itu_zone: u32,
    my_continent: String,
    state: ScoreState,
}

impl IaruHf {
    /// Builds the scorer with its window resolved.
    pub fn new(
        settings: &StationSettings,
        window: (NaiveDateTime, NaiveDateTime),
        policy: ErrorPolicy,
    ) -> IaruHf {
        IaruHf {
            window,
            policy,
            my_call: settings.my_call.clone(),
            my_section: settings.my_section.clone(),
            my_itu_zone: settings.my_itu_zone,
            my_continent: settings.my_continent.clone(),
            state: ScoreState::new(),
        }
    }

    /// Decodes the received exchange into (RST, zone-or-HQ token, numeric
    /// zone). A numeric token outside 1..=90 is structural; a non-numeric
    /// token is an HQ abbreviation and scores as zone 0.
    fn parse_exchange(&self, ctx: &QsoContext<'_>) -> Result<(String, String, u32), ScoreError> {
        let raw = ctx
            .rec
            .srx_string
            .as_deref()
            .or(ctx.rec.qth.as_deref())
            .ok_or_else(|| ScoreError::Structural {
                index: ctx.index,
                problem: format!("no received exchange for {}", ctx.rec.call),
                dump: ctx.rec.dump(),
            })?;
        let delimiter = if raw.contains(',') { ',' } else { ' ' };
        let tokens = split_exchange(raw, delimiter);

        let (rst, token) = match tokens.len() {
            1 => ("599".to_string(), tokens[0].clone()),
            2 => (tokens[0].clone(), tokens[1].clone()),
            _ => {
                return Err(ScoreError::Structural {
                    index: ctx.index,
                    problem: format!("exchange {raw:?} is not RST + zone"),
                    dump: ctx.rec.dump(),
                });
            }
        };

        let decoded = reverse_cut_numbers(&token);
        match decoded.parse::<u32>() {
            Ok(z) if (1..=90).contains(&z) => Ok((rst, decoded, z)),
            Ok(z) => Err(ScoreError::Structural {
                index: ctx.index,
                problem: format!("ITU zone {z} out of range"),
                dump: ctx.rec.dump(),
            }),
            // HQ abbreviation: keep the token as logged, zone 0.
            Err(_) => Ok((rst, token, 0)),
        }
    }
}

impl ContestScorer for IaruHf {
    fn contest(&self) -> &'static str {
        "IARU-HF"
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
        vec![("LOCATION", self.my_section.clone())]
    }

    fn score_qso(&mut self, ctx: &QsoContext<'_>) -> Result<Scored, ScoreError> {
        let rec = ctx.rec;
        let (rst, token, zone) = self.parse_exchange(ctx)?;
        if rst != "599" {
            warn!("{}: unusual received RST {rst}", rec.call);
            self.state.warnings += 1;
        }
        if let Some(entry) = ctx.history.get(&rec.call) {
            if zone > 0 && !entry.itu_zone.is_empty() && entry.itu_zone != zone.to_string() {
                warn!(
                    "{}: zone {zone} disagrees with history ({})",
                    rec.call, entry.itu_zone
                );
                self.state.warnings += 1;
            }
        }
        self.state.note_exchange(&rec.call, token.clone());

        if !ctx.dupe {
            let info = dx::resolve(&rec.call);
            let points: u64 = if zone == 0 || zone == self.my_itu_zone {
                1
            } else if info.continent == self.my_continent {
                3
            } else if matches!(info.continent, "SA" | "EU" | "OC" | "AF" | "AS") {
                5
            } else {
                return Err(ScoreError::Structural {
                    index: ctx.index,
                    problem: format!("cannot place {} on a continent", rec.call),
                    dump: rec.dump(),
                });
            };
            self.state.unique_qsos += 1;
            self.state.total_points += points;
            self.state.mults.credit(rec.band, token.clone());
        }

        let freq = crate::engine::exchange::convert_freq(rec.freq_mhz, rec.band);
        let line = format!(
            "QSO: {:>5} CW {:>10} {:>4} {:<13} {:<3} {:<6} {:<13}      {:<3} {:<6}",
            freq,
            rec.date_str(),
            rec.time_str(),
            self.my_call,
            599,
            self.my_itu_zone,
            rec.call,
            rst,
            token
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
        let mut summary = Summary::from_state(&self.state, mults, claimed);
        for (band, values) in self.state.mults.by_band_sorted() {
            summary
                .detail
                .push(format!("{band}: {} mults: {}", values.len(), values.join(" ")));
        }
        summary
    }
}
