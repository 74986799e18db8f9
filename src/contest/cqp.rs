//! California QSO Party rules, scored from the California side.

use chrono::NaiveDateTime;
use log::warn;

use crate::engine::exchange::{reverse_cut_numbers, split_exchange};
use crate::engine::state::{DupeScope, ScoreState};
use crate::score::{ContestScorer, ErrorPolicy, QsoContext, Scored, ScoreError, Summary};
use crate::settings::StationSettings;
use crate::tables::{cqp_mults, cqp_valid_qths, CA_COUNTIES};

/// CQP scorer. Exchange is serial + QTH; a received county collapses to CA
/// and the Maritimes collapse to MR before multiplier credit. A contact may
/// legitimately repeat on the same band when the other station moved
/// counties, so the duplicate scope includes the multiplier token.
pub struct Cqp {
    window: (NaiveDateTime, NaiveDateTime),
    policy: ErrorPolicy,
    my_call: String,
    my_county: String,
    my_section: String,
    state: ScoreState,
}

impl Cqp {
    /// Builds the scorer with its window resolved.
    pub fn new(
        settings: &StationSettings,
        window: (NaiveDateTime, NaiveDateTime),
        policy: ErrorPolicy,
    ) -> Cqp {
        Cqp {
            window,
            policy,
            my_call: settings.my_call.clone(),
            my_county: settings.my_county.clone(),
            my_section: settings.my_section.clone(),
            state: ScoreState::new(),
        }
    }

    /// Serial + QTH from the exchange string. The QTH token is validated
    /// against the full accept list before it collapses to a multiplier.
    fn parse_exchange(&self, ctx: &QsoContext<'_>) -> Result<(String, String), ScoreError> {
        let rec = ctx.rec;
        let raw = rec
            .srx_string
            .as_deref()
            .ok_or_else(|| ScoreError::Structural {
                index: ctx.index,
                problem: format!("no received exchange for {}", rec.call),
                dump: rec.dump(),
            })?;
        let tokens = split_exchange(raw, if raw.contains(',') { ',' } else { ' ' });
        if tokens.len() != 2 {
            return Err(ScoreError::Structural {
                index: ctx.index,
                problem: format!("exchange {raw:?} is not serial + QTH"),
                dump: rec.dump(),
            });
        }

        let serial = reverse_cut_numbers(&tokens[0]);
        let qth = tokens[1].clone();
        if !cqp_valid_qths().contains(&qth.as_str()) {
            return Err(ScoreError::Validation {
                index: ctx.index,
                value: qth,
                table: "CQP QTHs",
                dump: rec.dump(),
            });
        }
        Ok((serial, qth))
    }
}

/// Collapses a received QTH token to its CQP multiplier: counties to CA,
/// the Maritime provinces to MR.
fn qth_to_mult(qth: &str) -> String {
    if CA_COUNTIES.contains(&qth) {
        return "CA".to_string();
    }
    match qth {
        "NB" | "NL" | "NS" | "PE" => "MR".to_string(),
        other => other.to_string(),
    }
}

impl ContestScorer for Cqp {
    fn contest(&self) -> &'static str {
        "CA-QSO-PARTY"
    }

    fn category_mode(&self) -> &'static str {
        "MIXED"
    }

    fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.window
    }

    fn dupe_scope(&self) -> DupeScope {
        DupeScope::CallBandMult
    }

    fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    fn header_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("LOCATION", self.my_county.clone()),
            ("ARRL-SECTION", self.my_section.clone()),
        ]
    }

    fn score_qso(&mut self, ctx: &QsoContext<'_>) -> Result<Scored, ScoreError> {
        let rec = ctx.rec;
        let (serial_in, qth) = self.parse_exchange(ctx)?;
        let mult = qth_to_mult(&qth);

        if let Some(entry) = ctx.history.get(&rec.call) {
            let known = if entry.county.is_empty() { &entry.state } else { &entry.county };
            if !known.is_empty() && *known != qth {
                warn!("{}: QTH {qth} disagrees with history ({known})", rec.call);
                self.state.warnings += 1;
            }
        }
        self.state.note_exchange(&rec.call, qth.clone());

        let phone = crate::engine::exchange::group_modes(&rec.mode) == "PH";
        if !ctx.dupe {
            self.state.unique_qsos += 1;
            self.state.total_points += if phone { 2 } else { 3 };
            if cqp_mults().contains(&mult.as_str()) {
                self.state.mults.credit_overall(mult.clone());
            }
        }

        let serial_out = rec
            .stx
            .as_deref()
            .map(|s| reverse_cut_numbers(s.trim()))
            .unwrap_or_else(|| "0".to_string());
        let mode = if phone { "PH" } else { "CW" };
        let freq = crate::engine::exchange::convert_freq(rec.freq_mhz, rec.band);
        let line = format!(
            "QSO: {:>5} {:>2} {:>10} {:>4} {:<10} {:>4} {:<4} {:<10} {:>4} {:<4}",
            freq,
            mode,
            rec.date_str(),
            rec.time_str(),
            self.my_call,
            serial_out,
            self.my_county,
            rec.call,
            serial_in,
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
        let mut summary = Summary::from_state(&self.state, mults, claimed);

        let worked = self.state.mults.overall_sorted();
        let missing: Vec<&str> = cqp_mults()
            .into_iter()
            .filter(|m| !worked.iter().any(|w| w == m))
            .collect();
        summary
            .detail
            .push(format!("mults worked: {} of {}", worked.len(), cqp_mults().len()));
        if !missing.is_empty() {
            summary.detail.push(format!("missing: {}", missing.join(" ")));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::qth_to_mult;

    #[test]
    fn county_and_maritime_collapse() {
        assert_eq!(qth_to_mult("SDIE"), "CA");
        assert_eq!(qth_to_mult("NS"), "MR");
        assert_eq!(qth_to_mult("PE"), "MR");
        assert_eq!(qth_to_mult("AZ"), "AZ");
        assert_eq!(qth_to_mult("ON"), "ON");
    }
}
