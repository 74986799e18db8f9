//! ARRL Sweepstakes rules: the four-part exchange and section sweep.

use chrono::NaiveDateTime;
use log::warn;

use crate::engine::exchange::{reverse_cut_numbers, split_exchange};
use crate::engine::state::{DupeScope, ScoreState};
use crate::score::{ContestScorer, ErrorPolicy, QsoContext, Scored, ScoreError, Summary};
use crate::settings::StationSettings;
use crate::tables::ARRL_SECTIONS;

const PRECEDENCE: [&str; 6] = ["Q", "A", "B", "U", "M", "S"];

/// CW Sweepstakes scorer. A call counts once regardless of band; the
/// received exchange is serial, precedence, check, and section.
pub struct Sweepstakes {
    window: (NaiveDateTime, NaiveDateTime),
    policy: ErrorPolicy,
    my_call: String,
    my_prec: String,
    my_check: String,
    my_section: String,
    state: ScoreState,
}

/// The decoded receive side of one exchange.
struct SsExchange {
    serial: String,
    prec: String,
    check: String,
    section: String,
}

impl Sweepstakes {
    /// Builds the scorer with its window resolved.
    pub fn new(
        settings: &StationSettings,
        window: (NaiveDateTime, NaiveDateTime),
        policy: ErrorPolicy,
    ) -> Sweepstakes {
        Sweepstakes {
            window,
            policy,
            my_call: settings.my_call.clone(),
            my_prec: settings.my_prec.clone(),
            my_check: settings.my_check.clone(),
            my_section: settings.my_section.clone(),
            state: ScoreState::new(),
        }
    }

    /// Positional parse of `serial prec check section`, with cut-number
    /// decoding on the numeric parts and the PEI alias collapsed to PE.
    fn parse_exchange(&self, ctx: &QsoContext<'_>) -> Result<SsExchange, ScoreError> {
        let raw = ctx
            .rec
            .srx_string
            .as_deref()
            .ok_or_else(|| ScoreError::Structural {
                index: ctx.index,
                problem: format!("no received exchange for {}", ctx.rec.call),
                dump: ctx.rec.dump(),
            })?;
        let delimiter = if raw.contains(',') { ',' } else { ' ' };
        let tokens = split_exchange(raw, delimiter);
        if tokens.len() != 4 {
            return Err(ScoreError::Structural {
                index: ctx.index,
                problem: format!("exchange {raw:?} is not serial/prec/check/section"),
                dump: ctx.rec.dump(),
            });
        }

        let serial = reverse_cut_numbers(&tokens[0]);
        let prec = tokens[1].clone();
        let check = reverse_cut_numbers(&tokens[2]);
        let mut section = tokens[3].clone();
        if section == "PEI" {
            section = "PE".to_string();
        }

        if !PRECEDENCE.contains(&prec.as_str()) {
            return Err(ScoreError::Validation {
                index: ctx.index,
                value: prec,
                table: "precedence letters",
                dump: ctx.rec.dump(),
            });
        }
        if !ARRL_SECTIONS.contains(&section.as_str()) {
            return Err(ScoreError::Validation {
                index: ctx.index,
                value: section,
                table: "ARRL sections",
                dump: ctx.rec.dump(),
            });
        }
        Ok(SsExchange { serial, prec, check, section })
    }
}

impl ContestScorer for Sweepstakes {
    fn contest(&self) -> &'static str {
        "ARRL-SS-CW"
    }

    fn category_mode(&self) -> &'static str {
        "CW"
    }

    fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.window
    }

    fn dupe_scope(&self) -> DupeScope {
        DupeScope::CallOnly
    }

    fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    fn header_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("LOCATION", self.my_section.clone()),
            ("ARRL-SECTION", self.my_section.clone()),
        ]
    }

    fn score_qso(&mut self, ctx: &QsoContext<'_>) -> Result<Scored, ScoreError> {
        let rec = ctx.rec;
        let exch = self.parse_exchange(ctx)?;

        if let Some(entry) = ctx.history.get(&rec.call) {
            if !entry.sec.is_empty() && entry.sec != exch.section {
                warn!(
                    "{}: section {} disagrees with history ({})",
                    rec.call, exch.section, entry.sec
                );
                self.state.warnings += 1;
            }
            if !entry.check.is_empty() && entry.check != exch.check {
                warn!(
                    "{}: check {} disagrees with history ({})",
                    rec.call, exch.check, entry.check
                );
                self.state.warnings += 1;
            }
        }
        self.state
            .note_exchange(&rec.call, format!("{} {} {}", exch.prec, exch.check, exch.section));

        if !ctx.dupe {
            self.state.unique_qsos += 1;
            self.state.total_points += 2;
            self.state.mults.credit_overall(exch.section.clone());
        }

        let my_serial = rec
            .stx
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(0);
        let check_num = exch.check.parse::<u32>().unwrap_or(0);
        let freq = crate::engine::exchange::convert_freq(rec.freq_mhz, rec.band);
        let line = format!(
            "QSO: {:>5} CW {:>10} {:>4} {:<10} {:>4} {:>1} {:>2} {:<3} {:<10} {:>4} {:>1} {:>2} {:<3}",
            freq,
            rec.date_str(),
            rec.time_str(),
            self.my_call,
            my_serial,
            self.my_prec,
            self.my_check,
            self.my_section,
            rec.call,
            exch.serial,
            exch.prec,
            check_num,
            exch.section
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
        let missing: Vec<&str> = ARRL_SECTIONS
            .iter()
            .copied()
            .filter(|sec| !worked.iter().any(|w| w == sec))
            .collect();
        summary
            .detail
            .push(format!("sections worked: {} of {}", worked.len(), ARRL_SECTIONS.len()));
        if !missing.is_empty() {
            summary.detail.push(format!("missing: {}", missing.join(" ")));
        }
        summary
    }
}
