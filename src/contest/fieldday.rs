//! ARRL Field Day rules: class + section exchange, per-mode points.

use chrono::NaiveDateTime;

use crate::engine::exchange::{convert_freq, group_modes, split_exchange};
use crate::engine::state::{DupeScope, ScoreState};
use crate::score::{ContestScorer, ErrorPolicy, QsoContext, Scored, ScoreError, Summary};
use crate::settings::StationSettings;
use crate::tables::fd_sections;

/// Power multiplier for the claimed-score line (low power, no commercial
/// mains bonus handling here).
const POWER_MULT: u64 = 2;

/// Field Day scorer. Not a sanctioned contest; the tally mirrors the
/// entry-form arithmetic: phone 1 point, CW and digital 2, times the power
/// multiplier.
pub struct FieldDay {
    window: (NaiveDateTime, NaiveDateTime),
    policy: ErrorPolicy,
    my_call: String,
    my_class: String,
    my_section: String,
    state: ScoreState,
}

impl FieldDay {
    /// Builds the scorer with its window resolved.
    pub fn new(
        settings: &StationSettings,
        window: (NaiveDateTime, NaiveDateTime),
        policy: ErrorPolicy,
    ) -> FieldDay {
        FieldDay {
            window,
            policy,
            my_call: settings.my_call.clone(),
            my_class: settings.my_fd_class.clone(),
            my_section: settings.my_section.clone(),
            state: ScoreState::new(),
        }
    }

    /// Class + section, from the dedicated ADIF fields or the exchange
    /// string.
    fn class_and_section(&self, ctx: &QsoContext<'_>) -> Result<(String, String), ScoreError> {
        let rec = ctx.rec;
        let (class, section) = match (&rec.class, &rec.arrl_sect) {
            (Some(c), Some(s)) => (c.to_ascii_uppercase(), s.to_ascii_uppercase()),
            _ => {
                let raw = rec.srx_string.as_deref().unwrap_or_default();
                let tokens = split_exchange(raw, if raw.contains(',') { ',' } else { ' ' });
                if tokens.len() != 2 {
                    return Err(ScoreError::Structural {
                        index: ctx.index,
                        problem: format!("exchange {raw:?} is not class + section"),
                        dump: rec.dump(),
                    });
                }
                (tokens[0].clone(), tokens[1].clone())
            }
        };

        if !valid_class(&class) {
            return Err(ScoreError::Structural {
                index: ctx.index,
                problem: format!("malformed Field Day class {class:?}"),
                dump: rec.dump(),
            });
        }
        if !fd_sections().contains(&section.as_str()) {
            return Err(ScoreError::Validation {
                index: ctx.index,
                value: section,
                table: "ARRL sections",
                dump: rec.dump(),
            });
        }
        Ok((class, section))
    }
}

/// A class is one or more transmitter digits followed by a single letter
/// A through F.
fn valid_class(class: &str) -> bool {
    let Some(last) = class.chars().last() else {
        return false;
    };
    let digits = &class[..class.len() - 1];
    ('A'..='F').contains(&last) && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

impl ContestScorer for FieldDay {
    fn contest(&self) -> &'static str {
        "ARRL-FD"
    }

    fn category_mode(&self) -> &'static str {
        "MIXED"
    }

    fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.window
    }

    fn dupe_scope(&self) -> DupeScope {
        DupeScope::CallBandMode
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
        let (class, section) = self.class_and_section(ctx)?;
        let mode = group_modes(&rec.mode);

        self.state
            .note_exchange(&rec.call, format!("{class} {section}"));

        if !ctx.dupe {
            self.state.unique_qsos += 1;
            self.state.total_points += if mode == "PH" { 1 } else { 2 };
            self.state.mults.credit_overall(section.clone());
        }

        let freq = convert_freq(rec.freq_mhz, rec.band);
        let line = format!(
            "QSO: {:>5} {:>2} {:>10} {:>4} {:<10} {:<3} {:<3}    {:<10} {:<3} {:<3}",
            freq,
            mode,
            rec.date_str(),
            rec.time_str(),
            self.my_call,
            self.my_class,
            self.my_section,
            rec.call,
            class,
            section
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
        let claimed = self.state.total_points * POWER_MULT;
        let sections = self.state.mults.total() as u64;
        let mut summary = Summary::from_state(&self.state, sections, claimed);
        summary
            .detail
            .push(format!("sections heard: {sections}"));
        summary
            .detail
            .push(format!("claimed = QSO points x power mult {POWER_MULT}"));
        summary
    }
}
