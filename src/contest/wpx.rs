//! CQ WPX rules: serial-number exchange, prefix multipliers.

use chrono::NaiveDateTime;

use crate::dx;
use crate::engine::exchange::{reverse_cut_numbers, split_exchange};
use crate::engine::state::{DupeScope, ScoreState};
use crate::score::{ContestScorer, ErrorPolicy, QsoContext, Scored, ScoreError, Summary};
use crate::settings::StationSettings;

/// CQ WPX scorer (CW or RTTY weekend). Multipliers are distinct call
/// prefixes counted once over the whole log.
pub struct CqWpx {
    rtty: bool,
    window: (NaiveDateTime, NaiveDateTime),
    policy: ErrorPolicy,
    my_call: String,
    my_state: String,
    state: ScoreState,
}

impl CqWpx {
    /// Builds a scorer; `rtty` selects the RTTY weekend rules and labels.
    pub fn new(
        rtty: bool,
        settings: &StationSettings,
        window: (NaiveDateTime, NaiveDateTime),
        policy: ErrorPolicy,
    ) -> CqWpx {
        CqWpx {
            rtty,
            window,
            policy,
            my_call: settings.my_call.clone(),
            my_state: settings.my_state.clone(),
            state: ScoreState::new(),
        }
    }

    fn mode_label(&self) -> &'static str {
        if self.rtty { "RY" } else { "CW" }
    }
}

/// Pulls a serial number out of a bare field or an exchange string. Exchange
/// strings may be comma- or space-delimited, with an optional leading RST.
fn serial_from(bare: Option<&str>, exchange: Option<&str>) -> Option<String> {
    if let Some(serial) = bare {
        let decoded = reverse_cut_numbers(serial.trim());
        if decoded.chars().all(|c| c.is_ascii_digit()) {
            return Some(decoded);
        }
    }
    let exchange = exchange?;
    let delimiter = if exchange.contains(',') { ',' } else { ' ' };
    split_exchange(exchange, delimiter)
        .into_iter()
        .map(|tok| reverse_cut_numbers(&tok))
        .filter(|tok| tok.chars().all(|c| c.is_ascii_digit()))
        .find(|tok| tok != "599" && tok != "59")
}

impl ContestScorer for CqWpx {
    fn contest(&self) -> &'static str {
        if self.rtty { "CQ-WPX-RTTY" } else { "CQ-WPX-CW" }
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

        let serial_in = serial_from(rec.srx.as_deref(), rec.srx_string.as_deref()).ok_or_else(
            || ScoreError::Structural {
                index: ctx.index,
                problem: format!("no received serial for {}", rec.call),
                dump: rec.dump(),
            },
        )?;
        let serial_out = serial_from(rec.stx.as_deref(), rec.stx_string.as_deref())
            .unwrap_or_else(|| "0".to_string());

        self.state.note_exchange(&rec.call, serial_in.clone());

        if !ctx.dupe {
            self.state.unique_qsos += 1;
            self.state.total_points += 1;
            self.state.mults.credit_overall(dx::wpx_prefix(&rec.call));
        }

        let freq = crate::engine::exchange::convert_freq(rec.freq_mhz, rec.band);
        let line = format!(
            "QSO: {:>5} {:>2} {:>10} {:>4} {:<13} {:<3} {:<6} {:<13}      {:<3} {:<6}",
            freq,
            self.mode_label(),
            rec.date_str(),
            rec.time_str(),
            self.my_call,
            599,
            serial_out,
            rec.call,
            599,
            serial_in
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
        summary.detail.push(format!(
            "prefixes: {}",
            self.state.mults.overall_sorted().join(" ")
        ));
        summary
    }
}
