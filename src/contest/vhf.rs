//! VHF contest rules: grid-square exchange, grids-per-band multipliers.

use chrono::NaiveDateTime;

use crate::engine::exchange::{convert_freq, group_modes};
use crate::engine::state::{DupeScope, ScoreState};
use crate::grid::grid_to_latlon;
use crate::score::{ContestScorer, ErrorPolicy, QsoContext, Scored, ScoreError, Summary};
use crate::settings::StationSettings;
use crate::types::Band;

/// Whose VHF contest: the point schedules differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VhfOrganizer {
    /// ARRL June/September VHF: 1 point through 2m, 2 above.
    Arrl,
    /// CQ WW VHF (6m and 2m only): 1 point on 6m, 2 on 2m.
    Cq,
}

/// VHF scorer. Exchange is the 4-character grid; multipliers are grids per
/// band.
pub struct VhfContest {
    organizer: VhfOrganizer,
    window: (NaiveDateTime, NaiveDateTime),
    policy: ErrorPolicy,
    my_call: String,
    my_grid: String,
    my_state: String,
    state: ScoreState,
}

impl VhfContest {
    /// Builds the scorer with its window resolved.
    pub fn new(
        organizer: VhfOrganizer,
        settings: &StationSettings,
        window: (NaiveDateTime, NaiveDateTime),
        policy: ErrorPolicy,
    ) -> VhfContest {
        VhfContest {
            organizer,
            window,
            policy,
            my_call: settings.my_call.clone(),
            my_grid: settings.grid4().to_string(),
            my_state: settings.my_state.clone(),
            state: ScoreState::new(),
        }
    }

    fn points_for(&self, band: Band) -> u64 {
        match (self.organizer, band) {
            (VhfOrganizer::Arrl, Band::B125m | Band::B70cm) => 2,
            (VhfOrganizer::Cq, Band::B2m) => 2,
            _ => 1,
        }
    }
}

/// First four characters of a well-formed grid, uppercased.
fn grid4_of(raw: &str) -> Option<String> {
    let grid = raw.trim().to_ascii_uppercase();
    if grid.len() != 4 && grid.len() != 6 {
        return None;
    }
    // get(), not a byte slice: multibyte input must not split a character.
    let head = grid.get(..4)?;
    grid_to_latlon(head).map(|_| head.to_string())
}

impl ContestScorer for VhfContest {
    fn contest(&self) -> &'static str {
        match self.organizer {
            VhfOrganizer::Arrl => "ARRL-VHF-JUN",
            VhfOrganizer::Cq => "CQ-VHF",
        }
    }

    fn category_mode(&self) -> &'static str {
        "MIXED"
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
        vec![("LOCATION", self.my_state.clone()), ("GRID-LOCATOR", self.my_grid.clone())]
    }

    fn score_qso(&mut self, ctx: &QsoContext<'_>) -> Result<Scored, ScoreError> {
        let rec = ctx.rec;

        let raw_grid = rec
            .gridsquare
            .as_deref()
            .or(rec.srx_string.as_deref())
            .unwrap_or_default();
        let grid = grid4_of(raw_grid).ok_or_else(|| ScoreError::Structural {
            index: ctx.index,
            problem: format!("malformed grid {raw_grid:?} from {}", rec.call),
            dump: rec.dump(),
        })?;

        let mode = group_modes(&rec.mode);
        if !matches!(mode.as_str(), "CW" | "PH" | "DG") {
            return Err(ScoreError::Structural {
                index: ctx.index,
                problem: format!("mode {} has no Cabrillo group", rec.mode),
                dump: rec.dump(),
            });
        }

        self.state.note_exchange(&rec.call, grid.clone());

        if !ctx.dupe {
            self.state.unique_qsos += 1;
            self.state.total_points += self.points_for(rec.band);
            self.state.mults.credit(rec.band, grid.clone());
        }

        let freq = convert_freq(rec.freq_mhz, rec.band);
        let line = format!(
            "QSO: {:>5} {:>2} {:>10} {:>4} {:<17} {:<6} {:<17} {:<6}",
            freq,
            mode,
            rec.date_str(),
            rec.time_str(),
            self.my_call,
            self.my_grid,
            rec.call,
            grid
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
                .push(format!("{band}: {} grids: {}", values.len(), values.join(" ")));
        }
        summary
    }
}
