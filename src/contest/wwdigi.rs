//! World Wide Digi DX rules: distance-based points, grid-field mults.

use chrono::NaiveDateTime;

use crate::engine::state::{DupeScope, ScoreState};
use crate::grid::{grid_distance_km, grid_to_latlon};
use crate::score::{ContestScorer, ErrorPolicy, QsoContext, Scored, ScoreError, Summary};
use crate::settings::StationSettings;

/// One point per started 3000 km.
const KM_PER_POINT: f64 = 3000.0;

/// WW Digi scorer. Exchange is the 4-character grid; points grow with
/// distance and multipliers are 2-character grid fields per band.
pub struct WwDigi {
    window: (NaiveDateTime, NaiveDateTime),
    policy: ErrorPolicy,
    my_call: String,
    my_grid: String,
    my_section: String,
    state: ScoreState,
    total_km: f64,
    best_dx: Option<(String, f64)>,
}

impl WwDigi {
    /// Builds the scorer with its window resolved.
    pub fn new(
        settings: &StationSettings,
        window: (NaiveDateTime, NaiveDateTime),
        policy: ErrorPolicy,
    ) -> WwDigi {
        WwDigi {
            window,
            policy,
            my_call: settings.my_call.clone(),
            my_grid: settings.grid4().to_string(),
            my_section: settings.my_section.clone(),
            state: ScoreState::new(),
            total_km: 0.0,
            best_dx: None,
        }
    }
}

impl ContestScorer for WwDigi {
    fn contest(&self) -> &'static str {
        "WW-DIGI"
    }

    fn category_mode(&self) -> &'static str {
        "DIGI"
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
        vec![("LOCATION", self.my_section.clone()), ("GRID-LOCATOR", self.my_grid.clone())]
    }

    fn score_qso(&mut self, ctx: &QsoContext<'_>) -> Result<Scored, ScoreError> {
        let rec = ctx.rec;

        let raw = rec
            .gridsquare
            .as_deref()
            .or(rec.srx_string.as_deref())
            .unwrap_or_default()
            .trim()
            .to_ascii_uppercase();
        let head = match raw.len() {
            // get(), not a byte slice: multibyte input must not split a
            // character.
            4 | 6 => raw.get(..4).filter(|h| grid_to_latlon(h).is_some()),
            _ => None,
        };
        let grid = head.map(str::to_string).ok_or_else(|| ScoreError::Structural {
            index: ctx.index,
            problem: format!("malformed grid {raw:?} from {}", rec.call),
            dump: rec.dump(),
        })?;

        self.state.note_exchange(&rec.call, grid.clone());

        if !ctx.dupe {
            let km = grid_distance_km(&grid, &self.my_grid).ok_or_else(|| {
                ScoreError::Structural {
                    index: ctx.index,
                    problem: format!("own grid {:?} does not resolve", self.my_grid),
                    dump: rec.dump(),
                }
            })?;
            self.state.unique_qsos += 1;
            self.state.total_points += 1 + (km / KM_PER_POINT) as u64;
            self.state.mults.credit(rec.band, grid[..2].to_string());

            self.total_km += km;
            if self.best_dx.as_ref().is_none_or(|(_, best)| km > *best) {
                self.best_dx = Some((rec.call.clone(), km));
            }
        }

        let freq = crate::engine::exchange::convert_freq(rec.freq_mhz, rec.band);
        let line = format!(
            "QSO: {:>5} DG {:>10} {:>4} {:<13} {:<8} {:<13} {:<8}     0",
            freq,
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
        if self.state.unique_qsos > 0 {
            summary.detail.push(format!(
                "average distance: {:.0} km",
                self.total_km / self.state.unique_qsos as f64
            ));
        }
        if let Some((call, km)) = &self.best_dx {
            summary.detail.push(format!("best DX: {call} at {km:.0} km"));
        }
        for (band, values) in self.state.mults.by_band_sorted() {
            summary
                .detail
                .push(format!("{band}: {} fields: {}", values.len(), values.join(" ")));
        }
        summary
    }
}
