//! CQ WW DX rules: CW, SSB, and the RTTY flavor with its state multiplier.

use chrono::NaiveDateTime;
use log::warn;

use crate::dx;
use crate::engine::state::{DupeScope, ScoreState};
use crate::score::{ContestScorer, ErrorPolicy, QsoContext, Scored, ScoreError, Summary};
use crate::settings::StationSettings;
use crate::tables::{cq_zone_for_state, PROVINCES, STATES};

/// Which CQ WW weekend is being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CqWwVariant {
    /// CW weekend (November).
    Cw,
    /// SSB weekend (October).
    Ssb,
    /// RTTY weekend (September), which adds US/VE states to the mults.
    Rtty,
}

/// CQ WW scorer. Exchange is RST plus CQ zone; multipliers are zones and
/// countries per band (plus states for RTTY).
pub struct CqWw {
    variant: CqWwVariant,
    window: (NaiveDateTime, NaiveDateTime),
    policy: ErrorPolicy,
    my_call: String,
    my_state: String,
    my_cq_zone: u32,
    my_country: String,
    my_continent: String,
    state: ScoreState,
}

impl CqWw {
    /// Builds a scorer for one variant with its window resolved.
    pub fn new(
        variant: CqWwVariant,
        settings: &StationSettings,
        window: (NaiveDateTime, NaiveDateTime),
        policy: ErrorPolicy,
    ) -> CqWw {
        CqWw {
            variant,
            window,
            policy,
            my_call: settings.my_call.clone(),
            my_state: settings.my_state.clone(),
            my_cq_zone: settings.my_cq_zone,
            my_country: settings.my_country.clone(),
            my_continent: settings.my_continent.clone(),
            state: ScoreState::new(),
        }
    }

    fn rst(&self) -> u32 {
        match self.variant {
            CqWwVariant::Ssb => 59,
            _ => 599,
        }
    }

    fn mode_label(&self) -> &'static str {
        match self.variant {
            CqWwVariant::Cw => "CW",
            CqWwVariant::Ssb => "PH",
            CqWwVariant::Rtty => "RY",
        }
    }

    /// Received CQ zone: logged QTH digits, else the last exchange token,
    /// else the prefix table's zone for the call.
    fn received_zone(&self, ctx: &QsoContext<'_>, table_zone: u32) -> Option<u32> {
        let from_qth = ctx
            .rec
            .qth
            .as_deref()
            .and_then(|q| q.trim().parse::<u32>().ok());
        if from_qth.is_some() {
            return from_qth;
        }
        let from_exchange = ctx.rec.srx_string.as_deref().and_then(|s| {
            s.split([',', ' '])
                .filter(|t| !t.trim().is_empty())
                .last()
                .and_then(|t| t.trim().parse::<u32>().ok())
        });
        if from_exchange.is_some() {
            return from_exchange;
        }
        if table_zone > 0 {
            warn!("{}: no zone logged, using prefix table ({table_zone})", ctx.rec.call);
            Some(table_zone)
        } else {
            None
        }
    }

    /// RTTY state token: US and VE stations send their state or province,
    /// everyone else counts as DX.
    fn received_state(&self, ctx: &QsoContext<'_>, domestic: bool) -> Result<String, ScoreError> {
        if !domestic {
            return Ok("DX".to_string());
        }
        let token = ctx
            .rec
            .state
            .clone()
            .or_else(|| {
                ctx.rec
                    .srx_string
                    .as_deref()
                    .and_then(|s| s.split(',').nth(2))
                    .map(|t| t.trim().to_string())
            })
            .unwrap_or_default()
            .to_ascii_uppercase();
        if STATES.contains(&token.as_str()) || PROVINCES.contains(&token.as_str()) {
            Ok(token)
        } else {
            Err(ScoreError::Validation {
                index: ctx.index,
                value: token,
                table: "US states and Canadian provinces",
                dump: ctx.rec.dump(),
            })
        }
    }
}

impl ContestScorer for CqWw {
    fn contest(&self) -> &'static str {
        match self.variant {
            CqWwVariant::Cw => "CQ-WW-CW",
            CqWwVariant::Ssb => "CQ-WW-SSB",
            CqWwVariant::Rtty => "CQ-WW-RTTY",
        }
    }

    fn category_mode(&self) -> &'static str {
        match self.variant {
            CqWwVariant::Cw => "CW",
            CqWwVariant::Ssb => "SSB",
            CqWwVariant::Rtty => "RTTY",
        }
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
        let info = dx::resolve(&rec.call);

        let zone = self
            .received_zone(ctx, info.cq_zone)
            .ok_or_else(|| ScoreError::Structural {
                index: ctx.index,
                problem: format!("cannot determine CQ zone for {}", rec.call),
                dump: rec.dump(),
            })?;
        if let Some(entry) = ctx.history.get(&rec.call) {
            if !entry.cq_zone.is_empty() && entry.cq_zone != zone.to_string() {
                warn!(
                    "{}: zone {zone} disagrees with history ({})",
                    rec.call, entry.cq_zone
                );
                self.state.warnings += 1;
            }
        }

        let domestic = info.country == "United States" || info.country == "Canada";
        let their_state = if self.variant == CqWwVariant::Rtty {
            let st = self.received_state(ctx, domestic)?;
            if let Some(expected) = cq_zone_for_state(&st) {
                if expected != zone {
                    warn!("{}: zone {zone} unusual for {st} (expected {expected})", rec.call);
                    self.state.warnings += 1;
                }
            }
            Some(st)
        } else {
            None
        };

        self.state.note_exchange(&rec.call, zone.to_string());

        if !ctx.dupe {
            self.state.unique_qsos += 1;
            let points: u64 = if info.country == self.my_country {
                match self.variant {
                    CqWwVariant::Rtty => 1,
                    _ => 0,
                }
            } else if info.continent == self.my_continent {
                2
            } else {
                3
            };
            self.state.total_points += points;
            self.state.mults.credit(rec.band, zone.to_string());
            if info.country != "Unknown" {
                self.state.mults.credit(rec.band, info.country);
            }
            if let Some(st) = &their_state {
                if st != "DX" {
                    self.state.mults.credit(rec.band, st.clone());
                }
            }
        }

        let freq = crate::engine::exchange::convert_freq(rec.freq_mhz, rec.band);
        let line = match self.variant {
            CqWwVariant::Rtty => {
                let st = their_state.unwrap_or_else(|| "DX".to_string());
                format!(
                    "QSO: {:>5} RY {:>10} {:>4} {:<13} 599 {:02} {:<2} {:<13} 599 {:02} {:<3}  0",
                    freq,
                    rec.date_str(),
                    rec.time_str(),
                    self.my_call,
                    self.my_cq_zone,
                    self.my_state,
                    rec.call,
                    zone,
                    st
                )
            }
            _ => format!(
                "QSO: {:>5} {:>2} {:>10} {:>4} {:<13} {:>3} {:02} {:<13} {:>3} {:02}  0",
                freq,
                self.mode_label(),
                rec.date_str(),
                rec.time_str(),
                self.my_call,
                self.rst(),
                self.my_cq_zone,
                rec.call,
                self.rst(),
                zone
            ),
        };
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
