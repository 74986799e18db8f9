//! The contest-independent accumulator every rule set shares.

use hashbrown::{HashMap, HashSet};
use log::warn;

use crate::engine::exchange::group_modes;
use crate::record::ContactRecord;
use crate::types::Band;

/// How a contest defines "same contact" for duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DupeScope {
    /// Same callsign anywhere in the log (Sweepstakes).
    CallOnly,
    /// Same callsign on the same band (most HF contests).
    CallBand,
    /// Same callsign, band, and mode group (Field Day).
    CallBandMode,
    /// Same callsign, band, and received multiplier token (CQP).
    CallBandMult,
}

/// Result of a duplicate scan for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DupeCheck {
    /// True when an earlier accepted record matches under the scope.
    pub duplicate: bool,
    /// True when the match sits within two positions of this record —
    /// an accidental re-log the driver drops silently.
    pub rapid: bool,
}

/// Monotonic per-band (plus overall) multiplier sets. Values only ever get
/// added, and only for non-duplicate contacts — callers enforce the latter.
#[derive(Debug, Default)]
pub struct MultTracker {
    by_band: HashMap<Band, HashSet<String>>,
    overall: HashSet<String>,
}

impl MultTracker {
    /// Credits a multiplier value on a band. Returns true when it was new.
    pub fn credit(&mut self, band: Band, value: impl Into<String>) -> bool {
        self.by_band.entry(band).or_default().insert(value.into())
    }

    /// Credits a log-wide multiplier value. Returns true when it was new.
    pub fn credit_overall(&mut self, value: impl Into<String>) -> bool {
        self.overall.insert(value.into())
    }

    /// Distinct values credited on one band.
    pub fn band_count(&self, band: Band) -> usize {
        self.by_band.get(&band).map_or(0, HashSet::len)
    }

    /// Total multiplier count: per-band set sizes plus overall set size.
    pub fn total(&self) -> usize {
        let per_band: usize = self.by_band.values().map(HashSet::len).sum();
        per_band + self.overall.len()
    }

    /// Sorted values per band, low band first, for summary listings.
    pub fn by_band_sorted(&self) -> Vec<(Band, Vec<String>)> {
        let mut bands: Vec<Band> = self.by_band.keys().copied().collect();
        bands.sort();
        bands
            .into_iter()
            .map(|band| {
                let mut values: Vec<String> =
                    self.by_band[&band].iter().cloned().collect();
                values.sort();
                (band, values)
            })
            .collect()
    }

    /// Sorted log-wide values.
    pub fn overall_sorted(&self) -> Vec<String> {
        let mut values: Vec<String> = self.overall.iter().cloned().collect();
        values.sort();
        values
    }
}

/// Cumulative scoring state for one contest run. Owned by the contest
/// scorer and threaded mutably through the single forward pass; nothing
/// else writes to it.
#[derive(Debug, Default)]
pub struct ScoreState {
    /// Raw QSO count: every record that reached the duplicate check.
    pub raw_qsos: u64,
    /// Unique (credited) QSO count.
    pub unique_qsos: u64,
    /// Duplicates flagged for review.
    pub dupes: u64,
    /// Rapid dupes silently skipped by the driver.
    pub skipped: u64,
    /// Accumulated QSO points.
    pub total_points: u64,
    /// Consistency warnings raised during the run.
    pub warnings: u64,
    /// Multiplier sets.
    pub mults: MultTracker,
    /// Received exchange strings per call, for the post-pass consistency
    /// check.
    exchanges: HashMap<String, Vec<String>>,
}

impl ScoreState {
    /// Fresh state for a run.
    pub fn new() -> ScoreState {
        ScoreState::default()
    }

    /// Duplicate scan for `qsos[i]` against the already-processed window
    /// `qsos[istart..i]`. Increments the raw QSO counter unconditionally;
    /// flagged duplicates also bump the dupe counter. Malformed comparisons
    /// degrade to "not a duplicate".
    pub fn check_dupes(
        &mut self,
        scope: DupeScope,
        qsos: &[ContactRecord],
        i: usize,
        istart: usize,
    ) -> DupeCheck {
        self.raw_qsos += 1;

        let Some(rec) = qsos.get(i) else {
            return DupeCheck { duplicate: false, rapid: false };
        };
        let mode_group = group_modes(&rec.mode);
        let mult = rec.mult_hint();

        let mut duplicate = false;
        let mut rapid = false;
        for (j, prior) in qsos.iter().enumerate().take(i).skip(istart) {
            if prior.call != rec.call {
                continue;
            }
            let hit = match scope {
                DupeScope::CallOnly => true,
                DupeScope::CallBand => prior.band == rec.band,
                DupeScope::CallBandMode => {
                    prior.band == rec.band && group_modes(&prior.mode) == mode_group
                }
                DupeScope::CallBandMult => {
                    prior.band == rec.band && prior.mult_hint() == mult
                }
            };
            if hit {
                duplicate = true;
                if i - j <= 2 {
                    rapid = true;
                    warn!("rapid dupe: {} {} (records {j} and {i})", rec.call, rec.band);
                } else {
                    warn!("dupe: {} {} (records {j} and {i})", rec.call, rec.band);
                }
            }
        }

        if duplicate {
            self.dupes += 1;
        }
        DupeCheck { duplicate, rapid }
    }

    /// Records the received exchange for a call, feeding [`Self::check_multis`].
    pub fn note_exchange(&mut self, call: &str, exchange: impl Into<String>) {
        self.exchanges
            .entry(call.to_string())
            .or_default()
            .push(exchange.into());
    }

    /// Post-pass consistency check: report lines for every call that gave
    /// more than one distinct exchange over the run. Advisory only.
    pub fn check_multis(&self) -> Vec<String> {
        let mut calls: Vec<&String> = self.exchanges.keys().collect();
        calls.sort();

        let mut report = Vec::new();
        for call in calls {
            let given = &self.exchanges[call];
            let mut distinct: Vec<&String> = Vec::new();
            for exch in given {
                if !distinct.contains(&exch) {
                    distinct.push(exch);
                }
            }
            if distinct.len() > 1 {
                report.push(format!(
                    "{call}: inconsistent exchanges over {} contacts: {}",
                    given.len(),
                    distinct
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(" / ")
                ));
            }
        }
        report
    }
}
