//! The seam between the generic engine and the per-contest rule sets.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::engine::state::{DupeScope, ScoreState};
use crate::history::History;
use crate::record::ContactRecord;

/// Typed per-record scoring failure. The driver decides whether a failure
/// aborts the batch or skips the record, based on the module's
/// [`ErrorPolicy`]; the old in-place process exit became this channel.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// A field the contest's exchange grammar requires was missing or
    /// unparseable.
    #[error("record {index}: {problem}\n  {dump}")]
    Structural {
        /// Position of the offending record in the sorted log.
        index: usize,
        /// What was wrong.
        problem: String,
        /// Context dump of the record.
        dump: String,
    },
    /// A decoded token is not in the contest's fixed multiplier table.
    #[error("record {index}: {value:?} not in {table}\n  {dump}")]
    Validation {
        /// Position of the offending record in the sorted log.
        index: usize,
        /// The rejected token.
        value: String,
        /// Which table rejected it.
        table: &'static str,
        /// Context dump of the record.
        dump: String,
    },
}

/// What the driver does with a [`ScoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the batch on the first bad record (default; partial output
    /// stays on disk).
    #[default]
    Strict,
    /// Log the diagnostic, skip the record (or zero its credit), continue.
    Lenient,
}

/// Everything a contest module may look at while scoring one record.
pub struct QsoContext<'a> {
    /// The record being scored.
    pub rec: &'a ContactRecord,
    /// Its position in the sorted log.
    pub index: usize,
    /// Duplicate verdict from the engine; duplicates still format a line
    /// but earn no points or multiplier credit.
    pub dupe: bool,
    /// The whole sorted log, for audit listings.
    pub log: &'a [ContactRecord],
    /// Read-only exchange history for cross-checking.
    pub history: &'a History,
}

/// Result of scoring one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored {
    /// The fixed-width Cabrillo `QSO:` line, or `None` when the record
    /// produced no output (lenient skip).
    pub line: Option<String>,
}

/// End-of-run tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Raw records that reached the duplicate check.
    pub raw_qsos: u64,
    /// Credited contacts.
    pub unique_qsos: u64,
    /// Flagged duplicates.
    pub dupes: u64,
    /// Rapid dupes silently dropped.
    pub skipped: u64,
    /// QSO point total.
    pub total_points: u64,
    /// Multiplier total.
    pub multipliers: u64,
    /// Claimed score under the contest's formula.
    pub claimed_score: u64,
    /// Contest-specific breakdown lines (per-band mults, missing sections).
    pub detail: Vec<String>,
}

impl Summary {
    /// Builds the common part of a summary from engine state; the caller
    /// fills in multipliers, score, and detail.
    pub fn from_state(state: &ScoreState, multipliers: u64, claimed_score: u64) -> Summary {
        Summary {
            raw_qsos: state.raw_qsos,
            unique_qsos: state.unique_qsos,
            dupes: state.dupes,
            skipped: state.skipped,
            total_points: state.total_points,
            multipliers,
            claimed_score,
            detail: Vec::new(),
        }
    }
}

/// One contest's rule set: window, duplicate scope, exchange grammar,
/// point rule, multiplier category, and output formats.
pub trait ContestScorer {
    /// Cabrillo `CONTEST:` identifier.
    fn contest(&self) -> &'static str;

    /// Operating mode for `CATEGORY-MODE:`.
    fn category_mode(&self) -> &'static str;

    /// Contest window (inclusive start, inclusive end), UTC.
    fn window(&self) -> (NaiveDateTime, NaiveDateTime);

    /// How this contest defines a duplicate.
    fn dupe_scope(&self) -> DupeScope;

    /// What the driver does when this module reports a [`ScoreError`].
    fn policy(&self) -> ErrorPolicy;

    /// Contest-specific Cabrillo header lines (LOCATION, ARRL-SECTION, ...).
    fn header_fields(&self) -> Vec<(&'static str, String)>;

    /// Scores one record: validates the exchange, assigns points and
    /// multiplier credit on non-duplicates, formats the `QSO:` line.
    fn score_qso(&mut self, ctx: &QsoContext<'_>) -> Result<Scored, ScoreError>;

    /// Read access to the accumulator for the driver's bookkeeping.
    fn state(&self) -> &ScoreState;

    /// Mutable access for the driver's dupe scan and skip counters.
    fn state_mut(&mut self) -> &mut ScoreState;

    /// Final tally.
    fn summary(&self) -> Summary;
}
