//! The batch driver: load, filter, sort, score, write, report.

use std::path::{Path, PathBuf};

use chrono::Duration;
use log::{error, info, warn};
use thiserror::Error;

use crate::adif::{self, AdifError};
use crate::cabrillo;
use crate::engine::audit;
use crate::history::History;
use crate::record::ContactRecord;
use crate::score::{ContestScorer, ErrorPolicy, QsoContext, ScoreError, Summary};
use crate::settings::StationSettings;

/// A gap longer than this counts as off time in the operating report.
const OFF_TIME_GAP_MIN: i64 = 30;

/// Batch failure.
#[derive(Debug, Error)]
pub enum RunError {
    /// An input file failed to load.
    #[error(transparent)]
    Adif(#[from] AdifError),
    /// A record failed to score under the strict policy. Partial output is
    /// already on disk.
    #[error("aborted: {0}")]
    Score(#[from] ScoreError),
    /// The output file could not be written.
    #[error("cannot write {path}: {source}")]
    Output {
        /// Offending path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Inputs for one scoring run.
pub struct RunOptions {
    /// ADIF / simplified-log input files, concatenated.
    pub inputs: Vec<PathBuf>,
    /// Cabrillo output path.
    pub output: PathBuf,
    /// Exchange history for cross-checking.
    pub history: History,
}

/// What a completed run hands back to the caller.
pub struct RunReport {
    /// Final tally.
    pub summary: Summary,
    /// Exchange-consistency report from the post-pass.
    pub inconsistencies: Vec<String>,
    /// Operating-time lines.
    pub operating: Vec<String>,
}

/// Scores a batch of logs against one contest and writes the Cabrillo file.
///
/// Under the strict policy the first scoring error aborts the run; whatever
/// lines were formatted up to that point are still written so the operator
/// can see where scoring stopped.
pub fn run(
    scorer: &mut dyn ContestScorer,
    settings: &StationSettings,
    opts: &RunOptions,
) -> Result<RunReport, RunError> {
    let qsos = load_inputs(&opts.inputs, scorer)?;
    let history = &opts.history;

    let mut lines: Vec<String> = Vec::with_capacity(qsos.len());
    let mut abort: Option<ScoreError> = None;
    for i in 0..qsos.len() {
        let check = {
            let scope = scorer.dupe_scope();
            scorer.state_mut().check_dupes(scope, &qsos, i, 0)
        };
        if check.rapid {
            scorer.state_mut().skipped += 1;
            continue;
        }
        let ctx = QsoContext {
            rec: &qsos[i],
            index: i,
            dupe: check.duplicate,
            log: &qsos,
            history,
        };
        match scorer.score_qso(&ctx) {
            Ok(scored) => {
                if let Some(line) = scored.line {
                    lines.push(line);
                }
            }
            Err(err) => match scorer.policy() {
                ErrorPolicy::Strict => {
                    abort = Some(err);
                    break;
                }
                ErrorPolicy::Lenient => {
                    error!("{err}");
                    scorer.state_mut().warnings += 1;
                }
            },
        }
    }

    cabrillo::write_log(&opts.output, &*scorer, settings, &lines).map_err(|source| {
        RunError::Output {
            path: opts.output.display().to_string(),
            source,
        }
    })?;
    if let Some(err) = abort {
        return Err(err.into());
    }

    Ok(RunReport {
        summary: scorer.summary(),
        inconsistencies: scorer.state().check_multis(),
        operating: operating_report(&qsos, scorer.state().unique_qsos),
    })
}

/// Audit mode: no scoring, just the exact and fuzzy listings for one call.
pub fn audit_call(
    call: &str,
    scorer: &mut dyn ContestScorer,
    opts: &RunOptions,
) -> Result<Vec<String>, RunError> {
    let qsos = load_inputs(&opts.inputs, scorer)?;
    let mut lines = audit::list_all_qsos(call, &qsos);
    lines.extend(audit::list_similar_calls(call, &qsos));
    Ok(lines)
}

/// Loads every input, drops out-of-window records (warning once per side),
/// and sorts what remains by timestamp.
fn load_inputs(
    inputs: &[PathBuf],
    scorer: &dyn ContestScorer,
) -> Result<Vec<ContactRecord>, AdifError> {
    let mut qsos: Vec<ContactRecord> = Vec::new();
    for path in inputs {
        let records = adif::load_records(Path::new(path))?;
        info!("{}: {} records", path.display(), records.len());
        qsos.extend(records);
    }

    let (start, end) = scorer.window();
    let before = qsos.iter().filter(|q| q.ts < start).count();
    let after = qsos.iter().filter(|q| q.ts > end).count();
    if before > 0 {
        warn!("{before} records before the contest window were dropped");
    }
    if after > 0 {
        warn!("{after} records after the contest window were dropped");
    }
    qsos.retain(|q| q.ts >= start && q.ts <= end);
    qsos.sort_by_key(|q| q.ts);
    Ok(qsos)
}

/// On-air time, off time, and rate from the sorted log. Gaps over
/// [`OFF_TIME_GAP_MIN`] minutes count as off time.
fn operating_report(qsos: &[ContactRecord], unique: u64) -> Vec<String> {
    let (Some(first), Some(last)) = (qsos.first(), qsos.last()) else {
        return vec!["no contacts in the contest window".to_string()];
    };

    let span = last.ts - first.ts;
    let mut off = Duration::zero();
    for pair in qsos.windows(2) {
        let gap = pair[1].ts - pair[0].ts;
        if gap > Duration::minutes(OFF_TIME_GAP_MIN) {
            off += gap;
        }
    }
    let on = span - off;
    let on_hours = on.num_minutes() as f64 / 60.0;
    let rate = if on_hours > 0.0 {
        unique as f64 / on_hours
    } else {
        0.0
    };

    vec![
        format!("first contact: {}", first.ts.format("%Y-%m-%d %H%M")),
        format!("last contact:  {}", last.ts.format("%Y-%m-%d %H%M")),
        format!(
            "operating time: {}h{:02}m (off {}h{:02}m)",
            on.num_hours(),
            on.num_minutes() % 60,
            off.num_hours(),
            off.num_minutes() % 60
        ),
        format!("average rate: {rate:.0}/hr"),
    ]
}
