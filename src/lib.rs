//! Contest log scoring: ADIF logs in, a scored Cabrillo submission out.
//!
//! The generic engine (duplicate detection, cut-number decoding, multiplier
//! tracking) lives under [`engine`]; each contest's rule set is a plain
//! struct under [`contest`] implementing [`score::ContestScorer`]; the batch
//! driver in [`run`] ties them together.
//!
//! # Examples
//!
//! ```
//! use cabscore::adif::parse_adif;
//! use cabscore::contest::{build, BuildOptions, ContestKind};
//! use cabscore::history::History;
//! use cabscore::score::{ContestScorer, ErrorPolicy, QsoContext};
//! use cabscore::settings::StationSettings;
//! use chrono::NaiveDate;
//!
//! let qsos = parse_adif(
//!     "<CALL:5>AA3BC <BAND:3>20m <MODE:2>CW <FREQ:6>14.040 \
//!      <QSO_DATE:8>20220115 <TIME_ON:6>183000 <NAME:3>JIM <QTH:2>MD <EOR>",
//! );
//! assert_eq!(qsos.len(), 1);
//!
//! let settings = StationSettings {
//!     my_call: "AA2IL".to_string(),
//!     my_name: "JOE".to_string(),
//!     my_state: "CA".to_string(),
//!     ..StationSettings::default()
//! };
//! let now = NaiveDate::from_ymd_opt(2022, 1, 20)
//!     .unwrap()
//!     .and_hms_opt(0, 0, 0)
//!     .unwrap();
//! let mut scorer = build(
//!     &ContestKind::NaqpCw,
//!     &settings,
//!     &BuildOptions { now, policy: ErrorPolicy::Strict, window_override: None },
//! );
//!
//! let history = History::empty();
//! let scored = scorer
//!     .score_qso(&QsoContext {
//!         rec: &qsos[0],
//!         index: 0,
//!         dupe: false,
//!         log: &qsos,
//!         history: &history,
//!     })
//!     .expect("well-formed exchange");
//! assert!(scored.line.expect("formatted line").starts_with("QSO: 14040 CW"));
//! assert_eq!(scorer.summary().total_points, 1);
//! ```

/// ADIF and simplified-log record sources.
pub mod adif;
/// Cabrillo 3.0 submission writer.
pub mod cabrillo;
/// Per-contest rule sets and the registry.
pub mod contest;
/// Callsign prefix resolution.
pub mod dx;
/// Contest-independent scoring engine.
pub mod engine;
/// Maidenhead grid math.
pub mod grid;
/// Exchange history for cross-checking.
pub mod history;
/// Contact records.
pub mod record;
/// The batch scoring driver.
pub mod run;
/// The scorer trait, errors, and summaries.
pub mod score;
/// Station settings.
pub mod settings;
/// Fixed multiplier tables.
pub mod tables;
/// Shared primitive types.
pub mod types;
