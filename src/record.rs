//! Parsed contact records and their field-map conversion.

use chrono::NaiveDateTime;
use hashbrown::HashMap;
use thiserror::Error;

use crate::types::Band;

/// Conversion failure turning a raw field map into a [`ContactRecord`].
#[derive(Debug, Error)]
pub enum RecordError {
    /// A required field was absent.
    #[error("missing field {0}")]
    MissingField(&'static str),
    /// A field was present but unparseable.
    #[error("bad {field} value {value:?}")]
    BadField {
        /// Field name.
        field: &'static str,
        /// Offending raw value.
        value: String,
    },
}

/// One logged contact, immutable once built.
///
/// Field names follow the ADIF tags they come from. Exchange content the
/// contest modules care about lives in `srx_string`/`stx_string` plus the
/// handful of named fields loggers sometimes use instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactRecord {
    /// Worked station's callsign, uppercased.
    pub call: String,
    /// Band bucket.
    pub band: Band,
    /// Raw operating mode label (CW, USB, FT8, ...).
    pub mode: String,
    /// Dial frequency in MHz.
    pub freq_mhz: f64,
    /// End-of-contact timestamp (UTC), used for window filtering and sorting.
    pub ts: NaiveDateTime,
    /// Received exchange string (comma- or space-separated tokens).
    pub srx_string: Option<String>,
    /// Sent exchange string.
    pub stx_string: Option<String>,
    /// Received serial, when logged as a bare number.
    pub srx: Option<String>,
    /// Sent serial.
    pub stx: Option<String>,
    /// Worked operator's name.
    pub name: Option<String>,
    /// Worked station's QTH (state/section/county as logged).
    pub qth: Option<String>,
    /// Worked station's state, when logged separately.
    pub state: Option<String>,
    /// Worked station's Maidenhead grid.
    pub gridsquare: Option<String>,
    /// Worked station's country, when the logger resolved it.
    pub country: Option<String>,
    /// ARRL section (Field Day style logs).
    pub arrl_sect: Option<String>,
    /// Field Day class.
    pub class: Option<String>,
    /// Our own callsign as logged (multi-call operations).
    pub station_callsign: Option<String>,
}

impl ContactRecord {
    /// Builds a record from an uppercase-keyed field map.
    ///
    /// `call`, `band`, `mode` and `freq` are required. The timestamp prefers
    /// `qso_date_off`/`time_off` and falls back to `qso_date`/`time_on`.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<ContactRecord, RecordError> {
        let get = |key: &'static str| fields.get(key).map(|s| s.trim().to_string());
        let require = |key: &'static str| get(key).ok_or(RecordError::MissingField(key));

        let call = require("CALL")?.to_ascii_uppercase();
        let band = Band::parse(&require("BAND")?);
        let mode = require("MODE")?.to_ascii_uppercase();
        let freq_raw = require("FREQ")?;
        let freq_mhz = freq_raw.parse::<f64>().map_err(|_| RecordError::BadField {
            field: "FREQ",
            value: freq_raw,
        })?;

        let (date, time) = match (get("QSO_DATE_OFF"), get("TIME_OFF")) {
            (Some(d), Some(t)) => (d, t),
            _ => (
                require("QSO_DATE")?,
                get("TIME_ON").ok_or(RecordError::MissingField("TIME_ON"))?,
            ),
        };
        let ts = parse_timestamp(&date, &time)?;

        Ok(ContactRecord {
            call,
            band,
            mode,
            freq_mhz,
            ts,
            srx_string: get("SRX_STRING"),
            stx_string: get("STX_STRING"),
            srx: get("SRX"),
            stx: get("STX"),
            name: get("NAME"),
            qth: get("QTH"),
            state: get("STATE"),
            gridsquare: get("GRIDSQUARE"),
            country: get("COUNTRY"),
            arrl_sect: get("ARRL_SECT"),
            class: get("CLASS"),
            station_callsign: get("STATION_CALLSIGN"),
        })
    }

    /// Contact date formatted for Cabrillo `QSO:` lines.
    pub fn date_str(&self) -> String {
        self.ts.format("%Y-%m-%d").to_string()
    }

    /// Contact time (HHMM) formatted for Cabrillo `QSO:` lines.
    pub fn time_str(&self) -> String {
        self.ts.format("%H%M").to_string()
    }

    /// Best guess at the received multiplier token, used by the
    /// call+band+multiplier duplicate scope: the second comma token of the
    /// received exchange, else the logged QTH or state.
    pub fn mult_hint(&self) -> Option<String> {
        if let Some(rx) = &self.srx_string {
            if let Some(tok) = rx.split(',').nth(1) {
                return Some(tok.trim().to_ascii_uppercase());
            }
        }
        self.qth
            .as_deref()
            .or(self.state.as_deref())
            .map(|s| s.to_ascii_uppercase())
    }

    /// One-line context dump for diagnostics.
    pub fn dump(&self) -> String {
        format!(
            "{} {} {} {:.4} MHz {} srx={:?} stx={:?}",
            self.ts.format("%Y-%m-%d %H%M%S"),
            self.call,
            self.band,
            self.freq_mhz,
            self.mode,
            self.srx_string,
            self.stx_string
        )
    }
}

fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, RecordError> {
    // ADIF times come as HHMMSS or HHMM.
    let padded = match time.len() {
        4 => format!("{time}00"),
        _ => time.to_string(),
    };
    NaiveDateTime::parse_from_str(&format!("{date} {padded}"), "%Y%m%d %H%M%S").map_err(|_| {
        RecordError::BadField {
            field: "QSO_DATE/TIME",
            value: format!("{date} {time}"),
        }
    })
}
