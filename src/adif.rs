//! Record source: ADIF logs and the simplified comma-separated `.LOG` format.

use std::fs;
use std::path::Path;

use hashbrown::HashMap;
use log::warn;
use thiserror::Error;

use crate::record::ContactRecord;

/// Record-source failure.
#[derive(Debug, Error)]
pub enum AdifError {
    /// Input file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Simplified log rows failed to parse.
    #[error("bad simplified log {path}: {source}")]
    SimpleLog {
        /// Offending path.
        path: String,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },
}

/// Reads one input file, dispatching on extension: `.log` is the simplified
/// comma-separated format, anything else is treated as ADIF.
pub fn load_records(path: &Path) -> Result<Vec<ContactRecord>, AdifError> {
    let content = fs::read_to_string(path).map_err(|source| AdifError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("log") => parse_simple_log(&content, path),
        _ => Ok(parse_adif(&content)),
    }
}

/// Parses ADIF text into contact records.
///
/// Tag scanning is case-insensitive; everything before `<EOH>` is header and
/// skipped. Records missing required fields are dropped with a warning rather
/// than aborting the whole file, matching how loggers leave stray partial
/// records behind.
pub fn parse_adif(content: &str) -> Vec<ContactRecord> {
    let body = match find_ci(content, "<EOH>") {
        Some(pos) => &content[pos + 5..],
        None => content,
    };

    let mut records = Vec::new();
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut rest = body;

    while let Some(open) = rest.find('<') {
        rest = &rest[open + 1..];
        let Some(close) = rest.find('>') else { break };
        let tag = &rest[..close];
        rest = &rest[close + 1..];

        if tag.eq_ignore_ascii_case("EOR") {
            if !fields.is_empty() {
                match ContactRecord::from_fields(&fields) {
                    Ok(rec) => records.push(rec),
                    Err(e) => warn!("skipping ADIF record: {e}"),
                }
            }
            fields.clear();
            continue;
        }

        // <NAME:len> or <NAME:len:type>
        let mut parts = tag.splitn(3, ':');
        let name = parts.next().unwrap_or_default();
        let Some(len) = parts.next().and_then(|l| l.trim().parse::<usize>().ok()) else {
            continue;
        };
        if len > rest.len() {
            warn!("truncated ADIF field {name}, dropping tail");
            break;
        }
        let value = &rest[..len];
        rest = &rest[len..];
        fields.insert(name.trim().to_ascii_uppercase(), value.to_string());
    }

    records
}

/// Parses the simplified log format:
/// `QSO_DATE_OFF,TIME_OFF,CALL,FREQ,BAND,MODE,SRX_STRING` with a header row.
/// Frequency may be kHz (legacy) or MHz; values above 1000 are taken as kHz.
pub fn parse_simple_log(content: &str, path: &Path) -> Result<Vec<ContactRecord>, AdifError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| AdifError::SimpleLog {
            path: path.display().to_string(),
            source,
        })?
        .iter()
        .map(|h| h.to_ascii_uppercase())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| AdifError::SimpleLog {
            path: path.display().to_string(),
            source,
        })?;

        let mut fields: HashMap<String, String> = HashMap::new();
        for (key, value) in headers.iter().zip(row.iter()) {
            fields.insert(key.clone(), value.to_string());
        }
        // Legacy simplified logs stored kHz in the FREQ column.
        if let Some(f) = fields.get("FREQ").and_then(|v| v.parse::<f64>().ok()) {
            if f >= 1000.0 {
                fields.insert("FREQ".to_string(), format!("{}", f / 1000.0));
            }
        }
        match ContactRecord::from_fields(&fields) {
            Ok(rec) => records.push(rec),
            Err(e) => warn!("skipping simplified log row: {e}"),
        }
    }

    Ok(records)
}

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let ned = needle.as_bytes();
    hay.windows(ned.len())
        .position(|w| w.eq_ignore_ascii_case(ned))
}
