//! Read-only call history for exchange cross-checking.
//!
//! A history file is a CSV keyed by callsign whose columns carry whatever
//! attributes earlier contests recorded (name, state, section, check, county,
//! CWops number, zones). Lookups never affect scoring; they only feed
//! consistency warnings.

use std::fs;
use std::path::Path;

use hashbrown::HashMap;
use thiserror::Error;

/// History-file failure.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// File could not be read.
    #[error("cannot read history {path}: {source}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A CSV row failed to parse.
    #[error("bad history {path}: {source}")]
    Parse {
        /// Offending path.
        path: String,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },
}

/// Previously known attributes for one callsign.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Operator name.
    pub name: String,
    /// State/province.
    pub state: String,
    /// ARRL section.
    pub sec: String,
    /// Sweepstakes check.
    pub check: String,
    /// County code.
    pub county: String,
    /// CWops member number.
    pub cwops: String,
    /// CQ zone.
    pub cq_zone: String,
    /// ITU zone.
    pub itu_zone: String,
}

/// Callsign → known attributes, loaded once per run.
#[derive(Debug, Default)]
pub struct History {
    entries: HashMap<String, HistoryEntry>,
}

impl History {
    /// An empty history; every lookup misses.
    pub fn empty() -> History {
        History::default()
    }

    /// Loads a header-addressed CSV history file. Unknown columns are
    /// ignored; missing columns leave fields empty.
    pub fn load(path: &Path) -> Result<History, HistoryError> {
        let text = fs::read_to_string(path).map_err(|source| HistoryError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|source| HistoryError::Parse {
                path: path.display().to_string(),
                source,
            })?
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();

        let col = |names: &[&str]| headers.iter().position(|h| names.contains(&h.as_str()));
        let call_col = col(&["call"]).unwrap_or(0);
        let cols = [
            col(&["name"]),
            col(&["state"]),
            col(&["sec"]),
            col(&["check"]),
            col(&["county"]),
            col(&["cwops"]),
            // Both header spellings circulate in the wild.
            col(&["cqz", "cq_zone"]),
            col(&["ituz", "itu_zone"]),
        ];

        let mut entries = HashMap::new();
        for row in reader.records() {
            let row = row.map_err(|source| HistoryError::Parse {
                path: path.display().to_string(),
                source,
            })?;
            let Some(call) = row.get(call_col) else {
                continue;
            };
            let field = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i))
                    .unwrap_or_default()
                    .to_ascii_uppercase()
            };
            entries.insert(
                call.to_ascii_uppercase(),
                HistoryEntry {
                    name: field(cols[0]),
                    state: field(cols[1]),
                    sec: field(cols[2]),
                    check: field(cols[3]),
                    county: field(cols[4]),
                    cwops: field(cols[5]),
                    cq_zone: field(cols[6]),
                    itu_zone: field(cols[7]),
                },
            );
        }

        Ok(History { entries })
    }

    /// Looks up a callsign.
    pub fn get(&self, call: &str) -> Option<&HistoryEntry> {
        self.entries.get(call)
    }

    /// Number of known callsigns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no history was loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::History;

    #[test]
    fn zone_columns_load_under_either_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");

        std::fs::write(&path, "Call,Name,State,cq_zone,itu_zone\nAA3BC,JIM,MD,5,8\n").unwrap();
        let hist = History::load(&path).unwrap();
        let entry = hist.get("AA3BC").unwrap();
        assert_eq!(entry.cq_zone, "5");
        assert_eq!(entry.itu_zone, "8");

        std::fs::write(&path, "call,cqz,ituz\nAA3BC,5,8\n").unwrap();
        let hist = History::load(&path).unwrap();
        let entry = hist.get("AA3BC").unwrap();
        assert_eq!(entry.cq_zone, "5");
        assert_eq!(entry.itu_zone, "8");
    }
}
