//! Operator settings: read once at startup, immutable for the run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings-file failure.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be read.
    #[error("cannot read settings {path}: {source}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// File was not valid JSON for [`StationSettings`].
    #[error("bad settings {path}: {source}")]
    Parse {
        /// Offending path.
        path: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// The operator's station data, supplied by a local JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StationSettings {
    /// Own callsign.
    pub my_call: String,
    /// Operator name (exchange + Cabrillo NAME line).
    pub my_name: String,
    /// State/province abbreviation.
    pub my_state: String,
    /// ARRL section.
    pub my_section: String,
    /// County code (state QSO parties).
    pub my_county: String,
    /// Maidenhead grid.
    pub my_grid: String,
    /// CQ zone number.
    pub my_cq_zone: u32,
    /// ITU zone number.
    pub my_itu_zone: u32,
    /// Country name as the prefix tables spell it.
    pub my_country: String,
    /// Continent code (NA, EU, ...).
    pub my_continent: String,
    /// Sweepstakes precedence letter.
    pub my_prec: String,
    /// Sweepstakes check (year first licensed, two digits).
    pub my_check: String,
    /// Field Day class (e.g. 1E).
    pub my_fd_class: String,
    /// Cabrillo CATEGORY-POWER.
    pub my_power: String,
    /// Cabrillo address block.
    pub address: Vec<String>,
    /// Cabrillo ADDRESS-CITY.
    pub city: String,
    /// Cabrillo ADDRESS-STATE-PROVINCE.
    pub address_state: String,
    /// Cabrillo ADDRESS-POSTALCODE.
    pub postal_code: String,
    /// Cabrillo ADDRESS-COUNTRY.
    pub country: String,
    /// Cabrillo EMAIL.
    pub email: String,
    /// Cabrillo CLUB.
    pub club: String,
}

impl Default for StationSettings {
    fn default() -> Self {
        StationSettings {
            my_call: String::new(),
            my_name: String::new(),
            my_state: String::new(),
            my_section: String::new(),
            my_county: String::new(),
            my_grid: String::new(),
            my_cq_zone: 0,
            my_itu_zone: 0,
            my_country: "United States".to_string(),
            my_continent: "NA".to_string(),
            my_prec: "A".to_string(),
            my_check: String::new(),
            my_fd_class: "1E".to_string(),
            my_power: "LOW".to_string(),
            address: Vec::new(),
            city: String::new(),
            address_state: String::new(),
            postal_code: String::new(),
            country: "USA".to_string(),
            email: String::new(),
            club: String::new(),
        }
    }
}

impl StationSettings {
    /// Loads settings from a JSON file.
    pub fn load(path: &Path) -> Result<StationSettings, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// First four characters of the grid, as exchanged in VHF contests.
    pub fn grid4(&self) -> &str {
        let end = self
            .my_grid
            .char_indices()
            .nth(4)
            .map_or(self.my_grid.len(), |(i, _)| i);
        &self.my_grid[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::StationSettings;

    #[test]
    fn grid4_truncates_on_char_boundaries() {
        let mut settings = StationSettings::default();
        settings.my_grid = "DM12ax".to_string();
        assert_eq!(settings.grid4(), "DM12");
        settings.my_grid = "DM1".to_string();
        assert_eq!(settings.grid4(), "DM1");
        settings.my_grid = "éééééé".to_string();
        assert_eq!(settings.grid4(), "éééé");
    }
}
