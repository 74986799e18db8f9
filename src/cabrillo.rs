//! Cabrillo 3.0 submission writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hashbrown::HashSet;
use log::info;

use crate::score::ContestScorer;
use crate::settings::StationSettings;

/// Writes a complete Cabrillo file: version line, contest and station
/// header, the formatted `QSO:` lines, and the end marker. Byte-identical
/// QSO lines are written once; loggers occasionally flush the same contact
/// twice.
pub fn write_log(
    path: &Path,
    scorer: &dyn ContestScorer,
    settings: &StationSettings,
    lines: &[String],
) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "START-OF-LOG:3.0")?;
    writeln!(out, "CONTEST: {}", scorer.contest())?;
    for (key, value) in scorer.header_fields() {
        writeln!(out, "{key}: {value}")?;
    }
    writeln!(out, "CALLSIGN: {}", settings.my_call)?;
    writeln!(out, "CATEGORY-OPERATOR: SINGLE-OP")?;
    writeln!(out, "CATEGORY-TRANSMITTER: ONE")?;
    writeln!(out, "CATEGORY-POWER: {}", settings.my_power)?;
    writeln!(out, "CATEGORY-ASSISTED: NON-ASSISTED")?;
    writeln!(out, "CATEGORY-BAND: ALL")?;
    writeln!(out, "CATEGORY-STATION: FIXED")?;
    writeln!(out, "CATEGORY-MODE: {}", scorer.category_mode())?;
    writeln!(out, "OPERATORS: {}", settings.my_call)?;
    if !settings.club.is_empty() {
        writeln!(out, "CLUB: {}", settings.club)?;
    }
    writeln!(out, "NAME: {}", settings.my_name)?;
    for line in &settings.address {
        writeln!(out, "ADDRESS: {line}")?;
    }
    if !settings.city.is_empty() {
        writeln!(out, "ADDRESS-CITY: {}", settings.city)?;
    }
    if !settings.address_state.is_empty() {
        writeln!(out, "ADDRESS-STATE-PROVINCE: {}", settings.address_state)?;
    }
    if !settings.postal_code.is_empty() {
        writeln!(out, "ADDRESS-POSTALCODE: {}", settings.postal_code)?;
    }
    if !settings.country.is_empty() {
        writeln!(out, "ADDRESS-COUNTRY: {}", settings.country)?;
    }
    if !settings.email.is_empty() {
        writeln!(out, "EMAIL: {}", settings.email)?;
    }
    writeln!(out, "SOAPBOX: ")?;
    writeln!(out, "SOAPBOX: ")?;
    writeln!(out, "SOAPBOX: ")?;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut written = 0usize;
    for line in lines {
        if seen.insert(line.as_str()) {
            writeln!(out, "{line}")?;
            written += 1;
        }
    }
    writeln!(out, "END-OF-LOG:")?;
    out.flush()?;

    info!("wrote {written} QSO lines to {}", path.display());
    Ok(())
}
