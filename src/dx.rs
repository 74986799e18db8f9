//! Callsign prefix resolution: country, continent, zones, WPX prefix.
//!
//! A compact longest-match prefix table stands in for a full country file.
//! It covers the entities that actually show up in this station's logs; an
//! unmatched call resolves to [`DxInfo::unknown`] and the scorers treat it
//! as plain DX.

/// Resolved attributes for a worked callsign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DxInfo {
    /// Entity name (matches the spelling the rule tables use).
    pub country: &'static str,
    /// Continent code.
    pub continent: &'static str,
    /// CQ zone.
    pub cq_zone: u32,
    /// ITU zone.
    pub itu_zone: u32,
}

impl DxInfo {
    /// Placeholder for calls the table does not cover.
    pub fn unknown() -> DxInfo {
        DxInfo {
            country: "Unknown",
            continent: "??",
            cq_zone: 0,
            itu_zone: 0,
        }
    }
}

struct PrefixRule {
    prefix: &'static str,
    country: &'static str,
    continent: &'static str,
    cq_zone: u32,
    itu_zone: u32,
}

// Ordered for readability; resolution picks the longest matching prefix, so
// specific rules (KH6, UA9) win over their generic parents (K, UA).
const PREFIX_RULES: &[PrefixRule] = &[
    // North America
    PrefixRule { prefix: "K", country: "United States", continent: "NA", cq_zone: 4, itu_zone: 7 },
    PrefixRule { prefix: "N", country: "United States", continent: "NA", cq_zone: 4, itu_zone: 7 },
    PrefixRule { prefix: "W", country: "United States", continent: "NA", cq_zone: 4, itu_zone: 7 },
    PrefixRule { prefix: "AA", country: "United States", continent: "NA", cq_zone: 4, itu_zone: 7 },
    PrefixRule { prefix: "AB", country: "United States", continent: "NA", cq_zone: 4, itu_zone: 7 },
    PrefixRule { prefix: "AC", country: "United States", continent: "NA", cq_zone: 4, itu_zone: 7 },
    PrefixRule { prefix: "AD", country: "United States", continent: "NA", cq_zone: 4, itu_zone: 7 },
    PrefixRule { prefix: "AE", country: "United States", continent: "NA", cq_zone: 4, itu_zone: 7 },
    PrefixRule { prefix: "AF", country: "United States", continent: "NA", cq_zone: 4, itu_zone: 7 },
    PrefixRule { prefix: "AG", country: "United States", continent: "NA", cq_zone: 4, itu_zone: 7 },
    PrefixRule { prefix: "KH6", country: "Hawaii", continent: "OC", cq_zone: 31, itu_zone: 61 },
    PrefixRule { prefix: "KL", country: "Alaska", continent: "NA", cq_zone: 1, itu_zone: 1 },
    PrefixRule { prefix: "KP4", country: "Puerto Rico", continent: "NA", cq_zone: 8, itu_zone: 11 },
    PrefixRule { prefix: "VE", country: "Canada", continent: "NA", cq_zone: 4, itu_zone: 9 },
    PrefixRule { prefix: "VA", country: "Canada", continent: "NA", cq_zone: 4, itu_zone: 9 },
    PrefixRule { prefix: "VO", country: "Canada", continent: "NA", cq_zone: 5, itu_zone: 9 },
    PrefixRule { prefix: "VY", country: "Canada", continent: "NA", cq_zone: 4, itu_zone: 9 },
    PrefixRule { prefix: "XE", country: "Mexico", continent: "NA", cq_zone: 6, itu_zone: 10 },
    PrefixRule { prefix: "CM", country: "Cuba", continent: "NA", cq_zone: 8, itu_zone: 11 },
    PrefixRule { prefix: "CO", country: "Cuba", continent: "NA", cq_zone: 8, itu_zone: 11 },
    PrefixRule { prefix: "J7", country: "Dominica", continent: "NA", cq_zone: 8, itu_zone: 11 },
    PrefixRule { prefix: "TI", country: "Costa Rica", continent: "NA", cq_zone: 7, itu_zone: 11 },
    // South America
    PrefixRule { prefix: "PY", country: "Brazil", continent: "SA", cq_zone: 11, itu_zone: 15 },
    PrefixRule { prefix: "PP", country: "Brazil", continent: "SA", cq_zone: 11, itu_zone: 15 },
    PrefixRule { prefix: "LU", country: "Argentina", continent: "SA", cq_zone: 13, itu_zone: 14 },
    PrefixRule { prefix: "CE", country: "Chile", continent: "SA", cq_zone: 12, itu_zone: 14 },
    PrefixRule { prefix: "HC", country: "Ecuador", continent: "SA", cq_zone: 10, itu_zone: 12 },
    PrefixRule { prefix: "CX", country: "Uruguay", continent: "SA", cq_zone: 13, itu_zone: 14 },
    PrefixRule { prefix: "YV", country: "Venezuela", continent: "SA", cq_zone: 9, itu_zone: 12 },
    PrefixRule { prefix: "OA", country: "Peru", continent: "SA", cq_zone: 10, itu_zone: 12 },
    // Europe
    PrefixRule { prefix: "G", country: "England", continent: "EU", cq_zone: 14, itu_zone: 27 },
    PrefixRule { prefix: "M", country: "England", continent: "EU", cq_zone: 14, itu_zone: 27 },
    PrefixRule { prefix: "2E", country: "England", continent: "EU", cq_zone: 14, itu_zone: 27 },
    PrefixRule { prefix: "F", country: "France", continent: "EU", cq_zone: 14, itu_zone: 27 },
    PrefixRule { prefix: "DL", country: "Germany", continent: "EU", cq_zone: 14, itu_zone: 28 },
    PrefixRule { prefix: "DJ", country: "Germany", continent: "EU", cq_zone: 14, itu_zone: 28 },
    PrefixRule { prefix: "DK", country: "Germany", continent: "EU", cq_zone: 14, itu_zone: 28 },
    PrefixRule { prefix: "I", country: "Italy", continent: "EU", cq_zone: 15, itu_zone: 28 },
    PrefixRule { prefix: "EA", country: "Spain", continent: "EU", cq_zone: 14, itu_zone: 37 },
    PrefixRule { prefix: "EA8", country: "Canary Islands", continent: "AF", cq_zone: 33, itu_zone: 36 },
    PrefixRule { prefix: "CT", country: "Portugal", continent: "EU", cq_zone: 14, itu_zone: 37 },
    PrefixRule { prefix: "ON", country: "Belgium", continent: "EU", cq_zone: 14, itu_zone: 27 },
    PrefixRule { prefix: "PA", country: "Netherlands", continent: "EU", cq_zone: 14, itu_zone: 27 },
    PrefixRule { prefix: "OZ", country: "Denmark", continent: "EU", cq_zone: 14, itu_zone: 18 },
    PrefixRule { prefix: "SM", country: "Sweden", continent: "EU", cq_zone: 14, itu_zone: 18 },
    PrefixRule { prefix: "LA", country: "Norway", continent: "EU", cq_zone: 14, itu_zone: 18 },
    PrefixRule { prefix: "OH", country: "Finland", continent: "EU", cq_zone: 15, itu_zone: 18 },
    PrefixRule { prefix: "SP", country: "Poland", continent: "EU", cq_zone: 15, itu_zone: 28 },
    PrefixRule { prefix: "OK", country: "Czech Republic", continent: "EU", cq_zone: 15, itu_zone: 28 },
    PrefixRule { prefix: "OE", country: "Austria", continent: "EU", cq_zone: 15, itu_zone: 28 },
    PrefixRule { prefix: "HB", country: "Switzerland", continent: "EU", cq_zone: 14, itu_zone: 28 },
    PrefixRule { prefix: "HA", country: "Hungary", continent: "EU", cq_zone: 15, itu_zone: 28 },
    PrefixRule { prefix: "EI", country: "Ireland", continent: "EU", cq_zone: 14, itu_zone: 27 },
    PrefixRule { prefix: "9A", country: "Croatia", continent: "EU", cq_zone: 15, itu_zone: 28 },
    PrefixRule { prefix: "UA", country: "European Russia", continent: "EU", cq_zone: 16, itu_zone: 29 },
    PrefixRule { prefix: "UA9", country: "Asiatic Russia", continent: "AS", cq_zone: 17, itu_zone: 30 },
    // Asia
    PrefixRule { prefix: "JA", country: "Japan", continent: "AS", cq_zone: 25, itu_zone: 45 },
    PrefixRule { prefix: "JE", country: "Japan", continent: "AS", cq_zone: 25, itu_zone: 45 },
    PrefixRule { prefix: "JH", country: "Japan", continent: "AS", cq_zone: 25, itu_zone: 45 },
    PrefixRule { prefix: "JR", country: "Japan", continent: "AS", cq_zone: 25, itu_zone: 45 },
    PrefixRule { prefix: "HL", country: "South Korea", continent: "AS", cq_zone: 25, itu_zone: 44 },
    PrefixRule { prefix: "BY", country: "China", continent: "AS", cq_zone: 24, itu_zone: 44 },
    PrefixRule { prefix: "VU", country: "India", continent: "AS", cq_zone: 22, itu_zone: 41 },
    PrefixRule { prefix: "4X", country: "Israel", continent: "AS", cq_zone: 20, itu_zone: 39 },
    PrefixRule { prefix: "HS", country: "Thailand", continent: "AS", cq_zone: 26, itu_zone: 49 },
    // Oceania
    PrefixRule { prefix: "VK", country: "Australia", continent: "OC", cq_zone: 30, itu_zone: 59 },
    PrefixRule { prefix: "ZL", country: "New Zealand", continent: "OC", cq_zone: 32, itu_zone: 60 },
    PrefixRule { prefix: "KH2", country: "Guam", continent: "OC", cq_zone: 27, itu_zone: 64 },
    // Africa
    PrefixRule { prefix: "ZS", country: "South Africa", continent: "AF", cq_zone: 38, itu_zone: 57 },
    PrefixRule { prefix: "CN", country: "Morocco", continent: "AF", cq_zone: 33, itu_zone: 37 },
    PrefixRule { prefix: "SU", country: "Egypt", continent: "AF", cq_zone: 34, itu_zone: 38 },
];

/// Resolves a callsign to entity data via longest-prefix match on its home
/// call (the longest `/`-separated chunk).
pub fn resolve(call: &str) -> DxInfo {
    let home = home_call(call);
    let mut best: Option<&PrefixRule> = None;
    for rule in PREFIX_RULES {
        if home.starts_with(rule.prefix) {
            match best {
                Some(b) if b.prefix.len() >= rule.prefix.len() => {}
                _ => best = Some(rule),
            }
        }
    }
    match best {
        Some(rule) => DxInfo {
            country: rule.country,
            continent: rule.continent,
            cq_zone: rule.cq_zone,
            itu_zone: rule.itu_zone,
        },
        None => DxInfo::unknown(),
    }
}

/// Strips portable designators: the longest `/`-separated chunk is taken as
/// the home call (`HC8N/4` -> `HC8N`, `F/AA2IL` -> `AA2IL`).
pub fn home_call(call: &str) -> &str {
    call.split('/')
        .max_by_key(|part| part.len())
        .unwrap_or(call)
}

/// WPX prefix of a call: everything up to and including the last digit of
/// the leading prefix block (`AA2IL` -> `AA2`, `HC8N` -> `HC8`). Calls with
/// no digit take their first two characters plus an implied zero.
pub fn wpx_prefix(call: &str) -> String {
    let home = home_call(call).to_ascii_uppercase();
    let trimmed = home.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    if trimmed.is_empty() {
        let head: String = home.chars().take(2).collect();
        return format!("{head}0");
    }
    trimmed.to_string()
}
