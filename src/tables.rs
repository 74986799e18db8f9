//! Fixed multiplier tables the contest rule sets validate against.
//!
//! These are build-time constants; a decoded token that is not in the
//! relevant table is a validation error, not a lookup miss to recover from.

/// The fifty US states.
pub const STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY",
];

/// Canadian provinces and territories.
pub const PROVINCES: [&str; 13] = [
    "AB", "BC", "MB", "NB", "NL", "NS", "NT", "NU", "ON", "PE", "QC", "SK", "YT",
];

/// ARRL/RAC sections (Sweepstakes, Field Day).
pub const ARRL_SECTIONS: [&str; 85] = [
    "CT", "EMA", "ME", "NH", "RI", "VT", "WMA", "ENY", "NLI", "NNJ", "NNY", "SNJ", "WNY", "DE",
    "EPA", "MDC", "WPA", "AL", "GA", "KY", "NC", "NFL", "SC", "SFL", "WCF", "TN", "VA", "PR", "VI",
    "AR", "LA", "MS", "NM", "NTX", "OK", "STX", "WTX", "EB", "LAX", "ORG", "SB", "SCV", "SDG",
    "SF", "SJV", "SV", "PAC", "AZ", "EWA", "ID", "MT", "NV", "OR", "UT", "WWA", "WY", "AK", "MI",
    "OH", "WV", "IL", "IN", "WI", "CO", "IA", "KS", "MN", "MO", "NE", "ND", "SD", "AB", "BC", "GH",
    "MB", "NB", "NL", "NS", "ONE", "ONN", "ONS", "PE", "QC", "SK", "TER",
];

/// NAQP multipliers: states, provinces, and DX for everything else.
pub fn naqp_mults() -> Vec<&'static str> {
    let mut v: Vec<&'static str> = Vec::with_capacity(STATES.len() + PROVINCES.len() + 1);
    v.extend_from_slice(&STATES);
    v.extend_from_slice(&PROVINCES);
    v.push("DX");
    v
}

/// California county codes (CQP four-letter abbreviations).
pub const CA_COUNTIES: [&str; 58] = [
    "ALAM", "ALPI", "AMAD", "BUTT", "CALA", "CCOS", "COLU", "DELN", "ELDO", "FRES", "GLEN",
    "HUMB", "IMPE", "INYO", "KERN", "KING", "LAKE", "LANG", "LASS", "MADE", "MARN", "MARP",
    "MEND", "MERC", "MODO", "MONO", "MONT", "NAPA", "NEVA", "ORAN", "PLAC", "PLUM", "RIVE",
    "SACR", "SBAR", "SBEN", "SBER", "SCLA", "SCRU", "SDIE", "SFRA", "SHAS", "SIER", "SISK",
    "SJOA", "SLUI", "SMAT", "SOLA", "SONO", "STAN", "SUTT", "TEHA", "TRIN", "TULA", "TUOL",
    "VENT", "YOLO", "YUBA",
];

/// CQP multipliers worked from inside California: the fifty states plus the
/// Canadian areas CQP counts (Maritimes collapse to MR).
pub fn cqp_mults() -> Vec<&'static str> {
    let mut v: Vec<&'static str> = Vec::with_capacity(STATES.len() + 8);
    v.extend_from_slice(&STATES);
    v.extend_from_slice(&["MR", "QC", "ON", "MB", "SK", "AB", "BC", "NT"]);
    v
}

/// Every QTH token CQP accepts on receive (before collapsing to a mult).
pub fn cqp_valid_qths() -> Vec<&'static str> {
    let mut v: Vec<&'static str> =
        Vec::with_capacity(STATES.len() + PROVINCES.len() + CA_COUNTIES.len() + 2);
    v.extend_from_slice(&STATES);
    v.extend_from_slice(&PROVINCES);
    v.extend_from_slice(&CA_COUNTIES);
    v.extend_from_slice(&["MR", "DX"]);
    v
}

/// Field Day sections: the ARRL/RAC list plus DX.
pub fn fd_sections() -> Vec<&'static str> {
    let mut v: Vec<&'static str> = Vec::with_capacity(ARRL_SECTIONS.len() + 1);
    v.extend_from_slice(&ARRL_SECTIONS);
    v.push("DX");
    v
}

/// CQ zone for a US state or Canadian province, for sanity-checking logged
/// zone/state pairs. W6/W7 country is zone 3, the middle is 4, the east 5.
pub fn cq_zone_for_state(state: &str) -> Option<u32> {
    const ZONE3: [&str; 7] = ["WA", "OR", "CA", "NV", "ID", "UT", "AZ"];
    const ZONE5: [&str; 20] = [
        "ME", "NH", "VT", "MA", "RI", "CT", "NY", "NJ", "PA", "DE", "MD", "VA", "WV", "NC", "SC",
        "GA", "FL", "OH", "MI", "DC",
    ];
    if state == "AK" {
        return Some(1);
    }
    if state == "HI" {
        return Some(31);
    }
    if ZONE3.contains(&state) {
        return Some(3);
    }
    if ZONE5.contains(&state) || ["NB", "NS", "PE", "NL"].contains(&state) {
        return Some(5);
    }
    if state == "BC" {
        return Some(3);
    }
    if STATES.contains(&state) || PROVINCES.contains(&state) {
        return Some(4);
    }
    None
}
