//! Exchange-token helpers shared by every contest rule set.

use crate::types::Band;

/// Decodes Morse cut numbers in a numeric token: T and O stand for 0, A for
/// 1, N for 9. The substituted string is then normalized through integer
/// parsing (stripping leading zeros); if it still is not numeric, the
/// substituted string is returned unchanged. Idempotent on all-digit input.
pub fn reverse_cut_numbers(token: &str) -> String {
    let substituted: String = token
        .to_ascii_uppercase()
        .chars()
        .map(|c| match c {
            'T' | 'O' => '0',
            'A' => '1',
            'N' => '9',
            other => other,
        })
        .collect();

    match substituted.parse::<u64>() {
        Ok(n) => n.to_string(),
        Err(_) => substituted,
    }
}

/// Collapses a raw mode label into the Cabrillo mode groups: phone variants
/// to PH, digital variants to DG, everything else passes through unchanged.
pub fn group_modes(mode: &str) -> String {
    match mode.to_ascii_uppercase().as_str() {
        "FM" | "SSB" | "USB" | "LSB" | "AM" => "PH".to_string(),
        "FT8" | "FT4" | "MFSK" => "DG".to_string(),
        other => other.to_string(),
    }
}

/// Converts a dial frequency to the value Cabrillo wants in the frequency
/// column: kHz (rounded) below 30 MHz, or the fixed band constant for
/// VHF/UHF bands.
///
/// Panics on a band with no Cabrillo constant. The band table is fixed at
/// build time, so hitting this means the table itself is wrong — fail fast
/// rather than emit a bogus submission line.
pub fn convert_freq(freq_mhz: f64, band: Band) -> u32 {
    if freq_mhz < 30.0 {
        return (1000.0 * freq_mhz + 0.5) as u32;
    }
    match band {
        Band::B6m => 50,
        Band::B2m => 144,
        Band::B125m => 223,
        Band::B70cm => 432,
        other => panic!("no Cabrillo frequency constant for band {other}"),
    }
}

/// Splits an exchange string on its delimiter into trimmed uppercase tokens.
pub fn split_exchange(exchange: &str, delimiter: char) -> Vec<String> {
    exchange
        .split(delimiter)
        .map(|tok| tok.trim().to_ascii_uppercase())
        .filter(|tok| !tok.is_empty())
        .collect()
}

/// Similarity ratio in `[0, 1]` between two strings, used for fuzzy
/// callsign matching at the 0.7 audit threshold. Levenshtein distance scaled
/// by the longer length; 1.0 means equal.
pub fn similar(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}
