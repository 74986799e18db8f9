use cabscore::dx::{home_call, resolve, wpx_prefix};
use cabscore::engine::exchange::{
    convert_freq, group_modes, reverse_cut_numbers, similar, split_exchange,
};
use cabscore::grid::{grid_distance_km, grid_to_latlon};
use cabscore::tables::cq_zone_for_state;
use cabscore::types::Band;

#[test]
fn cut_numbers_decode() {
    assert_eq!(reverse_cut_numbers("TOA"), "1");
    assert_eq!(reverse_cut_numbers("T5T"), "50");
    assert_eq!(reverse_cut_numbers("5NN"), "599");
    assert_eq!(reverse_cut_numbers("A2"), "12");
    assert_eq!(reverse_cut_numbers("007"), "7");
}

#[test]
fn cut_numbers_idempotent_on_digits() {
    assert_eq!(reverse_cut_numbers("599"), "599");
    assert_eq!(reverse_cut_numbers("1"), "1");
    assert_eq!(reverse_cut_numbers("42"), "42");
}

#[test]
fn cut_numbers_pass_through_when_not_numeric() {
    // Substitution applies but the result is returned as-is.
    assert_eq!(reverse_cut_numbers("ABC"), "1BC");
    assert_eq!(reverse_cut_numbers("SDG"), "SDG");
    assert_eq!(reverse_cut_numbers(""), "");
}

#[test]
fn mode_groups() {
    assert_eq!(group_modes("USB"), "PH");
    assert_eq!(group_modes("LSB"), "PH");
    assert_eq!(group_modes("FM"), "PH");
    assert_eq!(group_modes("fm"), "PH");
    assert_eq!(group_modes("FT8"), "DG");
    assert_eq!(group_modes("FT4"), "DG");
    assert_eq!(group_modes("MFSK"), "DG");
    assert_eq!(group_modes("CW"), "CW");
    assert_eq!(group_modes("RTTY"), "RTTY");
}

#[test]
fn freq_conversion() {
    assert_eq!(convert_freq(14.0401, Band::B20m), 14040);
    assert_eq!(convert_freq(7.0386, Band::B40m), 7039);
    assert_eq!(convert_freq(3.5, Band::B80m), 3500);
    assert_eq!(convert_freq(1.8255, Band::B160m), 1826);
    // VHF/UHF use the band constant regardless of dial frequency.
    assert_eq!(convert_freq(50.313, Band::B6m), 50);
    assert_eq!(convert_freq(144.2, Band::B2m), 144);
    assert_eq!(convert_freq(222.1, Band::B125m), 223);
    assert_eq!(convert_freq(432.1, Band::B70cm), 432);
}

#[test]
#[should_panic]
fn freq_conversion_rejects_unknown_band() {
    convert_freq(1296.1, Band::Other);
}

#[test]
fn exchange_splitting() {
    assert_eq!(split_exchange("  599, 03 ", ','), vec!["599", "03"]);
    assert_eq!(split_exchange("123 a 72 sdg", ' '), vec!["123", "A", "72", "SDG"]);
    assert_eq!(split_exchange(",,", ','), Vec::<String>::new());
}

#[test]
fn similarity_ratio() {
    assert_eq!(similar("AA2IL", "AA2IL"), 1.0);
    assert!(similar("AA2IL", "AA2I") >= 0.7);
    assert!(similar("K6ABC", "K6ABD") >= 0.7);
    assert!(similar("K1A", "W6XYZ") < 0.7);
    assert_eq!(similar("", ""), 1.0);
}

#[test]
fn wpx_prefixes() {
    assert_eq!(wpx_prefix("AA2IL"), "AA2");
    assert_eq!(wpx_prefix("HC8N"), "HC8");
    assert_eq!(wpx_prefix("K6M"), "K6");
    assert_eq!(wpx_prefix("F/AA2IL"), "AA2");
    // No digit at all: first two characters plus an implied zero.
    assert_eq!(wpx_prefix("RAEM"), "RA0");
}

#[test]
fn home_call_strips_portable() {
    assert_eq!(home_call("HC8N/4"), "HC8N");
    assert_eq!(home_call("F/AA2IL"), "AA2IL");
    assert_eq!(home_call("K6XYZ"), "K6XYZ");
}

#[test]
fn prefix_resolution() {
    let us = resolve("K6ABC");
    assert_eq!(us.country, "United States");
    assert_eq!(us.continent, "NA");

    let ja = resolve("JA1XYZ");
    assert_eq!(ja.country, "Japan");
    assert_eq!(ja.continent, "AS");
    assert_eq!(ja.cq_zone, 25);

    // Longest prefix wins over the generic parent.
    assert_eq!(resolve("KH6LC").country, "Hawaii");
    assert_eq!(resolve("UA9ABC").country, "Asiatic Russia");
    assert_eq!(resolve("UA3ABC").country, "European Russia");

    assert_eq!(resolve("5T5PA").country, "Unknown");
}

#[test]
fn grid_centers() {
    let (lat, lon) = grid_to_latlon("DM12").expect("valid grid");
    assert!((lat - 32.5).abs() < 1e-9);
    assert!((lon + 117.0).abs() < 1e-9);

    assert!(grid_to_latlon("D1").is_none());
    assert!(grid_to_latlon("12DM").is_none());
    assert!(grid_to_latlon("DM12j").is_none());
}

#[test]
fn grid_distances() {
    assert_eq!(grid_distance_km("DM12", "DM12"), Some(0.0));
    // San Diego to Boston area, roughly 4200 km.
    let km = grid_distance_km("DM12", "FN42").expect("valid grids");
    assert!((3900.0..4500.0).contains(&km), "got {km}");
    assert!(grid_distance_km("DM12", "bogus").is_none());
}

#[test]
fn state_zones() {
    assert_eq!(cq_zone_for_state("CA"), Some(3));
    assert_eq!(cq_zone_for_state("NY"), Some(5));
    assert_eq!(cq_zone_for_state("TX"), Some(4));
    assert_eq!(cq_zone_for_state("AK"), Some(1));
    assert_eq!(cq_zone_for_state("HI"), Some(31));
    assert_eq!(cq_zone_for_state("ON"), Some(4));
    assert_eq!(cq_zone_for_state("BC"), Some(3));
    assert_eq!(cq_zone_for_state("NS"), Some(5));
    assert_eq!(cq_zone_for_state("XX"), None);
}

#[test]
fn band_labels() {
    assert_eq!(Band::parse("20M"), Band::B20m);
    assert_eq!(Band::parse("1.25m"), Band::B125m);
    assert_eq!(Band::parse("23cm"), Band::Other);
    assert!(Band::B10m.is_hf());
    assert!(!Band::B6m.is_hf());
    assert_eq!(Band::B40m.to_string(), "40m");
}
