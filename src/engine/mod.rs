//! Contest-independent scoring primitives.

/// Audit listings for exact and fuzzy callsign matches.
pub mod audit;
/// Cut numbers, mode grouping, frequency conversion, token helpers.
pub mod exchange;
/// Accumulator state, duplicate detection, multiplier tracking.
pub mod state;
