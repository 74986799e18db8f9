//! Shared band and mode primitives.

use serde::{Deserialize, Serialize};

/// Contest band bucket, HF through 70cm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    /// 160 meters.
    B160m,
    /// 80 meters.
    B80m,
    /// 40 meters.
    B40m,
    /// 20 meters.
    B20m,
    /// 15 meters.
    B15m,
    /// 10 meters.
    B10m,
    /// 6 meters.
    B6m,
    /// 2 meters.
    B2m,
    /// 1.25 meters (222 MHz).
    B125m,
    /// 70 centimeters.
    B70cm,
    /// Any non-standard band.
    Other,
}

impl Band {
    /// Parses an ADIF band label. Unknown labels land in [`Band::Other`].
    pub fn parse(label: &str) -> Band {
        match label.to_ascii_lowercase().as_str() {
            "160m" => Band::B160m,
            "80m" => Band::B80m,
            "40m" => Band::B40m,
            "20m" => Band::B20m,
            "15m" => Band::B15m,
            "10m" => Band::B10m,
            "6m" => Band::B6m,
            "2m" => Band::B2m,
            "1.25m" => Band::B125m,
            "70cm" => Band::B70cm,
            _ => Band::Other,
        }
    }

    /// ADIF band label.
    pub fn name(&self) -> &'static str {
        match self {
            Band::B160m => "160m",
            Band::B80m => "80m",
            Band::B40m => "40m",
            Band::B20m => "20m",
            Band::B15m => "15m",
            Band::B10m => "10m",
            Band::B6m => "6m",
            Band::B2m => "2m",
            Band::B125m => "1.25m",
            Band::B70cm => "70cm",
            Band::Other => "?",
        }
    }

    /// True for bands below 30 MHz.
    pub fn is_hf(&self) -> bool {
        matches!(
            self,
            Band::B160m | Band::B80m | Band::B40m | Band::B20m | Band::B15m | Band::B10m
        )
    }

    /// The six classic HF contest bands, low to high.
    pub const HF_CONTEST: [Band; 6] = [
        Band::B160m,
        Band::B80m,
        Band::B40m,
        Band::B20m,
        Band::B15m,
        Band::B10m,
    ];

    /// VHF/UHF contest bands.
    pub const VHF_CONTEST: [Band; 3] = [Band::B6m, Band::B2m, Band::B70cm];
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
