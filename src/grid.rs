//! Maidenhead grid math for grid-exchange contests.

/// Center latitude/longitude of a 4- or 6-character Maidenhead grid.
/// Returns `None` for malformed grids.
pub fn grid_to_latlon(grid: &str) -> Option<(f64, f64)> {
    let grid = grid.to_ascii_uppercase();
    let b = grid.as_bytes();
    if b.len() != 4 && b.len() != 6 {
        return None;
    }
    if !(b'A'..=b'R').contains(&b[0]) || !(b'A'..=b'R').contains(&b[1]) {
        return None;
    }
    if !b[2].is_ascii_digit() || !b[3].is_ascii_digit() {
        return None;
    }

    let mut lon = f64::from(b[0] - b'A') * 20.0 - 180.0;
    let mut lat = f64::from(b[1] - b'A') * 10.0 - 90.0;
    lon += f64::from(b[2] - b'0') * 2.0;
    lat += f64::from(b[3] - b'0');

    if b.len() == 6 {
        if !b[4].is_ascii_alphabetic() || !b[5].is_ascii_alphabetic() {
            return None;
        }
        lon += f64::from(b[4] - b'A') * (2.0 / 24.0) + 1.0 / 24.0;
        lat += f64::from(b[5] - b'A') * (1.0 / 24.0) + 0.5 / 24.0;
    } else {
        // Square center.
        lon += 1.0;
        lat += 0.5;
    }

    Some((lat, lon))
}

/// Great-circle distance in kilometers between two grid centers.
/// Returns `None` when either grid is malformed.
pub fn grid_distance_km(a: &str, b: &str) -> Option<f64> {
    let (lat1, lon1) = grid_to_latlon(a)?;
    let (lat2, lon2) = grid_to_latlon(b)?;
    Some(haversine_km(lat1, lon1, lat2, lon2))
}

fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
