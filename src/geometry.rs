//! Distance and vehicle-speed primitives.
//!
//! Two metrics live here on purpose: Euclidean on raw `(lat, lng)`, which
//! the ALNS core is tuned against, and haversine in kilometres, which the
//! legacy map-provider path used when stops were still postal codes. The
//! core only ever calls [`euclidean`] / [`DistanceCache`]; `haversine_km`
//! is kept as a documented alternate metric.

use crate::domain::types::{Stop, VehicleClass};

pub fn euclidean(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (a.0 - b.0, a.1 - b.1);
    (dx * dx + dy * dy).sqrt()
}

/// Haversine distance in kilometres. Unused by the ALNS core; kept for
/// parity with the legacy distance-matrix providers, which operate in
/// real postal-code geography.
pub fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let (lat1, lat2) = (a.0.to_radians(), b.0.to_radians());
    let dlat = (b.0 - a.0).to_radians();
    let dlng = (b.1 - a.1).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Cruise speed in "degree-equivalents per minute" — chosen so that
/// `distance / speed` produces a time-like value consistent with the
/// minute-denominated time-window arithmetic in [`crate::evaluation::cost`].
pub fn vehicle_speed(class: VehicleClass) -> f64 {
    match class {
        VehicleClass::Motorcycle => 0.9,
        VehicleClass::Scooter => 0.75,
        VehicleClass::Van => 0.6,
        VehicleClass::Unknown => 0.7,
    }
}

/// Symmetric n×n table of pairwise Euclidean distances, computed once per
/// call and never retained across calls — no process-wide cache.
#[derive(Debug, Clone)]
pub struct DistanceCache {
    n: usize,
    table: Vec<f64>,
}

impl DistanceCache {
    pub fn build(stops: &[Stop]) -> Self {
        let n = stops.len();
        let mut table = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = euclidean((stops[i].lat, stops[i].lng), (stops[j].lat, stops[j].lng));
                table[i * n + j] = d;
                table[j * n + i] = d;
            }
        }
        DistanceCache { n, table }
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.n && j < self.n);
        self.table[i * self.n + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_is_symmetric() {
        let a = (1.0, 2.0);
        let b = (4.0, 6.0);
        assert_eq!(euclidean(a, b), euclidean(b, a));
        assert!((euclidean(a, b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn distance_cache_matches_direct_computation() {
        let stops = vec![
            Stop {
                lat: 0.0,
                lng: 0.0,
                is_fragile: false,
                window: Default::default(),
            },
            Stop {
                lat: 0.03,
                lng: 0.0,
                is_fragile: false,
                window: Default::default(),
            },
            Stop {
                lat: 0.0,
                lng: 0.04,
                is_fragile: false,
                window: Default::default(),
            },
        ];
        let cache = DistanceCache::build(&stops);
        for i in 0..stops.len() {
            for j in 0..stops.len() {
                let direct = euclidean((stops[i].lat, stops[i].lng), (stops[j].lat, stops[j].lng));
                assert!((cache.get(i, j) - direct).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn haversine_is_zero_for_identical_points() {
        assert!(haversine_km((1.3, 103.8), (1.3, 103.8)).abs() < 1e-9);
    }

    #[test]
    fn vehicle_speed_ranks_van_slowest() {
        assert!(vehicle_speed(VehicleClass::Van) < vehicle_speed(VehicleClass::Scooter));
        assert!(vehicle_speed(VehicleClass::Scooter) < vehicle_speed(VehicleClass::Motorcycle));
    }

    #[test]
    fn unknown_vehicle_class_defaults_to_documented_speed() {
        assert_eq!(vehicle_speed(VehicleClass::Unknown), 0.7);
    }
}
