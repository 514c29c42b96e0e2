//! Synthetic stop generation for the demo binary and for tests, using the
//! same ChaCha8Rng-seeded random generation as the rest of the crate.
//! `toy_instance` is a small fixed instance used by several unit tests.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::domain::types::{Stop, TimeWindow};

/// A small fixed four-stop instance with a near stop and a far stop,
/// used by several unit tests that check ordering and penalty behavior.
pub fn toy_instance() -> Vec<Stop> {
    vec![
        Stop { lat: 0.0, lng: 0.0, is_fragile: false, window: TimeWindow { start: Some(480), end: Some(1320) } },
        Stop { lat: 0.06, lng: 0.0, is_fragile: false, window: TimeWindow { start: Some(480), end: Some(1320) } },
        Stop { lat: 0.01, lng: 0.0, is_fragile: false, window: TimeWindow { start: Some(480), end: Some(1320) } },
        Stop { lat: 0.02, lng: 0.01, is_fragile: false, window: TimeWindow { start: Some(480), end: Some(1320) } },
    ]
}

/// A random collection of `n` stops (plus the anchor at the origin)
/// within a small lat/lng box around the anchor, with open time windows
/// and a small fraction marked fragile. Seeded for reproducibility.
pub fn random_instance(n: usize, rng: &mut ChaCha8Rng) -> Vec<Stop> {
    let mut stops = Vec::with_capacity(n + 1);
    stops.push(Stop {
        lat: 0.0,
        lng: 0.0,
        is_fragile: false,
        window: TimeWindow::OPEN,
    });
    for _ in 0..n {
        let lat = rng.gen_range(-0.1..0.1);
        let lng = rng.gen_range(-0.1..0.1);
        let is_fragile = rng.gen_bool(0.2);
        let window = if rng.gen_bool(0.5) {
            let start = rng.gen_range(480..900);
            TimeWindow {
                start: Some(start),
                end: Some(start + rng.gen_range(60..240)),
            }
        } else {
            TimeWindow::OPEN
        };
        stops.push(Stop { lat, lng, is_fragile, window });
    }
    stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn toy_instance_has_four_stops() {
        assert_eq!(toy_instance().len(), 4);
    }

    #[test]
    fn random_instance_always_anchors_at_origin() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let stops = random_instance(10, &mut rng);
        assert_eq!(stops.len(), 11);
        assert_eq!((stops[0].lat, stops[0].lng), (0.0, 0.0));
    }

    #[test]
    fn random_instance_is_deterministic_for_fixed_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        let sa = random_instance(5, &mut a);
        let sb = random_instance(5, &mut b);
        for (x, y) in sa.iter().zip(sb.iter()) {
            assert_eq!(x.lat, y.lat);
            assert_eq!(x.lng, y.lng);
        }
    }
}
