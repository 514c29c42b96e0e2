//! Destroy operators. Every operator preserves the pinned anchor
//! at `route.order[0]` and returns `(remaining, removed)` such that
//! `remaining` still starts with the anchor and
//! `remaining ∪ removed == route.order`.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::domain::types::{Route, Stop};
use crate::evaluation::CostModel;
use crate::geometry::DistanceCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestroyOperator {
    Random,
    Fragile,
    Worst,
}

impl DestroyOperator {
    pub const ALL: [DestroyOperator; 3] = [
        DestroyOperator::Random,
        DestroyOperator::Fragile,
        DestroyOperator::Worst,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DestroyOperator::Random => "random",
            DestroyOperator::Fragile => "fragile",
            DestroyOperator::Worst => "worst",
        }
    }

    /// Applies this operator to `route`, removing up to `k` stops
    /// (fewer if the route's non-anchor suffix is smaller than `k`).
    pub fn apply(
        &self,
        route: &Route,
        stops: &[Stop],
        distances: &DistanceCache,
        context: &crate::domain::types::Context,
        k: usize,
        rng: &mut ChaCha8Rng,
        model: &dyn CostModel,
    ) -> (Route, Vec<usize>) {
        match self {
            DestroyOperator::Random => random_destroy(route, k, rng),
            DestroyOperator::Fragile => fragile_destroy(route, stops, k, rng),
            DestroyOperator::Worst => worst_destroy(route, stops, distances, context, model),
        }
    }
}

fn split_out(route: &Route, positions: &[usize]) -> (Route, Vec<usize>) {
    let mut removed = Vec::with_capacity(positions.len());
    let mut remaining = Vec::with_capacity(route.order.len() - positions.len());
    for (i, &stop) in route.order.iter().enumerate() {
        if positions.contains(&i) {
            removed.push(stop);
        } else {
            remaining.push(stop);
        }
    }
    (Route { order: remaining }, removed)
}

fn random_destroy(route: &Route, k: usize, rng: &mut ChaCha8Rng) -> (Route, Vec<usize>) {
    let n = route.order.len();
    let k = k.min(n.saturating_sub(1));
    let positions: Vec<usize> = (1..n).collect();
    let chosen: Vec<usize> = positions
        .choose_multiple(rng, k)
        .copied()
        .collect();
    split_out(route, &chosen)
}

fn fragile_destroy(route: &Route, stops: &[Stop], k: usize, rng: &mut ChaCha8Rng) -> (Route, Vec<usize>) {
    let n = route.order.len();
    let fragile_positions: Vec<usize> = (1..n)
        .filter(|&i| stops[route.order[i]].is_fragile)
        .collect();
    if fragile_positions.is_empty() {
        return random_destroy(route, k, rng);
    }
    let k = k.min(fragile_positions.len());
    let chosen: Vec<usize> = fragile_positions
        .choose_multiple(rng, k)
        .copied()
        .collect();
    split_out(route, &chosen)
}

/// Removes the single stop whose prefix cost (cost of the route truncated
/// right after it) is maximal. Ties broken by lowest index. This is a
/// coarse proxy for "biggest contributor", not a true removal-gain
/// computation.
fn worst_destroy(
    route: &Route,
    stops: &[Stop],
    distances: &DistanceCache,
    context: &crate::domain::types::Context,
    model: &dyn CostModel,
) -> (Route, Vec<usize>) {
    let n = route.order.len();
    if n < 2 {
        return (route.clone(), Vec::new());
    }

    let mut worst_position = 1;
    let mut worst_prefix_cost = f64::NEG_INFINITY;
    for i in 1..n {
        let prefix = Route {
            order: route.order[..=i].to_vec(),
        };
        let prefix_cost = model.cost(&prefix, stops, distances, context);
        if prefix_cost > worst_prefix_cost {
            worst_prefix_cost = prefix_cost;
            worst_position = i;
        }
    }

    split_out(route, &[worst_position])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Context, TimeWindow, TrafficLevel, VehicleClass};
    use crate::evaluation::AnalyticCost;
    use rand::SeedableRng;

    fn stops() -> Vec<Stop> {
        vec![
            Stop { lat: 0.0, lng: 0.0, is_fragile: false, window: TimeWindow::OPEN },
            Stop { lat: 0.06, lng: 0.0, is_fragile: false, window: TimeWindow::OPEN },
            Stop { lat: 0.01, lng: 0.0, is_fragile: true, window: TimeWindow::OPEN },
            Stop { lat: 0.02, lng: 0.01, is_fragile: false, window: TimeWindow::OPEN },
        ]
    }

    fn ctx() -> Context {
        Context {
            vehicle: VehicleClass::Van,
            traffic: TrafficLevel::Normal,
            weather: "clear".into(),
            start_minute: 480,
            day_of_week: 0,
            incident: None,
        }
    }

    #[test]
    fn random_destroy_never_removes_anchor() {
        let route = Route::identity(4);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (remaining, removed) = DestroyOperator::Random.apply(
            &route,
            &stops(),
            &DistanceCache::build(&stops()),
            &ctx(),
            2,
            &mut rng,
            &AnalyticCost,
        );
        assert_eq!(remaining.order[0], 0);
        assert_eq!(remaining.order.len() + removed.len(), 4);
        assert!(!removed.contains(&0));
    }

    #[test]
    fn fragile_destroy_picks_fragile_stops() {
        let route = Route::identity(4);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (_remaining, removed) = DestroyOperator::Fragile.apply(
            &route,
            &stops(),
            &DistanceCache::build(&stops()),
            &ctx(),
            1,
            &mut rng,
            &AnalyticCost,
        );
        assert_eq!(removed, vec![2]);
    }

    #[test]
    fn fragile_destroy_falls_back_to_random_when_none_fragile() {
        let mut plain = stops();
        plain[2].is_fragile = false;
        let route = Route::identity(4);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (remaining, removed) = DestroyOperator::Fragile.apply(
            &route,
            &plain,
            &DistanceCache::build(&plain),
            &ctx(),
            2,
            &mut rng,
            &AnalyticCost,
        );
        assert_eq!(remaining.order.len() + removed.len(), 4);
    }

    #[test]
    fn worst_destroy_preserves_anchor_and_removes_one() {
        let route = Route::identity(4);
        let (remaining, removed) = DestroyOperator::Worst.apply(
            &route,
            &stops(),
            &DistanceCache::build(&stops()),
            &ctx(),
            2,
            &mut ChaCha8Rng::seed_from_u64(1),
            &AnalyticCost,
        );
        assert_eq!(removed.len(), 1);
        assert_eq!(remaining.order[0], 0);
        assert!(!removed.contains(&0));
    }
}
