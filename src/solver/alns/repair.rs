//! Repair operators. Each reinserts every removed stop into
//! `remaining` at a position >= 1 (never before the pinned anchor).
//! Insertion-cost candidates for a single removed stop are evaluated in
//! parallel over a rayon thread pool, since each candidate's cost is
//! independent of the others.

use rayon::prelude::*;

use crate::domain::types::{Context, Route, Stop};
use crate::evaluation::CostModel;
use crate::geometry::DistanceCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepairOperator {
    Greedy,
    Regret2,
}

impl RepairOperator {
    pub const ALL: [RepairOperator; 2] = [RepairOperator::Greedy, RepairOperator::Regret2];

    pub fn name(&self) -> &'static str {
        match self {
            RepairOperator::Greedy => "greedy",
            RepairOperator::Regret2 => "regret2",
        }
    }

    pub fn apply(
        &self,
        remaining: Route,
        removed: Vec<usize>,
        stops: &[Stop],
        distances: &DistanceCache,
        context: &Context,
        model: &dyn CostModel,
    ) -> Route {
        match self {
            RepairOperator::Greedy => greedy_repair(remaining, removed, stops, distances, context, model),
            RepairOperator::Regret2 => regret2_repair(remaining, removed, stops, distances, context, model),
        }
    }
}

/// Best insertion position (>= 1) and its resulting route cost, for one
/// removed stop against one current route.
fn best_insertion(
    current: &Route,
    stop: usize,
    stops: &[Stop],
    distances: &DistanceCache,
    context: &Context,
    model: &dyn CostModel,
) -> (usize, f64) {
    let positions: Vec<usize> = (1..=current.order.len()).collect();
    positions
        .par_iter()
        .map(|&pos| {
            let mut order = current.order.clone();
            order.insert(pos, stop);
            let candidate = Route { order };
            (pos, model.cost(&candidate, stops, distances, context))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .unwrap_or((1, f64::INFINITY))
}

fn greedy_repair(
    mut current: Route,
    removed: Vec<usize>,
    stops: &[Stop],
    distances: &DistanceCache,
    context: &Context,
    model: &dyn CostModel,
) -> Route {
    for stop in removed {
        let (pos, _) = best_insertion(&current, stop, stops, distances, context, model);
        current.order.insert(pos, stop);
    }
    current
}

/// Regret-2 insertion: repeatedly inserts the removed stop whose
/// best-vs-second-best insertion-cost gap (its "regret") is largest,
/// breaking ties by lowest stop index.
fn regret2_repair(
    mut current: Route,
    mut removed: Vec<usize>,
    stops: &[Stop],
    distances: &DistanceCache,
    context: &Context,
    model: &dyn CostModel,
) -> Route {
    while !removed.is_empty() {
        let mut best_choice: Option<(usize, usize, usize, f64)> = None; // (removed_idx, stop, pos, regret)

        for (ri, &stop) in removed.iter().enumerate() {
            let positions: Vec<usize> = (1..=current.order.len()).collect();
            let mut costs: Vec<(usize, f64)> = positions
                .par_iter()
                .map(|&pos| {
                    let mut order = current.order.clone();
                    order.insert(pos, stop);
                    let candidate = Route { order };
                    (pos, model.cost(&candidate, stops, distances, context))
                })
                .collect();
            costs.sort_by(|a, b| a.1.total_cmp(&b.1));

            let (best_pos, best_cost) = costs[0];
            let regret = if costs.len() > 1 {
                costs[1].1 - best_cost
            } else {
                best_cost
            };

            let better = match &best_choice {
                None => true,
                Some((_, _, _, cur_regret)) => {
                    regret > *cur_regret || (regret == *cur_regret && stop < best_choice.unwrap().1)
                }
            };
            if better {
                best_choice = Some((ri, stop, best_pos, regret));
            }
        }

        let (ri, stop, pos, _) = best_choice.expect("removed is non-empty");
        current.order.insert(pos, stop);
        removed.remove(ri);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{TimeWindow, TrafficLevel, VehicleClass};
    use crate::evaluation::AnalyticCost;

    fn stops() -> Vec<Stop> {
        vec![
            Stop { lat: 0.0, lng: 0.0, is_fragile: false, window: TimeWindow::OPEN },
            Stop { lat: 0.06, lng: 0.0, is_fragile: false, window: TimeWindow::OPEN },
            Stop { lat: 0.01, lng: 0.0, is_fragile: false, window: TimeWindow::OPEN },
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
    fn greedy_repair_reinserts_all_removed() {
        let remaining = Route { order: vec![0, 3] };
        let removed = vec![1, 2];
        let repaired = greedy_repair(remaining, removed, &stops(), &DistanceCache::build(&stops()), &ctx(), &AnalyticCost);
        assert_eq!(repaired.order.len(), 4);
        assert_eq!(repaired.order[0], 0);
        assert!(repaired.order.contains(&1));
        assert!(repaired.order.contains(&2));
    }

    #[test]
    fn regret2_repair_reinserts_all_removed() {
        let remaining = Route { order: vec![0, 3] };
        let removed = vec![1, 2];
        let repaired = regret2_repair(remaining, removed, &stops(), &DistanceCache::build(&stops()), &ctx(), &AnalyticCost);
        assert_eq!(repaired.order.len(), 4);
        assert_eq!(repaired.order[0], 0);
    }

    #[test]
    fn never_inserts_before_anchor() {
        let remaining = Route { order: vec![0] };
        let removed = vec![1];
        let repaired = greedy_repair(remaining, removed, &stops(), &DistanceCache::build(&stops()), &ctx(), &AnalyticCost);
        assert_eq!(repaired.order[0], 0);
    }
}
