//! ALNS outer loop: simulated-annealing acceptance binding the
//! destroy/repair operators through their adaptive selectors.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, span, Level};

use crate::config::constant::{
    COOLING_RATE, DESTROY_K, INITIAL_TEMPERATURE_FACTOR, ITERS, TEMPERATURE_FLOOR,
};
use crate::domain::types::{Context, Route, Stop};
use crate::evaluation::{AnalyticCost, CostModel};
use crate::geometry::DistanceCache;

use super::destroy::DestroyOperator;
use super::repair::RepairOperator;
use super::selector::AdaptiveSelector;

#[derive(Debug, Clone, Copy)]
pub struct AlnsConfig {
    pub iters: usize,
    pub seed: u64,
    pub destroy_k: usize,
}

impl Default for AlnsConfig {
    fn default() -> Self {
        AlnsConfig {
            iters: ITERS,
            seed: crate::config::constant::SEED,
            destroy_k: DESTROY_K,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlnsOutcome {
    pub route: Route,
    pub cost: f64,
}

/// Runs the ALNS search against the default analytic cost backend. See
/// [`optimize_route_with_model`] for the pluggable-cost-backend entry
/// point.
pub fn optimize_route(
    stops: &[Stop],
    context: &Context,
    config: AlnsConfig,
    cancel: Option<&AtomicBool>,
) -> AlnsOutcome {
    optimize_route_with_model(stops, context, config, cancel, &AnalyticCost)
}

/// Runs the ALNS search. `cancel`, when provided, is checked once per
/// outer iteration; a cancellation request returns the current best
/// immediately, exactly like a normal budget-exhausted termination (not
/// an error). `model` is the pluggable cost backend; the analytic cost
/// function is the only production implementor today.
pub fn optimize_route_with_model(
    stops: &[Stop],
    context: &Context,
    config: AlnsConfig,
    cancel: Option<&AtomicBool>,
    model: &dyn CostModel,
) -> AlnsOutcome {
    let loop_span = span!(Level::INFO, "main_search_loop", total_iterations = config.iters);
    let _loop_guard = loop_span.enter();

    let distances = DistanceCache::build(stops);
    let mut best = Route::identity(stops.len());
    let mut best_cost = model.cost(&best, stops, &distances, context);
    let mut temperature = (INITIAL_TEMPERATURE_FACTOR * best_cost).max(TEMPERATURE_FLOOR);

    info!(baseline_cost = best_cost, "starting ALNS search");

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut destroy_selector = AdaptiveSelector::new(&DestroyOperator::ALL);
    let mut repair_selector = AdaptiveSelector::new(&RepairOperator::ALL);

    let mut iterations_run = 0;
    for iteration in 0..config.iters {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                info!(iteration, "ALNS search cancelled");
                break;
            }
        }
        iterations_run = iteration + 1;

        let iter_span = span!(Level::DEBUG, "iteration", iter = iteration);
        let _iter_guard = iter_span.enter();

        let destroy_op = destroy_selector.select(&mut rng);
        let repair_op = repair_selector.select(&mut rng);

        let (remaining, removed) = destroy_op.apply(
            &best,
            stops,
            &distances,
            context,
            config.destroy_k,
            &mut rng,
            model,
        );
        let candidate = repair_op.apply(remaining, removed, stops, &distances, context, model);
        let candidate_cost = model.cost(&candidate, stops, &distances, context);

        let delta = candidate_cost - best_cost;
        let accept = delta < 0.0
            || rng.gen::<f64>() < (-delta / temperature.max(TEMPERATURE_FLOOR)).exp();

        if accept {
            debug!(iteration, delta, "accepted candidate");
            best = candidate;
            best_cost += delta;
        }

        destroy_selector.reward(destroy_op, delta);
        repair_selector.reward(repair_op, delta);
        destroy_selector.update();
        repair_selector.update();

        temperature *= COOLING_RATE;
    }

    info!(iterations_run, best_cost, "ALNS search complete");

    AlnsOutcome {
        route: best,
        cost: best_cost,
    }
}
