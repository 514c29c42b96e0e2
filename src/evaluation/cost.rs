//! Context-aware cost function. Pure: simulates a route left to
//! right with a clock and an accumulator and never mutates its inputs.

use crate::config::constant::{
    FRAGILE_PENALTY_FACTOR, INCIDENT_ACCIDENT_PER_SEVERITY, INCIDENT_ROAD_CLOSED_FLAT,
    INCIDENT_TRAFFIC_JAM_PER_SEVERITY, LATE_PENALTY_FACTOR, SHARP_TURN_DEGREES,
    SMOOTHNESS_PENALTY_FACTOR, WAIT_PENALTY_FACTOR,
};
use crate::domain::types::{Context, IncidentKind, Route, Stop, TrafficLevel};
use crate::geometry::{vehicle_speed, DistanceCache};

fn traffic_multiplier(level: TrafficLevel) -> f64 {
    match level {
        TrafficLevel::Low => 0.9,
        TrafficLevel::Normal => 1.0,
        TrafficLevel::Medium => 1.15,
        TrafficLevel::Heavy => 1.35,
    }
}

/// Angle (degrees) between the heading into `b` and the heading out of
/// `b` towards `c`, given the preceding point `a`. `acos`'s argument is
/// clamped to `[-1, 1]` so floating-point drift never hands back a NaN.
fn turn_angle_degrees(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Option<f64> {
    let v1 = (b.0 - a.0, b.1 - a.1);
    let v2 = (c.0 - b.0, c.1 - b.1);
    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if mag1 <= 0.0 || mag2 <= 0.0 {
        return None;
    }
    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let cos_theta = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos_theta.acos().to_degrees())
}

/// Pluggable cost backend. The ALNS core only ever depends on this
/// trait; [`AnalyticCost`] — the left-to-right simulation below — is its
/// sole production implementor. A future supervised-ETA-regressor backend
/// would slot in here without the driver or operators changing.
pub trait CostModel: Send + Sync {
    fn cost(&self, route: &Route, stops: &[Stop], distances: &DistanceCache, context: &Context) -> f64;
}

/// The analytic, left-to-right simulated cost function. Default
/// and only production [`CostModel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticCost;

impl CostModel for AnalyticCost {
    fn cost(&self, route: &Route, stops: &[Stop], distances: &DistanceCache, context: &Context) -> f64 {
        cost(route, stops, distances, context)
    }
}

/// Walks `route` left to right, accumulating travel time and every
/// penalty, and returns the total. Never returns a non-finite value: a
/// degenerate candidate is mapped to `f64::INFINITY` so the ALNS
/// acceptance logic always has a well-ordered value to compare against.
pub fn cost(
    route: &Route,
    stops: &[Stop],
    distances: &DistanceCache,
    context: &Context,
) -> f64 {
    let raw = cost_inner(route, stops, distances, context);
    if raw.is_finite() {
        raw
    } else {
        f64::INFINITY
    }
}

fn cost_inner(route: &Route, stops: &[Stop], distances: &DistanceCache, context: &Context) -> f64 {
    let order = &route.order;
    if order.len() < 2 {
        return 0.0;
    }

    let speed = vehicle_speed(context.vehicle);
    let multiplier = traffic_multiplier(context.traffic);

    let mut t = context.start_minute as f64;
    let mut total = 0.0;

    for i in 0..order.len() - 1 {
        let (from, to) = (order[i], order[i + 1]);
        let leg = distances.get(from, to);
        let travel = if speed > 0.0 {
            (leg / speed) * multiplier
        } else {
            0.0
        };
        t += travel;
        total += travel;

        if let Some(incident) = context.incident {
            if incident.index == to {
                total += match incident.kind {
                    IncidentKind::TrafficJam => {
                        incident.severity * INCIDENT_TRAFFIC_JAM_PER_SEVERITY
                    }
                    IncidentKind::Accident => incident.severity * INCIDENT_ACCIDENT_PER_SEVERITY,
                    IncidentKind::RoadClosed => INCIDENT_ROAD_CLOSED_FLAT,
                };
            }
        }

        let window = stops[to].window;
        if let Some(start) = window.start {
            let start = start as f64;
            if t < start {
                total += WAIT_PENALTY_FACTOR * (start - t);
                t = start;
            }
        }
        if let Some(end) = window.end {
            let end = end as f64;
            if t > end {
                total += LATE_PENALTY_FACTOR * (t - end);
            }
        }

        if stops[to].is_fragile {
            total += FRAGILE_PENALTY_FACTOR * travel;
        }

        if i >= 2 {
            let a = (stops[order[i - 1]].lat, stops[order[i - 1]].lng);
            let b = (stops[from].lat, stops[from].lng);
            let c = (stops[to].lat, stops[to].lng);
            if let Some(angle) = turn_angle_degrees(a, b, c) {
                if angle < SHARP_TURN_DEGREES {
                    total += SMOOTHNESS_PENALTY_FACTOR * leg;
                }
            }
        }
    }

    total
}
