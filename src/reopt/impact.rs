//! Impact estimator. Pure function translating an event label and
//! a baseline ETA into an estimated added delay.

use crate::config::constant::{
    IMPACT_ACCIDENT, IMPACT_DEVIATION, IMPACT_ROAD_CLOSED, IMPACT_TRAFFIC_JAM, IMPACT_UNKNOWN,
};

fn factor(event_label: &str) -> f64 {
    match event_label {
        "traffic_jam" => IMPACT_TRAFFIC_JAM,
        "accident" => IMPACT_ACCIDENT,
        "road_closed" => IMPACT_ROAD_CLOSED,
        "deviation" => IMPACT_DEVIATION,
        _ => IMPACT_UNKNOWN,
    }
}

/// Never negative; always 0 when `baseline_eta_min <= 0`.
pub fn estimate_delay(event_label: &str, baseline_eta_min: f64) -> f64 {
    if baseline_eta_min <= 0.0 {
        return 0.0;
    }
    baseline_eta_min * factor(event_label)
}
