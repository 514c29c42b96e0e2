pub mod constant {
    /// Default ALNS iteration budget.
    pub(crate) const ITERS: usize = 400;
    /// Default seed used when the caller doesn't supply one.
    pub(crate) const SEED: u64 = 42;
    /// Default number of stops removed per destroy call.
    pub(crate) const DESTROY_K: usize = 2;

    /// Initial temperature as a fraction of the baseline (identity-route) cost.
    pub(crate) const INITIAL_TEMPERATURE_FACTOR: f64 = 0.15;
    /// Temperature decay applied once per iteration.
    pub(crate) const COOLING_RATE: f64 = 0.995;
    /// Floor under the temperature so SA acceptance never divides by zero.
    pub(crate) const TEMPERATURE_FLOOR: f64 = 1e-6;

    /// Selector weight decay applied every iteration. Not batched over
    /// segments — the reward/decay cycle fires once per iteration.
    pub(crate) const SELECTOR_DECAY: f64 = 0.8;
    pub(crate) const SELECTOR_WEIGHT_FLOOR: f64 = 0.1;
    pub(crate) const REWARD_IMPROVING: f64 = 5.0;
    pub(crate) const REWARD_LATERAL: f64 = 1.0;
    pub(crate) const REWARD_NONE: f64 = 0.0;

    /// Cost-function penalty constants.
    pub(crate) const INCIDENT_TRAFFIC_JAM_PER_SEVERITY: f64 = 35.0;
    pub(crate) const INCIDENT_ACCIDENT_PER_SEVERITY: f64 = 60.0;
    pub(crate) const INCIDENT_ROAD_CLOSED_FLAT: f64 = 200.0;
    pub(crate) const WAIT_PENALTY_FACTOR: f64 = 0.2;
    pub(crate) const LATE_PENALTY_FACTOR: f64 = 6.0;
    pub(crate) const FRAGILE_PENALTY_FACTOR: f64 = 2.0;
    pub(crate) const SMOOTHNESS_PENALTY_FACTOR: f64 = 0.3;
    pub(crate) const SHARP_TURN_DEGREES: f64 = 45.0;

    /// Impact estimator factors.
    pub(crate) const IMPACT_TRAFFIC_JAM: f64 = 0.30;
    pub(crate) const IMPACT_ACCIDENT: f64 = 0.50;
    pub(crate) const IMPACT_ROAD_CLOSED: f64 = 0.90;
    pub(crate) const IMPACT_DEVIATION: f64 = 0.40;
    pub(crate) const IMPACT_UNKNOWN: f64 = 0.0;

    /// Live-traffic provider bound.
    pub(crate) const PROVIDER_TIMEOUT_SECS: u64 = 2;
    pub(crate) const PROVIDER_TIMEOUT_MILLIS_EXTRA: u64 = 500;
}
