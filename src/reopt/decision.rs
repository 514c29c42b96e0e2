//! Decision gate: should a live event trigger a reoptimization?
//!
//! Two threshold rules are implemented: a flat `delay >= 1 minute` rule
//! and a slack-scaled "explainable" rule. The service layer wires up the
//! explainable variant; the flat variant is kept alongside it for
//! comparison but is not called from [`crate::service`].

/// Explainable, slack-scaled threshold. Always `false` when `delay <= 0`.
pub fn should_reoptimize(
    delay_min: f64,
    next_stop_fragile: bool,
    slack_min: f64,
    last_reopt_sec: f64,
) -> bool {
    if delay_min <= 0.0 {
        return false;
    }
    let threshold = if next_stop_fragile {
        0.5 * slack_min
    } else {
        slack_min
    };
    let adjusted = (last_reopt_sec / 60.0)
        .min(threshold)
        .max(0.5 * threshold);
    delay_min >= adjusted
}

/// Flat threshold: reoptimize whenever `delay_min >= 1.0`. Unused by the
/// service layer; kept as an alternate, simpler rule.
pub fn should_reoptimize_flat(delay_min: f64) -> bool {
    delay_min >= 1.0
}
