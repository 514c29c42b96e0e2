//! Thin orchestration layer: validates a request, resolves incidents
//! (consulting the live-traffic provider on the reoptimize path), decides
//! whether a reoptimize is worth running, and hands the resolved context
//! to the ALNS driver.
//!
//! No transport is wired up here — these are plain, `serde`-derived
//! in-process request/response types for callers and tests.

use std::str::FromStr;
use std::sync::atomic::AtomicBool;

use chrono::{Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, span, warn, Level};

use crate::domain::types::{
    Context, Incident, IncidentKind, Route, Stop, TimeWindow, TrafficLevel, VehicleClass,
};
use crate::error::{OptimizerError, ValidationError};
use crate::evaluation::cost as cost_fn;
use crate::geometry::DistanceCache;
use crate::provider;
use crate::reopt::{aggregate_incidents, estimate_delay, should_reoptimize};
use crate::solver::alns::{optimize_route, AlnsConfig};

/// Logical wire shape for one stop in a request. `window_start`/
/// `window_end` are minutes-since-midnight; either may be absent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StopInput {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub is_fragile: bool,
    #[serde(default)]
    pub window_start: Option<i64>,
    #[serde(default)]
    pub window_end: Option<i64>,
}

impl From<StopInput> for Stop {
    fn from(input: StopInput) -> Self {
        Stop {
            lat: input.lat,
            lng: input.lng,
            is_fragile: input.is_fragile,
            window: TimeWindow {
                start: input.window_start,
                end: input.window_end,
            },
        }
    }
}

/// Logical wire shape for one explicit incident in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentInput {
    pub index: usize,
    pub kind: String,
    pub severity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub stops: Vec<StopInput>,
    pub vehicle: String,
    pub traffic: String,
    pub weather: String,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub incidents: Option<Vec<IncidentInput>>,
    /// When `false` (the default), an unrecognized vehicle/traffic label
    /// degrades to its documented default instead of erroring.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub iters: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReoptimizeRequest {
    /// Stops still to be visited, in their current planned order, not
    /// including the driver's current position.
    pub remaining_stops: Vec<StopInput>,
    pub current_lat: f64,
    pub current_lng: f64,
    pub vehicle: String,
    pub traffic: String,
    pub weather: String,
    #[serde(default)]
    pub start_time: Option<i64>,
    /// High-level event label, e.g. "traffic_jam", "accident",
    /// "road_closed", "deviation".
    pub reason: String,
    #[serde(default)]
    pub severity: Option<f64>,
    /// Explicit incidents, indexed relative to `remaining_stops`.
    #[serde(default)]
    pub incidents: Option<Vec<IncidentInput>>,
    /// Seconds since the last time this route was reoptimized.
    pub last_reopt_sec: f64,
    /// Minutes until the next stop's time window binds; used by the
    /// decision gate. `None` means no window constrains it.
    #[serde(default)]
    pub slack_min: Option<f64>,
    /// Estimated minutes of ETA the event is measured against.
    pub baseline_eta_min: f64,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub iters: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizeResponse {
    pub stops: Vec<Stop>,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReoptimizeResponse {
    pub stops: Vec<Stop>,
    pub cost: f64,
    /// Whether the decision gate actually triggered a re-plan. `false`
    /// means `stops` is `remaining_stops` unchanged.
    pub rerouted: bool,
}

/// Parses a vehicle-class label. Outside strict mode, an unrecognized
/// label degrades to [`VehicleClass::Unknown`] (whose cruise speed is
/// documented alongside the other vehicle classes) rather than erroring.
pub fn parse_vehicle(label: &str, strict: bool) -> Result<VehicleClass, ValidationError> {
    match VehicleClass::from_str(label) {
        Ok(class) => Ok(class),
        Err(err) if strict => Err(err),
        Err(_) => {
            warn!(label, "unrecognized vehicle class, defaulting");
            Ok(VehicleClass::Unknown)
        }
    }
}

/// Parses a traffic-level label. Outside strict mode, an unrecognized
/// label degrades to `Normal` (whose multiplier, 1.0, is the cost
/// function's documented default) rather than erroring.
pub fn parse_traffic(label: &str, strict: bool) -> Result<TrafficLevel, ValidationError> {
    match TrafficLevel::from_str(label) {
        Ok(level) => Ok(level),
        Err(err) if strict => Err(err),
        Err(_) => {
            warn!(label, "unrecognized traffic level, defaulting to normal");
            Ok(TrafficLevel::Normal)
        }
    }
}

fn now_minute_of_day() -> i64 {
    let now = Utc::now();
    (now.hour() * 60 + now.minute()) as i64
}

fn now_day_of_week() -> u8 {
    Utc::now().weekday().num_days_from_monday() as u8
}

fn validate_stops(stops: &[Stop]) -> Result<(), ValidationError> {
    if stops.len() < 2 {
        return Err(ValidationError::TooFewStops(stops.len()));
    }
    for (index, stop) in stops.iter().enumerate() {
        stop.window.validate(index)?;
    }
    Ok(())
}

fn parse_explicit_incidents(
    inputs: &[IncidentInput],
    n: usize,
) -> Result<Vec<Incident>, ValidationError> {
    inputs
        .iter()
        .map(|input| {
            if input.index >= n {
                return Err(ValidationError::IncidentOutOfRange {
                    index: input.index,
                    len: n,
                });
            }
            let kind = IncidentKind::parse(&input.kind)
                .ok_or_else(|| ValidationError::UnknownIncidentKind(input.kind.clone()))?;
            Ok(Incident {
                index: input.index,
                kind,
                severity: input.severity,
            })
        })
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Plans an initial stop ordering for `request`.
#[instrument(name = "optimize", skip(request))]
pub async fn optimize(request: OptimizeRequest) -> Result<OptimizeResponse, OptimizerError> {
    let setup_span = span!(Level::DEBUG, "setup");
    let (stops, context, config) = {
        let _guard = setup_span.enter();

        let stops: Vec<Stop> = request.stops.into_iter().map(Stop::from).collect();
        validate_stops(&stops)?;

        let vehicle = parse_vehicle(&request.vehicle, request.strict)?;
        let traffic = parse_traffic(&request.traffic, request.strict)?;

        let explicit = request
            .incidents
            .map(|inputs| parse_explicit_incidents(&inputs, stops.len()))
            .transpose()?
            .unwrap_or_default();
        let incident = aggregate_incidents(&[], &explicit, "", None);

        let context = Context {
            vehicle,
            traffic,
            weather: request.weather,
            start_minute: request.start_time.unwrap_or_else(now_minute_of_day),
            day_of_week: now_day_of_week(),
            incident,
        };

        let config = AlnsConfig {
            seed: request.seed.unwrap_or(AlnsConfig::default().seed),
            iters: request.iters.unwrap_or(AlnsConfig::default().iters),
            ..AlnsConfig::default()
        };

        (stops, context, config)
    };

    let stops_for_search = stops.clone();
    let context_for_search = context.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        optimize_route(&stops_for_search, &context_for_search, config, None)
    })
    .await
    .expect("ALNS search task panicked");

    info!(cost = outcome.cost, "optimize complete");

    let ordered = outcome.route.order.iter().map(|&i| stops[i]).collect();
    Ok(OptimizeResponse {
        stops: ordered,
        cost: round3(outcome.cost),
    })
}

/// Re-plans the remaining suffix of a route in response to a live event.
/// Consults the decision gate before ever running ALNS:
/// an immaterial delay short-circuits to the unchanged remaining stops.
#[instrument(name = "reoptimize", skip(request))]
pub async fn reoptimize(
    request: ReoptimizeRequest,
) -> Result<ReoptimizeResponse, OptimizerError> {
    let remaining: Vec<Stop> = request
        .remaining_stops
        .iter()
        .copied()
        .map(Stop::from)
        .collect();
    if remaining.is_empty() {
        return Err(OptimizerError::Validation(ValidationError::TooFewStops(1)));
    }

    let driver_stop = Stop {
        lat: request.current_lat,
        lng: request.current_lng,
        is_fragile: false,
        window: TimeWindow::OPEN,
    };
    let mut stops = Vec::with_capacity(remaining.len() + 1);
    stops.push(driver_stop);
    stops.extend(remaining.iter().copied());
    validate_stops(&stops)?;

    let vehicle = parse_vehicle(&request.vehicle, request.strict)?;
    let traffic = parse_traffic(&request.traffic, request.strict)?;

    let explicit = request
        .incidents
        .map(|inputs| parse_explicit_incidents(&inputs, remaining.len()))
        .transpose()?
        .unwrap_or_default();

    let live = match tokio::time::timeout(
        std::time::Duration::from_millis(2_500),
        provider::fetch_incidents_along_route(
            &stops.iter().map(|s| (s.lat, s.lng)).collect::<Vec<_>>(),
        ),
    )
    .await
    {
        Ok(incidents) => incidents,
        Err(_) => {
            warn!("live-traffic provider timed out, degrading to caller-supplied incidents");
            Vec::new()
        }
    };

    let incident = aggregate_incidents(&explicit, &live, &request.reason, request.severity);

    let start_minute = request.start_time.unwrap_or_else(now_minute_of_day);
    let delay = estimate_delay(&request.reason, request.baseline_eta_min);
    let next_stop_fragile = remaining[0].is_fragile;
    let slack_min = request.slack_min.unwrap_or_else(|| match remaining[0].window.end {
        Some(end) => ((end - start_minute) as f64).max(0.0),
        None => f64::MAX,
    });

    let decide = should_reoptimize(delay, next_stop_fragile, slack_min, request.last_reopt_sec);

    if !decide {
        info!(delay, "decision gate declined to reoptimize");
        let distances = DistanceCache::build(&stops);
        let identity = Route::identity(stops.len());
        let context = Context {
            vehicle,
            traffic,
            weather: request.weather,
            start_minute,
            day_of_week: now_day_of_week(),
            incident,
        };
        let cost = cost_fn(&identity, &stops, &distances, &context);
        return Ok(ReoptimizeResponse {
            stops: remaining,
            cost: round3(cost),
            rerouted: false,
        });
    }

    crate::anomaly_log::AnomalyLog::from_env().append(&request.reason, delay, true);

    let context = Context {
        vehicle,
        traffic,
        weather: request.weather,
        start_minute,
        day_of_week: now_day_of_week(),
        incident,
    };
    let config = AlnsConfig {
        seed: request.seed.unwrap_or(AlnsConfig::default().seed),
        iters: request.iters.unwrap_or(AlnsConfig::default().iters),
        ..AlnsConfig::default()
    };

    let stops_for_search = stops.clone();
    let context_for_search = context.clone();
    let cancel = AtomicBool::new(false);
    let outcome = tokio::task::spawn_blocking(move || {
        optimize_route(&stops_for_search, &context_for_search, config, Some(&cancel))
    })
    .await
    .expect("ALNS search task panicked");

    info!(cost = outcome.cost, "reoptimize complete");

    let ordered: Vec<Stop> = outcome.route.order[1..].iter().map(|&i| stops[i]).collect();
    Ok(ReoptimizeResponse {
        stops: ordered,
        cost: round3(outcome.cost),
        rerouted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_input(lat: f64, lng: f64) -> StopInput {
        StopInput {
            lat,
            lng,
            is_fragile: false,
            window_start: Some(480),
            window_end: Some(1320),
        }
    }

    #[tokio::test]
    async fn optimize_rejects_too_few_stops() {
        let request = OptimizeRequest {
            stops: vec![stop_input(0.0, 0.0)],
            vehicle: "van".into(),
            traffic: "Normal".into(),
            weather: "clear".into(),
            start_time: Some(480),
            incidents: None,
            strict: false,
            seed: Some(42),
            iters: Some(50),
        };
        let result = optimize(request).await;
        assert!(matches!(
            result,
            Err(OptimizerError::Validation(ValidationError::TooFewStops(1)))
        ));
    }

    #[tokio::test]
    async fn optimize_anchors_first_stop_at_the_origin() {
        let request = OptimizeRequest {
            stops: vec![
                stop_input(0.0, 0.0),
                stop_input(0.06, 0.0),
                stop_input(0.01, 0.0),
                stop_input(0.02, 0.01),
            ],
            vehicle: "van".into(),
            traffic: "Normal".into(),
            weather: "clear".into(),
            start_time: Some(480),
            incidents: None,
            strict: false,
            seed: Some(42),
            iters: Some(400),
        };
        let response = optimize(request).await.expect("optimize succeeds");
        assert_eq!(response.stops.len(), 4);
        assert_eq!((response.stops[0].lat, response.stops[0].lng), (0.0, 0.0));
    }

    #[tokio::test]
    async fn unknown_vehicle_defaults_outside_strict_mode() {
        let request = OptimizeRequest {
            stops: vec![stop_input(0.0, 0.0), stop_input(0.01, 0.0)],
            vehicle: "spaceship".into(),
            traffic: "Normal".into(),
            weather: "clear".into(),
            start_time: Some(480),
            incidents: None,
            strict: false,
            seed: Some(1),
            iters: Some(20),
        };
        assert!(optimize(request).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_vehicle_errors_in_strict_mode() {
        let request = OptimizeRequest {
            stops: vec![stop_input(0.0, 0.0), stop_input(0.01, 0.0)],
            vehicle: "spaceship".into(),
            traffic: "Normal".into(),
            weather: "clear".into(),
            start_time: Some(480),
            incidents: None,
            strict: true,
            seed: Some(1),
            iters: Some(20),
        };
        assert!(matches!(
            optimize(request).await,
            Err(OptimizerError::Validation(ValidationError::UnknownVehicle(_)))
        ));
    }

    #[tokio::test]
    async fn reoptimize_skips_alns_when_delay_is_immaterial() {
        let request = ReoptimizeRequest {
            remaining_stops: vec![stop_input(0.01, 0.0), stop_input(0.02, 0.01)],
            current_lat: 0.0,
            current_lng: 0.0,
            vehicle: "van".into(),
            traffic: "Normal".into(),
            weather: "clear".into(),
            start_time: Some(480),
            reason: "unknown".into(),
            severity: None,
            incidents: None,
            last_reopt_sec: 600.0,
            slack_min: Some(60.0),
            baseline_eta_min: 20.0,
            strict: false,
            seed: Some(1),
            iters: Some(50),
        };
        let response = reoptimize(request).await.expect("reoptimize succeeds");
        assert!(!response.rerouted);
        assert_eq!(response.stops.len(), 2);
    }

    #[tokio::test]
    async fn reoptimize_rejects_empty_remaining_stops() {
        let request = ReoptimizeRequest {
            remaining_stops: vec![],
            current_lat: 0.0,
            current_lng: 0.0,
            vehicle: "van".into(),
            traffic: "Normal".into(),
            weather: "clear".into(),
            start_time: Some(480),
            reason: "traffic_jam".into(),
            severity: Some(0.8),
            incidents: None,
            last_reopt_sec: 0.0,
            slack_min: None,
            baseline_eta_min: 20.0,
            strict: false,
            seed: Some(1),
            iters: Some(50),
        };
        assert!(reoptimize(request).await.is_err());
    }
}
