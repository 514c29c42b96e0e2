//! Demo entrypoint: runs `optimize` against a small toy instance, then
//! `reoptimize` against a simulated road-closure event, printing the
//! resulting stop order and cost and exporting a run-history CSV.

use std::error::Error;

use colored::*;
use csv::Writer;
use optimile_alns::domain::{Route, Stop};
use optimile_alns::fixtures::toy_instance;
use optimile_alns::service::{self, IncidentInput, OptimizeRequest, ReoptimizeRequest, StopInput};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn stop_to_input(stop: &Stop) -> StopInput {
    StopInput {
        lat: stop.lat,
        lng: stop.lng,
        is_fragile: stop.is_fragile,
        window_start: stop.window.start,
        window_end: stop.window.end,
    }
}

fn print_route(label: &str, stops: &[Stop], cost: f64) {
    println!(
        "{} {}",
        label.bold(),
        format_args!("cost={:.3}", cost).to_string().green()
    );
    for (position, stop) in stops.iter().enumerate() {
        let fragile_marker = if stop.is_fragile { " [fragile]".yellow().to_string() } else { String::new() };
        println!(
            "  {:>2}: ({:.4}, {:.4}){}",
            position, stop.lat, stop.lng, fragile_marker
        );
    }
}

fn write_run_history(rows: &[(&str, usize, f64, bool)], filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filename)?;
    wtr.write_record(["scenario", "stop_count", "cost", "rerouted"])?;
    for (scenario, stop_count, cost, rerouted) in rows {
        wtr.write_record([
            scenario.to_string(),
            stop_count.to_string(),
            cost.to_string(),
            rerouted.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[tokio::main]
#[tracing::instrument(name = "last-mile demo", level = "info")]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE))
        .init();

    let stops = toy_instance();
    info!(stop_count = stops.len(), "running optimize demo");

    let baseline_cost = {
        let distances = optimile_alns::geometry::DistanceCache::build(&stops);
        let route = Route::identity(stops.len());
        let context = optimile_alns::domain::Context {
            vehicle: optimile_alns::domain::VehicleClass::Van,
            traffic: optimile_alns::domain::TrafficLevel::Normal,
            weather: "clear".into(),
            start_minute: 480,
            day_of_week: 0,
            incident: None,
        };
        optimile_alns::evaluation::cost(&route, &stops, &distances, &context)
    };

    let optimize_request = OptimizeRequest {
        stops: stops.iter().map(stop_to_input).collect(),
        vehicle: "van".into(),
        traffic: "Normal".into(),
        weather: "clear".into(),
        start_time: Some(480),
        incidents: None,
        strict: false,
        seed: Some(42),
        iters: Some(400),
    };
    let optimized = service::optimize(optimize_request).await?;
    print_route("optimized route", &optimized.stops, optimized.cost);
    println!("{}", format_args!("identity baseline cost={:.3}", baseline_cost).to_string().dimmed());

    let remaining: Vec<StopInput> = optimized.stops[1..].iter().map(stop_to_input).collect();
    let reoptimize_request = ReoptimizeRequest {
        remaining_stops: remaining,
        current_lat: optimized.stops[0].lat,
        current_lng: optimized.stops[0].lng,
        vehicle: "van".into(),
        traffic: "Normal".into(),
        weather: "rain".into(),
        start_time: Some(500),
        reason: "road_closed".into(),
        severity: Some(1.0),
        incidents: Some(vec![IncidentInput {
            index: 0,
            kind: "road_closed".into(),
            severity: 1.0,
        }]),
        last_reopt_sec: 0.0,
        slack_min: Some(5.0),
        baseline_eta_min: 20.0,
        strict: false,
        seed: Some(7),
        iters: Some(400),
    };
    let reoptimized = service::reoptimize(reoptimize_request).await?;
    print_route("reoptimized suffix", &reoptimized.stops, reoptimized.cost);
    println!(
        "{}",
        format_args!("rerouted={}", reoptimized.rerouted).to_string().cyan()
    );

    write_run_history(
        &[
            ("optimize", optimized.stops.len(), optimized.cost, false),
            (
                "reoptimize",
                reoptimized.stops.len(),
                reoptimized.cost,
                reoptimized.rerouted,
            ),
        ],
        "alns_run_history.csv",
    )?;

    Ok(())
}
