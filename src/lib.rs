//! Real-time last-mile route optimizer: an Adaptive Large Neighborhood
//! Search (ALNS) solver and context-aware cost function, wrapped by a
//! thin service layer that validates requests, judges whether a live
//! event is worth re-planning around, and consults a live-traffic
//! provider on the reoptimize path.
//!
//! Module map:
//! - [`domain`] — `Stop`, `Route`, `Context`, `Incident`, and the
//!   enumerated `VehicleClass`/`TrafficLevel`/`IncidentKind` families.
//! - [`geometry`] — distance and vehicle-speed primitives.
//! - [`evaluation`] — the cost function and its `CostModel` seam.
//! - [`solver::alns`] — destroy/repair operators, the adaptive selector,
//!   and the simulated-annealing driver that binds them.
//! - [`reopt`] — the impact estimator, decision gate, and incident
//!   aggregator used on the reoptimize path.
//! - [`provider`] — the live-traffic external collaborator.
//! - [`anomaly_log`] — the append-only NDJSON side channel.
//! - [`service`] — `optimize`/`reoptimize` orchestration and request
//!   response types.

pub mod anomaly_log;
pub mod config;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod geometry;
pub mod provider;
pub mod reopt;
pub mod service;
pub mod solver;
