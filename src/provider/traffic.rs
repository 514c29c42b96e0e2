//! Live-traffic provider: a bounded, best-effort HTTP call to a
//! vendor incident feed along the route's bounding box. Any failure —
//! timeout, transport error, missing credential, malformed body —
//! degrades to an empty incident list rather than propagating.

use std::env;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::config::constant::{PROVIDER_TIMEOUT_MILLIS_EXTRA, PROVIDER_TIMEOUT_SECS};
use crate::domain::types::{Incident, IncidentKind};

#[derive(Debug, Deserialize)]
struct VendorIncident {
    category: String,
    #[serde(default)]
    severity: Option<f64>,
    #[serde(default)]
    nearest_stop_index: Option<usize>,
}

fn map_category(category: &str) -> IncidentKind {
    match category {
        "accident" => IncidentKind::Accident,
        "road_closed" => IncidentKind::RoadClosed,
        _ => IncidentKind::TrafficJam,
    }
}

fn clamp_severity(severity: Option<f64>) -> f64 {
    severity.unwrap_or(0.5).clamp(0.1, 1.0)
}

/// Fetches incidents along a polyline of `(lat, lng)` coordinates.
/// Degrades to `vec![]` on any error or missing `TRAFFIC_PROVIDER_API_KEY`
/// within a short, hard timeout — the reoptimize path must never block
/// on a flaky vendor.
pub async fn fetch_incidents_along_route(coords: &[(f64, f64)]) -> Vec<Incident> {
    if coords.is_empty() {
        return Vec::new();
    }

    let api_key = match env::var("TRAFFIC_PROVIDER_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            warn!("TRAFFIC_PROVIDER_API_KEY not set, degrading to no live incidents");
            return Vec::new();
        }
    };

    let base_url = env::var("TRAFFIC_PROVIDER_BASE_URL")
        .unwrap_or_else(|_| "https://api.tomtom.com/traffic/services/5/incidentDetails".to_string());

    let bbox = bounding_box(coords);
    let url = format!(
        "{}?bbox={},{},{},{}&key={}",
        base_url, bbox.0, bbox.1, bbox.2, bbox.3, api_key
    );

    let timeout = Duration::from_secs(PROVIDER_TIMEOUT_SECS)
        + Duration::from_millis(PROVIDER_TIMEOUT_MILLIS_EXTRA);

    trace!("fetching live incidents from traffic provider");
    let client = Client::new();
    let response = match client.get(&url).timeout(timeout).send().await {
        Ok(resp) if resp.status().is_success() => resp,
        Ok(resp) => {
            warn!(status = %resp.status(), "traffic provider returned non-success status");
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "traffic provider request failed, degrading to no incidents");
            return Vec::new();
        }
    };

    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "traffic provider returned malformed JSON");
            return Vec::new();
        }
    };

    let raw_incidents = match body.get("incidents").and_then(Value::as_array) {
        Some(arr) => arr,
        None => {
            debug!("traffic provider response had no incidents array");
            return Vec::new();
        }
    };

    let incidents: Vec<Incident> = raw_incidents
        .iter()
        .filter_map(|v| serde_json::from_value::<VendorIncident>(v.clone()).ok())
        .map(|vi| Incident {
            index: vi.nearest_stop_index.unwrap_or(1).max(1),
            kind: map_category(&vi.category),
            severity: clamp_severity(vi.severity),
        })
        .collect();

    info!(count = incidents.len(), "fetched live incidents");
    incidents
}

fn bounding_box(coords: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    let (mut min_lat, mut min_lng) = (f64::MAX, f64::MAX);
    let (mut max_lat, mut max_lng) = (f64::MIN, f64::MIN);
    for &(lat, lng) in coords {
        min_lat = min_lat.min(lat);
        min_lng = min_lng.min(lng);
        max_lat = max_lat.max(lat);
        max_lng = max_lng.max(lng);
    }
    (min_lat, min_lng, max_lat, max_lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_categories() {
        assert_eq!(map_category("accident"), IncidentKind::Accident);
        assert_eq!(map_category("road_closed"), IncidentKind::RoadClosed);
        assert_eq!(map_category("jam"), IncidentKind::TrafficJam);
        assert_eq!(map_category("unknown_vendor_label"), IncidentKind::TrafficJam);
    }

    #[test]
    fn severity_is_clamped() {
        assert_eq!(clamp_severity(Some(0.0)), 0.1);
        assert_eq!(clamp_severity(Some(5.0)), 1.0);
        assert_eq!(clamp_severity(None), 0.5);
    }

    #[test]
    fn bounding_box_covers_all_points() {
        let coords = [(1.30, 103.8), (1.35, 103.85), (1.28, 103.9)];
        let (min_lat, min_lng, max_lat, max_lng) = bounding_box(&coords);
        assert_eq!(min_lat, 1.28);
        assert_eq!(max_lat, 1.35);
        assert_eq!(min_lng, 103.8);
        assert_eq!(max_lng, 103.9);
    }

    #[tokio::test]
    async fn degrades_to_empty_without_api_key() {
        std::env::remove_var("TRAFFIC_PROVIDER_API_KEY");
        let incidents = fetch_incidents_along_route(&[(1.3, 103.8), (1.31, 103.81)]).await;
        assert!(incidents.is_empty());
    }

    #[tokio::test]
    async fn empty_coords_short_circuits() {
        let incidents = fetch_incidents_along_route(&[]).await;
        assert!(incidents.is_empty());
    }
}
