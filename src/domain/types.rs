use serde::{Deserialize, Serialize};

/// A single delivery stop. `lat`/`lng` are plain coordinates — the ALNS
/// core treats them as points in a Euclidean plane; no geocoding
/// or road-graph snapping happens here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub is_fragile: bool,
    #[serde(default)]
    pub window: TimeWindow,
}

/// Minute-of-day time window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl TimeWindow {
    pub const OPEN: TimeWindow = TimeWindow {
        start: None,
        end: None,
    };

    /// Validates the invariant that if both bounds are present,
    /// `start <= end`, and each bound lies in `[0, 1440)`.
    pub fn validate(&self, index: usize) -> Result<(), crate::error::ValidationError> {
        use crate::error::ValidationError;
        for minute in [self.start, self.end].into_iter().flatten() {
            if !(0..1440).contains(&minute) {
                return Err(ValidationError::WindowOutOfRange { index, minute });
            }
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(ValidationError::InvertedWindow { index, start, end });
            }
        }
        Ok(())
    }
}

/// Vehicle cruise class. Drives [`crate::geometry::vehicle_speed`].
/// `Unknown` is never produced by strict parsing (see
/// [`VehicleClass::from_str`]) — it is the documented fallback the
/// service layer substitutes when strict mode is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Motorcycle,
    Scooter,
    Van,
    Unknown,
}

impl std::str::FromStr for VehicleClass {
    type Err = crate::error::ValidationError;

    /// Strict: recognizes only the three named classes. Callers that want
    /// the documented unknown-class default should use
    /// `crate::service::parse_vehicle` instead, which falls back to
    /// [`VehicleClass::Unknown`] outside strict mode.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "motorcycle" => Ok(VehicleClass::Motorcycle),
            "scooter" => Ok(VehicleClass::Scooter),
            "van" => Ok(VehicleClass::Van),
            other => Err(crate::error::ValidationError::UnknownVehicle(
                other.to_string(),
            )),
        }
    }
}

/// Qualitative traffic level. Drives the travel-time multiplier in the
/// cost function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficLevel {
    Low,
    Normal,
    Medium,
    Heavy,
}

impl std::str::FromStr for TrafficLevel {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(TrafficLevel::Low),
            "normal" => Ok(TrafficLevel::Normal),
            "medium" => Ok(TrafficLevel::Medium),
            "heavy" => Ok(TrafficLevel::Heavy),
            other => Err(crate::error::ValidationError::UnknownTrafficLevel(
                other.to_string(),
            )),
        }
    }
}

/// Kind of live disruption. `severity` is expected in `[0, 1]` for
/// provider-sourced incidents but is not clamped here — clamping to
/// `[0.1, 1.0]` is a provider-boundary contract, not a core invariant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    TrafficJam,
    Accident,
    RoadClosed,
}

impl IncidentKind {
    /// Parses the free-text `reason`/vendor category strings used at the
    /// service boundary. Returns `None` for anything unrecognized.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "traffic_jam" => Some(IncidentKind::TrafficJam),
            "accident" => Some(IncidentKind::Accident),
            "road_closed" => Some(IncidentKind::RoadClosed),
            _ => None,
        }
    }
}

/// A live disruption tied to a downstream stop index in the *current*
/// route frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub index: usize,
    pub kind: IncidentKind,
    pub severity: f64,
}

/// Environmental parameters for one optimize/reoptimize call.
#[derive(Debug, Clone)]
pub struct Context {
    pub vehicle: VehicleClass,
    pub traffic: TrafficLevel,
    pub weather: String,
    pub start_minute: i64,
    pub day_of_week: u8,
    pub incident: Option<Incident>,
}

/// An ordered permutation of stop indices. `order[0]` is the pinned
/// anchor (depot or current driver position) — no destroy/repair
/// operator may displace it.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub order: Vec<usize>,
}

impl Route {
    pub fn identity(n: usize) -> Self {
        Route {
            order: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The non-anchor suffix, i.e. everything that may be rearranged.
    pub fn suffix(&self) -> &[usize] {
        &self.order[1.min(self.order.len())..]
    }

    #[cfg(test)]
    pub fn is_permutation_of(&self, n: usize) -> bool {
        let mut seen = vec![false; n];
        for &i in &self.order {
            if i >= n || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        seen.iter().all(|&s| s) && self.order.first() == Some(&0)
    }
}
