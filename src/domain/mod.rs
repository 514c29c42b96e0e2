pub mod types;

pub use types::{
    Context, Incident, IncidentKind, Route, Stop, TimeWindow, TrafficLevel, VehicleClass,
};
