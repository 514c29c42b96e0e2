pub mod decision;
pub mod impact;
pub mod incident_aggregator;

pub use decision::{should_reoptimize, should_reoptimize_flat};
pub use impact::estimate_delay;
pub use incident_aggregator::aggregate as aggregate_incidents;
