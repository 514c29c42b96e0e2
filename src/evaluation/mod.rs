pub mod cost;

pub use cost::{cost, AnalyticCost, CostModel};
