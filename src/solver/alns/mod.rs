pub mod destroy;
pub mod driver;
pub mod repair;
pub mod selector;

pub use destroy::DestroyOperator;
pub use driver::{optimize_route, optimize_route_with_model, AlnsConfig, AlnsOutcome};
pub use repair::RepairOperator;
pub use selector::AdaptiveSelector;
