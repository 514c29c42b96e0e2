pub mod traffic;

pub use traffic::fetch_incidents_along_route;
