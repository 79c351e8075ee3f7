pub mod routes;
pub mod startup;
pub mod errors;
pub mod openapi;
pub mod state;

pub use startup::{app, build_services, run, run_with};
pub use state::ServerState;
