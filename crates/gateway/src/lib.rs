//! Validating front tier: checks payloads and headers, then forwards every
//! call to the server and relays its answer.

pub mod errors;
pub mod observability;
pub mod validation;
pub mod client;
pub mod state;
pub mod routes;
pub mod startup;

pub use startup::{app, build_state, run, run_with};
pub use state::GatewayState;
