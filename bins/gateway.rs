use std::process::ExitCode;

use common::utils::logging::init_logging_json;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    dotenv().ok();
    init_logging_json();
    info!(service = "gateway", event = "logger_init", "tracing subscriber initialized");
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "gateway", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    info!(service = "gateway", event = "start", %service_id, pid, version, "gateway service starting");

    match gateway::run().await {
        Ok(()) => {
            info!(service = "gateway", event = "stop", %service_id, pid, "gateway service stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "gateway", event = "run_failed", %service_id, error = %e, "gateway::run returned error");
            ExitCode::FAILURE
        }
    }
}
