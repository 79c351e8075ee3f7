use service::AppServices;

/// Shared by every handler.
#[derive(Clone)]
pub struct ServerState {
    pub services: AppServices,
}

impl ServerState {
    pub fn new(services: AppServices) -> Self { Self { services } }
}
