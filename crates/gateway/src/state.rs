use std::sync::Arc;

use crate::client::{BookingClient, ItemClient, RequestClient, ShareItClient, UserClient};
use crate::errors::GatewayError;
use crate::observability::GatewayMetrics;
use crate::validation::Validate;

/// Shared by every gateway handler.
#[derive(Clone)]
pub struct GatewayState {
    pub users: UserClient,
    pub items: ItemClient,
    pub bookings: BookingClient,
    pub requests: RequestClient,
    pub metrics: Arc<GatewayMetrics>,
}

impl GatewayState {
    pub fn new(client: ShareItClient, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            users: UserClient::new(client.clone()),
            items: ItemClient::new(client.clone()),
            bookings: BookingClient::new(client.clone()),
            requests: RequestClient::new(client),
            metrics,
        }
    }

    /// Runs the payload checks, counting rejections.
    pub fn checked<T: Validate>(&self, payload: T) -> Result<T, GatewayError> {
        self.reject_counted(payload.validate())?;
        Ok(payload)
    }

    pub fn reject_counted<T>(&self, result: Result<T, GatewayError>) -> Result<T, GatewayError> {
        if result.is_err() {
            self.metrics.validation_rejections_total.inc();
        }
        result
    }
}
