//! Order service.

use tracing::instrument;

use crate::api::{ApiClient, ApiError};
use crate::models::Order;

/// Typed wrapper over the order listing endpoint.
#[derive(Clone)]
pub struct OrderService {
    api: ApiClient,
}

impl OrderService {
    /// Create a new order service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List the authenticated merchant's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, ApiError> {
        self.api
            .get::<Vec<Order>>("orders")
            .await?
            .require_data("orders")
    }
}
