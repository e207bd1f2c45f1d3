//! Store service.

use tracing::instrument;

use vitrine_core::{StoreId, Subdomain};

use crate::api::{ApiClient, ApiError};
use crate::models::{Store, StoreUpdate, SubdomainAvailability};

/// Typed wrapper over the store endpoints.
#[derive(Clone)]
pub struct StoreService {
    api: ApiClient,
}

impl StoreService {
    /// Create a new store service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch a store by its subdomain (the storefront bootstrap call).
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged; a 404 means no store
    /// owns that subdomain.
    #[instrument(skip(self), fields(subdomain = %subdomain))]
    pub async fn get_by_subdomain(&self, subdomain: &Subdomain) -> Result<Store, ApiError> {
        let path = format!("stores/{subdomain}");
        self.api.get::<Store>(&path).await?.require_data(&path)
    }

    /// Update the merchant's store.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged.
    #[instrument(skip(self, update), fields(id = %id))]
    pub async fn update(&self, id: &StoreId, update: &StoreUpdate) -> Result<Store, ApiError> {
        let path = format!("stores/{id}");
        self.api.put::<Store, _>(&path, update).await?.require_data(&path)
    }

    /// Check whether a subdomain is still free. `true` means available.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged.
    #[instrument(skip(self), fields(subdomain = %subdomain))]
    pub async fn check_subdomain(&self, subdomain: &Subdomain) -> Result<bool, ApiError> {
        let availability = self
            .api
            .get::<SubdomainAvailability>(&format!("stores/availability?subdominio={subdomain}"))
            .await?
            .require_data("stores/availability")?;

        Ok(availability.available)
    }
}
