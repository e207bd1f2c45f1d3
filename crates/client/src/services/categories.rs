//! Category service.

use std::sync::Arc;

use moka::future::Cache;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError};
use crate::models::Category;

use super::{CACHE_CAPACITY, CACHE_TTL};

const CACHE_KEY: &str = "categories";

/// Typed wrapper over the category listing endpoint. The list changes
/// rarely, so it is cached for five minutes.
#[derive(Clone)]
pub struct CategoryService {
    api: ApiClient,
    cache: Cache<&'static str, Arc<Vec<Category>>>,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self { api, cache }
    }

    /// List every category.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Arc<Vec<Category>>, ApiError> {
        if let Some(categories) = self.cache.get(CACHE_KEY).await {
            debug!("cache hit for categories");
            return Ok(categories);
        }

        let categories = self
            .api
            .get::<Vec<Category>>("categories")
            .await?
            .require_data("categories")?;

        let categories = Arc::new(categories);
        self.cache.insert(CACHE_KEY, Arc::clone(&categories)).await;

        Ok(categories)
    }
}
