//! Product service.

use std::sync::Arc;

use moka::future::Cache;
use tracing::{debug, instrument};

use vitrine_core::ProductId;

use crate::api::{ApiClient, ApiError};
use crate::models::{Product, ProductCreate, ProductUpdate};

use super::{CACHE_CAPACITY, CACHE_TTL};

/// Typed wrapper over the product endpoints.
///
/// Storefront-facing catalog reads (`list_by_store`) are cached for five
/// minutes; merchant-console reads and all mutations go straight through,
/// and every mutation drops the cache.
#[derive(Clone)]
pub struct ProductService {
    api: ApiClient,
    catalog_cache: Cache<String, Arc<Vec<Product>>>,
}

impl ProductService {
    /// Create a new product service.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let catalog_cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self { api, catalog_cache }
    }

    /// List the authenticated merchant's own products (console view,
    /// never cached).
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        self.api
            .get::<Vec<Product>>("products")
            .await?
            .require_data("products")
    }

    /// List a storefront's catalog by subdomain (customer view, cached).
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged.
    #[instrument(skip(self), fields(subdomain = %subdomain))]
    pub async fn list_by_store(&self, subdomain: &str) -> Result<Arc<Vec<Product>>, ApiError> {
        let cache_key = format!("catalog:{subdomain}");

        if let Some(products) = self.catalog_cache.get(&cache_key).await {
            debug!("cache hit for catalog");
            return Ok(products);
        }

        let products = self
            .api
            .get::<Vec<Product>>(&format!("products?subdominio={subdomain}"))
            .await?
            .require_data("products")?;

        let products = Arc::new(products);
        self.catalog_cache
            .insert(cache_key, Arc::clone(&products))
            .await;

        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged; a 404 means the
    /// product does not exist.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get(&self, id: &ProductId) -> Result<Product, ApiError> {
        let path = format!("products/{id}");
        self.api.get::<Product>(&path).await?.require_data(&path)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged.
    #[instrument(skip(self, product))]
    pub async fn create(&self, product: &ProductCreate) -> Result<Product, ApiError> {
        let created = self
            .api
            .post::<Product, _>("products", product)
            .await?
            .require_data("products")?;

        self.invalidate_catalog().await;
        Ok(created)
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged.
    #[instrument(skip(self, update), fields(id = %id))]
    pub async fn update(&self, id: &ProductId, update: &ProductUpdate) -> Result<Product, ApiError> {
        let path = format!("products/{id}");
        let updated = self
            .api
            .put::<Product, _>(&path, update)
            .await?
            .require_data(&path)?;

        self.invalidate_catalog().await;
        Ok(updated)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns the gateway's [`ApiError`] unchanged.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        self.api
            .delete::<serde_json::Value>(&format!("products/{id}"))
            .await?;

        self.invalidate_catalog().await;
        Ok(())
    }

    /// Drop every cached catalog.
    async fn invalidate_catalog(&self) {
        self.catalog_cache.invalidate_all();
        self.catalog_cache.run_pending_tasks().await;
    }
}
