//! Application container wiring the client together.
//!
//! Everything downstream of the storage backend is constructed here, once,
//! and handed out by reference - state containers are dependency-injected,
//! never ambient.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::cart::CartEngine;
use crate::config::ClientConfig;
use crate::services::{AuthService, CategoryService, OrderService, ProductService, StoreService};
use crate::session::SessionStore;
use crate::storage::KeyValueStore;

/// The assembled Vitrine client.
///
/// Cheaply cloneable via `Arc`; clones share the connection pool, caches,
/// session state, and storage handle.
#[derive(Clone)]
pub struct VitrineApp {
    inner: Arc<AppInner>,
}

struct AppInner {
    config: ClientConfig,
    storage: Arc<dyn KeyValueStore>,
    api: ApiClient,
    auth: AuthService,
    products: ProductService,
    categories: CategoryService,
    stores: StoreService,
    orders: OrderService,
    session: SessionStore,
}

impl VitrineApp {
    /// Assemble the client over a storage backend.
    #[must_use]
    pub fn new(config: ClientConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        let api = ApiClient::new(&config, Arc::clone(&storage));

        Self {
            inner: Arc::new(AppInner {
                auth: AuthService::new(api.clone()),
                products: ProductService::new(api.clone()),
                categories: CategoryService::new(api.clone()),
                stores: StoreService::new(api.clone()),
                orders: OrderService::new(api.clone()),
                session: SessionStore::new(Arc::clone(&storage)),
                config,
                storage,
                api,
            }),
        }
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.storage
    }

    /// Get a reference to the API gateway.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the auth service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the product service.
    #[must_use]
    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }

    /// Get a reference to the category service.
    #[must_use]
    pub fn categories(&self) -> &CategoryService {
        &self.inner.categories
    }

    /// Get a reference to the store service.
    #[must_use]
    pub fn stores(&self) -> &StoreService {
        &self.inner.stores
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Build a cart engine for a storefront scope (the `subdominio` URL
    /// query value; empty string when absent).
    #[must_use]
    pub fn cart(&self, scope: &str) -> CartEngine {
        CartEngine::new(scope, Arc::clone(&self.inner.storage))
    }
}
