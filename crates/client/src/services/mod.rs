//! Domain services: thin typed wrappers over the API gateway.
//!
//! One service per remote resource. Services add types, endpoint paths,
//! and (for storefront read paths) caching - nothing else. Errors from
//! the gateway are re-thrown unchanged.

mod auth;
mod categories;
mod orders;
mod products;
mod stores;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use orders::OrderService;
pub use products::ProductService;
pub use stores::StoreService;

use std::time::Duration;

/// TTL for cached storefront reads.
pub(crate) const CACHE_TTL: Duration = Duration::from_secs(300);

/// Maximum number of cached entries per service.
pub(crate) const CACHE_CAPACITY: u64 = 1000;
