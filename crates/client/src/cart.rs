//! Per-storefront shopping cart engine.
//!
//! Owns the authoritative in-memory cart for one storefront scope and
//! keeps it durable across restarts. State lives behind a single async
//! mutex, so every read-modify-write is atomic - two concurrent `add`
//! calls can resolve in either order, but neither update is ever lost.
//!
//! Persistence is a side effect of mutation, not a transaction with it:
//! each mutation rewrites `cart_<scope>` in the key-value store, and a
//! write failure is logged while the in-memory state stays authoritative
//! for the session.
//!
//! Quantity policy (deliberately asymmetric, matching observed product
//! behavior): `add` on an item already at its stock ceiling is rejected
//! with a [`CartEvent::StockExceeded`] signal; `update_quantity` above
//! stock silently clamps to it.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};
use tracing::{instrument, warn};

use vitrine_core::{CategoryId, Price, ProductId};

use crate::models::Product;
use crate::storage::{KeyValueStore, keys};

/// Capacity of the notification channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// One line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Base unit price.
    pub price: Decimal,
    #[serde(default)]
    pub promotional_price: Option<Decimal>,
    /// Inventory ceiling; quantity never exceeds it.
    pub stock: u32,
    /// Positive, at most `stock`.
    pub quantity: u32,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
}

impl CartItem {
    /// What the customer pays per unit: the promotional price when
    /// present and lower, else the base price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        Price {
            amount: self.price,
            promotional: self.promotional_price,
        }
        .effective()
    }
}

/// A product selected for the cart, before it carries a quantity.
#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub price: Decimal,
    pub promotional_price: Option<Decimal>,
    pub stock: u32,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
}

impl From<&Product> for NewCartItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            price: product.price,
            promotional_price: product.promotional_price,
            stock: product.stock,
            category_id: product.category_id.clone(),
            category_name: product.category_name.clone(),
        }
    }
}

impl NewCartItem {
    fn with_quantity(self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            price: self.price,
            promotional_price: self.promotional_price,
            stock: self.stock,
            quantity,
            category_id: self.category_id,
            category_name: self.category_name,
        }
    }
}

/// Snapshot of the cart: items in insertion order plus aggregates.
///
/// `total` and `item_count` are always recomputed from `items` - there is
/// no code path that mutates them independently.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub item_count: u32,
    /// UI drawer flag; not persisted.
    pub is_open: bool,
}

impl Cart {
    fn recompute(&mut self) {
        self.total = self
            .items
            .iter()
            .map(|item| item.effective_price() * Decimal::from(item.quantity))
            .sum();
        self.item_count = self.items.iter().map(|item| item.quantity).sum();
    }
}

/// Outcome of an [`CartEngine::add`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Item added or its quantity incremented; carries the new quantity.
    Added {
        quantity: u32,
    },
    /// The item was already at its stock ceiling; nothing changed.
    StockExceeded,
}

/// User-visible cart notifications, delivered over a broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded(ProductId),
    StockExceeded(ProductId),
    QuantityChanged(ProductId, u32),
    ItemRemoved(ProductId),
    Cleared,
}

/// The cart engine for one storefront scope.
///
/// `scope` is the `subdominio` URL query value - the empty string when
/// absent. Two scopes never share storage keys, so carts for different
/// storefronts are fully independent.
pub struct CartEngine {
    scope: String,
    storage: Arc<dyn KeyValueStore>,
    state: Mutex<Cart>,
    events: broadcast::Sender<CartEvent>,
}

impl CartEngine {
    /// Create an empty cart engine for `scope`. Call [`Self::restore`] to
    /// adopt previously persisted state.
    #[must_use]
    pub fn new(scope: impl Into<String>, storage: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            scope: scope.into(),
            storage,
            state: Mutex::new(Cart::default()),
            events,
        }
    }

    /// The storage key this engine persists under.
    #[must_use]
    pub fn storage_key(&self) -> String {
        keys::cart(&self.scope)
    }

    /// Subscribe to cart notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Adopt persisted state for this scope, if present and well-formed.
    ///
    /// Malformed data is logged and ignored (the cart starts empty);
    /// storage read failures likewise never propagate.
    #[instrument(skip(self), fields(scope = %self.scope))]
    pub async fn restore(&self) {
        let raw = match self.storage.get(&self.storage_key()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                warn!("cart restore failed, starting empty: {e}");
                return;
            }
        };

        match serde_json::from_str::<Vec<CartItem>>(&raw) {
            Ok(items) => {
                let mut cart = self.state.lock().await;
                cart.items = items;
                cart.recompute();
            }
            Err(e) => {
                warn!("discarding malformed persisted cart: {e}");
            }
        }
    }

    /// Add a product to the cart.
    ///
    /// An item already present has its quantity incremented by one, capped
    /// at its stock ceiling; at the ceiling the call is rejected with
    /// [`AddOutcome::StockExceeded`] and no state change. A new item is
    /// appended with quantity 1.
    #[instrument(skip(self, item), fields(scope = %self.scope, id = %item.id))]
    pub async fn add(&self, item: NewCartItem) -> AddOutcome {
        let id = item.id.clone();
        let mut cart = self.state.lock().await;

        let outcome = if let Some(existing) = cart.items.iter_mut().find(|i| i.id == id) {
            if existing.quantity >= existing.stock {
                self.notify(CartEvent::StockExceeded(id));
                return AddOutcome::StockExceeded;
            }
            existing.quantity += 1;
            AddOutcome::Added {
                quantity: existing.quantity,
            }
        } else if item.stock == 0 {
            // An out-of-stock product can never enter the cart
            self.notify(CartEvent::StockExceeded(id));
            return AddOutcome::StockExceeded;
        } else {
            cart.items.push(item.with_quantity(1));
            AddOutcome::Added { quantity: 1 }
        };

        cart.recompute();
        self.persist(&cart).await;
        self.notify(CartEvent::ItemAdded(id));

        outcome
    }

    /// Remove an item unconditionally. Absent items are a no-op beyond
    /// the lookup.
    #[instrument(skip(self), fields(scope = %self.scope, id = %id))]
    pub async fn remove(&self, id: &ProductId) {
        let mut cart = self.state.lock().await;

        let before = cart.items.len();
        cart.items.retain(|item| item.id != *id);
        if cart.items.len() == before {
            return;
        }

        cart.recompute();
        self.persist(&cart).await;
        self.notify(CartEvent::ItemRemoved(id.clone()));
    }

    /// Set an item's quantity.
    ///
    /// Zero behaves as [`Self::remove`]. Anything above the stock ceiling
    /// silently clamps to it (unlike `add`, which rejects - both
    /// behaviors are intentional).
    #[instrument(skip(self), fields(scope = %self.scope, id = %id, quantity))]
    pub async fn update_quantity(&self, id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(id).await;
            return;
        }

        let mut cart = self.state.lock().await;

        let Some(item) = cart.items.iter_mut().find(|i| i.id == *id) else {
            return;
        };

        let clamped = quantity.min(item.stock);
        item.quantity = clamped;

        cart.recompute();
        self.persist(&cart).await;
        self.notify(CartEvent::QuantityChanged(id.clone(), clamped));
    }

    /// Empty the cart and reset aggregates to zero.
    #[instrument(skip(self), fields(scope = %self.scope))]
    pub async fn clear(&self) {
        let mut cart = self.state.lock().await;

        cart.items.clear();
        cart.recompute();
        self.persist(&cart).await;
        self.notify(CartEvent::Cleared);
    }

    /// Open the cart drawer. UI flag only; item data is untouched.
    pub async fn open(&self) {
        self.state.lock().await.is_open = true;
    }

    /// Close the cart drawer.
    pub async fn close(&self) {
        self.state.lock().await.is_open = false;
    }

    /// Current cart state.
    pub async fn snapshot(&self) -> Cart {
        self.state.lock().await.clone()
    }

    /// Current total (effective price x quantity, summed).
    pub async fn total(&self) -> Decimal {
        self.state.lock().await.total
    }

    /// Current item count (quantities summed).
    pub async fn item_count(&self) -> u32 {
        self.state.lock().await.item_count
    }

    /// Serialize items back to storage. Failures are logged; in-memory
    /// state stays authoritative for the session.
    async fn persist(&self, cart: &Cart) {
        let payload = match serde_json::to_string(&cart.items) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("failed to serialize cart: {e}");
                return;
            }
        };

        if let Err(e) = self.storage.set(&self.storage_key(), &payload).await {
            warn!("failed to persist cart: {e}");
        }
    }

    /// Best-effort event send; a cart with no listeners is fine.
    fn notify(&self, event: CartEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use rust_decimal::dec;

    fn item(id: &str, price: Decimal, promotional: Option<Decimal>, stock: u32) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            title: format!("Produto {id}"),
            description: String::new(),
            image_url: None,
            price,
            promotional_price: promotional,
            stock,
            category_id: None,
            category_name: None,
        }
    }

    fn engine() -> CartEngine {
        CartEngine::new("loja-teste", Arc::new(MemoryStore::new()))
    }

    async fn assert_aggregates_consistent(cart: &CartEngine) {
        let snapshot = cart.snapshot().await;
        let expected_total: Decimal = snapshot
            .items
            .iter()
            .map(|i| i.effective_price() * Decimal::from(i.quantity))
            .sum();
        let expected_count: u32 = snapshot.items.iter().map(|i| i.quantity).sum();
        assert_eq!(snapshot.total, expected_total);
        assert_eq!(snapshot.item_count, expected_count);
    }

    #[tokio::test]
    async fn test_add_new_item_starts_at_quantity_one() {
        let cart = engine();

        let outcome = cart.add(item("p1", dec!(100), None, 5)).await;
        assert_eq!(outcome, AddOutcome::Added { quantity: 1 });

        let snapshot = cart.snapshot().await;
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.total, dec!(100));
        assert_eq!(snapshot.item_count, 1);
    }

    #[tokio::test]
    async fn test_add_increments_until_stock_then_rejects() {
        // stock 2, promotional price 80
        let cart = engine();

        cart.add(item("p1", dec!(100), Some(dec!(80)), 2)).await;
        let outcome = cart.add(item("p1", dec!(100), Some(dec!(80)), 2)).await;
        assert_eq!(outcome, AddOutcome::Added { quantity: 2 });

        let snapshot = cart.snapshot().await;
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.total, dec!(160));

        // Third add is rejected: no state change at all
        let outcome = cart.add(item("p1", dec!(100), Some(dec!(80)), 2)).await;
        assert_eq!(outcome, AddOutcome::StockExceeded);

        let snapshot = cart.snapshot().await;
        assert_eq!(snapshot.items.first().unwrap().quantity, 2);
        assert_eq!(snapshot.total, dec!(160));
        assert_aggregates_consistent(&cart).await;
    }

    #[tokio::test]
    async fn test_stock_exceeded_emits_event() {
        let cart = engine();
        let mut events = cart.subscribe();

        cart.add(item("p1", dec!(10), None, 1)).await;
        cart.add(item("p1", dec!(10), None, 1)).await;

        assert_eq!(
            events.recv().await.unwrap(),
            CartEvent::ItemAdded(ProductId::new("p1"))
        );
        assert_eq!(
            events.recv().await.unwrap(),
            CartEvent::StockExceeded(ProductId::new("p1"))
        );
    }

    #[tokio::test]
    async fn test_add_out_of_stock_product_is_rejected() {
        let cart = engine();

        let outcome = cart.add(item("p1", dec!(10), None, 0)).await;
        assert_eq!(outcome, AddOutcome::StockExceeded);
        assert!(cart.snapshot().await.items.is_empty());
    }

    #[tokio::test]
    async fn test_effective_price_uses_lower_promotion_only() {
        let cart = engine();

        // Promotion above base price is ignored
        cart.add(item("p1", dec!(50), Some(dec!(60)), 5)).await;
        assert_eq!(cart.total().await, dec!(50));

        cart.clear().await;

        cart.add(item("p2", dec!(50), Some(dec!(40)), 5)).await;
        assert_eq!(cart.total().await, dec!(40));
    }

    #[tokio::test]
    async fn test_insertion_order_is_preserved() {
        let cart = engine();

        cart.add(item("p1", dec!(10), None, 5)).await;
        cart.add(item("p2", dec!(20), None, 5)).await;
        cart.add(item("p3", dec!(30), None, 5)).await;
        cart.add(item("p2", dec!(20), None, 5)).await;

        let ids: Vec<String> = cart
            .snapshot()
            .await
            .items
            .iter()
            .map(|i| i.id.to_string())
            .collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn test_remove_deletes_unconditionally() {
        let cart = engine();

        cart.add(item("p1", dec!(10), None, 5)).await;
        cart.add(item("p1", dec!(10), None, 5)).await;
        cart.remove(&ProductId::new("p1")).await;

        let snapshot = cart.snapshot().await;
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.total, Decimal::ZERO);
        assert_eq!(snapshot.item_count, 0);
    }

    #[tokio::test]
    async fn test_remove_absent_item_is_noop() {
        let cart = engine();
        cart.add(item("p1", dec!(10), None, 5)).await;

        cart.remove(&ProductId::new("ghost")).await;
        assert_eq!(cart.item_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes() {
        let cart = engine();
        cart.add(item("p1", dec!(10), None, 5)).await;

        cart.update_quantity(&ProductId::new("p1"), 0).await;
        assert!(cart.snapshot().await.items.is_empty());
    }

    #[tokio::test]
    async fn test_update_quantity_clamps_to_stock() {
        // stock 2, requested 5 -> quantity 2
        let cart = engine();
        cart.add(item("p1", dec!(10), None, 2)).await;

        cart.update_quantity(&ProductId::new("p1"), 5).await;

        let snapshot = cart.snapshot().await;
        assert_eq!(snapshot.items.first().unwrap().quantity, 2);
        assert_aggregates_consistent(&cart).await;
    }

    #[tokio::test]
    async fn test_update_quantity_within_stock() {
        let cart = engine();
        cart.add(item("p1", dec!(10), None, 5)).await;

        cart.update_quantity(&ProductId::new("p1"), 3).await;
        assert_eq!(cart.item_count().await, 3);
        assert_eq!(cart.total().await, dec!(30));
    }

    #[tokio::test]
    async fn test_clear_resets_aggregates() {
        let cart = engine();
        cart.add(item("p1", dec!(10), None, 5)).await;
        cart.add(item("p2", dec!(20), None, 5)).await;

        cart.clear().await;

        let snapshot = cart.snapshot().await;
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.total, Decimal::ZERO);
        assert_eq!(snapshot.item_count, 0);
    }

    #[tokio::test]
    async fn test_open_close_touch_only_the_flag() {
        let cart = engine();
        cart.add(item("p1", dec!(10), None, 5)).await;

        cart.open().await;
        let snapshot = cart.snapshot().await;
        assert!(snapshot.is_open);
        assert_eq!(snapshot.item_count, 1);

        cart.close().await;
        assert!(!cart.snapshot().await.is_open);
    }

    #[tokio::test]
    async fn test_persists_and_restores() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let cart = CartEngine::new("loja", Arc::clone(&storage));
        cart.add(item("p1", dec!(100), Some(dec!(80)), 2)).await;
        cart.add(item("p1", dec!(100), Some(dec!(80)), 2)).await;

        // A fresh engine over the same storage adopts the persisted state
        let reloaded = CartEngine::new("loja", Arc::clone(&storage));
        reloaded.restore().await;

        let snapshot = reloaded.snapshot().await;
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.total, dec!(160));
        assert!(!snapshot.is_open, "drawer flag is not persisted");
    }

    #[tokio::test]
    async fn test_malformed_persisted_cart_starts_empty() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set("cart_loja", "{not json").await.unwrap();

        let cart = CartEngine::new("loja", Arc::clone(&storage));
        cart.restore().await;

        assert!(cart.snapshot().await.items.is_empty());
    }

    #[tokio::test]
    async fn test_subdomain_scopes_are_independent() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let cart_a = CartEngine::new("loja-a", Arc::clone(&storage));
        cart_a.add(item("p1", dec!(10), None, 5)).await;

        let cart_b = CartEngine::new("loja-b", Arc::clone(&storage));
        cart_b.restore().await;

        assert!(cart_b.snapshot().await.items.is_empty());
        assert!(storage.get("cart_loja-a").await.unwrap().is_some());
        assert!(storage.get("cart_loja-b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_aggregates_never_drift() {
        let cart = engine();

        cart.add(item("p1", dec!(9.9), Some(dec!(7.5)), 3)).await;
        cart.add(item("p2", dec!(25), None, 2)).await;
        cart.add(item("p1", dec!(9.9), Some(dec!(7.5)), 3)).await;
        assert_aggregates_consistent(&cart).await;

        cart.update_quantity(&ProductId::new("p2"), 9).await;
        assert_aggregates_consistent(&cart).await;

        cart.remove(&ProductId::new("p1")).await;
        assert_aggregates_consistent(&cart).await;

        cart.update_quantity(&ProductId::new("p2"), 0).await;
        assert_aggregates_consistent(&cart).await;
        assert_eq!(cart.total().await, Decimal::ZERO);
    }
}
