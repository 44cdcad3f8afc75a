//! Cart store: the single owner of every live cart.
//!
//! One task owns all carts and applies commands one at a time, in the order
//! they arrive. Handlers never touch cart state directly; they hold a
//! [`CartHandle`] and send commands over a bounded channel, each with a
//! `oneshot` reply. Because only the task mutates carts, no locks guard them.
//!
//! Carts are kept in a `moka` cache keyed by [`CartId`] with a time-to-idle
//! matching the session expiry, so a cart disappears with its session.
//! Empty carts are not stored at all.

use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use dessert_shop_core::{
    Cart, CartChange, CartId, OrderConfirmation, OrderId, Product, ProductId,
};

/// Errors returned by [`CartHandle`].
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The cart store task has stopped.
    #[error("cart store is not running")]
    Closed,
}

/// Result type alias for cart store calls.
pub type Result<T> = std::result::Result<T, CartStoreError>;

/// A cart after a mutation, plus what the mutation did.
#[derive(Debug, Clone)]
pub struct CartUpdate {
    pub cart: Cart,
    pub change: CartChange,
}

/// Commands understood by the cart store task.
#[derive(Debug)]
pub enum CartCommand {
    Get {
        cart_id: CartId,
        reply: oneshot::Sender<Cart>,
    },
    AddItem {
        cart_id: CartId,
        product: Product,
        reply: oneshot::Sender<CartUpdate>,
    },
    RemoveItem {
        cart_id: CartId,
        product_id: ProductId,
        reply: oneshot::Sender<CartUpdate>,
    },
    UpdateQuantity {
        cart_id: CartId,
        product_id: ProductId,
        quantity: i64,
        reply: oneshot::Sender<CartUpdate>,
    },
    Clear {
        cart_id: CartId,
        reply: oneshot::Sender<CartUpdate>,
    },
    Checkout {
        cart_id: CartId,
        reply: oneshot::Sender<Option<OrderConfirmation>>,
    },
}

/// The task side of the cart store.
pub struct CartStore {
    commands: mpsc::Receiver<CartCommand>,
    carts: Cache<CartId, Cart>,
}

impl CartStore {
    /// Create a store and its handle without starting the task.
    ///
    /// # Arguments
    ///
    /// * `mailbox` - Command queue capacity (must be non-zero)
    /// * `idle` - How long an untouched cart is kept
    #[must_use]
    pub fn new(mailbox: usize, idle: Duration) -> (Self, CartHandle) {
        let (sender, commands) = mpsc::channel(mailbox.max(1));
        let carts = Cache::builder().time_to_idle(idle).build();

        (Self { commands, carts }, CartHandle { sender })
    }

    /// Create a store and run it on the tokio runtime.
    ///
    /// The task stops once every [`CartHandle`] has been dropped.
    #[must_use]
    pub fn spawn(mailbox: usize, idle: Duration) -> (CartHandle, JoinHandle<()>) {
        let (store, handle) = Self::new(mailbox, idle);
        let task = tokio::spawn(store.run());
        (handle, task)
    }

    /// Process commands until all handles are gone.
    pub async fn run(mut self) {
        info!("Cart store started");
        while let Some(command) = self.commands.recv().await {
            self.handle(command).await;
        }
        info!("Cart store stopped");
    }

    async fn handle(&self, command: CartCommand) {
        match command {
            CartCommand::Get { cart_id, reply } => {
                let cart = self.carts.get(&cart_id).await.unwrap_or_default();
                send_reply(reply, cart);
            }
            CartCommand::AddItem {
                cart_id,
                product,
                reply,
            } => {
                let update = self.mutate(cart_id, |cart| cart.add_item(&product)).await;
                send_reply(reply, update);
            }
            CartCommand::RemoveItem {
                cart_id,
                product_id,
                reply,
            } => {
                let update = self
                    .mutate(cart_id, |cart| cart.remove_item(product_id))
                    .await;
                send_reply(reply, update);
            }
            CartCommand::UpdateQuantity {
                cart_id,
                product_id,
                quantity,
                reply,
            } => {
                let update = self
                    .mutate(cart_id, |cart| cart.update_quantity(product_id, quantity))
                    .await;
                send_reply(reply, update);
            }
            CartCommand::Clear { cart_id, reply } => {
                let update = self.mutate(cart_id, Cart::clear).await;
                send_reply(reply, update);
            }
            CartCommand::Checkout { cart_id, reply } => {
                let confirmation = self.checkout(cart_id).await;
                send_reply(reply, confirmation);
            }
        }
    }

    /// Apply `op` to a cart and store the result.
    #[instrument(skip(self, op), fields(cart_id = %cart_id))]
    async fn mutate<F>(&self, cart_id: CartId, op: F) -> CartUpdate
    where
        F: FnOnce(&mut Cart) -> CartChange,
    {
        let mut cart = self.carts.get(&cart_id).await.unwrap_or_default();
        let change = op(&mut cart);
        debug!(?change, item_count = cart.item_count(), "Cart mutated");

        if cart.is_empty() {
            self.carts.invalidate(&cart_id).await;
        } else {
            self.carts.insert(cart_id, cart.clone()).await;
        }

        CartUpdate { cart, change }
    }

    /// Confirm the cart as an order and start a new, empty one.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    async fn checkout(&self, cart_id: CartId) -> Option<OrderConfirmation> {
        let cart = self.carts.get(&cart_id).await?;
        let confirmation = cart.confirm(OrderId::generate(), Utc::now())?;
        self.carts.invalidate(&cart_id).await;

        info!(
            order_id = %confirmation.order_id,
            item_count = confirmation.item_count,
            total = %confirmation.total,
            "Order confirmed"
        );
        Some(confirmation)
    }
}

/// Send a reply, ignoring callers that have gone away.
fn send_reply<T>(reply: oneshot::Sender<T>, value: T) {
    if reply.send(value).is_err() {
        debug!("Cart store caller dropped before reply");
    }
}

/// Cloneable client for the cart store task.
#[derive(Debug, Clone)]
pub struct CartHandle {
    sender: mpsc::Sender<CartCommand>,
}

impl CartHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> CartCommand,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| CartStoreError::Closed)?;
        response.await.map_err(|_| CartStoreError::Closed)
    }

    /// Current contents of a cart (empty if unknown or expired).
    ///
    /// # Errors
    ///
    /// Returns `CartStoreError::Closed` if the store task has stopped.
    pub async fn get(&self, cart_id: CartId) -> Result<Cart> {
        self.request(|reply| CartCommand::Get { cart_id, reply })
            .await
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns `CartStoreError::Closed` if the store task has stopped.
    pub async fn add_item(&self, cart_id: CartId, product: Product) -> Result<CartUpdate> {
        self.request(|reply| CartCommand::AddItem {
            cart_id,
            product,
            reply,
        })
        .await
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns `CartStoreError::Closed` if the store task has stopped.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<CartUpdate> {
        self.request(|reply| CartCommand::RemoveItem {
            cart_id,
            product_id,
            reply,
        })
        .await
    }

    /// Set a product's quantity; zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartStoreError::Closed` if the store task has stopped.
    pub async fn update_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartUpdate> {
        self.request(|reply| CartCommand::UpdateQuantity {
            cart_id,
            product_id,
            quantity,
            reply,
        })
        .await
    }

    /// Empty a cart.
    ///
    /// # Errors
    ///
    /// Returns `CartStoreError::Closed` if the store task has stopped.
    pub async fn clear(&self, cart_id: CartId) -> Result<CartUpdate> {
        self.request(|reply| CartCommand::Clear { cart_id, reply })
            .await
    }

    /// Confirm the cart as an order and reset it.
    ///
    /// Returns `None` if the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns `CartStoreError::Closed` if the store task has stopped.
    pub async fn checkout(&self, cart_id: CartId) -> Result<Option<OrderConfirmation>> {
        self.request(|reply| CartCommand::Checkout { cart_id, reply })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dessert_shop_core::Catalog;
    use rust_decimal::Decimal;

    use super::*;

    fn dessert(id: i32) -> Product {
        Catalog::desserts()
            .unwrap()
            .get(ProductId::new(id))
            .cloned()
            .unwrap()
    }

    fn start() -> CartHandle {
        let (handle, _task) = CartStore::spawn(8, Duration::from_secs(60));
        handle
    }

    #[tokio::test]
    async fn test_add_twice_increments() {
        let carts = start();
        let cart_id = CartId::generate();
        let brulee = dessert(2);

        let first = carts.add_item(cart_id, brulee.clone()).await.unwrap();
        assert_eq!(first.change, CartChange::Added);

        let second = carts.add_item(cart_id, brulee).await.unwrap();
        assert_eq!(second.change, CartChange::Incremented { quantity: 2 });
        assert_eq!(second.cart.total().amount, Decimal::new(1400, 2));

        let stored = carts.get(cart_id).await.unwrap();
        assert_eq!(stored, second.cart);
    }

    #[tokio::test]
    async fn test_carts_are_independent() {
        let carts = start();
        let alice = CartId::generate();
        let bob = CartId::generate();

        carts.add_item(alice, dessert(7)).await.unwrap();
        carts.add_item(bob, dessert(3)).await.unwrap();
        carts.add_item(bob, dessert(3)).await.unwrap();

        assert_eq!(carts.get(alice).await.unwrap().item_count(), 1);
        assert_eq!(carts.get(bob).await.unwrap().item_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_cart_is_empty() {
        let carts = start();
        assert!(carts.get(CartId::generate()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let carts = start();
        let cart_id = CartId::generate();
        let pie = dessert(6);

        carts.add_item(cart_id, pie.clone()).await.unwrap();
        let update = carts.update_quantity(cart_id, pie.id, 3).await.unwrap();
        assert_eq!(update.change, CartChange::QuantitySet { quantity: 3 });

        let update = carts
            .remove_item(cart_id, ProductId::new(404))
            .await
            .unwrap();
        assert_eq!(update.change, CartChange::Unchanged);
        assert_eq!(update.cart.item_count(), 3);

        let update = carts.update_quantity(cart_id, pie.id, 0).await.unwrap();
        assert_eq!(update.change, CartChange::Removed);
        assert!(carts.get(cart_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let carts = start();
        let cart_id = CartId::generate();
        carts.add_item(cart_id, dessert(1)).await.unwrap();
        carts.add_item(cart_id, dessert(9)).await.unwrap();

        let update = carts.clear(cart_id).await.unwrap();
        assert_eq!(update.change, CartChange::Cleared);
        assert!(update.cart.is_empty());
        assert!(carts.get(cart_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_confirms_and_resets() {
        let carts = start();
        let cart_id = CartId::generate();
        carts.add_item(cart_id, dessert(7)).await.unwrap();
        carts.add_item(cart_id, dessert(3)).await.unwrap();

        let confirmation = carts.checkout(cart_id).await.unwrap().unwrap();
        assert_eq!(confirmation.total.amount, Decimal::new(1250, 2));
        assert_eq!(confirmation.item_count, 2);
        assert_eq!(confirmation.lines.len(), 2);

        assert!(carts.get(cart_id).await.unwrap().is_empty());
        assert!(carts.checkout(cart_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_checkout_of_huge_order_keeps_store_running() {
        let carts = start();
        let big_spender = CartId::generate();
        let neighbour = CartId::generate();

        let mut gilded = dessert(2);
        gilded.price.amount = Decimal::MAX;
        carts.add_item(big_spender, gilded.clone()).await.unwrap();
        carts.add_item(big_spender, gilded.clone()).await.unwrap();
        carts.add_item(neighbour, gilded).await.unwrap();

        let confirmation = carts.checkout(big_spender).await.unwrap().unwrap();
        assert_eq!(confirmation.total.amount, Decimal::MAX);

        assert_eq!(carts.get(neighbour).await.unwrap().item_count(), 1);
        assert!(carts.checkout(neighbour).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_idle_cart_expires() {
        let (carts, _task) = CartStore::spawn(8, Duration::from_millis(50));
        let cart_id = CartId::generate();
        carts.add_item(cart_id, dessert(5)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(carts.get(cart_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_store() {
        let (store, carts) = CartStore::new(1, Duration::from_secs(60));
        drop(store);

        let err = carts.get(CartId::generate()).await.unwrap_err();
        assert!(matches!(err, CartStoreError::Closed));
    }

    #[tokio::test]
    async fn test_run_stops_when_handles_dropped() {
        let (carts, task) = CartStore::spawn(1, Duration::from_secs(60));
        drop(carts);
        task.await.unwrap();
    }
}
