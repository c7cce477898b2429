//! Narrow store contracts consumed by the engines.
//!
//! The engines do not prescribe a storage technology; they require a
//! transactional backend exposing these traits. Every mutating engine
//! operation runs inside a single [`Store::transaction`] spanning all of
//! its reads and writes: the closure's `Err` return is the unit of
//! rollback, and a committed transaction must be atomic with respect to
//! concurrent transactions on the same rows.

use crate::cart::{Cart, CartItem};
use crate::catalog::Product;
use crate::checkout::{Order, OrderItem};
use crate::error::CommerceError;
use crate::ids::{CartId, CartItemId, CustomerId, OrderId, OrderItemId, ProductId};

/// Catalog access: product reads plus stock/popularity mutation.
pub trait CatalogStore {
    /// Load a product. Fails with `ProductNotFound` if absent.
    fn product(&self, id: &ProductId) -> Result<Product, CommerceError>;

    /// Insert or update a product.
    fn save_product(&mut self, product: Product) -> Result<(), CommerceError>;
}

/// Cart and cart item access.
pub trait CartStore {
    /// Load a cart. Fails with `CartNotFound` if absent.
    fn cart(&self, id: &CartId) -> Result<Cart, CommerceError>;

    /// Load the cart owned by a customer. Fails with
    /// `CartNotFoundForCustomer` if the customer has no cart.
    fn cart_by_customer(&self, customer_id: &CustomerId) -> Result<Cart, CommerceError>;

    /// Insert or update a cart.
    fn save_cart(&mut self, cart: Cart) -> Result<(), CommerceError>;

    /// Load a cart item. Fails with `CartItemNotFound` if absent.
    fn cart_item(&self, id: &CartItemId) -> Result<CartItem, CommerceError>;

    /// Load all items belonging to a cart.
    fn cart_items(&self, cart_id: &CartId) -> Result<Vec<CartItem>, CommerceError>;

    /// Insert or update a cart item.
    fn save_cart_item(&mut self, item: CartItem) -> Result<(), CommerceError>;

    /// Delete a cart item. Fails with `CartItemNotFound` if absent.
    fn delete_cart_item(&mut self, id: &CartItemId) -> Result<(), CommerceError>;

    /// Delete every item belonging to a cart.
    fn delete_cart_items(&mut self, cart_id: &CartId) -> Result<(), CommerceError>;
}

/// Order and order item access.
pub trait OrderStore {
    /// Load an order. Fails with `OrderNotFound` if absent.
    fn order(&self, id: &OrderId) -> Result<Order, CommerceError>;

    /// Insert or update an order.
    fn save_order(&mut self, order: Order) -> Result<(), CommerceError>;

    /// Load an order item. Fails with `OrderItemNotFound` if absent.
    fn order_item(&self, id: &OrderItemId) -> Result<OrderItem, CommerceError>;

    /// Load all items belonging to an order.
    fn order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, CommerceError>;

    /// Insert or update an order item.
    fn save_order_item(&mut self, item: OrderItem) -> Result<(), CommerceError>;

    /// Delete an order item. Fails with `OrderItemNotFound` if absent.
    fn delete_order_item(&mut self, id: &OrderItemId) -> Result<(), CommerceError>;

    /// Load all orders placed by a customer, newest first.
    fn orders_by_customer(&self, customer_id: &CustomerId) -> Result<Vec<Order>, CommerceError>;
}

/// The view of the store inside a transaction.
pub trait StoreTx: CatalogStore + CartStore + OrderStore {}

impl<T: CatalogStore + CartStore + OrderStore> StoreTx for T {}

/// A transactional store.
///
/// Implementations must guarantee that the closure's reads and writes are
/// atomic and isolated: either every write commits, or (on `Err`) none do,
/// and two transactions touching the same product or cart rows must not
/// interleave in a way that lets both observe stale state. Pessimistic
/// locking and optimistic retry-on-conflict (surfacing
/// [`CommerceError::Conflict`]) are both acceptable strategies.
pub trait Store {
    /// The transaction handle type.
    type Tx: StoreTx;

    /// Run `f` inside a transaction, committing on `Ok` and rolling back
    /// every write on `Err`.
    fn transaction<T, F>(&self, f: F) -> Result<T, CommerceError>
    where
        F: FnOnce(&mut Self::Tx) -> Result<T, CommerceError>;
}
