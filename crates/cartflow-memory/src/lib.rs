//! In-memory transactional store backend for Cartflow.
//!
//! Provides an implementation of the `Store` trait from
//! `cartflow-commerce` backed by plain maps, useful for tests and
//! development where persistence is not required.
//!
//! A transaction locks the shared state, clones it into a working copy,
//! runs the closure against the copy, and swaps the copy back in only when
//! the closure succeeds. That gives serialized (pessimistic) transactions
//! and exact pre-call state on any failure, which is the concurrency
//! contract the engines rely on: no partial stock decrement, cart update,
//! or order write is ever observable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use cartflow_commerce::cart::{Cart, CartItem};
use cartflow_commerce::catalog::Product;
use cartflow_commerce::checkout::{Order, OrderItem};
use cartflow_commerce::error::CommerceError;
use cartflow_commerce::ids::{CartId, CartItemId, CustomerId, OrderId, OrderItemId, ProductId};
use cartflow_commerce::store::{CartStore, CatalogStore, OrderStore, Store};

/// The backing tables.
#[derive(Debug, Clone, Default)]
struct State {
    products: BTreeMap<ProductId, Product>,
    carts: BTreeMap<CartId, Cart>,
    cart_items: BTreeMap<CartItemId, CartItem>,
    orders: BTreeMap<OrderId, Order>,
    order_items: BTreeMap<OrderItemId, OrderItem>,
}

/// Thread-safe in-memory store.
///
/// Cloning shares the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A transaction's working copy of the store state.
#[derive(Debug)]
pub struct MemoryTx {
    working: State,
}

impl Store for MemoryStore {
    type Tx = MemoryTx;

    fn transaction<T, F>(&self, f: F) -> Result<T, CommerceError>
    where
        F: FnOnce(&mut Self::Tx) -> Result<T, CommerceError>,
    {
        // The lock is held for the whole transaction, serializing writers
        // and readers alike.
        let mut guard = self.state.lock().expect("state lock poisoned");
        let mut tx = MemoryTx {
            working: guard.clone(),
        };
        let out = f(&mut tx)?;
        *guard = tx.working;
        Ok(out)
    }
}

impl CatalogStore for MemoryTx {
    fn product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.working
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(id.clone()))
    }

    fn save_product(&mut self, product: Product) -> Result<(), CommerceError> {
        self.working.products.insert(product.id.clone(), product);
        Ok(())
    }
}

impl CartStore for MemoryTx {
    fn cart(&self, id: &CartId) -> Result<Cart, CommerceError> {
        self.working
            .carts
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::CartNotFound(id.clone()))
    }

    fn cart_by_customer(&self, customer_id: &CustomerId) -> Result<Cart, CommerceError> {
        self.working
            .carts
            .values()
            .find(|cart| cart.customer_id == *customer_id)
            .cloned()
            .ok_or_else(|| CommerceError::CartNotFoundForCustomer(customer_id.clone()))
    }

    fn save_cart(&mut self, cart: Cart) -> Result<(), CommerceError> {
        self.working.carts.insert(cart.id.clone(), cart);
        Ok(())
    }

    fn cart_item(&self, id: &CartItemId) -> Result<CartItem, CommerceError> {
        self.working
            .cart_items
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::CartItemNotFound(id.clone()))
    }

    fn cart_items(&self, cart_id: &CartId) -> Result<Vec<CartItem>, CommerceError> {
        Ok(self
            .working
            .cart_items
            .values()
            .filter(|item| item.cart_id == *cart_id)
            .cloned()
            .collect())
    }

    fn save_cart_item(&mut self, item: CartItem) -> Result<(), CommerceError> {
        self.working.cart_items.insert(item.id.clone(), item);
        Ok(())
    }

    fn delete_cart_item(&mut self, id: &CartItemId) -> Result<(), CommerceError> {
        self.working
            .cart_items
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CommerceError::CartItemNotFound(id.clone()))
    }

    fn delete_cart_items(&mut self, cart_id: &CartId) -> Result<(), CommerceError> {
        self.working
            .cart_items
            .retain(|_, item| item.cart_id != *cart_id);
        Ok(())
    }
}

impl OrderStore for MemoryTx {
    fn order(&self, id: &OrderId) -> Result<Order, CommerceError> {
        self.working
            .orders
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::OrderNotFound(id.clone()))
    }

    fn save_order(&mut self, order: Order) -> Result<(), CommerceError> {
        self.working.orders.insert(order.id.clone(), order);
        Ok(())
    }

    fn order_item(&self, id: &OrderItemId) -> Result<OrderItem, CommerceError> {
        self.working
            .order_items
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::OrderItemNotFound(id.clone()))
    }

    fn order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, CommerceError> {
        Ok(self
            .working
            .order_items
            .values()
            .filter(|item| item.order_id == *order_id)
            .cloned()
            .collect())
    }

    fn save_order_item(&mut self, item: OrderItem) -> Result<(), CommerceError> {
        self.working.order_items.insert(item.id.clone(), item);
        Ok(())
    }

    fn delete_order_item(&mut self, id: &OrderItemId) -> Result<(), CommerceError> {
        self.working
            .order_items
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CommerceError::OrderItemNotFound(id.clone()))
    }

    fn orders_by_customer(&self, customer_id: &CustomerId) -> Result<Vec<Order>, CommerceError> {
        let mut orders: Vec<Order> = self
            .working
            .orders
            .values()
            .filter(|order| order.customer_id == *customer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartflow_commerce::money::{Currency, Money};

    fn product(name: &str, cents: i64, stock: i64) -> Product {
        Product::new(name, Money::new(cents, Currency::USD), stock)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = MemoryStore::new();
        let missing = store.transaction(|tx| tx.product(&ProductId::new("nope")));
        assert!(matches!(missing, Err(CommerceError::ProductNotFound(_))));
    }

    #[test]
    fn test_clone_shares_storage() {
        let store1 = MemoryStore::new();
        let store2 = store1.clone();

        let p = product("Widget", 1000, 5);
        let id = p.id.clone();
        store1.transaction(|tx| tx.save_product(p)).unwrap();

        let loaded = store2.transaction(|tx| tx.product(&id)).unwrap();
        assert_eq!(loaded.name, "Widget");
    }

    #[test]
    fn test_commit_on_ok() {
        let store = MemoryStore::new();
        let cart = Cart::new(CustomerId::new("cust-1"), Currency::USD);
        let cart_id = cart.id.clone();

        store.transaction(|tx| tx.save_cart(cart)).unwrap();
        assert!(store.transaction(|tx| tx.cart(&cart_id)).is_ok());
    }

    #[test]
    fn test_rollback_on_err() {
        let store = MemoryStore::new();
        let p = product("Widget", 1000, 5);
        let id = p.id.clone();

        let result: Result<(), CommerceError> = store.transaction(|tx| {
            tx.save_product(p)?;
            Err(CommerceError::Overflow)
        });
        assert!(result.is_err());

        // The write inside the failed transaction must not be visible.
        let missing = store.transaction(|tx| tx.product(&id));
        assert!(matches!(missing, Err(CommerceError::ProductNotFound(_))));
    }

    #[test]
    fn test_cart_by_customer() {
        let store = MemoryStore::new();
        let customer = CustomerId::new("cust-1");
        let cart = Cart::new(customer.clone(), Currency::USD);
        let cart_id = cart.id.clone();
        store.transaction(|tx| tx.save_cart(cart)).unwrap();

        let found = store
            .transaction(|tx| tx.cart_by_customer(&customer))
            .unwrap();
        assert_eq!(found.id, cart_id);

        let missing = store.transaction(|tx| tx.cart_by_customer(&CustomerId::new("other")));
        assert!(matches!(
            missing,
            Err(CommerceError::CartNotFoundForCustomer(_))
        ));
    }

    #[test]
    fn test_delete_cart_items_scoped_to_cart() {
        let store = MemoryStore::new();
        let cart_a = Cart::new(CustomerId::new("a"), Currency::USD);
        let cart_b = Cart::new(CustomerId::new("b"), Currency::USD);
        let item_a = CartItem::new(
            cart_a.id.clone(),
            ProductId::new("p1"),
            Money::new(100, Currency::USD),
        );
        let item_b = CartItem::new(
            cart_b.id.clone(),
            ProductId::new("p2"),
            Money::new(200, Currency::USD),
        );
        let b_item_id = item_b.id.clone();

        store
            .transaction(|tx| {
                tx.save_cart(cart_a.clone())?;
                tx.save_cart(cart_b.clone())?;
                tx.save_cart_item(item_a)?;
                tx.save_cart_item(item_b)
            })
            .unwrap();

        store
            .transaction(|tx| tx.delete_cart_items(&cart_a.id))
            .unwrap();

        let a_items = store.transaction(|tx| tx.cart_items(&cart_a.id)).unwrap();
        assert!(a_items.is_empty());
        assert!(store.transaction(|tx| tx.cart_item(&b_item_id)).is_ok());
    }
}
