//! Cart-to-order fulfillment and inventory-consistency core for Cartflow.
//!
//! This crate provides the domain types and engines for the one part of an
//! order-management backend with real invariants:
//!
//! - **Catalog**: product records with price, stock, and popularity
//! - **Cart**: stock-bounded cart mutation with a total that always equals
//!   the sum of its line prices
//! - **Checkout**: the atomic conversion of a cart into an immutable,
//!   snapshot-based order, committing stock at conversion time
//! - **Store**: narrow transactional store traits the engines run against
//!
//! # Example
//!
//! ```rust,ignore
//! use cartflow_commerce::prelude::*;
//! use cartflow_memory::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let carts = CartEngine::new(store.clone());
//! let orders = OrderEngine::new(store);
//!
//! let cart = carts.create_cart(customer_id, Currency::USD)?;
//! carts.add_item(&cart.id, &product_id)?;
//!
//! let placed = orders.place_order(
//!     &cart.id,
//!     DeliveryInfo::new("Jane Doe", "1 Main St", "555-0100"),
//! )?;
//! println!("total: {}", placed.order.total_price);
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod pricing;
pub mod store;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::{CommerceError, ErrorKind};
pub use ids::*;
pub use money::{Currency, Money};

/// Get the current Unix timestamp in seconds.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, ErrorKind};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::Product;

    // Cart
    pub use crate::cart::{Cart, CartEngine, CartItem, CartPolicy};

    // Checkout
    pub use crate::checkout::{DeliveryInfo, Order, OrderEngine, OrderItem, OrderStatus, PlacedOrder};

    // Store contracts
    pub use crate::store::{CartStore, CatalogStore, OrderStore, Store, StoreTx};
}
