//! The Order Engine.
//!
//! Owns the one state transition that turns a mutable cart into an
//! immutable historical order, with stock committed at conversion time.
//! The conversion re-validates every cart line against the current product
//! state, snapshots product facts into order items, decrements stock,
//! bumps popularity, recomputes the order total from the snapshots, and
//! clears the source cart — all inside a single store transaction. Any
//! line failing aborts the whole conversion; the customer never loses
//! cart or stock state without receiving an order, nor receives an order
//! without stock being committed.

use crate::cart::engine::clear_cart_in_tx;
use crate::checkout::{DeliveryInfo, Order, OrderItem, OrderStatus};
use crate::error::CommerceError;
use crate::ids::{CartId, CustomerId, OrderId, OrderItemId};
use crate::pricing;
use crate::store::{CartStore, CatalogStore, OrderStore, Store};
use tracing::{info, warn};

/// The result of a successful conversion: the persisted order and its
/// frozen line snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    /// The created order.
    pub order: Order,
    /// The order's line snapshots.
    pub items: Vec<OrderItem>,
}

/// Order conversion and administration over a transactional store.
#[derive(Debug, Clone)]
pub struct OrderEngine<S> {
    store: S,
}

impl<S: Store> OrderEngine<S> {
    /// Create an engine over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Convert a cart into a new order.
    ///
    /// Fails with `EmptyCart` if the cart has no lines and
    /// `InvalidDelivery` if the delivery info is malformed. Each line is
    /// re-validated against the **current** product state: a missing or
    /// deactivated product fails `ProductNotFound`, and a line whose
    /// quantity can no longer be fulfilled fails `ProductUnavailable`.
    /// Cart line prices are carried over verbatim as order line prices,
    /// preserving price-at-add-time semantics; the order total is
    /// recomputed from the snapshots rather than copied from the cart.
    pub fn place_order(
        &self,
        cart_id: &CartId,
        delivery: DeliveryInfo,
    ) -> Result<PlacedOrder, CommerceError> {
        delivery.validate()?;
        let result = self.store.transaction(|tx| {
            let cart = tx.cart(cart_id)?;
            let lines = tx.cart_items(cart_id)?;
            if lines.is_empty() {
                return Err(CommerceError::EmptyCart(cart_id.clone()));
            }

            let mut order = Order::new(cart.customer_id.clone(), cart.currency, delivery);
            let mut items = Vec::with_capacity(lines.len());

            for line in &lines {
                let mut product = tx.product(&line.product_id)?;
                if !product.is_active {
                    return Err(CommerceError::ProductNotFound(line.product_id.clone()));
                }
                if !product.can_fulfill(line.quantity) {
                    return Err(CommerceError::ProductUnavailable {
                        product_id: product.id.clone(),
                        name: product.name.clone(),
                    });
                }

                // Snapshot current product facts; the line price is reused
                // verbatim from the cart.
                let item = OrderItem {
                    id: OrderItemId::generate(),
                    order_id: order.id.clone(),
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    product_description: product.description.clone(),
                    image_url: product.image_url.clone(),
                    unit_price: product.price,
                    quantity: line.quantity,
                    price: line.price,
                };

                product.commit_sale(line.quantity);
                tx.save_product(product)?;
                items.push(item);
            }

            // Re-derive the total from the snapshots as a cross-check
            // against a stale cart total.
            order.total_price =
                pricing::aggregate_total(items.iter().map(|i| &i.price), cart.currency)?;

            tx.save_order(order.clone())?;
            for item in &items {
                tx.save_order_item(item.clone())?;
            }
            clear_cart_in_tx(tx, cart_id)?;

            Ok(PlacedOrder { order, items })
        });

        match &result {
            Ok(placed) => info!(
                order_id = %placed.order.id,
                cart_id = %cart_id,
                total = %placed.order.total_price,
                lines = placed.items.len(),
                "order placed"
            ),
            Err(err) => warn!(cart_id = %cart_id, error = %err, "order conversion rejected"),
        }
        result
    }

    /// Transition an order to a new status.
    ///
    /// Only the legal edges of the status machine are accepted; anything
    /// else fails `InvalidStatusTransition`.
    pub fn update_status(
        &self,
        order_id: &OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, CommerceError> {
        self.store.transaction(|tx| {
            let mut order = tx.order(order_id)?;
            if !order.status.can_transition_to(new_status) {
                return Err(CommerceError::InvalidStatusTransition {
                    from: order.status,
                    to: new_status,
                });
            }
            let from = order.status;
            order.status = new_status;
            order.touch();
            tx.save_order(order.clone())?;
            info!(order_id = %order_id, %from, to = %new_status, "order status updated");
            Ok(order)
        })
    }

    /// Remove a line from a historical order, re-balancing the order total.
    ///
    /// This is an administrative correction, not a cancellation: stock is
    /// not restored.
    pub fn delete_order_item(&self, order_item_id: &OrderItemId) -> Result<(), CommerceError> {
        self.store.transaction(|tx| {
            let item = tx.order_item(order_item_id)?;
            let mut order = tx.order(&item.order_id)?;
            order.total_price = pricing::subtract_from_total(order.total_price, &item.price)?;
            order.touch();
            tx.delete_order_item(order_item_id)?;
            tx.save_order(order)?;
            info!(order_item_id = %order_item_id, "order item removed");
            Ok(())
        })
    }

    /// Load an order by id.
    pub fn order(&self, order_id: &OrderId) -> Result<Order, CommerceError> {
        self.store.transaction(|tx| tx.order(order_id))
    }

    /// List an order's line snapshots.
    pub fn order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, CommerceError> {
        self.store.transaction(|tx| {
            tx.order(order_id)?;
            tx.order_items(order_id)
        })
    }

    /// List a customer's orders, newest first.
    pub fn orders_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<Order>, CommerceError> {
        self.store.transaction(|tx| tx.orders_by_customer(customer_id))
    }
}
