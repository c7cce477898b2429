//! Order and order item records.

use crate::checkout::DeliveryInfo;
use crate::ids::{CustomerId, OrderId, OrderItemId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status.
///
/// Statuses advance along `New -> Processing -> Shipped -> Delivered ->
/// Completed`; `New` and `Processing` may be cancelled, and delivered
/// orders may be returned. Transitions are set explicitly by an
/// administrative actor, never auto-advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting processing. The only initial state.
    #[default]
    New,
    /// Order confirmed and being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order completed.
    Completed,
    /// Order cancelled before shipping.
    Cancelled,
    /// Order returned by the customer after delivery.
    Returned,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new" => Some(OrderStatus::New),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            "returned" => Some(OrderStatus::Returned),
            _ => None,
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Cancelled | OrderStatus::Returned
        )
    }

    /// Check if an order in this status can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::New | OrderStatus::Processing)
    }

    /// Check whether a transition to `next` is a legal edge.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (New, Processing)
                | (New, Cancelled)
                | (Processing, Shipped)
                | (Processing, Cancelled)
                | (Shipped, Delivered)
                | (Delivered, Completed)
                | (Delivered, Returned)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable historical order.
///
/// Created exactly once per successful cart-to-order conversion and never
/// reconstituted from a cart again; only status transitions mutate it
/// afterwards. Lines are stored as separate [`OrderItem`] snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Customer who placed the order.
    pub customer_id: CustomerId,
    /// Current status.
    pub status: OrderStatus,
    /// Order currency.
    pub currency: Currency,
    /// Total charged: the sum of the line prices, recomputed independently
    /// of the source cart's running total at conversion time.
    pub total_price: Money,
    /// Recipient full name, captured as a plain string.
    pub delivery_full_name: String,
    /// Delivery address, captured as a plain string.
    pub delivery_address: String,
    /// Contact phone number, captured as a plain string.
    pub delivery_phone: String,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Order {
    /// Create a new order shell in the initial status.
    pub fn new(customer_id: CustomerId, currency: Currency, delivery: DeliveryInfo) -> Self {
        let now = crate::current_timestamp();
        Self {
            id: OrderId::generate(),
            customer_id,
            status: OrderStatus::New,
            currency,
            total_price: Money::zero(currency),
            delivery_full_name: delivery.full_name,
            delivery_address: delivery.address,
            delivery_phone: delivery.phone,
            created_at: now,
            updated_at: now,
        }
    }

    /// Touch the update timestamp.
    pub(crate) fn touch(&mut self) {
        self.updated_at = crate::current_timestamp();
    }
}

/// A frozen line snapshot in an order.
///
/// Product facts (name, description, image, unit price) are copied at
/// conversion time so the order stays immutable against later catalog
/// edits. The stored product id is audit data only; order-line facts are
/// never re-derived from a live product lookup after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Unique line identifier.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Product id at order time, kept for audit only.
    pub product_id: ProductId,
    /// Product name at order time.
    pub product_name: String,
    /// Product description at order time.
    pub product_description: String,
    /// Product image URL at order time.
    pub image_url: String,
    /// Product unit price at order time.
    pub unit_price: Money,
    /// Quantity ordered.
    pub quantity: i64,
    /// Line price, carried over verbatim from the cart line.
    pub price: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_the_initial_status() {
        assert_eq!(OrderStatus::default(), OrderStatus::New);
    }

    #[test]
    fn test_legal_transitions() {
        use OrderStatus::*;
        assert!(New.can_transition_to(Processing));
        assert!(New.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Processing.can_transition_to(Cancelled));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Delivered.can_transition_to(Completed));
        assert!(Delivered.can_transition_to(Returned));
    }

    #[test]
    fn test_illegal_transitions() {
        use OrderStatus::*;
        assert!(!New.can_transition_to(Shipped));
        assert!(!New.can_transition_to(Delivered));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Processing));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Returned));
        assert!(!Cancelled.can_transition_to(New));
        assert!(!Returned.can_transition_to(Delivered));
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Returned.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
        assert!(!OrderStatus::Delivered.is_terminal());
    }

    #[test]
    fn test_can_cancel() {
        assert!(OrderStatus::New.can_cancel());
        assert!(OrderStatus::Processing.can_cancel());
        assert!(!OrderStatus::Shipped.can_cancel());
        assert!(!OrderStatus::Delivered.can_cancel());
    }

    #[test]
    fn test_order_serializes_status_as_variant_name() {
        let order = Order::new(
            CustomerId::new("cust-1"),
            Currency::USD,
            DeliveryInfo::new("Jane Doe", "1 Main St", "555-0100"),
        );
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "New");
        assert_eq!(json["delivery_full_name"], "Jane Doe");
        assert_eq!(json["total_price"]["amount_cents"], 0);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            OrderStatus::New,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
            OrderStatus::Returned,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_str("unknown"), None);
    }
}
