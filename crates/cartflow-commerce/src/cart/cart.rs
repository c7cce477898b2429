//! Cart and cart item records.

use crate::ids::{CartId, CartItemId, CustomerId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A customer's shopping cart.
///
/// Exactly one cart exists per customer. It is created at account creation
/// and cleared, never destroyed, after each successful order conversion.
/// Lines are stored as separate [`CartItem`] records keyed by their own id;
/// `total_price` always equals the sum of the line prices after any
/// successful mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Cart currency.
    pub currency: Currency,
    /// Running total, maintained by the Cart Engine.
    pub total_price: Money,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty cart for a customer.
    pub fn new(customer_id: CustomerId, currency: Currency) -> Self {
        let now = crate::current_timestamp();
        Self {
            id: CartId::generate(),
            customer_id,
            currency,
            total_price: Money::zero(currency),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the stored total is zero.
    pub fn is_zeroed(&self) -> bool {
        self.total_price.is_zero()
    }

    /// Touch the update timestamp.
    pub(crate) fn touch(&mut self) {
        self.updated_at = crate::current_timestamp();
    }
}

/// A line in a cart.
///
/// At most one line exists per (cart, product) pair; adding the same
/// product again accumulates quantity instead of duplicating rows. `price`
/// is the line price captured at the time of the last mutation, not
/// live-linked to the current product price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Unique line identifier.
    pub id: CartItemId,
    /// Owning cart.
    pub cart_id: CartId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Units of the product. Always >= 1.
    pub quantity: i64,
    /// Line price: unit price x quantity at time of last mutation.
    pub price: Money,
}

impl CartItem {
    /// Create a new line with quantity 1 at the given unit price.
    pub fn new(cart_id: CartId, product_id: ProductId, unit_price: Money) -> Self {
        Self {
            id: CartItemId::generate(),
            cart_id,
            product_id,
            quantity: 1,
            price: unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cart_is_zeroed() {
        let cart = Cart::new(CustomerId::new("cust-1"), Currency::USD);
        assert!(cart.is_zeroed());
        assert_eq!(cart.total_price, Money::zero(Currency::USD));
    }

    #[test]
    fn test_new_item_starts_at_one() {
        let item = CartItem::new(
            CartId::new("cart-1"),
            ProductId::new("prod-1"),
            Money::new(500, Currency::USD),
        );
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price.amount_cents, 500);
    }
}
