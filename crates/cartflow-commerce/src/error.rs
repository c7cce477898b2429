//! Commerce error types.

use crate::ids::{CartId, CartItemId, CustomerId, OrderId, OrderItemId, ProductId};
use crate::checkout::OrderStatus;
use thiserror::Error;

/// Errors that can occur in cart and order operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product absent from the catalog or deactivated.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Cart not found.
    #[error("Cart not found: {0}")]
    CartNotFound(CartId),

    /// No cart exists for the customer.
    #[error("Cart not found for customer: {0}")]
    CartNotFoundForCustomer(CustomerId),

    /// Cart item not found.
    #[error("Cart item not found: {0}")]
    CartItemNotFound(CartItemId),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Order item not found.
    #[error("Order item not found: {0}")]
    OrderItemNotFound(OrderItemId),

    /// Requested quantity exceeds available stock during a cart mutation.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Quantity is not positive.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds the per-line policy cap.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// A conversion was attempted on a cart with no lines.
    #[error("Cannot create an order from an empty cart: {0}")]
    EmptyCart(CartId),

    /// A product in the cart is no longer available in the requested
    /// quantity at conversion time.
    #[error("Product '{name}' ({product_id}) is no longer available in the requested quantity")]
    ProductUnavailable { product_id: ProductId, name: String },

    /// Delivery information failed validation.
    #[error("Invalid delivery info: missing {0}")]
    InvalidDelivery(&'static str),

    /// Illegal order status transition.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// The customer already has a cart.
    #[error("Cart already exists for customer: {0}")]
    CartExists(CustomerId),

    /// A concurrent mutation won the race (optimistic backends only).
    #[error("Concurrent modification conflict: {0}")]
    Conflict(String),

    /// Currency mismatch between a product and its cart.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow in price calculation.
    #[error("Arithmetic overflow in price calculation")]
    Overflow,
}

/// Coarse error classification for callers mapping onto transport status
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Referenced cart/item/product/order absent or logically deleted.
    NotFound,
    /// Requested quantity exceeds available stock.
    StockExceeded,
    /// Malformed or unsatisfiable request.
    InvalidArgument,
    /// Concurrent mutation lost the race.
    Conflict,
}

impl CommerceError {
    /// Classify this error into the coarse taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::ProductNotFound(_)
            | CommerceError::CartNotFound(_)
            | CommerceError::CartNotFoundForCustomer(_)
            | CommerceError::CartItemNotFound(_)
            | CommerceError::OrderNotFound(_)
            | CommerceError::OrderItemNotFound(_) => ErrorKind::NotFound,
            CommerceError::StockExceeded { .. } => ErrorKind::StockExceeded,
            CommerceError::InvalidQuantity(_)
            | CommerceError::QuantityExceedsLimit(..)
            | CommerceError::EmptyCart(_)
            | CommerceError::ProductUnavailable { .. }
            | CommerceError::InvalidDelivery(_)
            | CommerceError::InvalidStatusTransition { .. }
            | CommerceError::CurrencyMismatch { .. }
            | CommerceError::Overflow => ErrorKind::InvalidArgument,
            CommerceError::CartExists(_) | CommerceError::Conflict(_) => ErrorKind::Conflict,
        }
    }
}
