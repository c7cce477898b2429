//! Shopping cart domain: cart records, line items, and the Cart Engine.

mod cart;
pub(crate) mod engine;

pub use cart::{Cart, CartItem};
pub use engine::{CartEngine, CartPolicy};
