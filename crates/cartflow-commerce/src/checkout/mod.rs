//! Checkout domain: orders, snapshots, delivery info, and the Order Engine.

mod delivery;
mod engine;
mod order;

pub use delivery::DeliveryInfo;
pub use engine::{OrderEngine, PlacedOrder};
pub use order::{Order, OrderItem, OrderStatus};
