//! Product type.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// Stock and popularity are mutated only inside order conversion; price,
/// stock corrections, and the active flag are edited through external admin
/// operations via the catalog store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description.
    pub description: String,
    /// Primary image URL.
    pub image_url: String,
    /// Current unit price.
    pub price: Money,
    /// Units currently in stock. Never negative.
    pub stock_quantity: i64,
    /// Whether the product is visible and purchasable. Deactivated
    /// products behave as deleted for cart and checkout purposes.
    pub is_active: bool,
    /// Times this product has been ordered.
    pub popularity: i64,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Product {
    /// Create a new active product with empty popularity.
    pub fn new(
        name: impl Into<String>,
        price: Money,
        stock_quantity: i64,
    ) -> Self {
        let now = crate::current_timestamp();
        Self {
            id: ProductId::generate(),
            name: name.into(),
            description: String::new(),
            image_url: String::new(),
            price,
            stock_quantity,
            is_active: true,
            popularity: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if a specific quantity can be fulfilled from current stock.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity >= 1 && self.stock_quantity >= quantity
    }

    /// Check if out of stock.
    pub fn is_out_of_stock(&self) -> bool {
        self.stock_quantity < 1
    }

    /// Commit a sale: decrement stock by `quantity` and bump popularity.
    ///
    /// Callers validate against stock first; this saturates at zero rather
    /// than going negative.
    pub fn commit_sale(&mut self, quantity: i64) {
        self.stock_quantity = (self.stock_quantity - quantity).max(0);
        self.popularity += 1;
        self.updated_at = crate::current_timestamp();
    }

    /// Add inventory (restock).
    pub fn restock(&mut self, quantity: i64) {
        self.stock_quantity += quantity;
        self.updated_at = crate::current_timestamp();
    }

    /// Deactivate the product. It remains in the store for audit but is
    /// treated as not found by cart and checkout.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = crate::current_timestamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn product(stock: i64) -> Product {
        Product::new("Widget", Money::new(1000, Currency::USD), stock)
    }

    #[test]
    fn test_can_fulfill() {
        let p = product(10);
        assert!(p.can_fulfill(10));
        assert!(!p.can_fulfill(11));
        assert!(!p.can_fulfill(0));
    }

    #[test]
    fn test_commit_sale() {
        let mut p = product(10);
        p.commit_sale(3);
        assert_eq!(p.stock_quantity, 7);
        assert_eq!(p.popularity, 1);
    }

    #[test]
    fn test_out_of_stock() {
        let p = product(0);
        assert!(p.is_out_of_stock());
        assert!(!product(1).is_out_of_stock());
    }
}
