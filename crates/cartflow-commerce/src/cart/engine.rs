//! The Cart Engine.
//!
//! Owns all mutations of a customer's cart and maintains two invariants
//! across them: the cart's stored total always equals the sum of its line
//! prices, and no line's quantity can be pushed past the product's current
//! stock. Every mutating operation runs inside a single store transaction,
//! so a partial update (quantity changed but not the total, or vice versa)
//! is never observable.

use crate::cart::{Cart, CartItem};
use crate::error::CommerceError;
use crate::ids::{CartId, CartItemId, CustomerId, ProductId};
use crate::money::{Currency, Money};
use crate::pricing;
use crate::store::{CartStore, CatalogStore, Store, StoreTx};
use tracing::debug;

/// Default per-line quantity cap.
pub const DEFAULT_MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Tunable limits for cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartPolicy {
    /// Maximum quantity allowed on a single line, independent of stock.
    pub max_quantity_per_item: i64,
}

impl Default for CartPolicy {
    fn default() -> Self {
        Self {
            max_quantity_per_item: DEFAULT_MAX_QUANTITY_PER_ITEM,
        }
    }
}

/// Cart mutation and read operations over a transactional store.
#[derive(Debug, Clone)]
pub struct CartEngine<S> {
    store: S,
    policy: CartPolicy,
}

impl<S: Store> CartEngine<S> {
    /// Create an engine with the default policy.
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: CartPolicy::default(),
        }
    }

    /// Create an engine with a custom policy.
    pub fn with_policy(store: S, policy: CartPolicy) -> Self {
        Self { store, policy }
    }

    /// Create the customer's cart.
    ///
    /// A customer owns exactly one cart for their whole lifetime; fails
    /// with `CartExists` if one is already present.
    pub fn create_cart(
        &self,
        customer_id: CustomerId,
        currency: Currency,
    ) -> Result<Cart, CommerceError> {
        self.store.transaction(|tx| {
            // Only the definitive "no cart" answer clears the way; any
            // other lookup failure propagates instead of minting a
            // duplicate cart.
            match tx.cart_by_customer(&customer_id) {
                Ok(_) => return Err(CommerceError::CartExists(customer_id.clone())),
                Err(CommerceError::CartNotFoundForCustomer(_)) => {}
                Err(err) => return Err(err),
            }
            let cart = Cart::new(customer_id, currency);
            tx.save_cart(cart.clone())?;
            debug!(cart_id = %cart.id, customer_id = %cart.customer_id, "cart created");
            Ok(cart)
        })
    }

    /// Load a cart by id.
    pub fn cart(&self, cart_id: &CartId) -> Result<Cart, CommerceError> {
        self.store.transaction(|tx| tx.cart(cart_id))
    }

    /// Load the cart owned by a customer.
    pub fn cart_by_customer(&self, customer_id: &CustomerId) -> Result<Cart, CommerceError> {
        self.store.transaction(|tx| tx.cart_by_customer(customer_id))
    }

    /// Add one unit of a product to a cart.
    ///
    /// If the cart already holds a line for this product the quantity is
    /// incremented by 1 and one unit price is added to both the line price
    /// and the cart total; otherwise a new line with quantity 1 is created.
    /// Fails with `ProductNotFound` if the product is absent or inactive,
    /// and `StockExceeded` if the resulting quantity would exceed current
    /// stock.
    pub fn add_item(
        &self,
        cart_id: &CartId,
        product_id: &ProductId,
    ) -> Result<CartItem, CommerceError> {
        self.store.transaction(|tx| {
            let product = tx.product(product_id)?;
            if !product.is_active {
                return Err(CommerceError::ProductNotFound(product_id.clone()));
            }
            let mut cart = tx.cart(cart_id)?;
            if product.price.currency != cart.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: cart.currency.code().to_string(),
                    got: product.price.currency.code().to_string(),
                });
            }

            let existing = tx
                .cart_items(cart_id)?
                .into_iter()
                .find(|line| line.product_id == *product_id);

            let item = match existing {
                Some(mut line) => {
                    let new_quantity = line.quantity + 1;
                    pricing::check_stock(&product, new_quantity)?;
                    if new_quantity > self.policy.max_quantity_per_item {
                        return Err(CommerceError::QuantityExceedsLimit(
                            new_quantity,
                            self.policy.max_quantity_per_item,
                        ));
                    }
                    // One unit was added, so one unit price is added to the
                    // line and to the cart total.
                    line.quantity = new_quantity;
                    line.price = pricing::add_to_total(line.price, &product.price)?;
                    tx.save_cart_item(line.clone())?;
                    line
                }
                None => {
                    pricing::check_stock(&product, 1)?;
                    let line = CartItem::new(cart_id.clone(), product_id.clone(), product.price);
                    tx.save_cart_item(line.clone())?;
                    line
                }
            };

            cart.total_price = pricing::add_to_total(cart.total_price, &product.price)?;
            cart.touch();
            tx.save_cart(cart)?;

            debug!(
                cart_id = %cart_id,
                product_id = %product_id,
                quantity = item.quantity,
                "cart item added"
            );
            Ok(item)
        })
    }

    /// Set a line's quantity, recomputing the line price from the current
    /// product price and adjusting the cart total by the delta.
    ///
    /// Zero and negative quantities are rejected with `InvalidQuantity`;
    /// use [`CartEngine::remove_item`] to delete a line. Fails with
    /// `StockExceeded` if the new quantity exceeds current stock.
    pub fn set_item_quantity(
        &self,
        cart_item_id: &CartItemId,
        new_quantity: i64,
    ) -> Result<CartItem, CommerceError> {
        self.store.transaction(|tx| {
            if new_quantity < 1 {
                return Err(CommerceError::InvalidQuantity(new_quantity));
            }
            if new_quantity > self.policy.max_quantity_per_item {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    self.policy.max_quantity_per_item,
                ));
            }

            let mut item = tx.cart_item(cart_item_id)?;
            let product = tx.product(&item.product_id)?;
            if !product.is_active {
                return Err(CommerceError::ProductNotFound(item.product_id.clone()));
            }
            pricing::check_stock(&product, new_quantity)?;

            let mut cart = tx.cart(&item.cart_id)?;

            // Subtract the old line price, then add the recomputed one.
            cart.total_price = pricing::subtract_from_total(cart.total_price, &item.price)?;
            item.quantity = new_quantity;
            item.price = pricing::line_price(product.price, new_quantity)?;
            cart.total_price = pricing::add_to_total(cart.total_price, &item.price)?;
            cart.touch();

            tx.save_cart_item(item.clone())?;
            tx.save_cart(cart)?;

            debug!(
                cart_item_id = %cart_item_id,
                quantity = new_quantity,
                "cart item quantity set"
            );
            Ok(item)
        })
    }

    /// Remove a line, subtracting its price from the cart total.
    pub fn remove_item(&self, cart_item_id: &CartItemId) -> Result<(), CommerceError> {
        self.store.transaction(|tx| {
            let item = tx.cart_item(cart_item_id)?;
            let mut cart = tx.cart(&item.cart_id)?;
            cart.total_price = pricing::subtract_from_total(cart.total_price, &item.price)?;
            cart.touch();
            tx.delete_cart_item(cart_item_id)?;
            tx.save_cart(cart)?;
            debug!(cart_item_id = %cart_item_id, "cart item removed");
            Ok(())
        })
    }

    /// Delete all lines and reset the total to zero.
    ///
    /// Used by the Order Engine after a successful conversion and exposed
    /// as a user action.
    pub fn clear(&self, cart_id: &CartId) -> Result<(), CommerceError> {
        self.store.transaction(|tx| {
            clear_cart_in_tx(tx, cart_id)?;
            debug!(cart_id = %cart_id, "cart cleared");
            Ok(())
        })
    }

    /// List all lines in a cart.
    pub fn items(&self, cart_id: &CartId) -> Result<Vec<CartItem>, CommerceError> {
        self.store.transaction(|tx| {
            // Distinguish a missing cart from an empty one.
            tx.cart(cart_id)?;
            tx.cart_items(cart_id)
        })
    }

    /// Load a single line.
    pub fn item(&self, cart_item_id: &CartItemId) -> Result<CartItem, CommerceError> {
        self.store.transaction(|tx| tx.cart_item(cart_item_id))
    }
}

/// Clear a cart inside an already-open transaction.
///
/// Shared with the Order Engine so conversion can clear the source cart in
/// the same transaction that commits stock and persists the order.
pub(crate) fn clear_cart_in_tx(
    tx: &mut impl StoreTx,
    cart_id: &CartId,
) -> Result<(), CommerceError> {
    let mut cart = tx.cart(cart_id)?;
    tx.delete_cart_items(cart_id)?;
    cart.total_price = Money::zero(cart.currency);
    cart.touch();
    tx.save_cart(cart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::checkout::{Order, OrderItem};
    use crate::ids::{OrderId, OrderItemId};
    use crate::store::OrderStore;

    /// A backend whose cart lookup fails for a reason other than absence.
    struct FailingLookupTx;

    impl CatalogStore for FailingLookupTx {
        fn product(&self, _: &ProductId) -> Result<Product, CommerceError> {
            unreachable!()
        }

        fn save_product(&mut self, _: Product) -> Result<(), CommerceError> {
            unreachable!()
        }
    }

    impl CartStore for FailingLookupTx {
        fn cart(&self, _: &CartId) -> Result<Cart, CommerceError> {
            unreachable!()
        }

        fn cart_by_customer(&self, _: &CustomerId) -> Result<Cart, CommerceError> {
            Err(CommerceError::Conflict("cart row locked".into()))
        }

        fn save_cart(&mut self, _: Cart) -> Result<(), CommerceError> {
            unreachable!()
        }

        fn cart_item(&self, _: &CartItemId) -> Result<CartItem, CommerceError> {
            unreachable!()
        }

        fn cart_items(&self, _: &CartId) -> Result<Vec<CartItem>, CommerceError> {
            unreachable!()
        }

        fn save_cart_item(&mut self, _: CartItem) -> Result<(), CommerceError> {
            unreachable!()
        }

        fn delete_cart_item(&mut self, _: &CartItemId) -> Result<(), CommerceError> {
            unreachable!()
        }

        fn delete_cart_items(&mut self, _: &CartId) -> Result<(), CommerceError> {
            unreachable!()
        }
    }

    impl OrderStore for FailingLookupTx {
        fn order(&self, _: &OrderId) -> Result<Order, CommerceError> {
            unreachable!()
        }

        fn save_order(&mut self, _: Order) -> Result<(), CommerceError> {
            unreachable!()
        }

        fn order_item(&self, _: &OrderItemId) -> Result<OrderItem, CommerceError> {
            unreachable!()
        }

        fn order_items(&self, _: &OrderId) -> Result<Vec<OrderItem>, CommerceError> {
            unreachable!()
        }

        fn save_order_item(&mut self, _: OrderItem) -> Result<(), CommerceError> {
            unreachable!()
        }

        fn delete_order_item(&mut self, _: &OrderItemId) -> Result<(), CommerceError> {
            unreachable!()
        }

        fn orders_by_customer(&self, _: &CustomerId) -> Result<Vec<Order>, CommerceError> {
            unreachable!()
        }
    }

    struct FailingLookupStore;

    impl Store for FailingLookupStore {
        type Tx = FailingLookupTx;

        fn transaction<T, F>(&self, f: F) -> Result<T, CommerceError>
        where
            F: FnOnce(&mut Self::Tx) -> Result<T, CommerceError>,
        {
            f(&mut FailingLookupTx)
        }
    }

    #[test]
    fn test_create_cart_propagates_lookup_failures() {
        // A lookup error that is not "no cart exists" must surface as-is,
        // never be mistaken for a free customer slot.
        let engine = CartEngine::new(FailingLookupStore);
        let err = engine
            .create_cart(CustomerId::new("cust-1"), Currency::USD)
            .unwrap_err();
        assert!(matches!(err, CommerceError::Conflict(_)));
    }
}
