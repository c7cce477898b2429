//! Shared pricing and inventory validation.
//!
//! Pure functions used by both the Cart Engine and the Order Engine to
//! validate quantities against stock and to (re)derive prices with
//! fixed-point arithmetic.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::money::{Currency, Money};

/// Validate a requested quantity against a product's current stock.
///
/// Fails with [`CommerceError::StockExceeded`] when the requested quantity
/// cannot be fulfilled.
pub fn check_stock(product: &Product, requested: i64) -> Result<(), CommerceError> {
    if requested > product.stock_quantity {
        return Err(CommerceError::StockExceeded {
            product_id: product.id.clone(),
            requested,
            available: product.stock_quantity,
        });
    }
    Ok(())
}

/// Compute a line price as `unit_price * quantity`.
///
/// Rejects non-positive quantities and checked-arithmetic overflow.
pub fn line_price(unit_price: Money, quantity: i64) -> Result<Money, CommerceError> {
    if quantity < 1 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    unit_price
        .try_multiply(quantity)
        .ok_or(CommerceError::Overflow)
}

/// Add a price into a running total.
///
/// `Money::try_add` folds currency mismatch and overflow into one `None`;
/// this keeps them apart so a currency drift on an admin-edited product is
/// not reported as arithmetic overflow.
pub fn add_to_total(total: Money, price: &Money) -> Result<Money, CommerceError> {
    if price.currency != total.currency {
        return Err(CommerceError::CurrencyMismatch {
            expected: total.currency.code().to_string(),
            got: price.currency.code().to_string(),
        });
    }
    total.try_add(price).ok_or(CommerceError::Overflow)
}

/// Subtract a price from a running total.
pub fn subtract_from_total(total: Money, price: &Money) -> Result<Money, CommerceError> {
    if price.currency != total.currency {
        return Err(CommerceError::CurrencyMismatch {
            expected: total.currency.code().to_string(),
            got: price.currency.code().to_string(),
        });
    }
    total.try_subtract(price).ok_or(CommerceError::Overflow)
}

/// Sum line prices into an aggregate total.
///
/// Used to independently re-derive a container's total instead of trusting
/// an incrementally-maintained running total, as a consistency cross-check
/// before persisting a conversion.
pub fn aggregate_total<'a>(
    prices: impl Iterator<Item = &'a Money>,
    currency: Currency,
) -> Result<Money, CommerceError> {
    let mut total = Money::zero(currency);
    for price in prices {
        total = add_to_total(total, price)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn product(stock: i64) -> Product {
        Product::new("Widget", Money::new(1000, Currency::USD), stock)
    }

    #[test]
    fn test_check_stock_within_bounds() {
        assert!(check_stock(&product(5), 5).is_ok());
        assert!(check_stock(&product(5), 1).is_ok());
    }

    #[test]
    fn test_check_stock_exceeded() {
        let err = check_stock(&product(2), 3).unwrap_err();
        assert!(matches!(
            err,
            CommerceError::StockExceeded {
                requested: 3,
                available: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_line_price() {
        let price = line_price(Money::new(2500, Currency::USD), 4).unwrap();
        assert_eq!(price.amount_cents, 10000);
    }

    #[test]
    fn test_line_price_rejects_zero() {
        assert!(matches!(
            line_price(Money::new(100, Currency::USD), 0),
            Err(CommerceError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn test_line_price_overflow() {
        assert!(matches!(
            line_price(Money::new(i64::MAX, Currency::USD), 2),
            Err(CommerceError::Overflow)
        ));
    }

    #[test]
    fn test_total_arithmetic_separates_mismatch_from_overflow() {
        let total = Money::new(1000, Currency::USD);
        assert!(matches!(
            add_to_total(total, &Money::new(100, Currency::EUR)),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            subtract_from_total(total, &Money::new(100, Currency::EUR)),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            add_to_total(Money::new(i64::MAX, Currency::USD), &Money::new(1, Currency::USD)),
            Err(CommerceError::Overflow)
        ));
        assert!(matches!(
            subtract_from_total(Money::new(i64::MIN, Currency::USD), &Money::new(1, Currency::USD)),
            Err(CommerceError::Overflow)
        ));
    }

    #[test]
    fn test_aggregate_total() {
        let prices = [
            Money::new(10000, Currency::USD),
            Money::new(3000, Currency::USD),
        ];
        let total = aggregate_total(prices.iter(), Currency::USD).unwrap();
        assert_eq!(total.amount_cents, 13000);
    }

    #[test]
    fn test_aggregate_total_currency_mismatch() {
        let prices = [
            Money::new(10000, Currency::USD),
            Money::new(3000, Currency::EUR),
        ];
        assert!(matches!(
            aggregate_total(prices.iter(), Currency::USD),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }
}
