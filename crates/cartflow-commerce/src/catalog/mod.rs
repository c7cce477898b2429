//! Catalog domain: products and stock.

mod product;

pub use product::Product;
