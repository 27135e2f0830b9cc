//! Monetary types for price and quantity representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Share count. Signed to match SQLite's integer column type.
pub type Quantity = i64;
