//! Holdings and their live valuation.

use rust_decimal::Decimal;
use serde::Serialize;

use super::money::{Price, Quantity};

/// A stock held in the paper portfolio at its average acquisition cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holding {
    pub ticker: String,
    pub quantity: Quantity,
    pub avg_price: Price,
}

impl Holding {
    /// Average cost after adding `quantity` shares bought at `price`.
    ///
    /// Returns `None` when the combined quantity is not positive.
    #[must_use]
    pub fn averaged_with(&self, quantity: Quantity, price: Price) -> Option<Price> {
        let total = self.quantity.checked_add(quantity)?;
        if total <= 0 {
            return None;
        }
        let cost = Decimal::from(self.quantity) * self.avg_price + Decimal::from(quantity) * price;
        Some(cost / Decimal::from(total))
    }

    /// Book cost of the holding.
    #[must_use]
    pub fn cost_basis(&self) -> Price {
        Decimal::from(self.quantity) * self.avg_price
    }

    /// Value this holding at a live price.
    #[must_use]
    pub fn valued_at(&self, live_price: Option<Price>) -> PositionStatus {
        PositionStatus {
            ticker: self.ticker.clone(),
            quantity: self.quantity,
            avg_price: self.avg_price,
            live_price,
            unrealized_pnl: live_price
                .map(|live| (live - self.avg_price) * Decimal::from(self.quantity)),
        }
    }
}

/// A holding joined with its live price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionStatus {
    pub ticker: String,
    pub quantity: Quantity,
    pub avg_price: Price,
    pub live_price: Option<Price>,
    /// `(live - avg) * quantity`; absent when no live price is known.
    pub unrealized_pnl: Option<Price>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(quantity: Quantity, avg: Price) -> Holding {
        Holding {
            ticker: "INFY.NS".into(),
            quantity,
            avg_price: avg,
        }
    }

    #[test]
    fn averaged_with_weights_by_quantity() {
        let avg = holding(10, dec!(100)).averaged_with(30, dec!(200)).unwrap();
        assert_eq!(avg, dec!(175));
    }

    #[test]
    fn averaged_with_rejects_non_positive_total() {
        assert!(holding(0, dec!(100)).averaged_with(0, dec!(1)).is_none());
    }

    #[test]
    fn valued_at_computes_unrealized_pnl() {
        let status = holding(4, dec!(1500)).valued_at(Some(dec!(1525.25)));
        assert_eq!(status.unrealized_pnl, Some(dec!(101.00)));
    }

    #[test]
    fn valued_at_without_price_has_no_pnl() {
        let status = holding(4, dec!(1500)).valued_at(None);
        assert!(status.live_price.is_none());
        assert!(status.unrealized_pnl.is_none());
    }

    #[test]
    fn cost_basis_multiplies_quantity() {
        assert_eq!(holding(3, dec!(10.5)).cost_basis(), dec!(31.5));
    }
}
