//! Single-asset position with proportional cost-basis accounting.

use rust_decimal::Decimal;

use super::error::HourtraderError;
use super::money::{round_currency, round_qty};

/// Running position state for one backtest.
///
/// `qty` is kept at 4 decimal places, `book_cost` and `realized_pnl` at 2.
/// The only mutations are [`Portfolio::buy`] and [`Portfolio::sell`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    pub qty: Decimal,
    pub book_cost: Decimal,
    pub realized_pnl: Decimal,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Market value of the held quantity at `price`, rounded to cents.
    pub fn value(&self, price: Decimal) -> Decimal {
        round_currency(price * self.qty)
    }

    /// Buy `qty` units at `price`. There is no cash constraint.
    pub fn buy(&mut self, qty: Decimal, price: Decimal) {
        let qty = round_qty(qty);
        let price = round_currency(price);

        self.qty += qty;
        self.book_cost = round_currency(self.book_cost + round_currency(qty * price));
    }

    /// Sell `qty` units at `price`, relieving book cost in proportion to the
    /// fraction of the position sold.
    ///
    /// Selling more than is held fails with [`HourtraderError::Oversell`] and
    /// leaves the portfolio untouched. A zero sell from an empty position is
    /// a no-op.
    pub fn sell(&mut self, qty: Decimal, price: Decimal) -> Result<(), HourtraderError> {
        if qty > self.qty {
            return Err(HourtraderError::Oversell {
                requested: qty,
                held: self.qty,
            });
        }
        if self.qty.is_zero() {
            return Ok(());
        }

        let qty = round_qty(qty);
        let price = round_currency(price);

        let cost_relieved = round_currency(self.book_cost * (qty / self.qty));
        self.book_cost = round_currency(self.book_cost - cost_relieved);
        self.qty = round_qty(self.qty - qty);

        let proceeds = round_currency(price * qty);
        self.realized_pnl = round_currency(self.realized_pnl + proceeds - cost_relieved);
        Ok(())
    }

    pub fn is_flat(&self) -> bool {
        self.qty.is_zero()
    }
}
