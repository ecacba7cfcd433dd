//! Buy-the-dip / take-profit rules.
//!
//! Pure functions over a price and a portfolio snapshot. Nothing here mutates
//! state; [`crate::domain::execution`] applies the decisions.

use rust_decimal::Decimal;

use super::money::{percent, round_qty};

pub const DEFAULT_X_PERCENT: u32 = 2;
pub const DEFAULT_Y_PERCENT: u32 = 110;

pub const X_PERCENT_RANGE: std::ops::RangeInclusive<u32> = 1..=20;
pub const Y_PERCENT_RANGE: std::ops::RangeInclusive<u32> = 101..=200;

/// Run parameters.
///
/// `x_percent` is both the dip below the day's open that triggers a BUY and
/// the number of shares bought. `y_percent` is the portfolio value, as a
/// percentage of book cost, at which half the position is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyParams {
    pub x_percent: u32,
    pub y_percent: u32,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            x_percent: DEFAULT_X_PERCENT,
            y_percent: DEFAULT_Y_PERCENT,
        }
    }
}

/// True when `price * qty >= (y_percent / 100) * book_cost` on a non-empty
/// position.
pub fn should_sell(price: Decimal, qty: Decimal, book_cost: Decimal, y_percent: u32) -> bool {
    if qty <= Decimal::ZERO {
        return false;
    }
    price * qty >= percent(y_percent) * book_cost
}

/// Half the current position.
pub fn sell_qty(qty: Decimal) -> Decimal {
    round_qty(qty * Decimal::new(5, 1))
}

/// True when `price <= (1 - x_percent / 100) * day_open`. Never fires without
/// a day open.
pub fn should_buy(price: Decimal, day_open: Option<Decimal>, x_percent: u32) -> bool {
    match day_open {
        Some(open) => price <= buy_threshold(open, x_percent),
        None => false,
    }
}

pub fn buy_threshold(day_open: Decimal, x_percent: u32) -> Decimal {
    (Decimal::ONE - percent(x_percent)) * day_open
}

/// Whole shares to buy: equal to `x_percent`.
pub fn buy_qty(x_percent: u32) -> Decimal {
    Decimal::from(x_percent)
}
