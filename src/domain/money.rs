//! Decimal rounding for quantities and currency amounts.
//!
//! Quantities are held at 4 decimal places and currency amounts at 2. Every
//! accounting step rounds its intermediate result with [`round_qty`] or
//! [`round_currency`] rather than rounding once at the end, so a long run of
//! bars produces the same figures as a ledger kept by hand.

use rust_decimal::{Decimal, RoundingStrategy};

pub const QTY_DP: u32 = 4;
pub const CURRENCY_DP: u32 = 2;

const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

/// Round a share quantity to [`QTY_DP`] places (half to even).
pub fn round_qty(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(QTY_DP, ROUNDING)
}

/// Round a price or money amount to [`CURRENCY_DP`] places (half to even).
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, ROUNDING)
}

/// `percent / 100` as an exact decimal fraction.
pub fn percent(percent: u32) -> Decimal {
    Decimal::from(percent) / Decimal::ONE_HUNDRED
}
