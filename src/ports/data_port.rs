//! Price data port.

use crate::domain::error::HourtraderError;
use crate::domain::market::{DailyContext, DateRange, HourlyBar};

/// Source of already-materialized price history for one symbol.
pub trait PriceDataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        range: Option<DateRange>,
    ) -> Result<DailyContext, HourtraderError>;

    /// Hourly closes sorted by timestamp.
    fn fetch_hourly(
        &self,
        symbol: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<HourlyBar>, HourtraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, HourtraderError>;
}
