//! Price inputs: hourly bars and the per-day open/close context.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// One hourly close observation.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyBar {
    pub timestamp: NaiveDateTime,
    pub close: Decimal,
}

impl HourlyBar {
    pub fn new(timestamp: NaiveDateTime, close: Decimal) -> Self {
        HourlyBar { timestamp, close }
    }

    /// Trading day this bar belongs to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Open and close of one trading day. A missing open disables buying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayPrices {
    pub open: Option<Decimal>,
    pub close: Decimal,
}

/// Date-keyed daily open/close, iterated in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyContext {
    days: BTreeMap<NaiveDate, DayPrices>,
}

impl DailyContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, open: Option<Decimal>, close: Decimal) {
        self.days.insert(date, DayPrices { open, close });
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayPrices> {
        self.days.get(&date)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, NaiveDate, DayPrices> {
        self.days.iter()
    }

    /// Close of the latest trading day.
    pub fn last_close(&self) -> Option<Decimal> {
        self.days.values().next_back().map(|d| d.close)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<(NaiveDate, DayPrices)> for DailyContext {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, DayPrices)>>(iter: I) -> Self {
        DailyContext {
            days: iter.into_iter().collect(),
        }
    }
}

/// Inclusive calendar range used to filter price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Split a chronological hourly series into per-day slices, keeping input
/// order within each day.
pub fn group_by_date(bars: &[HourlyBar]) -> BTreeMap<NaiveDate, Vec<&HourlyBar>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&HourlyBar>> = BTreeMap::new();
    for bar in bars {
        grouped.entry(bar.date()).or_default().push(bar);
    }
    grouped
}
