#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use hourtrader::domain::error::HourtraderError;
use hourtrader::domain::market::{DailyContext, DateRange, HourlyBar};
use hourtrader::ports::data_port::PriceDataPort;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

pub struct MockPriceDataPort {
    pub daily: HashMap<String, DailyContext>,
    pub hourly: HashMap<String, Vec<HourlyBar>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            daily: HashMap::new(),
            hourly: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_symbol(mut self, symbol: &str, daily: DailyContext, hourly: Vec<HourlyBar>) -> Self {
        self.daily.insert(symbol.to_string(), daily);
        self.hourly.insert(symbol.to_string(), hourly);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn check(&self, symbol: &str) -> Result<(), HourtraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(HourtraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(())
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        range: Option<DateRange>,
    ) -> Result<DailyContext, HourtraderError> {
        self.check(symbol)?;
        let daily = self
            .daily
            .get(symbol)
            .ok_or_else(|| HourtraderError::NoData {
                symbol: symbol.to_string(),
            })?;
        Ok(daily
            .iter()
            .filter(|(date, _)| range.is_none_or(|r| r.contains(**date)))
            .map(|(date, day)| (*date, *day))
            .collect())
    }

    fn fetch_hourly(
        &self,
        symbol: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<HourlyBar>, HourtraderError> {
        self.check(symbol)?;
        let bars = self
            .hourly
            .get(symbol)
            .ok_or_else(|| HourtraderError::NoData {
                symbol: symbol.to_string(),
            })?;
        Ok(bars
            .iter()
            .filter(|b| range.is_none_or(|r| r.contains(b.date())))
            .cloned()
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, HourtraderError> {
        let mut symbols: Vec<_> = self.daily.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, 0, 0).unwrap()
}

/// One day with the given open and close.
pub fn daily_of(days: &[(NaiveDate, Option<&str>, &str)]) -> DailyContext {
    let mut daily = DailyContext::new();
    for (day, open, close) in days {
        daily.insert(*day, open.map(dec), dec(close));
    }
    daily
}

/// Hourly bars on `day`, starting at 10:00, one per hour.
pub fn hours(day: NaiveDate, closes: &[&str]) -> Vec<HourlyBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| HourlyBar::new(at(day, 10 + i as u32), dec(c)))
        .collect()
}

/// Daily context whose open is 100 on every day and whose close is the last
/// hourly close of that day (or 100 when the day has no bars).
pub fn daily_for(bars: &[HourlyBar], days: &[NaiveDate]) -> DailyContext {
    let mut daily = DailyContext::new();
    for day in days {
        let close = bars
            .iter()
            .filter(|b| b.date() == *day)
            .last()
            .map(|b| b.close)
            .unwrap_or(Decimal::ONE_HUNDRED);
        daily.insert(*day, Some(Decimal::ONE_HUNDRED), close);
    }
    daily
}

/// The reference scenario: open 100, bars 98, 97, 120 on one day.
pub fn reference_day() -> (DailyContext, Vec<HourlyBar>) {
    let day = date(2023, 1, 1);
    let daily = daily_of(&[(day, Some("100"), "102")]);
    (daily, hours(day, &["98", "97", "120"]))
}
