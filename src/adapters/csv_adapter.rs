//! CSV file price adapter.
//!
//! Reads `<SYMBOL>_daily.csv` (`date,open,close`) and `<SYMBOL>_hourly.csv`
//! (`timestamp,close`) from a base directory.

use crate::domain::error::HourtraderError;
use crate::domain::market::{DailyContext, DateRange, HourlyBar};
use crate::ports::data_port::PriceDataPort;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

const DAILY_SUFFIX: &str = "_daily.csv";
const HOURLY_SUFFIX: &str = "_hourly.csv";

const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, suffix: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}{suffix}"))
    }

    fn read(&self, symbol: &str, suffix: &str) -> Result<csv::Reader<std::fs::File>, HourtraderError> {
        let path = self.csv_path(symbol, suffix);
        if !path.exists() {
            return Err(HourtraderError::NoData {
                symbol: symbol.to_string(),
            });
        }
        csv::Reader::from_path(&path).map_err(|e| HourtraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'r str, HourtraderError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| HourtraderError::Data {
            reason: format!("missing {name} column"),
        })
}

fn parse_decimal(value: &str, name: &str) -> Result<Decimal, HourtraderError> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| HourtraderError::Data {
            reason: format!("invalid {name} value {value:?}: {e}"),
        })
}

/// Parse an hourly timestamp, keeping the wall-clock time of any offset.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, HourtraderError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.naive_local());
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| HourtraderError::Data {
            reason: format!("invalid timestamp {value:?}"),
        })
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        range: Option<DateRange>,
    ) -> Result<DailyContext, HourtraderError> {
        let mut rdr = self.read(symbol, DAILY_SUFFIX)?;
        let mut daily = DailyContext::new();

        for result in rdr.records() {
            let record = result?;

            let date_str = field(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                HourtraderError::Data {
                    reason: format!("invalid date format {date_str:?}: {e}"),
                }
            })?;

            if range.is_some_and(|r| !r.contains(date)) {
                continue;
            }

            let open = match field(&record, 1, "open")? {
                "" => None,
                raw => Some(parse_decimal(raw, "open")?),
            };
            let close = parse_decimal(field(&record, 2, "close")?, "close")?;

            daily.insert(date, open, close);
        }

        Ok(daily)
    }

    fn fetch_hourly(
        &self,
        symbol: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<HourlyBar>, HourtraderError> {
        let mut rdr = self.read(symbol, HOURLY_SUFFIX)?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result?;

            let timestamp = parse_timestamp(field(&record, 0, "timestamp")?)?;
            if range.is_some_and(|r| !r.contains(timestamp.date())) {
                continue;
            }
            let close = parse_decimal(field(&record, 1, "close")?, "close")?;

            bars.push(HourlyBar::new(timestamp, close));
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, HourtraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| HourtraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(DAILY_SUFFIX) {
                if self.csv_path(symbol, HOURLY_SUFFIX).exists() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
