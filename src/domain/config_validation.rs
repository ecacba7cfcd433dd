//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::HourtraderError;
use crate::domain::market::DateRange;
use crate::domain::strategy::{X_PERCENT_RANGE, Y_PERCENT_RANGE};
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::ops::RangeInclusive;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), HourtraderError> {
    validate_data_dir(config)?;
    validate_symbols(config)?;
    validate_date_range(config)?;
    validate_strategy_config(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), HourtraderError> {
    parse_percent(config, "x_percent", X_PERCENT_RANGE)?;
    parse_percent(config, "y_percent", Y_PERCENT_RANGE)?;
    Ok(())
}

/// Range-check a BUY threshold given on the command line.
pub fn check_x_percent(value: u32) -> Result<u32, HourtraderError> {
    check_range("x_percent", value, X_PERCENT_RANGE)
}

/// Range-check a SELL threshold given on the command line.
pub fn check_y_percent(value: u32) -> Result<u32, HourtraderError> {
    check_range("y_percent", value, Y_PERCENT_RANGE)
}

fn check_range(key: &str, value: u32, range: RangeInclusive<u32>) -> Result<u32, HourtraderError> {
    if !range.contains(&value) {
        return Err(HourtraderError::invalid(
            "strategy",
            key,
            format!(
                "{key} must be between {} and {}, got {value}",
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(value)
}

fn parse_percent(
    config: &dyn ConfigPort,
    key: &str,
    range: RangeInclusive<u32>,
) -> Result<Option<u32>, HourtraderError> {
    let Some(raw) = config.get_string("strategy", key) else {
        return Ok(None);
    };
    let value: u32 = raw.trim().parse().map_err(|_| {
        HourtraderError::invalid("strategy", key, format!("{key} must be a whole number"))
    })?;
    check_range(key, value, range).map(Some)
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), HourtraderError> {
    match config.get_string("data", "data_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(HourtraderError::missing("data", "data_dir")),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), HourtraderError> {
    let symbols = config
        .get_string("data", "symbols")
        .or_else(|| config.get_string("data", "symbol"));

    match symbols {
        Some(s) if !s.trim().is_empty() => {
            parse_symbols(&s)?;
            Ok(())
        }
        _ => Err(HourtraderError::missing("data", "symbol")),
    }
}

/// Optional `[data] start_date` / `end_date`. Both or neither must be given.
pub fn parse_date_range(config: &dyn ConfigPort) -> Result<Option<DateRange>, HourtraderError> {
    let start = config.get_string("data", "start_date");
    let end = config.get_string("data", "end_date");

    match (start, end) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(HourtraderError::missing("data", "end_date")),
        (None, Some(_)) => Err(HourtraderError::missing("data", "start_date")),
        (Some(start), Some(end)) => {
            let start = parse_date(&start, "start_date")?;
            let end = parse_date(&end, "end_date")?;
            if start >= end {
                return Err(HourtraderError::invalid(
                    "data",
                    "start_date",
                    "start_date must be before end_date",
                ));
            }
            Ok(Some(DateRange { start, end }))
        }
    }
}

fn validate_date_range(config: &dyn ConfigPort) -> Result<(), HourtraderError> {
    parse_date_range(config).map(|_| ())
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, HourtraderError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        HourtraderError::invalid(
            "data",
            field,
            format!("invalid {field} format, expected YYYY-MM-DD"),
        )
    })
}
