//! Symbol universe for batch runs.
//!
//! Parses symbol lists from configuration and loads the price history of each
//! symbol, skipping symbols whose data is missing. Every loaded symbol is
//! backtested on its own with an independent portfolio.

use crate::domain::error::HourtraderError;
use crate::domain::market::{DailyContext, DateRange, HourlyBar};
use crate::ports::data_port::PriceDataPort;
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Price history for one symbol, ready to backtest.
#[derive(Debug, Clone)]
pub struct SymbolData {
    pub symbol: String,
    pub daily: DailyContext,
    pub hourly: Vec<HourlyBar>,
}

#[derive(Debug)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: HourtraderError,
}

pub struct LoadedUniverse {
    pub symbols: Vec<SymbolData>,
    pub skipped: Vec<SkippedSymbol>,
}

/// Fetch both series for `symbol`. A symbol with no daily rows or no hourly
/// rows is reported as [`HourtraderError::InsufficientData`].
pub fn load_symbol(
    data_port: &dyn PriceDataPort,
    symbol: &str,
    range: Option<DateRange>,
) -> Result<SymbolData, HourtraderError> {
    let daily = data_port.fetch_daily(symbol, range)?;
    let hourly = data_port.fetch_hourly(symbol, range)?;

    if daily.is_empty() || hourly.is_empty() {
        return Err(HourtraderError::InsufficientData {
            symbol: symbol.to_string(),
            daily: daily.len(),
            hourly: hourly.len(),
        });
    }

    Ok(SymbolData {
        symbol: symbol.to_string(),
        daily,
        hourly,
    })
}

/// Load every symbol, collecting failures instead of aborting. Fails only when
/// no symbol could be loaded.
pub fn load_universe(
    data_port: &dyn PriceDataPort,
    symbols: Vec<String>,
    range: Option<DateRange>,
) -> Result<LoadedUniverse, HourtraderError> {
    let total = symbols.len();
    let mut loaded = Vec::new();
    let mut skipped = Vec::new();

    for symbol in symbols {
        match load_symbol(data_port, &symbol, range) {
            Ok(data) => {
                info!(
                    symbol = %symbol,
                    days = data.daily.len(),
                    bars = data.hourly.len(),
                    "loaded"
                );
                loaded.push(data);
            }
            Err(reason) => {
                warn!(symbol = %symbol, error = %reason, "skipping");
                skipped.push(SkippedSymbol { symbol, reason });
            }
        }
    }

    if loaded.is_empty() {
        return Err(match skipped.pop() {
            Some(last) if total == 1 => last.reason,
            _ => HourtraderError::NoSymbolsLoaded { attempted: total },
        });
    }

    if !skipped.is_empty() {
        warn!("backtesting {} of {} symbols", loaded.len(), total);
    }

    Ok(LoadedUniverse {
        symbols: loaded,
        skipped,
    })
}
