//! Domain error types.

use rust_decimal::Decimal;

use crate::domain::universe::UniverseError;

/// Top-level error type for hourtrader.
#[derive(Debug, thiserror::Error)]
pub enum HourtraderError {
    #[error("cannot sell {requested} units, only {held} held")]
    Oversell { requested: Decimal, held: Decimal },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: {daily} daily rows, {hourly} hourly rows")]
    InsufficientData {
        symbol: String,
        daily: usize,
        hourly: usize,
    },

    #[error("none of the {attempted} symbols had usable data")]
    NoSymbolsLoaded { attempted: usize },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HourtraderError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        HourtraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        HourtraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&HourtraderError> for std::process::ExitCode {
    fn from(err: &HourtraderError) -> Self {
        let code: u8 = match err {
            HourtraderError::Io(_) => 1,
            HourtraderError::ConfigParse { .. }
            | HourtraderError::ConfigMissing { .. }
            | HourtraderError::ConfigInvalid { .. }
            | HourtraderError::Universe(_) => 2,
            HourtraderError::Data { .. } | HourtraderError::Csv(_) => 3,
            HourtraderError::Oversell { .. } => 4,
            HourtraderError::NoData { .. }
            | HourtraderError::InsufficientData { .. }
            | HourtraderError::NoSymbolsLoaded { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
