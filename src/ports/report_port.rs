//! Report generation port.

use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::HourtraderError;
use crate::domain::strategy::StrategyParams;

/// Port for writing the transaction ledger of a finished run.
pub trait ReportPort {
    fn write(
        &self,
        symbol: &str,
        result: &BacktestResult,
        params: &StrategyParams,
        output_path: &Path,
    ) -> Result<(), HourtraderError>;
}
