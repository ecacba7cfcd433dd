//! CSV ledger report adapter implementing ReportPort.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::info;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::HourtraderError;
use crate::domain::ledger::{Ledger, Transaction};
use crate::domain::money::{round_currency, round_qty, CURRENCY_DP, QTY_DP};
use crate::domain::strategy::StrategyParams;
use crate::ports::report_port::ReportPort;

pub const LEDGER_HEADERS: [&str; 9] = [
    "Date",
    "Open Price",
    "Close Price",
    "Transaction Price",
    "Action",
    "Portfolio Value",
    "Portfolio Book Cost",
    "Transaction Quantity",
    "Portfolio Quantity",
];

pub struct CsvReportAdapter;

// Decimal precision formatting truncates, so round first.
fn price(value: Decimal) -> String {
    format!("{:.*}", CURRENCY_DP as usize, round_currency(value))
}

fn qty(value: Decimal) -> String {
    format!("{:.*}", QTY_DP as usize, round_qty(value))
}

fn row(txn: &Transaction) -> [String; 9] {
    [
        txn.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        txn.day_open.map(price).unwrap_or_default(),
        price(txn.day_close),
        price(txn.transaction_price),
        txn.action.to_string(),
        price(txn.portfolio_value),
        price(txn.portfolio_book_cost),
        qty(txn.transaction_qty),
        qty(txn.portfolio_qty),
    ]
}

/// Serialize the ledger as CSV into `writer`.
pub fn write_ledger<W: std::io::Write>(ledger: &Ledger, writer: W) -> Result<(), HourtraderError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(LEDGER_HEADERS)?;
    for txn in ledger {
        wtr.write_record(row(txn))?;
    }
    wtr.flush()?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        symbol: &str,
        result: &BacktestResult,
        params: &StrategyParams,
        output_path: &Path,
    ) -> Result<(), HourtraderError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(output_path)?;
        write_ledger(&result.ledger, file)?;
        info!(
            symbol,
            x_percent = params.x_percent,
            y_percent = params.y_percent,
            rows = result.ledger.len(),
            path = %output_path.display(),
            "ledger written"
        );
        Ok(())
    }
}
