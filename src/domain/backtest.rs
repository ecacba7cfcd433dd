//! Backtest driver: walks trading days and their hourly bars in order.

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::error::HourtraderError;
use super::execution::{evaluate_bar, BarContext};
use super::ledger::{Action, Ledger, Transaction};
use super::market::{group_by_date, DailyContext, HourlyBar};
use super::metrics::Kpis;
use super::portfolio::Portfolio;
use super::strategy::StrategyParams;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub ledger: Ledger,
    pub portfolio: Portfolio,
    pub kpis: Kpis,
}

/// Run the strategy over `daily` and `hourly`.
///
/// Each trading day in `daily` contributes its bars in input order. At most
/// one BUY executes per day; SELL may fire on any bar. A day without any
/// action gets a single HOLD row priced at the day's close. Hourly bars on
/// dates missing from `daily` are ignored.
///
/// Empty inputs are not an error: the ledger is empty (or HOLD-only) and the
/// KPIs are zero.
pub fn run_backtest(
    daily: &DailyContext,
    hourly: &[HourlyBar],
    params: &StrategyParams,
) -> Result<BacktestResult, HourtraderError> {
    let mut portfolio = Portfolio::new();
    let mut ledger = Ledger::new();
    let bars_by_date = group_by_date(hourly);

    for date in daily.dates() {
        let Some(&day) = daily.get(date) else {
            continue;
        };

        let mut bought_today = false;
        let mut day_has_txn = false;

        for bar in bars_by_date.get(&date).into_iter().flatten() {
            let ctx = BarContext {
                timestamp: bar.timestamp,
                day,
                price: bar.close,
            };
            let txns = evaluate_bar(&ctx, &mut portfolio, params, !bought_today)?;
            for txn in &txns {
                debug!(
                    timestamp = %txn.timestamp,
                    action = %txn.action,
                    price = %txn.transaction_price,
                    qty = %txn.transaction_qty,
                    position = %txn.portfolio_qty,
                    "executed"
                );
                if txn.action == Action::Buy {
                    bought_today = true;
                }
            }
            day_has_txn |= !txns.is_empty();
            ledger.extend(txns);
        }

        if !day_has_txn {
            debug!(date = %date, close = %day.close, "hold");
            ledger.push(Transaction::hold(date, &day, &portfolio));
        }
    }

    let kpis = Kpis::compute(&portfolio, &ledger, final_price(daily, hourly));

    info!(
        days = daily.len(),
        bars = hourly.len(),
        rows = ledger.len(),
        final_qty = %kpis.final_qty,
        realized_pnl = %kpis.realized_pnl,
        "backtest complete"
    );

    Ok(BacktestResult {
        ledger,
        portfolio,
        kpis,
    })
}

/// Price used to value the final position: the last hourly close, else the
/// last daily close, else zero.
pub fn final_price(daily: &DailyContext, hourly: &[HourlyBar]) -> Decimal {
    hourly
        .last()
        .map(|bar| bar.close)
        .or_else(|| daily.last_close())
        .unwrap_or(Decimal::ZERO)
}
