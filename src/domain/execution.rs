//! Per-bar execution: apply the strategy rules to one hourly bar.
//!
//! Order within a bar is fixed: the sell rule is checked first against the
//! current position, then the buy rule against whatever the sell left behind.
//! Both can fire on the same bar.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::error::HourtraderError;
use super::ledger::{Action, Transaction};
use super::market::DayPrices;
use super::portfolio::Portfolio;
use super::strategy::{buy_qty, sell_qty, should_buy, should_sell, StrategyParams};

/// Everything the rules need to know about one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarContext {
    pub timestamp: NaiveDateTime,
    pub day: DayPrices,
    pub price: Decimal,
}

/// Evaluate one bar, mutating `portfolio` and returning 0, 1 or 2 records
/// (SELL before BUY).
///
/// `allow_buy` is the caller's per-day gate; the sell rule ignores it.
pub fn evaluate_bar(
    bar: &BarContext,
    portfolio: &mut Portfolio,
    params: &StrategyParams,
    allow_buy: bool,
) -> Result<Vec<Transaction>, HourtraderError> {
    let mut transactions = Vec::with_capacity(2);

    if should_sell(bar.price, portfolio.qty, portfolio.book_cost, params.y_percent) {
        let qty = sell_qty(portfolio.qty);
        portfolio.sell(qty, bar.price)?;
        transactions.push(Transaction::record(
            bar.timestamp,
            &bar.day,
            bar.price,
            Action::Sell,
            qty,
            portfolio,
        ));
    }

    if allow_buy && should_buy(bar.price, bar.day.open, params.x_percent) {
        let qty = buy_qty(params.x_percent);
        portfolio.buy(qty, bar.price);
        transactions.push(Transaction::record(
            bar.timestamp,
            &bar.day,
            bar.price,
            Action::Buy,
            qty,
            portfolio,
        ));
    }

    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn bar(price: Decimal) -> BarContext {
        BarContext {
            timestamp: NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
            day: DayPrices {
                open: Some(dec!(100)),
                close: dec!(102),
            },
            price,
        }
    }

    #[test]
    fn sell_then_buy_on_same_bar() {
        let mut p = Portfolio::new();
        p.buy(dec!(2), dec!(10));
        let params = StrategyParams::default();

        let txns = evaluate_bar(&bar(dec!(98)), &mut p, &params, true).unwrap();

        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].action, Action::Sell);
        assert_eq!(txns[0].transaction_qty, dec!(1));
        assert_eq!(txns[0].portfolio_qty, dec!(1));
        assert_eq!(txns[1].action, Action::Buy);
        assert_eq!(txns[1].transaction_qty, dec!(2));
        assert_eq!(txns[1].portfolio_qty, dec!(3));
        assert_eq!(p.qty, dec!(3));
        // 10 + 196
        assert_eq!(p.book_cost, dec!(206));
        assert_eq!(p.realized_pnl, dec!(88));
    }

    #[test]
    fn buy_blocked_by_gate() {
        let mut p = Portfolio::new();
        let txns =
            evaluate_bar(&bar(dec!(98)), &mut p, &StrategyParams::default(), false).unwrap();
        assert!(txns.is_empty());
        assert!(p.is_flat());
    }

    #[test]
    fn sell_ignores_gate() {
        let mut p = Portfolio::new();
        p.buy(dec!(2), dec!(98));
        let txns =
            evaluate_bar(&bar(dec!(120)), &mut p, &StrategyParams::default(), false).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].action, Action::Sell);
        assert_eq!(txns[0].portfolio_value, dec!(120));
        assert_eq!(txns[0].portfolio_book_cost, dec!(98));
    }

    #[test]
    fn quiet_bar_emits_nothing() {
        let mut p = Portfolio::new();
        p.buy(dec!(2), dec!(98));
        let before = p.clone();
        let txns =
            evaluate_bar(&bar(dec!(99)), &mut p, &StrategyParams::default(), true).unwrap();
        assert!(txns.is_empty());
        assert_eq!(p, before);
    }

    #[test]
    fn missing_open_disables_buy() {
        let mut p = Portfolio::new();
        let mut ctx = bar(dec!(1));
        ctx.day.open = None;
        let txns = evaluate_bar(&ctx, &mut p, &StrategyParams::default(), true).unwrap();
        assert!(txns.is_empty());
    }
}
