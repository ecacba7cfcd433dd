//! Run summary: KPIs, daily equity curve and drawdown.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ledger::{Action, Ledger, Transaction};
use super::money::round_currency;
use super::portfolio::Portfolio;

#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub final_qty: Decimal,
    pub final_value: Decimal,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub total_buys: Decimal,
    pub total_sells: Decimal,
}

impl Kpis {
    /// Summarise the final portfolio, valued at `last_price`.
    pub fn compute(portfolio: &Portfolio, ledger: &Ledger, last_price: Decimal) -> Self {
        let final_value = portfolio.value(last_price);
        Kpis {
            final_qty: portfolio.qty,
            final_value,
            realized_pnl: portfolio.realized_pnl,
            unrealized_pnl: round_currency(final_value - portfolio.book_cost),
            total_buys: ledger.total_qty(Action::Buy),
            total_sells: ledger.total_qty(Action::Sell),
        }
    }

    /// `(label, value)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, Decimal); 6] {
        [
            ("Final PQ", self.final_qty),
            ("Final PV", self.final_value),
            ("Realized PnL", self.realized_pnl),
            ("Unrealized PnL", self.unrealized_pnl),
            ("Total Buys", self.total_buys),
            ("Total Sells", self.total_sells),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

fn cash_flow(txn: &Transaction) -> Decimal {
    let amount = round_currency(round_currency(txn.transaction_price) * txn.transaction_qty);
    match txn.action {
        Action::Buy => -amount,
        Action::Sell => amount,
        Action::Hold => Decimal::ZERO,
    }
}

/// Largest net cash outlay reached over the run, used as the starting
/// balance of the equity curve.
pub fn capital_employed(ledger: &Ledger) -> Decimal {
    let mut cash = Decimal::ZERO;
    let mut lowest = Decimal::ZERO;
    for txn in ledger {
        cash += cash_flow(txn);
        lowest = lowest.min(cash);
    }
    -lowest
}

/// Total equity (cash plus position value) at the last ledger row of each
/// trading day. Cash starts at [`capital_employed`], so it never goes negative.
pub fn equity_curve(ledger: &Ledger) -> Vec<EquityPoint> {
    let mut cash = capital_employed(ledger);
    let mut curve: Vec<EquityPoint> = Vec::new();
    for txn in ledger {
        cash += cash_flow(txn);
        let date = txn.date();
        let value = cash + txn.portfolio_value;
        match curve.last_mut() {
            Some(point) if point.date == date => point.value = value,
            _ => curve.push(EquityPoint { date, value }),
        }
    }
    curve
}

/// Largest peak-to-trough decline as a fraction of the peak.
pub fn max_drawdown(curve: &[EquityPoint]) -> Decimal {
    let Some(first) = curve.first() else {
        return Decimal::ZERO;
    };

    let mut peak = first.value;
    let mut max_dd = Decimal::ZERO;
    for point in curve {
        if point.value > peak {
            peak = point.value;
        } else if peak > Decimal::ZERO {
            let dd = (peak - point.value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStats {
    pub trading_days: usize,
    pub buys: usize,
    pub sells: usize,
    pub holds: usize,
}

impl LedgerStats {
    pub fn compute(ledger: &Ledger) -> Self {
        let mut trading_days = 0;
        let mut last_date = None;
        for txn in ledger {
            let date = txn.date();
            if last_date != Some(date) {
                trading_days += 1;
                last_date = Some(date);
            }
        }
        LedgerStats {
            trading_days,
            buys: ledger.count(Action::Buy),
            sells: ledger.count(Action::Sell),
            holds: ledger.count(Action::Hold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::DayPrices;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn prices() -> DayPrices {
        DayPrices {
            open: Some(dec!(100)),
            close: dec!(100),
        }
    }

    fn curve(values: &[Decimal]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| EquityPoint {
                date: day(i as u32 + 1),
                value,
            })
            .collect()
    }

    #[test]
    fn kpis_from_portfolio_and_ledger() {
        let mut p = Portfolio::new();
        let mut ledger = Ledger::new();
        let ts = day(1).and_hms_opt(10, 0, 0).unwrap();

        p.buy(dec!(2), dec!(98));
        ledger.push(Transaction::record(ts, &prices(), dec!(98), Action::Buy, dec!(2), &p));
        p.sell(dec!(1), dec!(120)).unwrap();
        ledger.push(Transaction::record(ts, &prices(), dec!(120), Action::Sell, dec!(1), &p));

        let k = Kpis::compute(&p, &ledger, dec!(120));
        assert_eq!(k.final_qty, dec!(1));
        assert_eq!(k.final_value, dec!(120));
        assert_eq!(k.realized_pnl, dec!(22));
        assert_eq!(k.unrealized_pnl, dec!(22));
        assert_eq!(k.total_buys, dec!(2));
        assert_eq!(k.total_sells, dec!(1));
        assert_eq!(k.entries()[0].0, "Final PQ");
    }

    #[test]
    fn kpis_for_empty_run_are_zero() {
        let k = Kpis::compute(&Portfolio::new(), &Ledger::new(), Decimal::ZERO);
        for (_, value) in k.entries() {
            assert_eq!(value, Decimal::ZERO);
        }
    }

    #[test]
    fn equity_curve_takes_last_row_per_day() {
        let mut p = Portfolio::new();
        let mut ledger = Ledger::new();
        let ts = |d: u32, h: u32| day(d).and_hms_opt(h, 0, 0).unwrap();

        p.buy(dec!(2), dec!(98));
        ledger.push(Transaction::record(ts(1, 10), &prices(), dec!(98), Action::Buy, dec!(2), &p));
        p.sell(dec!(1), dec!(120)).unwrap();
        ledger.push(Transaction::record(ts(1, 12), &prices(), dec!(120), Action::Sell, dec!(1), &p));
        ledger.push(Transaction::hold(day(2), &prices(), &p));

        // funded with the 196 spent on day one
        assert_eq!(capital_employed(&ledger), dec!(196));
        let curve = equity_curve(&ledger);
        assert_eq!(curve.len(), 2);
        assert_eq!(curve[0].value, dec!(240));
        assert_eq!(curve[1].value, dec!(220));

        let stats = LedgerStats::compute(&ledger);
        assert_eq!(stats.trading_days, 2);
        assert_eq!(stats.buys, 1);
        assert_eq!(stats.sells, 1);
        assert_eq!(stats.holds, 1);
    }

    #[test]
    fn take_profit_sell_is_not_a_drawdown() {
        let mut p = Portfolio::new();
        let mut ledger = Ledger::new();
        let ts = |d: u32| day(d).and_hms_opt(10, 0, 0).unwrap();

        p.buy(dec!(2), dec!(98));
        ledger.push(Transaction::record(ts(1), &prices(), dec!(98), Action::Buy, dec!(2), &p));
        p.buy(dec!(2), dec!(107));
        ledger.push(Transaction::record(ts(2), &prices(), dec!(107), Action::Buy, dec!(2), &p));
        p.sell(dec!(2), dec!(130)).unwrap();
        ledger.push(Transaction::record(ts(3), &prices(), dec!(130), Action::Sell, dec!(2), &p));

        assert_eq!(capital_employed(&ledger), dec!(410));
        let values: Vec<_> = equity_curve(&ledger).iter().map(|e| e.value).collect();
        assert_eq!(values, vec![dec!(410), dec!(428), dec!(520)]);
        assert_eq!(max_drawdown(&equity_curve(&ledger)), Decimal::ZERO);
    }

    #[test]
    fn losing_position_shows_drawdown() {
        let mut p = Portfolio::new();
        let mut ledger = Ledger::new();
        let ts = day(1).and_hms_opt(10, 0, 0).unwrap();
        let weak = DayPrices {
            open: Some(dec!(100)),
            close: dec!(90),
        };

        p.buy(dec!(2), dec!(98));
        ledger.push(Transaction::record(ts, &prices(), dec!(98), Action::Buy, dec!(2), &p));
        ledger.push(Transaction::hold(day(2), &weak, &p));

        // 196 -> 180
        let dd = max_drawdown(&equity_curve(&ledger));
        assert_eq!(dd, dec!(16) / dec!(196));
    }

    #[test]
    fn max_drawdown_peak_to_trough() {
        let c = curve(&[dec!(100), dec!(110), dec!(90), dec!(95), dec!(88), dec!(100)]);
        assert_eq!(max_drawdown(&c), dec!(0.2));
    }

    #[test]
    fn max_drawdown_flat_or_empty() {
        assert_eq!(max_drawdown(&[]), Decimal::ZERO);
        assert_eq!(max_drawdown(&curve(&[dec!(0), dec!(0)])), Decimal::ZERO);
        assert_eq!(max_drawdown(&curve(&[dec!(1), dec!(2), dec!(3)])), Decimal::ZERO);
    }
}
