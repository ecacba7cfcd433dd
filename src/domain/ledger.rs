//! Transaction ledger.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fmt;

use super::market::DayPrices;
use super::portfolio::Portfolio;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ledger row. Portfolio fields describe the state after the action.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub timestamp: NaiveDateTime,
    pub day_open: Option<Decimal>,
    pub day_close: Decimal,
    pub transaction_price: Decimal,
    pub action: Action,
    pub portfolio_value: Decimal,
    pub portfolio_book_cost: Decimal,
    pub transaction_qty: Decimal,
    pub portfolio_qty: Decimal,
}

impl Transaction {
    /// Snapshot `portfolio` right after `action` executed at `price`.
    pub fn record(
        timestamp: NaiveDateTime,
        day: &DayPrices,
        price: Decimal,
        action: Action,
        qty: Decimal,
        portfolio: &Portfolio,
    ) -> Self {
        Transaction {
            timestamp,
            day_open: day.open,
            day_close: day.close,
            transaction_price: price,
            action,
            portfolio_value: portfolio.value(price),
            portfolio_book_cost: portfolio.book_cost,
            transaction_qty: qty,
            portfolio_qty: portfolio.qty,
        }
    }

    /// Synthetic row for a day without trades, priced at the day's close.
    pub fn hold(date: NaiveDate, day: &DayPrices, portfolio: &Portfolio) -> Self {
        Transaction::record(
            date.and_time(chrono::NaiveTime::MIN),
            day,
            day.close,
            Action::Hold,
            Decimal::ZERO,
            portfolio,
        )
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Append-only, chronological list of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    rows: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, txn: Transaction) {
        self.rows.push(txn);
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.rows.iter().map(|t| t.action).collect()
    }

    /// Sum of `transaction_qty` over rows with `action`.
    pub fn total_qty(&self, action: Action) -> Decimal {
        self.rows
            .iter()
            .filter(|t| t.action == action)
            .map(|t| t.transaction_qty)
            .sum()
    }

    pub fn count(&self, action: Action) -> usize {
        self.rows.iter().filter(|t| t.action == action).count()
    }
}

impl Extend<Transaction> for Ledger {
    fn extend<I: IntoIterator<Item = Transaction>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
