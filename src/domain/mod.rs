//! Core domain types and logic.

pub mod money;
pub mod market;
pub mod portfolio;
pub mod strategy;
pub mod ledger;
pub mod execution;
pub mod backtest;
pub mod metrics;
pub mod universe;
pub mod config_validation;
pub mod error;
