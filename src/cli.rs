//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::format::{fmt_price, fmt_qty};
use crate::domain::backtest::{run_backtest, BacktestResult};
use crate::domain::config_validation::{
    check_x_percent, check_y_percent, parse_date_range, validate_config,
};
use crate::domain::error::HourtraderError;
use crate::domain::market::DateRange;
use crate::domain::metrics::{equity_curve, max_drawdown, LedgerStats};
use crate::domain::strategy::{StrategyParams, DEFAULT_X_PERCENT, DEFAULT_Y_PERCENT};
use crate::domain::universe::{load_universe, parse_symbols, SkippedSymbol};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "hourtrader", about = "Hourly dip-buying strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Single symbol, replaces the configured list
        #[arg(long)]
        symbol: Option<String>,
        /// BUY when price falls X% below the day's open; buys X shares
        #[arg(short = 'x', long)]
        x_percent: Option<u32>,
        /// SELL half when value reaches Y% of book cost
        #[arg(short = 'y', long)]
        y_percent: Option<u32>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show available symbols, or the data range for one symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub symbol: Option<String>,
    pub x_percent: Option<u32>,
    pub y_percent: Option<u32>,
    pub output_dir: Option<PathBuf>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub symbols: Vec<String>,
    pub range: Option<DateRange>,
    pub params: StrategyParams,
    pub output_dir: PathBuf,
}

/// Outcome of one symbol's run.
#[derive(Debug)]
pub struct SymbolRun {
    pub symbol: String,
    pub result: BacktestResult,
    pub report_path: PathBuf,
}

/// Every symbol of one invocation: those that ran and those refused at load.
#[derive(Debug)]
pub struct BatchRun {
    pub runs: Vec<SymbolRun>,
    pub skipped: Vec<SkippedSymbol>,
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            symbol,
            x_percent,
            y_percent,
            output_dir,
            dry_run,
        } => {
            let overrides = Overrides {
                symbol,
                x_percent,
                y_percent,
                output_dir,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_backtest_command(&config, &overrides)
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, HourtraderError> {
    info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn resolve_symbols(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, HourtraderError> {
    let raw = symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("data", "symbols"))
        .or_else(|| config.get_string("data", "symbol"))
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| HourtraderError::missing("data", "symbol"))?;
    Ok(parse_symbols(&raw)?)
}

fn configured_percent(config: &dyn ConfigPort, key: &str, default: u32) -> u32 {
    u32::try_from(config.get_int("strategy", key, i64::from(default))).unwrap_or(default)
}

/// Merge the validated config file with command-line overrides.
pub fn build_run_config(
    config: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<RunConfig, HourtraderError> {
    let data_dir = config
        .get_string("data", "data_dir")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| HourtraderError::missing("data", "data_dir"))?;

    let symbols = resolve_symbols(overrides.symbol.as_deref(), config)?;
    let range = parse_date_range(config)?;

    let x_percent = match overrides.x_percent {
        Some(x) => check_x_percent(x)?,
        None => check_x_percent(configured_percent(config, "x_percent", DEFAULT_X_PERCENT))?,
    };
    let y_percent = match overrides.y_percent {
        Some(y) => check_y_percent(y)?,
        None => check_y_percent(configured_percent(config, "y_percent", DEFAULT_Y_PERCENT))?,
    };

    let output_dir = overrides
        .output_dir
        .clone()
        .or_else(|| config.get_string("report", "output_dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(RunConfig {
        data_dir,
        symbols,
        range,
        params: StrategyParams {
            x_percent,
            y_percent,
        },
        output_dir,
    })
}

pub fn report_path(output_dir: &Path, symbol: &str) -> PathBuf {
    output_dir.join(format!("{symbol}_trades.csv"))
}

fn run_backtest_command(config_path: &Path, overrides: &Overrides) -> Result<(), HourtraderError> {
    // Stage 1: Load and validate config
    let adapter = load_config(config_path)?;
    validate_config(&adapter)?;

    // Stage 2: Resolve run settings
    let run_config = build_run_config(&adapter, overrides)?;

    // Stage 3: Load data, run, report
    let data_port = CsvPriceAdapter::new(run_config.data_dir.clone());
    let batch = run_backtest_pipeline(&data_port, &CsvReportAdapter, &run_config)?;

    // Stage 4: Console summary
    for run in &batch.runs {
        print_summary(run);
    }
    print_skipped(&batch.skipped);
    Ok(())
}

/// Load every configured symbol, backtest each with its own portfolio and
/// write its ledger. Symbols without data are skipped; an engine error aborts.
pub fn run_backtest_pipeline(
    data_port: &dyn PriceDataPort,
    report_port: &dyn ReportPort,
    run_config: &RunConfig,
) -> Result<BatchRun, HourtraderError> {
    let params = run_config.params;
    info!(
        symbols = run_config.symbols.len(),
        x_percent = params.x_percent,
        y_percent = params.y_percent,
        "running backtest"
    );

    let universe = load_universe(data_port, run_config.symbols.clone(), run_config.range)?;

    let mut runs = Vec::with_capacity(universe.symbols.len());
    for data in universe.symbols {
        let result = run_backtest(&data.daily, &data.hourly, &params)?;
        let path = report_path(&run_config.output_dir, &data.symbol);
        report_port.write(&data.symbol, &result, &params, &path)?;
        runs.push(SymbolRun {
            symbol: data.symbol,
            result,
            report_path: path,
        });
    }
    Ok(BatchRun {
        runs,
        skipped: universe.skipped,
    })
}

pub fn print_summary(run: &SymbolRun) {
    let result = &run.result;
    println!("\n=== {} ===", run.symbol);
    for (label, value) in result.kpis.entries() {
        let shown = if label.contains("PQ") {
            fmt_qty(value)
        } else {
            fmt_price(value)
        };
        println!("{label:<16}{shown}");
    }

    let stats = LedgerStats::compute(&result.ledger);
    let drawdown = max_drawdown(&equity_curve(&result.ledger));
    println!("{:<16}{}", "Trading Days", stats.trading_days);
    println!(
        "{:<16}{} buys, {} sells, {} holds",
        "Ledger Rows", stats.buys, stats.sells, stats.holds
    );
    println!(
        "{:<16}{}%",
        "Max Drawdown",
        fmt_price(drawdown * Decimal::ONE_HUNDRED)
    );
    println!("{:<16}{}", "Ledger", run.report_path.display());
}

pub fn print_skipped(skipped: &[SkippedSymbol]) {
    if skipped.is_empty() {
        return;
    }
    println!("\n=== Skipped ===");
    for s in skipped {
        println!("{:<16}{}", s.symbol, s.reason);
    }
}

pub fn run_dry_run(config_path: &Path, overrides: &Overrides) -> Result<(), HourtraderError> {
    let adapter = load_config(config_path)?;
    validate_config(&adapter)?;
    let run_config = build_run_config(&adapter, overrides)?;

    println!("Data directory: {}", run_config.data_dir.display());
    println!("Symbols:        {}", run_config.symbols.join(", "));
    match run_config.range {
        Some(range) => println!("Date range:     {} to {}", range.start, range.end),
        None => println!("Date range:     all available"),
    }
    println!(
        "Rules:          BUY {x} shares at <= (1 - {x}/100) x open, once per day",
        x = run_config.params.x_percent
    );
    println!(
        "                SELL 50% when value >= {}% of book cost",
        run_config.params.y_percent
    );
    println!("Output:         {}", run_config.output_dir.display());
    info!("dry run complete: configuration is valid");
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), HourtraderError> {
    let adapter = load_config(config_path)?;
    validate_config(&adapter)?;
    info!("configuration is valid");
    Ok(())
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> Result<(), HourtraderError> {
    let adapter = load_config(config_path)?;
    let data_dir = adapter
        .get_string("data", "data_dir")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| HourtraderError::missing("data", "data_dir"))?;
    let data_port = CsvPriceAdapter::new(PathBuf::from(data_dir));

    match symbol {
        Some(symbol) => {
            let symbol = symbol.trim().to_uppercase();
            println!("{}", describe_symbol(&data_port, &symbol)?);
        }
        None => {
            let symbols = data_port.list_symbols()?;
            if symbols.is_empty() {
                warn!("no symbols found");
            }
            for s in &symbols {
                println!("{s}");
            }
        }
    }
    Ok(())
}

/// One-line summary of the price history available for `symbol`.
pub fn describe_symbol(
    data_port: &dyn PriceDataPort,
    symbol: &str,
) -> Result<String, HourtraderError> {
    let daily = data_port.fetch_daily(symbol, None)?;
    let hourly = data_port.fetch_hourly(symbol, None)?;

    match (daily.first_date(), daily.last_date()) {
        (Some(first), Some(last)) => Ok(format!(
            "{symbol}: {} days, {} hourly bars, {first} to {last}",
            daily.len(),
            hourly.len()
        )),
        _ => Ok(format!("{symbol}: no daily data, {} hourly bars", hourly.len())),
    }
}
