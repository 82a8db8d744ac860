//! TrialScope CLI — clinical-trial catalyst backtester.
//!
//! Commands:
//! - `run` — query the trials registry per company, fetch price history,
//!   resolve windows, write the CSV report, print the aggregate average
//! - `names` — preview the cleaned company list without network access

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trialscope_core::companies::load_companies;
use trialscope_core::config::BacktestConfig;
use trialscope_core::pipeline::{run_backtest, StdoutProgress};
use trialscope_core::prices::AlphaVantageProvider;
use trialscope_core::registry::ClassicCtgovRegistry;

#[derive(Parser)]
#[command(name = "trialscope", about = "Clinical-trial catalyst backtester")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the backtest and write the CSV report.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Company list CSV (name in column 1, ticker in column 2).
        #[arg(long)]
        list: Option<PathBuf>,

        /// Report destination. Defaults to results/output.csv.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Alpha Vantage API key (falls back to the ALPHA_VANTAGE env var).
        #[arg(long)]
        api_key: Option<String>,

        /// Treat this date as "today" for the started-trial cutoff (YYYY-MM-DD).
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Print the cleaned (name, ticker) pairs from a company list.
    Names {
        /// Company list CSV. Defaults to lists/nasdaq.csv.
        #[arg(long)]
        list: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            list,
            output,
            api_key,
            as_of,
        } => run_cmd(config, list, output, api_key, as_of),
        Commands::Names { list } => names_cmd(list),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<BacktestConfig> {
    match path {
        Some(path) => Ok(BacktestConfig::from_file(&path)?),
        None => Ok(BacktestConfig::default()),
    }
}

fn run_cmd(
    config: Option<PathBuf>,
    list: Option<PathBuf>,
    output: Option<PathBuf>,
    api_key: Option<String>,
    as_of: Option<String>,
) -> Result<()> {
    let mut config = load_config(config)?;

    // Flags override config-file values, which override defaults.
    if let Some(list) = list {
        config.company_list = list;
    }
    if let Some(output) = output {
        config.output_path = output;
    }
    if let Some(key) = api_key {
        config.prices.api_key = Some(key);
    }
    if let Some(as_of) = as_of.as_deref() {
        config.as_of = Some(NaiveDate::parse_from_str(as_of, "%Y-%m-%d")?);
    }

    let registry = ClassicCtgovRegistry::new(config.registry.clone());
    let prices = AlphaVantageProvider::new(&config.prices)?;

    let summary = run_backtest(&config, &registry, &prices, &StdoutProgress)?;

    println!("Average percent change: {:.2}%", summary.average_percent);
    Ok(())
}

fn names_cmd(list: Option<PathBuf>) -> Result<()> {
    let defaults = BacktestConfig::default();
    let list = list.unwrap_or(defaults.company_list);

    let companies = load_companies(&list, &defaults.corporate_suffixes)?;
    for company in &companies {
        println!("{:6} {}", company.ticker, company.name);
    }
    println!("{} companies", companies.len());
    Ok(())
}
