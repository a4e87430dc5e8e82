//! rusty-fx CLI - exchange-rate analytics from the command line
//!
//! Works on NBP rate documents (JSON) or CSV files downloaded beforehand.
//!
//! ## Example Usage
//!
//! ```bash
//! # Where to download USD rates for the last month
//! rusty-fx url USD --period MONTH
//!
//! # Statistics and sessions of USD over the last quarter
//! rusty-fx report USD --period QUARTER --data ./rates
//!
//! # EUR/USD change distribution for a month starting on a given day
//! rusty-fx distribution EUR/USD --begin 2025-01-02 --ranges 10 --data ./rates
//!
//! # Currencies listed in downloaded tables
//! rusty-fx codes --table-a tables_a.json --table-b tables_b.json
//! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rusty_fx_analyzer::analysis::distribution::{
    max_count, DistributionMode, DistributionOptions,
};
use rusty_fx_analyzer::config::AnalyzerConfig;
use rusty_fx_analyzer::currency::{CurrencyCode, CurrencyPair, TableType};
use rusty_fx_analyzer::data::{self, nbp, InMemoryRateSource};
use rusty_fx_analyzer::period::{parse_date, AnalysisWindow, Period};
use rusty_fx_analyzer::report::{
    format_measure, format_percentage, AnalysisReport, DistributionReport,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// rusty-fx: exchange-rate statistics, sessions and change distributions
#[derive(Parser)]
#[command(name = "rusty-fx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Robert Fall")]
#[command(about = "Exchange-rate analytics over NBP mid rates", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Median, mode, variance and standard deviation of one currency
    Stats {
        /// Currency code (default from config)
        #[arg(value_name = "CURRENCY")]
        currency: Option<String>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Rising, falling and stable sessions of one currency
    Sessions {
        #[arg(value_name = "CURRENCY")]
        currency: Option<String>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Statistics and sessions together
    Report {
        #[arg(value_name = "CURRENCY")]
        currency: Option<String>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Histogram of cross-rate changes of a currency pair
    Distribution {
        /// Currency pair, e.g. EUR/USD
        #[arg(value_name = "PAIR")]
        pair: String,

        /// Number of ranges to aim for
        #[arg(short = 'r', long)]
        ranges: Option<usize>,

        /// Narrowest allowed range
        #[arg(long)]
        min_range_size: Option<f64>,

        /// Bin the cross rates themselves instead of their changes
        #[arg(long)]
        cross_rates: bool,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// List currency codes of downloaded NBP tables
    Codes {
        /// Table A document
        #[arg(long)]
        table_a: PathBuf,

        /// Table B document
        #[arg(long)]
        table_b: Option<PathBuf>,
    },

    /// Print the NBP request URL for a currency and window, or for the latest table
    Url {
        #[arg(value_name = "CURRENCY")]
        currency: Option<String>,

        /// NBP table (A or B)
        #[arg(short = 't', long, default_value = "A")]
        table: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Show configuration
    Info,
}

#[derive(Args, Clone)]
struct QueryArgs {
    /// Analysis period (WEEK, TWO_WEEKS, MONTH, QUARTER, HALF_YEAR, YEAR)
    #[arg(short = 'p', long)]
    period: Option<String>,

    /// First day of the window (YYYY-MM-DD); default is the period ending today
    #[arg(short = 'b', long)]
    begin: Option<String>,

    /// Evaluate as if today were this date (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<String>,

    /// Rate files or directories (default: data_dir from config)
    #[arg(short = 'd', long = "data")]
    data: Vec<PathBuf>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".rusty-fx").join("config.toml"))
}

fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    let config = match path {
        Some(path) => AnalyzerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => AnalyzerConfig::from_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AnalyzerConfig::default(),
        },
    };
    Ok(config.with_env_overrides()?)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    if cli.verbose && !cli.json {
        println!(
            "{} v{}",
            "rusty-fx".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!(
            "Data dir: {}",
            config.data_dir.display().to_string().dimmed()
        );
    }

    match cli.command {
        Commands::Stats { currency, query } => {
            let report = build_report(&config, currency.as_deref(), &query)?;
            if cli.json {
                print_json(&report.statistics)
            } else {
                print_statistics(&report);
                Ok(())
            }
        }
        Commands::Sessions { currency, query } => {
            let report = build_report(&config, currency.as_deref(), &query)?;
            if cli.json {
                print_json(&report.sessions)
            } else {
                print_sessions(&report);
                Ok(())
            }
        }
        Commands::Report { currency, query } => {
            let report = build_report(&config, currency.as_deref(), &query)?;
            if cli.json {
                print_json(&report)
            } else {
                print_statistics(&report);
                print_sessions(&report);
                Ok(())
            }
        }
        Commands::Distribution {
            pair,
            ranges,
            min_range_size,
            cross_rates,
            query,
        } => {
            let pair = CurrencyPair::parse(&pair)?;
            let mut options = config.distribution;
            if let Some(ranges) = ranges {
                options.desired_ranges = ranges;
            }
            if let Some(size) = min_range_size {
                options.min_range_size = size;
            }
            if cross_rates {
                options.mode = DistributionMode::CrossRates;
            }

            let report = build_distribution(&config, &pair, &options, &query)?;
            if cli.json {
                print_json(&report)
            } else {
                print_distribution(&report);
                Ok(())
            }
        }
        Commands::Codes { table_a, table_b } => {
            list_codes(&config, &table_a, table_b.as_deref(), cli.json)
        }
        Commands::Url {
            currency,
            table,
            query,
        } => {
            let table: TableType = table.parse()?;
            let path = match currency {
                Some(currency) => {
                    let code = CurrencyCode::new(&currency)?;
                    let window = resolve_window(&config, &query)?;
                    nbp::rates_path(table, &code, window.start, window.end)?
                }
                None => nbp::tables_path(table),
            };
            println!("{}", nbp::build_url(&config.nbp_api_base_url, &path)?);
            Ok(())
        }
        Commands::Info => {
            show_info(&config);
            Ok(())
        }
    }
}

fn today(query: &QueryArgs) -> Result<NaiveDate> {
    match &query.as_of {
        Some(date) => Ok(parse_date(date)?),
        None => Ok(Local::now().date_naive()),
    }
}

fn resolve_window(config: &AnalyzerConfig, query: &QueryArgs) -> Result<AnalysisWindow> {
    let period: Period = match &query.period {
        Some(p) => p.parse()?,
        None => config.default_period,
    };
    let today = today(query)?;

    match &query.begin {
        Some(begin) => {
            let window = AnalysisWindow::new(parse_date(begin)?, period);
            window.validate(today, config.min_allowed_date)?;
            Ok(window)
        }
        None => Ok(AnalysisWindow::trailing(period, today)),
    }
}

fn load_source(config: &AnalyzerConfig, query: &QueryArgs) -> Result<InMemoryRateSource> {
    let mut source = InMemoryRateSource::with_reference(config.reference_currency.clone());
    let paths = if query.data.is_empty() {
        vec![config.data_dir.clone()]
    } else {
        query.data.clone()
    };

    for path in &paths {
        let result = if path.is_dir() {
            source.load_dir(path)
        } else {
            source.load_path(path, None)
        };
        let loaded =
            result.with_context(|| format!("Failed to load rates from {}", path.display()))?;
        log::info!("{} rates from {}", loaded, path.display());
    }
    Ok(source)
}

fn build_report(
    config: &AnalyzerConfig,
    currency: Option<&str>,
    query: &QueryArgs,
) -> Result<AnalysisReport> {
    let code = match currency {
        Some(c) => CurrencyCode::new(c)?,
        None => config.default_currency.clone(),
    };
    let window = resolve_window(config, query)?;
    let source = load_source(config, query)?;
    Ok(AnalysisReport::build(&source, &code, &window)?)
}

fn build_distribution(
    config: &AnalyzerConfig,
    pair: &CurrencyPair,
    options: &DistributionOptions,
    query: &QueryArgs,
) -> Result<DistributionReport> {
    let window = resolve_window(config, query)?;
    let source = load_source(config, query)?;
    Ok(DistributionReport::build(&source, pair, &window, options)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_header(title: &str, report_currency: &str, window: &AnalysisWindow) {
    println!("{}", format!("{} - {}", title, report_currency).green().bold());
    println!(
        "  {} {} ({} to {})",
        "Period:".bold(),
        window.period.label(),
        window.start,
        window.end
    );
}

fn print_statistics(report: &AnalysisReport) {
    let stats = &report.statistics;
    print_header("Statistical measures", report.currency.as_str(), &report.window);
    println!("  {} {}", "Observations:".bold(), stats.observations);
    println!("  {} {} PLN", "Median:".bold(), format_measure(stats.median));
    println!("  {} {} PLN", "Mode:".bold(), format_measure(stats.mode));
    println!(
        "  {} {} PLN",
        "Standard deviation:".bold(),
        format_measure(stats.standard_deviation)
    );
    println!("  {} {}", "Variance:".bold(), format_measure(stats.variance));
    println!();
}

fn print_sessions(report: &AnalysisReport) {
    let sessions = &report.sessions;
    print_header("Session analysis", report.currency.as_str(), &report.window);
    println!(
        "  {} {} ({})",
        "Rising:".bold(),
        sessions.rising.to_string().bright_green(),
        format_percentage(sessions.rising_percentage)
    );
    println!(
        "  {} {} ({})",
        "Stable:".bold(),
        sessions.stable,
        format_percentage(sessions.stable_percentage)
    );
    println!(
        "  {} {} ({})",
        "Falling:".bold(),
        sessions.falling.to_string().red(),
        format_percentage(sessions.falling_percentage)
    );
    println!("  {} {}", "Total:".bold(), sessions.total);
    println!();
}

fn print_distribution(report: &DistributionReport) {
    print_header("Change distribution", &report.pair.to_string(), &report.window);
    println!("  {} {}", "Aligned dates:".bold(), report.aligned_dates);

    if report.histogram.is_empty() {
        println!("  {}", "No data".yellow());
        return;
    }

    const BAR_WIDTH: usize = 40;
    let max = max_count(&report.histogram).max(1);
    for bin in &report.histogram {
        let bar = "#".repeat(bin.count * BAR_WIDTH / max);
        println!(
            "  {:>26}  {:>4}  {}",
            bin.range_label(),
            bin.count,
            bar.cyan()
        );
    }
    println!();
}

fn list_codes(
    config: &AnalyzerConfig,
    table_a: &Path,
    table_b: Option<&Path>,
    json: bool,
) -> Result<()> {
    let read = |path: &Path| -> Result<Vec<nbp::NbpTable>> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(data::parse_tables(&contents)?)
    };

    let tables_a = read(table_a)?;
    let tables_b = match table_b {
        Some(path) => read(path)?,
        None => Vec::new(),
    };

    let codes = data::currency_codes(&tables_a, &tables_b, &config.reference_currency);
    if json {
        return print_json(&codes);
    }
    for code in codes {
        println!("{}", code);
    }
    Ok(())
}

fn show_info(config: &AnalyzerConfig) {
    println!(
        "{} {}",
        "rusty-fx".cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();

    println!("{}", "Configuration".bold());
    println!("{}", "=============".dimmed());
    println!("  {} {}", "Data directory:".bold(), config.data_dir.display());
    println!("  {} {}", "Default currency:".bold(), config.default_currency);
    println!("  {} {}", "Default period:".bold(), config.default_period);
    println!("  {} {}", "Reference currency:".bold(), config.reference_currency);
    println!("  {} {}", "Archive starts:".bold(), config.min_allowed_date);
    println!("  {} {}", "NBP API:".bold(), config.nbp_api_base_url);
    println!(
        "  {} {} (min size {})",
        "Distribution ranges:".bold(),
        config.distribution.desired_ranges,
        config.distribution.min_range_size
    );
    if let Some(path) = default_config_path() {
        println!("  {} {}", "Config file:".bold(), path.display());
    }
    println!();
}
