//! Stockfolio CLI - price history and technical indicators
//!
//! # Usage
//! ```sh
//! stockfolio fetch --symbols AAPL --start 2020-01-01 --end 2023-12-31 --indicators
//! stockfolio indicators --input prices.csv --output prices_with_indicators.csv
//! stockfolio indicators --input artifacts/raw/AAPL.csv   # writes artifacts/indicators/AAPL.csv
//! stockfolio size --path artifacts/raw/AAPL.csv
//! ```
//!
//! # Environment Variables
//! - `DATA_DIR` - Root directory for generated artifacts (default: artifacts)
//! - `ALPACA_API_KEY` / `ALPACA_SECRET_KEY` - Market data credentials
//! - `RUST_LOG` - Log filter (default: info)

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stockfolio::application::indicators::{CLOSE_COLUMN, IndicatorEngine};
use stockfolio::config::{Config, PipelineSettings};
use stockfolio::domain::market::DateRange;
use stockfolio::domain::ports::MarketDataService;
use stockfolio::infrastructure::AlpacaMarketDataService;
use stockfolio::infrastructure::csv_loader::{load_csv_data, save_csv_data};
use stockfolio::infrastructure::storage::{
    create_directories, decode_image, encode_image_into_base64, get_size, save_json,
};
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Price history and technical indicators", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily price history and store it as CSV
    Fetch {
        /// Comma-separated list of symbols
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), exclusive
        #[arg(long)]
        end: Option<String>,

        /// TOML file providing [data] tickers, start and end
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output CSV file (default: $DATA_DIR/raw/<symbols>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Add MA_50, MA_200 and RSI columns before saving
        #[arg(long)]
        indicators: bool,
    },
    /// Add MA_50, MA_200 and RSI columns to a CSV price table
    Indicators {
        /// Input CSV with a Close column
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file (default: $DATA_DIR/indicators/<input file name>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the table as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Print the approximate size of a file
    Size {
        #[arg(short, long)]
        path: PathBuf,
    },
    /// Print an image file as base64
    EncodeImage {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Write a base64 image payload (read from a text file) to disk
    DecodeImage {
        /// File containing the base64 payload
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Fetch {
            symbols,
            start,
            end,
            config: settings_file,
            output,
            indicators,
        } => {
            let request = resolve_fetch_request(symbols, start, end, settings_file)?;
            let FetchRequest {
                symbols,
                range,
                artifacts_root,
            } = request;
            if !config.alpaca.has_credentials() {
                warn!("ALPACA_API_KEY / ALPACA_SECRET_KEY not set; request will likely be rejected");
            }

            let service = AlpacaMarketDataService::new(&config.alpaca);
            let mut table = service
                .load_stock_data(&symbols, &range)
                .await
                .with_context(|| format!("Failed to load price history for {:?}", symbols))?;

            if indicators {
                if table.has_column(CLOSE_COLUMN) {
                    IndicatorEngine::default().create_technical_indicators(&mut table)?;
                } else {
                    warn!("Indicators skipped: multi-symbol tables have no plain Close column");
                }
            }

            let raw_dir = artifacts_root
                .map(|root| root.join("raw"))
                .unwrap_or_else(|| config.raw_data_dir());
            let output =
                output.unwrap_or_else(|| raw_dir.join(format!("{}.csv", symbols.join("_"))));
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                create_directories(&[parent], true)?;
            }
            save_csv_data(&table, &output)?;
            info!("Saved {} rows to {:?} ({})", table.len(), output, get_size(&output)?);
        }
        Commands::Indicators {
            input,
            output,
            json,
        } => {
            let mut table = load_csv_data(&input)?;
            IndicatorEngine::default()
                .create_technical_indicators(&mut table)
                .with_context(|| format!("Failed to compute indicators for {:?}", input))?;

            let output = output.unwrap_or_else(|| config.indicators_output_for(&input));
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                create_directories(&[parent], true)?;
            }
            save_csv_data(&table, &output)?;
            if let Some(json_path) = json {
                save_json(&json_path, &table)?;
            }
        }
        Commands::Size { path } => {
            println!("{}", get_size(&path)?);
        }
        Commands::EncodeImage { input } => {
            println!("{}", encode_image_into_base64(&input)?);
        }
        Commands::DecodeImage { input, output } => {
            let payload = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {:?}", input))?;
            decode_image(&payload, &output)?;
            info!("Image written to {:?}", output);
        }
    }

    Ok(())
}

struct FetchRequest {
    symbols: Vec<String>,
    range: DateRange,
    artifacts_root: Option<PathBuf>,
}

/// Flags take precedence over the TOML file; at least one source must supply
/// symbols and both dates.
fn resolve_fetch_request(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    settings_file: Option<PathBuf>,
) -> Result<FetchRequest> {
    let settings = settings_file
        .map(|path| PipelineSettings::from_file(&path))
        .transpose()?;

    let symbols = match (symbols.is_empty(), &settings) {
        (false, _) => symbols,
        (true, Some(s)) => s.tickers.clone(),
        (true, None) => bail!("No symbols given: pass --symbols or --config"),
    };

    let range = match (start, end, &settings) {
        (Some(start), Some(end), _) => DateRange::parse(&start, &end)?,
        (None, None, Some(s)) => s.range,
        _ => bail!("Both --start and --end are required unless --config provides them"),
    };

    Ok(FetchRequest {
        symbols,
        range,
        artifacts_root: settings.and_then(|s| s.artifacts_root),
    })
}
