//! Coinbase loader - prints trading pairs, pair stats and candles.

use std::env;
use std::fs::{File, OpenOptions};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use coinbase_api::{Config, ExchangeDataClient, Granularity};

const DEFAULT_PAIR: &str = "btc-usdt";
const DEFAULT_START: &str = "2023-01-01";
const DEFAULT_END: &str = "2023-06-30";
const DEFAULT_ROWS: usize = 5;
const DEFAULT_LOG_FILE: &str = "coinbase_loader.log";

#[derive(Debug, Clone, PartialEq)]
struct Args {
    endpoint: Option<String>,
    config: Option<String>,
    pair: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
    rows: usize,
    log_file: Option<String>,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [options]", program);
    eprintln!("Options:");
    eprintln!("  --endpoint URL       API base URL (default: {})", coinbase_api::BASE_URL);
    eprintln!("  --config PATH        TOML config file (default: ./coinbase.toml if present)");
    eprintln!("  --pair ID            Trading pair (default: {})", DEFAULT_PAIR);
    eprintln!("  --start YYYY-MM-DD   Range start (default: {})", DEFAULT_START);
    eprintln!("  --end YYYY-MM-DD     Range end (default: {})", DEFAULT_END);
    eprintln!("  --granularity N      60, 300, 900, 3600, 21600, 86400 or 1m..1d (default: 86400)");
    eprintln!("  --rows N             Candle rows to print (default: {})", DEFAULT_ROWS);
    eprintln!("  --log-file [PATH]    Log to a file (default name: {})", DEFAULT_LOG_FILE);
}

fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))?;
    Ok(date
        .and_hms_opt(0, 0, 0)
        .context("invalid time of day")?
        .and_utc())
}

/// Parse options; `None` means help was requested.
fn parse_args(args: &[String]) -> Result<Option<Args>> {
    let mut parsed = Args {
        endpoint: None,
        config: None,
        pair: DEFAULT_PAIR.to_string(),
        start: parse_date(DEFAULT_START)?,
        end: parse_date(DEFAULT_END)?,
        granularity: Granularity::OneDay,
        rows: DEFAULT_ROWS,
        log_file: None,
    };

    let value = |i: usize| -> Result<&str> {
        args.get(i + 1)
            .map(String::as_str)
            .with_context(|| format!("missing value for {}", args[i]))
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(None),
            "--endpoint" => {
                parsed.endpoint = Some(value(i)?.to_string());
                i += 2;
            }
            "--config" => {
                parsed.config = Some(value(i)?.to_string());
                i += 2;
            }
            "--pair" => {
                parsed.pair = value(i)?.to_string();
                i += 2;
            }
            "--start" => {
                parsed.start = parse_date(value(i)?)?;
                i += 2;
            }
            "--end" => {
                parsed.end = parse_date(value(i)?)?;
                i += 2;
            }
            "--granularity" => {
                parsed.granularity = value(i)?.parse()?;
                i += 2;
            }
            "--rows" => {
                parsed.rows = value(i)?
                    .parse()
                    .with_context(|| format!("invalid row count '{}'", args[i + 1]))?;
                i += 2;
            }
            "--log-file" => match args.get(i + 1) {
                Some(path) if !path.starts_with("--") => {
                    parsed.log_file = Some(path.clone());
                    i += 2;
                }
                _ => {
                    parsed.log_file = Some(DEFAULT_LOG_FILE.to_string());
                    i += 1;
                }
            },
            other => bail!("unknown option '{other}'"),
        }
    }

    Ok(Some(parsed))
}

/// Open `path` for appending, creating it if needed.
fn open_log_file(path: &str) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {path}"))
}

fn init_logging(log_file: Option<&str>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if let Some(path) = log_file {
        builder.target(env_logger::Target::Pipe(Box::new(open_log_file(path)?)));
    }

    builder.init();
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("failed to load {path}"))?,
        None => Config::load_default(),
    };
    let config = config.with_env_overrides();

    Ok(match &args.endpoint {
        Some(url) => config.with_base_url(url),
        None => config,
    })
}

fn run() -> Result<()> {
    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("coinbase-loader");

    let Some(args) = parse_args(&argv)? else {
        print_usage(program);
        return Ok(());
    };

    init_logging(args.log_file.as_deref())?;
    log::debug!("Parsed arguments: {:?}", args);

    let client = ExchangeDataClient::with_config(load_config(&args)?)?;

    let pairs = client.list_trading_pairs()?;
    println!("{pairs}");
    println!();

    let stats = client.get_pair_stats(&args.pair)?;
    println!("{stats}");
    println!();

    let candles = client.get_historical_data(&args.pair, args.start, args.end, args.granularity)?;
    println!("{}", candles.head(Some(args.rows)));

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
