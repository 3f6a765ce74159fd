//! Tickforge CLI: export, serve, quote and series commands.
//!
//! Commands:
//! - `export`: write trailing history for a set of symbols to CSV
//! - `serve`: run the HTTP/JSON query service
//! - `quote`: show the profile, regime and price of one symbol at one instant
//! - `series`: print a trailing candle series as JSON

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tickforge_core::{
    parse_duration, trailing_days, trailing_years, try_build_series, CandleInterval,
    PriceSampler,
};
use tickforge_runner::{
    export_to_file, generate_batch, BatchRequest, CsvLayout, ExportSettings, TickforgeConfig,
};
use tickforge_server::{AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tickforge",
    about = "Tickforge CLI: deterministic synthetic OHLC market data"
)]
struct Cli {
    /// Path to a TOML config file with `[engine]` and `[export]` tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write trailing candle history to a CSV file.
    Export {
        /// Comma-separated symbols. Overrides the config file.
        #[arg(long, value_delimiter = ',')]
        symbols: Option<Vec<String>>,

        /// Trailing window length in calendar years.
        #[arg(long)]
        years: Option<u32>,

        /// Candle length, e.g. 300h, 24h, 90m.
        #[arg(long)]
        interval: Option<String>,

        /// Row layout: grouped or interleaved.
        #[arg(long)]
        layout: Option<CsvLayout>,

        /// Output CSV path.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Largest batch to generate, summed over symbols.
        #[arg(long)]
        max_candles: Option<usize>,
    },
    /// Run the HTTP query service until Ctrl-C.
    Serve {
        /// Bind address. Defaults to TICKFORGE_BIND or 0.0.0.0.
        #[arg(long)]
        bind: Option<String>,

        /// Port. Defaults to TICKFORGE_PORT or 8080.
        #[arg(long)]
        port: Option<u16>,

        /// Per-request candle cap. Defaults to TICKFORGE_MAX_CANDLES or 100000.
        #[arg(long)]
        max_candles: Option<usize>,
    },
    /// Show profile, regime multiplier and price of a symbol at an instant.
    Quote {
        symbol: String,

        /// Instant (RFC 3339). Defaults to now.
        #[arg(long)]
        at: Option<String>,
    },
    /// Print a trailing candle series as JSON.
    Series {
        symbol: String,

        /// Lookback in days.
        #[arg(long, default_value_t = 30)]
        days: i64,

        /// Candle length.
        #[arg(long, default_value = "24h")]
        interval: String,

        /// Largest series to generate. Defaults to the `[export]` cap.
        #[arg(long)]
        max_candles: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TickforgeConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Export {
            symbols,
            years,
            interval,
            layout,
            output,
            max_candles,
        } => run_export(config, symbols, years, interval, layout, output, max_candles),
        Commands::Serve {
            bind,
            port,
            max_candles,
        } => run_serve(config, bind, port, max_candles),
        Commands::Quote { symbol, at } => run_quote(&config, &symbol, at.as_deref()),
        Commands::Series {
            symbol,
            days,
            interval,
            max_candles,
        } => {
            let limit = max_candles.unwrap_or(config.export.max_candles);
            run_series(&config, &symbol, days, &interval, limit)
        }
    }
}

/// Trimmed symbol, or an error when nothing is left.
fn require_symbol(symbol: &str) -> Result<&str> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        bail!("symbol must not be empty");
    }
    Ok(symbol)
}

/// Batch covering the trailing `years` ending at `now`, within `max_candles`.
fn export_request(export: &ExportSettings, now: DateTime<Utc>) -> Result<BatchRequest> {
    export.validate()?;
    let window = trailing_years(now, export.years)
        .with_context(|| format!("{} years reaches past the supported date range", export.years))?;
    let request = BatchRequest {
        symbols: export
            .symbols
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        window,
        interval: export.candle_interval()?,
    };
    request.check_limit(export.max_candles)?;
    Ok(request)
}

/// One-symbol batch over the trailing `days` ending at `now`, within `limit`.
fn series_request(
    symbol: &str,
    days: i64,
    interval: &str,
    now: DateTime<Utc>,
    limit: usize,
) -> Result<BatchRequest> {
    let symbol = require_symbol(symbol)?;
    if days <= 0 {
        bail!("--days must be positive, got {days}");
    }
    let interval = CandleInterval::new(parse_duration(interval)?)?;
    let window = trailing_days(now, days)
        .with_context(|| format!("{days} days reaches past the supported date range"))?;
    let request = BatchRequest {
        symbols: vec![symbol.to_string()],
        window,
        interval,
    };
    request.check_limit(limit)?;
    Ok(request)
}

fn run_export(
    mut config: TickforgeConfig,
    symbols: Option<Vec<String>>,
    years: Option<u32>,
    interval: Option<String>,
    layout: Option<CsvLayout>,
    output: Option<PathBuf>,
    max_candles: Option<usize>,
) -> Result<()> {
    let export = &mut config.export;
    if let Some(symbols) = symbols {
        export.symbols = symbols;
    }
    if let Some(years) = years {
        export.years = years;
    }
    if let Some(interval) = interval {
        export.interval = interval;
    }
    if let Some(layout) = layout {
        export.layout = layout;
    }
    if let Some(output) = output {
        export.output = output;
    }
    if let Some(max_candles) = max_candles {
        export.max_candles = max_candles;
    }

    let request = export_request(export, Utc::now())?;
    let candles = request.candle_count();
    let window = request.window;
    tracing::info!(
        symbols = request.symbols.len(),
        candles,
        interval = %request.interval,
        layout = ?export.layout,
        output = %export.output.display(),
        "export started"
    );
    println!(
        "Generating {candles} candles for {} symbol(s) at {} from {} to {}...",
        request.symbols.len(),
        request.interval,
        window.start.format("%Y-%m-%d"),
        window.end.format("%Y-%m-%d"),
    );

    let started = Instant::now();
    let series = generate_batch(&config.engine, &request);
    let rows = export_to_file(&export.output, &series, export.layout)?;
    let elapsed = started.elapsed().as_secs_f64();

    tracing::info!(
        rows,
        elapsed_secs = elapsed,
        output = %export.output.display(),
        "export finished"
    );
    println!(
        "Wrote {rows} rows to {} in {elapsed:.2}s",
        export.output.display()
    );
    Ok(())
}

fn run_serve(
    config: TickforgeConfig,
    bind: Option<String>,
    port: Option<u16>,
    max_candles: Option<usize>,
) -> Result<()> {
    let mut server = ServerConfig::from_env();
    if let Some(bind) = bind {
        server.bind = bind;
    }
    if let Some(port) = port {
        server.port = port;
    }
    if let Some(max_candles) = max_candles {
        server.max_candles = max_candles;
    }

    tracing::info!(
        bind = %server.bind,
        port = server.port,
        max_candles = server.max_candles,
        "starting query service"
    );
    let state = AppState::new(config.engine, &server);
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime
        .block_on(tickforge_server::serve(&server, state))
        .with_context(|| format!("server on {}:{} failed", server.bind, server.port))
}

fn parse_instant(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid RFC 3339 instant '{s}'"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn run_quote(config: &TickforgeConfig, symbol: &str, at: Option<&str>) -> Result<()> {
    let symbol = require_symbol(symbol)?;
    let instant = parse_instant(at)?;
    tracing::debug!(symbol, at = %instant, "quote");
    let sampler = PriceSampler::new(&config.engine, symbol);
    let profile = sampler.profile();
    let horizon = sampler.horizon();
    let multiplier = sampler.multiplier_at(instant);

    println!();
    println!("=== {symbol} @ {} ===", instant.to_rfc3339());
    println!("Base price:       {:.2}", profile.base_price);
    println!("Base volatility:  {:.2}%", profile.base_volatility * 100.0);
    println!(
        "Regime length:    {:.1} days (phase {:.1} days)",
        horizon.interval_secs as f64 / 86_400.0,
        horizon.phase_secs as f64 / 86_400.0
    );
    println!("Price mult:       {:.4}", multiplier.price);
    println!("Volatility mult:  {:.4}", multiplier.volatility);
    println!("Price:            {:.2}", sampler.price_at(instant));
    println!();
    Ok(())
}

fn run_series(
    config: &TickforgeConfig,
    symbol: &str,
    days: i64,
    interval: &str,
    limit: usize,
) -> Result<()> {
    let request = series_request(symbol, days, interval, Utc::now(), limit)?;
    let window = request.window;
    let symbol = &request.symbols[0];
    tracing::debug!(
        symbol = %symbol,
        candles = request.candle_count(),
        interval = %request.interval,
        "building series"
    );

    let series = try_build_series(
        &config.engine,
        symbol,
        window.start,
        window.end,
        request.interval,
    )?;
    println!("{}", serde_json::to_string_pretty(&series)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_overrides() {
        let cli = Cli::try_parse_from([
            "tickforge",
            "--config",
            "tf.toml",
            "export",
            "--symbols",
            "GOLD,SILVER",
            "--layout",
            "interleaved",
            "--years",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("tf.toml")));
        match cli.command {
            Commands::Export {
                symbols,
                years,
                layout,
                interval,
                output,
                max_candles,
            } => {
                assert_eq!(symbols.unwrap(), vec!["GOLD", "SILVER"]);
                assert_eq!(years, Some(2));
                assert_eq!(layout, Some(CsvLayout::Interleaved));
                assert!(interval.is_none());
                assert!(output.is_none());
                assert!(max_candles.is_none());
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn unknown_layout_rejected() {
        assert!(Cli::try_parse_from(["tickforge", "export", "--layout", "wide"]).is_err());
    }

    #[test]
    fn series_defaults() {
        let cli = Cli::try_parse_from(["tickforge", "series", "ETH-USD"]).unwrap();
        match cli.command {
            Commands::Series {
                symbol,
                days,
                interval,
                max_candles,
            } => {
                assert_eq!(symbol, "ETH-USD");
                assert_eq!(days, 30);
                assert_eq!(interval, "24h");
                assert!(max_candles.is_none());
            }
            _ => panic!("expected series"),
        }
    }

    #[test]
    fn instant_parsing() {
        let t = parse_instant(Some("2025-12-08T12:00:00+02:00")).unwrap();
        assert_eq!(t.to_rfc3339(), "2025-12-08T10:00:00+00:00");
        assert!(parse_instant(Some("yesterday")).is_err());
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-12-08T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn blank_symbol_rejected() {
        assert_eq!(require_symbol(" GOLD ").unwrap(), "GOLD");
        for blank in ["", "   ", "\t"] {
            assert!(require_symbol(blank).is_err(), "{blank:?}");
            assert!(series_request(blank, 5, "1h", fixed_now(), 1_000).is_err());
        }
    }

    #[test]
    fn series_request_counts_candles() {
        let request = series_request("ETH-USD", 5, "1h", fixed_now(), 1_000).unwrap();
        assert_eq!(request.symbols, vec!["ETH-USD"]);
        assert_eq!(request.candle_count(), 120);
        assert!(series_request("ETH-USD", 0, "1h", fixed_now(), 1_000).is_err());
        assert!(series_request("ETH-USD", 5, "0s", fixed_now(), 1_000).is_err());
    }

    #[test]
    fn series_cap_rejects_tiny_intervals() {
        let err = series_request("GOLD", 30, "1ns", fixed_now(), 10_000_000).unwrap_err();
        assert!(err.to_string().contains("limit is 10000000"), "{err}");
        assert!(series_request("GOLD", 5, "1h", fixed_now(), 119).is_err());
        assert!(series_request("GOLD", 5, "1h", fixed_now(), 120).is_ok());
    }

    #[test]
    fn export_cap_applies_to_whole_batch() {
        let mut export = ExportSettings {
            symbols: vec!["GOLD".into(), " ".into(), "SILVER".into()],
            years: 1,
            interval: "24h".into(),
            ..ExportSettings::default()
        };
        let request = export_request(&export, fixed_now()).unwrap();
        assert_eq!(request.symbols, vec!["GOLD", "SILVER"]);
        assert_eq!(request.candle_count(), 2 * 365);

        export.max_candles = 729;
        assert!(export_request(&export, fixed_now()).is_err());

        export.interval = "1ns".into();
        export.max_candles = ExportSettings::default().max_candles;
        let err = export_request(&export, fixed_now()).unwrap_err();
        assert!(err.to_string().contains("candles"), "{err}");
    }
}
