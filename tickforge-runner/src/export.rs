//! CSV export of candle series.
//!
//! Two layouts are supported:
//! - **Grouped**: header `Symbol,Time,Open,High,Low,Close`, then every candle
//!   of the first symbol, then the second, and so on
//! - **Interleaved**: header `symbol,date,open,high,low,close`, rows ordered
//!   by interval and, within an interval, by symbol
//!
//! Times are written as `YYYY-MM-DD HH:MM:SS` (UTC) and prices with two
//! decimals.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tickforge_core::{Candle, CandleSeries};

/// Timestamp format for CSV rows.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const GROUPED_HEADER: [&str; 6] = ["Symbol", "Time", "Open", "High", "Low", "Close"];
const INTERLEAVED_HEADER: [&str; 6] = ["symbol", "date", "open", "high", "low", "close"];

/// Row ordering and header style of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvLayout {
    Grouped,
    Interleaved,
}

impl CsvLayout {
    pub fn header(&self) -> [&'static str; 6] {
        match self {
            CsvLayout::Grouped => GROUPED_HEADER,
            CsvLayout::Interleaved => INTERLEAVED_HEADER,
        }
    }
}

impl FromStr for CsvLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grouped" => Ok(CsvLayout::Grouped),
            "interleaved" => Ok(CsvLayout::Interleaved),
            other => Err(format!(
                "unknown layout '{other}'. Valid: grouped, interleaved"
            )),
        }
    }
}

/// CSV fields of one candle.
pub fn candle_record(candle: &Candle) -> [String; 6] {
    [
        candle.symbol.clone(),
        candle.timestamp.format(TIME_FORMAT).to_string(),
        format!("{:.2}", candle.open),
        format!("{:.2}", candle.high),
        format!("{:.2}", candle.low),
        format!("{:.2}", candle.close),
    ]
}

/// Write `series` to `writer` in the given layout. Returns the number of data
/// rows written.
pub fn write_csv<W: Write>(writer: W, series: &[CandleSeries], layout: CsvLayout) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(layout.header())?;

    let mut rows = 0;
    match layout {
        CsvLayout::Grouped => {
            for s in series {
                for candle in s {
                    wtr.write_record(candle_record(candle))?;
                    rows += 1;
                }
            }
        }
        CsvLayout::Interleaved => {
            let longest = series.iter().map(CandleSeries::len).max().unwrap_or(0);
            for i in 0..longest {
                for candle in series.iter().filter_map(|s| s.candles.get(i)) {
                    wtr.write_record(candle_record(candle))?;
                    rows += 1;
                }
            }
        }
    }

    wtr.flush().context("failed to flush CSV writer")?;
    Ok(rows)
}

/// Render `series` as a CSV string.
pub fn export_csv(series: &[CandleSeries], layout: CsvLayout) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, series, layout)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

/// Create (or truncate) `path` and write `series` into it.
pub fn export_to_file(path: &Path, series: &[CandleSeries], layout: CsvLayout) -> Result<usize> {
    let file = File::create(path)
        .with_context(|| format!("cannot create file {}", path.display()))?;
    let rows = write_csv(BufWriter::new(file), series, layout)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), rows, ?layout, "wrote CSV export");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series(symbol: &str, n: i64) -> CandleSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut s = CandleSeries::with_capacity(symbol, n as usize);
        for i in 0..n {
            s.push(Candle {
                symbol: symbol.to_string(),
                timestamp: start + Duration::hours(i),
                open: 100.0 + i as f64,
                high: 101.256,
                low: 99.004,
                close: 100.5,
            });
        }
        s
    }

    #[test]
    fn record_format() {
        let s = series("GOLD", 1);
        assert_eq!(
            candle_record(&s.candles[0]),
            [
                "GOLD",
                "2024-01-02 03:04:05",
                "100.00",
                "101.26",
                "99.00",
                "100.50"
            ]
        );
    }

    #[test]
    fn grouped_layout() {
        let csv = export_csv(&[series("A", 2), series("B", 2)], CsvLayout::Grouped).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Symbol,Time,Open,High,Low,Close");
        let symbols: Vec<&str> = lines[1..].iter().map(|l| &l[..1]).collect();
        assert_eq!(symbols, vec!["A", "A", "B", "B"]);
    }

    #[test]
    fn interleaved_layout() {
        let csv = export_csv(&[series("A", 2), series("B", 2)], CsvLayout::Interleaved).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "symbol,date,open,high,low,close");
        let symbols: Vec<&str> = lines[1..].iter().map(|l| &l[..1]).collect();
        assert_eq!(symbols, vec!["A", "B", "A", "B"]);
        assert!(lines[1].contains("2024-01-02 03:04:05"));
        assert!(lines[3].contains("2024-01-02 04:04:05"));
    }

    #[test]
    fn interleaved_tolerates_uneven_series() {
        let mut buf = Vec::new();
        let rows = write_csv(&mut buf, &[series("A", 3), series("B", 1)], CsvLayout::Interleaved)
            .unwrap();
        assert_eq!(rows, 4);
    }

    #[test]
    fn symbols_with_commas_are_quoted() {
        let csv = export_csv(&[series("X,Y", 1)], CsvLayout::Grouped).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("\"X,Y\","));
    }

    #[test]
    fn layout_from_str() {
        assert_eq!("grouped".parse::<CsvLayout>(), Ok(CsvLayout::Grouped));
        assert_eq!("Interleaved".parse::<CsvLayout>(), Ok(CsvLayout::Interleaved));
        assert!("wide".parse::<CsvLayout>().is_err());
    }
}
