use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Duration;
use serde::Serialize;
use std::sync::Arc;
use tickforge_core::{parse_duration, trailing_days, CandleInterval, CandleSeries};
use tickforge_runner::{generate_batch, BatchRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub const DEFAULT_DAYS: i64 = 30;

pub fn default_interval() -> Duration {
    Duration::hours(24)
}

// ── Query params ─────────────────────────────────────────────────────────

/// Raw query string. Fields stay strings so malformed values can fall back
/// to defaults instead of failing extraction.
#[derive(Debug, Default)]
pub struct CandlesQuery {
    pub symbol: Option<String>,
    pub days: Option<String>,
    pub interval: Option<String>,
}

impl CandlesQuery {
    /// Build from decoded key/value pairs. A repeated key keeps its first
    /// value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "symbol" => &mut query.symbol,
                "days" => &mut query.days,
                "interval" => &mut query.interval,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Comma-separated symbols, trimmed, empties dropped.
pub fn parse_symbols(raw: Option<&str>) -> Result<Vec<String>, ApiError> {
    let symbols: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if symbols.is_empty() {
        return Err(ApiError::BadRequest("no symbol found".to_string()));
    }
    Ok(symbols)
}

/// Lookback in days. Absent or unparseable ⇒ default; non-positive ⇒ 400.
pub fn parse_days(raw: Option<&str>) -> Result<i64, ApiError> {
    let days = raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_DAYS);
    if days <= 0 {
        return Err(ApiError::BadRequest(format!(
            "days must be positive, got {days}"
        )));
    }
    Ok(days)
}

/// Candle length. Absent or unparseable ⇒ 24h; non-positive ⇒ 400.
pub fn parse_interval(raw: Option<&str>) -> Result<CandleInterval, ApiError> {
    let duration = raw
        .and_then(|s| parse_duration(s.trim()).ok())
        .unwrap_or_else(default_interval);
    CandleInterval::new(duration).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ── Response ─────────────────────────────────────────────────────────────

/// One series for a single symbol, an array for several.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CandlesData {
    One(CandleSeries),
    Many(Vec<CandleSeries>),
}

impl From<Vec<CandleSeries>> for CandlesData {
    fn from(series: Vec<CandleSeries>) -> Self {
        match <[CandleSeries; 1]>::try_from(series) {
            Ok([one]) => Self::One(one),
            Err(many) => Self::Many(many),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub success: bool,
    pub message: String,
}

// ── Route definitions ────────────────────────────────────────────────────

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/candles", get(api_candles))
}

/// Turn the raw query into a batch over `[now − days, now)`.
pub fn batch_request(state: &AppState, q: &CandlesQuery) -> Result<BatchRequest, ApiError> {
    let symbols = parse_symbols(q.symbol.as_deref())?;
    let days = parse_days(q.days.as_deref())?;
    let interval = parse_interval(q.interval.as_deref())?;
    let window = trailing_days(state.now(), days)
        .ok_or_else(|| ApiError::BadRequest(format!("days out of range: {days}")))?;

    let request = BatchRequest {
        symbols,
        window,
        interval,
    };
    request
        .check_limit(state.max_candles)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(request)
}

async fn api_candles(
    State(state): State<Arc<AppState>>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(pairs) = pairs?;
    let q = CandlesQuery::from_pairs(pairs);
    let request = batch_request(&state, &q)?;
    let symbols = request.symbols.len();

    let worker = Arc::clone(&state);
    let series =
        tokio::task::spawn_blocking(move || generate_batch(&worker.engine, &request)).await?;
    let candles: usize = series.iter().map(CandleSeries::len).sum();

    let envelope = Envelope {
        data: Some(CandlesData::from(series)),
        success: true,
        message: format!("{candles} candles for {symbols} symbol(s)"),
    };
    let body = serde_json::to_vec(&envelope)?;
    tracing::debug!(symbols, candles, bytes = body.len(), "served candles");

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
