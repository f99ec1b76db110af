//! Daily price change for a ticker via `/chart`.

mod wire;

use serde::Serialize;

use crate::core::{SmClient, SmError};
use wire::{ChartPayload, FlatQuote, MetaNode, QuoteBlock};

/// Today's move for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyChange {
    /// Latest traded price (or close).
    pub last_price: f64,
    /// Reference price the change is measured against.
    pub previous_close: f64,
    /// `(last - previous) / previous * 100`.
    pub change_pct: f64,
}

impl DailyChange {
    fn from_prices(last: f64, previous: f64) -> Result<Self, SmError> {
        if !last.is_finite() || !previous.is_finite() || previous == 0.0 {
            return Err(SmError::Data(format!(
                "cannot derive change from last={last} previous={previous}"
            )));
        }
        Ok(Self {
            last_price: last,
            previous_close: previous,
            change_pct: (last - previous) / previous * 100.0,
        })
    }
}

/// Fetches `GET {base}/chart?symbol=X&interval=1d&range=1d` and derives the daily change.
///
/// # Errors
///
/// Returns [`SmError::Data`] if the payload has no usable prices, and the usual transport /
/// status / unauthorized errors otherwise.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(client), err))]
pub async fn daily_change(client: &SmClient, symbol: &str) -> Result<DailyChange, SmError> {
    let mut url = client.endpoint("chart")?;
    url.query_pairs_mut()
        .append_pair("symbol", symbol)
        .append_pair("interval", "1d")
        .append_pair("range", "1d");

    let body = client.get_authed(url).await?;
    decode_change(&body)
}

fn decode_change(body: &str) -> Result<DailyChange, SmError> {
    let payload: ChartPayload = serde_json::from_str(body)?;
    match payload {
        ChartPayload::Envelope(env) => {
            if let Some(err) = env.chart.error {
                return Err(SmError::Data(format!(
                    "chart error: {} - {}",
                    err.code.as_deref().unwrap_or("unknown"),
                    err.description.as_deref().unwrap_or("no description"),
                )));
            }
            let r0 = env
                .chart
                .result
                .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
                .ok_or_else(|| SmError::Data("empty chart result".into()))?;
            let quote = r0.indicators.and_then(|i| i.quote.into_iter().next());
            from_chart(r0.meta.as_ref(), quote.as_ref())
        }
        ChartPayload::Flat(flat) => from_flat(&flat),
    }
}

fn from_chart(meta: Option<&MetaNode>, quote: Option<&QuoteBlock>) -> Result<DailyChange, SmError> {
    let last_close = quote.and_then(|q| q.close.iter().rev().find_map(|c| *c));
    let first_open = quote.and_then(|q| q.open.iter().find_map(|o| *o));

    let last = meta
        .and_then(|m| m.regular_market_price)
        .or(last_close)
        .ok_or_else(|| SmError::Data("chart has no price".into()))?;
    let previous = meta
        .and_then(|m| m.chart_previous_close.or(m.previous_close))
        .or(first_open)
        .ok_or_else(|| SmError::Data("chart has no reference price".into()))?;

    DailyChange::from_prices(last, previous)
}

fn from_flat(flat: &FlatQuote) -> Result<DailyChange, SmError> {
    let last = flat
        .close
        .ok_or_else(|| SmError::Data("quote has no price".into()))?;
    let previous = flat
        .previous_close
        .or(flat.open)
        .ok_or_else(|| SmError::Data("quote has no reference price".into()))?;
    DailyChange::from_prices(last, previous)
}
