//! Maps heterogeneous provider records into uniform [`NewsItem`]s.

use std::collections::HashSet;

use chrono_tz::Tz;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::core::SmError;
use crate::core::time::{format_display, parse_timestamp, parse_timestamp_value};
use crate::core::wire::{Record, as_text, first_f64, first_str, first_value};
use crate::feed::model::{FeedKind, NewsItem, Sentiment};
use crate::feed::wire::{self, RawEntry};

/// Placeholder for missing symbol/company values.
pub const UNKNOWN: &str = "N/A";
/// Category used when a record names none.
pub const DEFAULT_CATEGORY: &str = "Company Update";
/// Title used when a record has no headline.
pub const DEFAULT_TITLE: &str = "Untitled";

const SOURCE_PREFIX: &str = "source:";

/// Parses a response body and normalizes it.
///
/// # Errors
/// Returns [`SmError::Json`] if the body is not JSON. Unusable records inside valid JSON are
/// skipped, never an error.
pub fn normalize_body(kind: FeedKind, body: &str, tz: Tz) -> Result<Vec<NewsItem>, SmError> {
    let payload: Value = serde_json::from_str(body)?;
    Ok(normalize_payload(kind, &payload, tz))
}

/// Flattens, normalizes, sorts newest-first and drops repeated ids.
pub fn normalize_payload(kind: FeedKind, payload: &Value, tz: Tz) -> Vec<NewsItem> {
    let mut items: Vec<NewsItem> = wire::flatten(payload)
        .into_iter()
        .map(|entry| normalize_entry(kind, entry, tz))
        .collect();
    sort_newest_first(&mut items);
    dedup_by_id(&mut items);
    items
}

/// Normalizes one bare record.
pub fn normalize_record(kind: FeedKind, record: &Record, tz: Tz) -> NewsItem {
    build_item(kind, record, None, tz)
}

fn normalize_entry(kind: FeedKind, entry: RawEntry, tz: Tz) -> NewsItem {
    build_item(kind, &entry.record, entry.key.as_deref(), tz)
}

fn build_item(kind: FeedKind, rec: &Record, key_hint: Option<&str>, tz: Tz) -> NewsItem {
    let symbol = first_str(rec, wire::SYMBOL_KEYS).unwrap_or_else(|| UNKNOWN.to_string());
    let company = first_str(rec, wire::COMPANY_KEYS).unwrap_or_else(|| UNKNOWN.to_string());
    let category =
        first_str(rec, wire::CATEGORY_KEYS).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let title = first_str(rec, wire::TITLE_KEYS).unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let raw_body = first_str(rec, wire::BODY_KEYS).unwrap_or_default();
    let (body, embedded_source) = split_source(&raw_body);
    let source = first_str(rec, wire::SOURCE_KEYS)
        .or(embedded_source)
        .unwrap_or_else(|| kind.default_source().to_string());

    // /terminal keys records by date; use it when the record itself carries no time
    let time_value = first_value(rec, wire::TIME_KEYS);
    let published_raw = time_value
        .and_then(as_text)
        .or_else(|| date_hint(kind, key_hint))
        .unwrap_or_default();
    let published_at = time_value
        .and_then(|v| parse_timestamp_value(v, tz))
        .or_else(|| parse_timestamp(&published_raw, tz));
    let published_display = match published_at {
        Some(ts) => format_display(ts, tz),
        None if published_raw.is_empty() => UNKNOWN.to_string(),
        None => published_raw.clone(),
    };

    let attachment_url = first_str(rec, wire::ATTACHMENT_KEYS).map(|a| attachment_link(kind, a));
    let (sentiment, sentiment_score) = read_sentiment(rec);
    let price_change = first_f64(rec, wire::PRICE_KEYS);

    let id = first_str(rec, wire::ID_KEYS)
        .or_else(|| id_hint(kind, key_hint))
        .unwrap_or_else(|| derived_id(kind, &symbol, &published_raw, &title));

    NewsItem {
        id,
        feed: kind,
        symbol,
        company,
        category,
        title,
        body,
        published_raw,
        published_at,
        published_display,
        attachment_url,
        sentiment,
        sentiment_score,
        source,
        price_change,
    }
}

fn date_hint(kind: FeedKind, key: Option<&str>) -> Option<String> {
    (kind == FeedKind::Terminal)
        .then_some(key)
        .flatten()
        .map(str::to_string)
}

fn id_hint(kind: FeedKind, key: Option<&str>) -> Option<String> {
    (kind == FeedKind::Bse)
        .then_some(key)
        .flatten()
        .filter(|k| !k.trim().is_empty())
        .map(str::to_string)
}

/// SHA-256 over the NUL-joined parts, so the id survives restarts and can be persisted.
fn derived_id(kind: FeedKind, symbol: &str, published: &str, title: &str) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in [kind.as_str(), symbol, published, title].iter().enumerate() {
        if i > 0 {
            hasher.update([0u8]);
        }
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();
    let hex: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
    format!("{}-{hex}", kind.as_str())
}

fn attachment_link(kind: FeedKind, raw: String) -> String {
    if kind == FeedKind::Bse && !raw.contains("://") {
        format!("{}{}", wire::BSE_ATTACHMENT_BASE, raw.trim_start_matches('/'))
    } else {
        raw
    }
}

/// Reads the label and confidence, either flat or nested as `{ label, score }`.
/// Scores given in percent are scaled to `[0, 1]`.
fn read_sentiment(rec: &Record) -> (Sentiment, f64) {
    let mut label = None;
    let mut score = first_f64(rec, wire::SCORE_KEYS);

    match first_value(rec, wire::SENTIMENT_KEYS) {
        Some(Value::Object(nested)) => {
            label = first_str(nested, wire::NESTED_LABEL_KEYS);
            score = score.or_else(|| first_f64(nested, wire::NESTED_SCORE_KEYS));
        }
        Some(v) => label = as_text(v),
        None => {}
    }

    let sentiment = label
        .as_deref()
        .map(Sentiment::from_label)
        .unwrap_or_default();
    (sentiment, score.map(scale_score).unwrap_or(0.0))
}

fn scale_score(raw: f64) -> f64 {
    let s = if raw > 1.0 { raw / 100.0 } else { raw };
    s.clamp(0.0, 1.0)
}

/// Splits a trailing `Source: ...` line off a body.
///
/// Returns the remaining body (trimmed) and the source label if one was found.
pub fn split_source(body: &str) -> (String, Option<String>) {
    let trimmed = body.trim_end();
    let (head, last) = match trimmed.rsplit_once('\n') {
        Some((head, last)) => (head, last),
        None => ("", trimmed),
    };

    let line = last.trim();
    let is_source = line
        .get(..SOURCE_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(SOURCE_PREFIX));
    if !is_source {
        return (trimmed.trim().to_string(), None);
    }

    let label = line[SOURCE_PREFIX.len()..].trim();
    let source = (!label.is_empty()).then(|| label.to_string());
    (head.trim().to_string(), source)
}

/// Publish time descending; items without a parsed time go last, ties keep input order.
pub fn sort_newest_first(items: &mut [NewsItem]) {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Keeps the first item per id.
pub fn dedup_by_id(items: &mut Vec<NewsItem>) {
    let mut seen = HashSet::with_capacity(items.len());
    items.retain(|it| seen.insert(it.id.clone()));
}
