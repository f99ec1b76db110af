//! Payload shapes of `/terminal` and `/bsefeed` and the candidate keys for each logical field.

use serde_json::Value;

use crate::core::wire::Record;

pub(crate) const ID_KEYS: &[&str] = &["id", "_id", "news_id", "NEWSID", "newsid", "uuid"];
pub(crate) const SYMBOL_KEYS: &[&str] = &[
    "symbol",
    "bse_code",
    "scrip_code",
    "SCRIP_CD",
    "scrip_cd",
    "code",
    "ticker",
];
pub(crate) const COMPANY_KEYS: &[&str] = &[
    "company",
    "company_name",
    "companyName",
    "SLONGNAME",
    "name",
];
pub(crate) const CATEGORY_KEYS: &[&str] = &["category", "CATEGORYNAME", "categoryname", "type"];
pub(crate) const TITLE_KEYS: &[&str] = &["title", "headline", "HEADLINE", "NEWSSUB", "subject"];
pub(crate) const BODY_KEYS: &[&str] = &[
    "body",
    "summary",
    "content",
    "text",
    "description",
    "MORE",
];
pub(crate) const TIME_KEYS: &[&str] = &[
    "published_at",
    "publishedAt",
    "pub_date",
    "datetime",
    "date",
    "time",
    "timestamp",
    "NEWS_DT",
    "DT_TM",
    "created_at",
];
pub(crate) const ATTACHMENT_KEYS: &[&str] = &[
    "attachment_url",
    "attachment",
    "pdf_url",
    "pdf",
    "url",
    "link",
    "ATTACHMENTNAME",
];
pub(crate) const SENTIMENT_KEYS: &[&str] = &["sentiment", "ai_sentiment", "sentiment_label"];
pub(crate) const SCORE_KEYS: &[&str] = &[
    "sentiment_score",
    "sentimentScore",
    "confidence",
    "ai_confidence",
    "score",
];
pub(crate) const NESTED_LABEL_KEYS: &[&str] = &["label", "sentiment", "value"];
pub(crate) const NESTED_SCORE_KEYS: &[&str] = &["score", "confidence"];
pub(crate) const SOURCE_KEYS: &[&str] = &["source", "provider", "publisher"];
pub(crate) const PRICE_KEYS: &[&str] = &[
    "price_change",
    "priceChange",
    "change_percent",
    "changePercent",
    "pct_change",
];

// wrapper keys some deployments put around the real list
const WRAPPER_KEYS: &[&str] = &["data", "result", "records", "Table"];

/// Where the bare attachment file names of exchange filings are served from.
pub(crate) const BSE_ATTACHMENT_BASE: &str =
    "https://www.bseindia.com/xml-data/corpfiling/AttachLive/";

/// A raw record plus the key it was found under in a keyed payload.
pub(crate) struct RawEntry {
    pub(crate) key: Option<String>,
    pub(crate) record: Record,
}

fn unwrap_wrapper(value: &Value) -> &Value {
    let mut current = value;
    while let Value::Object(map) = current {
        match WRAPPER_KEYS.iter().find_map(|k| map.get(*k)) {
            Some(inner) if inner.is_array() || inner.is_object() => current = inner,
            _ => break,
        }
    }
    current
}

fn push_records(out: &mut Vec<RawEntry>, key: Option<&str>, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                if let Value::Object(rec) = item {
                    out.push(RawEntry {
                        key: key.map(str::to_string),
                        record: rec.clone(),
                    });
                }
            }
        }
        Value::Object(rec) => out.push(RawEntry {
            key: key.map(str::to_string),
            record: rec.clone(),
        }),
        _ => {}
    }
}

fn looks_like_record(map: &Record) -> bool {
    ID_KEYS
        .iter()
        .chain(TITLE_KEYS)
        .filter_map(|k| map.get(*k))
        .any(|v| v.is_string() || v.is_number())
}

/// Flattens a payload into raw records.
///
/// Accepts a bare array, a `{ "data": ... }` style wrapper, or an object whose values are
/// records or arrays of records (the key is kept as a hint: a date for `/terminal`, an id for
/// `/bsefeed`).
pub(crate) fn flatten(payload: &Value) -> Vec<RawEntry> {
    let mut out = Vec::new();
    match unwrap_wrapper(payload) {
        arr @ Value::Array(_) => push_records(&mut out, None, arr),
        Value::Object(map) if looks_like_record(map) => out.push(RawEntry {
            key: None,
            record: map.clone(),
        }),
        Value::Object(map) => {
            for (key, value) in map {
                push_records(&mut out, Some(key), value);
            }
        }
        _ => {}
    }
    out
}
