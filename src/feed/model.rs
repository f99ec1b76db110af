use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::SmError;

/// Which backend collection an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// General market news (`/terminal`).
    Terminal,
    /// Exchange filings (`/bsefeed`).
    Bse,
}

impl FeedKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            FeedKind::Terminal => "terminal",
            FeedKind::Bse => "bse",
        }
    }

    /// Source label used when a record names none.
    pub const fn default_source(self) -> &'static str {
        match self {
            FeedKind::Terminal => "News",
            FeedKind::Bse => "BSE",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedKind {
    type Err = SmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminal" | "news" => Ok(FeedKind::Terminal),
            "bse" | "bsefeed" => Ok(FeedKind::Bse),
            other => Err(SmError::validation("feed", format!("unknown feed '{other}'"))),
        }
    }
}

/// Backend-computed sentiment label.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Bullish, Sentiment::Bearish, Sentiment::Neutral];

    /// Lenient mapping of backend labels; anything unrecognized is neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "bullish" | "positive" | "buy" => Sentiment::Bullish,
            "bearish" | "negative" | "sell" => Sentiment::Bearish,
            _ => Sentiment::Neutral,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Sentiment::Bullish => "bullish",
            Sentiment::Bearish => "bearish",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = SmError;

    /// Strict parse for user input (`bullish`, `bearish`, `neutral`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullish" => Ok(Sentiment::Bullish),
            "bearish" => Ok(Sentiment::Bearish),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(SmError::validation(
                "sentiment",
                format!("expected bullish, bearish or neutral, got '{other}'"),
            )),
        }
    }
}

/// One uniform news/filing card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Stable merge key, unique within a feed.
    pub id: String,
    /// Which feed produced the item.
    pub feed: FeedKind,
    /// Ticker or exchange code (`"N/A"` when absent).
    pub symbol: String,
    pub company: String,
    pub category: String,
    pub title: String,
    /// Body text with any trailing `Source:` line removed.
    pub body: String,
    /// Publish timestamp exactly as the backend sent it.
    pub published_raw: String,
    /// Parsed publish time; `None` when the raw value was not understood.
    pub published_at: Option<DateTime<Utc>>,
    /// Display form of `published_at` in the client's timezone.
    pub published_display: String,
    pub attachment_url: Option<String>,
    pub sentiment: Sentiment,
    /// Confidence in `[0, 1]`.
    pub sentiment_score: f64,
    pub source: String,
    /// Daily price change in percent, once known.
    pub price_change: Option<f64>,
}

impl NewsItem {
    /// Whether the item refers to a tradeable symbol (price lookups make sense).
    pub fn has_symbol(&self) -> bool {
        !self.symbol.is_empty() && self.symbol != super::normalize::UNKNOWN
    }
}
