//! News feeds: fetching, normalization and snapshot merging.

mod api;
pub mod merge;
mod model;
pub mod normalize;
mod wire;

pub use merge::{PriceCache, merge_snapshot};
pub use model::{FeedKind, NewsItem, Sentiment};

use chrono::NaiveDate;

use crate::core::{
    SmClient, SmError,
    client::constants::{BSE_POLL_INTERVAL, TERMINAL_POLL_INTERVAL, TERMINAL_SOURCE},
    time::today_in,
};

/// A reusable request description for one feed.
///
/// Dates default to "today" in the client's display timezone and are re-evaluated on every
/// [`fetch`](Self::fetch), so a long-running poller rolls over at midnight.
#[derive(Debug, Clone)]
pub struct FeedBuilder {
    client: SmClient,
    kind: FeedKind,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    source: String,
}

impl FeedBuilder {
    /// Creates a builder for `kind`.
    pub fn new(client: &SmClient, kind: FeedKind) -> Self {
        Self {
            client: client.clone(),
            kind,
            from: None,
            to: None,
            source: TERMINAL_SOURCE.to_string(),
        }
    }

    /// The general news feed.
    pub fn terminal(client: &SmClient) -> Self {
        Self::new(client, FeedKind::Terminal)
    }

    /// The exchange filings feed.
    pub fn bse(client: &SmClient) -> Self {
        Self::new(client, FeedKind::Bse)
    }

    /// First day to include (terminal feed only).
    #[must_use]
    pub fn from(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self
    }

    /// Last day to include (terminal feed only).
    #[must_use]
    pub fn to(mut self, date: NaiveDate) -> Self {
        self.to = Some(date);
        self
    }

    /// Both ends of the date window (terminal feed only).
    #[must_use]
    pub fn between(self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from(from).to(to)
    }

    /// Provider selector sent as `source=` (terminal feed only). Default: `g`.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    pub fn client(&self) -> &SmClient {
        &self.client
    }

    /// Suggested auto-refresh cadence for this feed.
    pub fn default_interval(&self) -> std::time::Duration {
        match self.kind {
            FeedKind::Terminal => TERMINAL_POLL_INTERVAL,
            FeedKind::Bse => BSE_POLL_INTERVAL,
        }
    }

    /// Fetches and normalizes one snapshot, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SmError::Unauthorized`] (after invalidating the session) on a 401,
    /// [`SmError::Status`] on other non-2xx answers, [`SmError::InvalidDates`] if `from > to`,
    /// and transport or JSON errors otherwise.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(feed = %self.kind)))]
    pub async fn fetch(&self) -> Result<Vec<NewsItem>, SmError> {
        match self.kind {
            FeedKind::Terminal => {
                let today = today_in(self.client.display_tz());
                let to = self.to.unwrap_or(today);
                let from = self.from.unwrap_or(to);
                api::fetch_terminal(&self.client, from, to, &self.source).await
            }
            FeedKind::Bse => api::fetch_bse(&self.client).await,
        }
    }
}
