//! View state of one market-terminal tab: the merged feed, the user's filter, the revealed
//! page and lazily resolved price changes.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use futures::stream::{self, StreamExt};

use crate::chart;
use crate::core::{SmClient, SmError};
use crate::feed::{FeedKind, NewsItem, PriceCache, merge_snapshot};
use crate::filter::{self, FilterState, Paginator, ScrollMetrics};
use crate::poller::FeedEvent;

/// Concurrent `/chart` lookups when resolving price changes.
pub const DEFAULT_PRICE_CONCURRENCY: usize = 4;

/// What the tab should render around the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    /// Nothing fetched yet.
    Loading,
    Ready,
    /// Inline error banner; `retryable` controls the retry button.
    Error { message: String, retryable: bool },
    /// The credential was rejected; show the login surface.
    LoggedOut,
}

#[derive(Debug, Clone)]
pub struct TerminalView {
    kind: FeedKind,
    tz: Tz,
    items: Vec<NewsItem>,
    prices: PriceCache,
    filter: FilterState,
    paginator: Paginator,
    status: ViewStatus,
    last_updated: Option<DateTime<Utc>>,
}

impl TerminalView {
    pub fn new(kind: FeedKind, tz: Tz) -> Self {
        Self::with_paginator(kind, tz, Paginator::default())
    }

    pub fn with_paginator(kind: FeedKind, tz: Tz, mut paginator: Paginator) -> Self {
        let filter = FilterState::default();
        paginator.sync_filter(&filter);
        Self {
            kind,
            tz,
            items: Vec::new(),
            prices: PriceCache::new(),
            filter,
            paginator,
            status: ViewStatus::Loading,
            last_updated: None,
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// The merged list in feed order, before filtering.
    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn prices(&self) -> &PriceCache {
        &self.prices
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Merges a fresh snapshot into the list, keeping known price changes.
    pub fn apply_snapshot(&mut self, fresh: Vec<NewsItem>, fetched_at: DateTime<Utc>) {
        let mut merged = merge_snapshot(&self.items, fresh);
        self.prices.fill(&mut merged);
        self.prices.absorb(&merged);
        self.items = merged;
        self.last_updated = Some(fetched_at);
        self.status = ViewStatus::Ready;
    }

    /// Shows a failed fetch. Items from earlier snapshots stay visible.
    pub fn apply_error(&mut self, error: &SmError) {
        self.status = match error {
            SmError::Unauthorized { .. } => ViewStatus::LoggedOut,
            e => ViewStatus::Error {
                message: e.user_message(),
                retryable: e.is_retryable(),
            },
        };
    }

    /// Folds a poller event into the view. Events for another feed are ignored.
    pub fn handle_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Snapshot {
                kind,
                items,
                fetched_at,
            } if kind == self.kind => self.apply_snapshot(items, fetched_at),
            FeedEvent::Failed { kind, error } if kind == self.kind => self.apply_error(&error),
            FeedEvent::LoggedOut { kind } if kind == self.kind => {
                self.status = ViewStatus::LoggedOut;
            }
            _ => {}
        }
    }

    /// Replaces the filter; any change resets the revealed page.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.paginator.sync_filter(&self.filter);
    }

    /// Every item passing the filter, in the selected order.
    pub fn filtered(&self) -> Vec<&NewsItem> {
        filter::apply(&self.items, &self.filter, self.tz)
    }

    /// The revealed page of [`filtered`](Self::filtered).
    pub fn visible(&self) -> Vec<&NewsItem> {
        let mut all = self.filtered();
        all.truncate(self.paginator.limit());
        all
    }

    pub fn has_more(&self) -> bool {
        self.paginator.has_more(self.filtered().len())
    }

    pub fn load_more(&mut self) -> bool {
        let total = self.filtered().len();
        self.paginator.load_more(total)
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        let total = self.filtered().len();
        self.paginator.on_scroll(metrics, total)
    }

    pub fn on_tail_visible(&mut self) -> bool {
        let total = self.filtered().len();
        self.paginator.on_tail_visible(total)
    }

    /// Distinct categories present in the feed, for the category picker.
    pub fn categories(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|it| it.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Stores a resolved price change for every item of `symbol`.
    pub fn record_price(&mut self, symbol: &str, change_pct: f64) {
        self.prices.insert(symbol, change_pct);
        for it in self
            .items
            .iter_mut()
            .filter(|it| it.symbol.eq_ignore_ascii_case(symbol))
        {
            it.price_change = Some(change_pct);
        }
    }

    /// Symbols on the revealed page that still lack a price change.
    pub fn pending_price_symbols(&self) -> Vec<String> {
        self.visible()
            .into_iter()
            .filter(|it| it.price_change.is_none() && it.has_symbol())
            .filter(|it| self.prices.get(&it.symbol).is_none())
            .map(|it| it.symbol.to_ascii_uppercase())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Looks up missing price changes for the revealed page, `concurrency` at a time.
    ///
    /// Individual lookup failures leave the card blank; a rejected credential flips the view to
    /// [`ViewStatus::LoggedOut`]. Returns how many symbols were resolved.
    pub async fn resolve_prices(&mut self, client: &SmClient, concurrency: usize) -> usize {
        let symbols = self.pending_price_symbols();
        if symbols.is_empty() {
            return 0;
        }

        let results: Vec<(String, Result<chart::DailyChange, SmError>)> = stream::iter(symbols)
            .map(|sym| async move {
                let res = chart::daily_change(client, &sym).await;
                (sym, res)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let mut resolved = 0;
        for (sym, res) in results {
            match res {
                Ok(change) => {
                    self.record_price(&sym, change.change_pct);
                    resolved += 1;
                }
                Err(SmError::Unauthorized { .. }) => self.status = ViewStatus::LoggedOut,
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(symbol = %sym, error = %_e, "price lookup failed");
                }
            }
        }
        resolved
    }
}
