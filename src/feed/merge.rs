//! Reconciles successive feed snapshots.
//!
//! Live price changes are resolved lazily per card, so a refreshed snapshot usually arrives
//! without them. Merging carries the last known value forward by item id, and the
//! [`PriceCache`] remembers per-ticker values for items that are new to the view.

use std::collections::{HashMap, HashSet};

use crate::feed::model::NewsItem;

/// Merges `fresh` over `previous`.
///
/// Every item comes from `fresh` (order included); an item whose `price_change` is unset
/// inherits the value of the previous item with the same id. Repeated ids in `fresh` keep
/// their first occurrence. Runs in O(n + m).
pub fn merge_snapshot(previous: &[NewsItem], fresh: Vec<NewsItem>) -> Vec<NewsItem> {
    let known: HashMap<&str, f64> = previous
        .iter()
        .filter_map(|it| it.price_change.map(|p| (it.id.as_str(), p)))
        .collect();

    let mut seen: HashSet<String> = HashSet::with_capacity(fresh.len());
    let mut merged = Vec::with_capacity(fresh.len());
    for mut item in fresh {
        if !seen.insert(item.id.clone()) {
            continue;
        }
        if item.price_change.is_none() {
            item.price_change = known.get(item.id.as_str()).copied();
        }
        merged.push(item);
    }
    merged
}

/// Last known daily price change per ticker, scoped to one view.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    by_symbol: HashMap<String, f64>,
}

fn cache_key(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.by_symbol.get(&cache_key(symbol)).copied()
    }

    pub fn insert(&mut self, symbol: &str, change_pct: f64) {
        self.by_symbol.insert(cache_key(symbol), change_pct);
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_symbol.clear();
    }

    /// Records every price change the items already carry.
    pub fn absorb(&mut self, items: &[NewsItem]) {
        for it in items {
            if let Some(p) = it.price_change
                && it.has_symbol()
            {
                self.insert(&it.symbol, p);
            }
        }
    }

    /// Fills unset price changes from the cache.
    pub fn fill(&self, items: &mut [NewsItem]) {
        for it in items.iter_mut().filter(|it| it.price_change.is_none()) {
            it.price_change = self.get(&it.symbol);
        }
    }
}
