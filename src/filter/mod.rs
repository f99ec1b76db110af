//! Client-side search, filtering and ordering of a merged feed.

pub mod paginate;

pub use paginate::{Paginator, ScrollMetrics};

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;

use crate::core::{SmError, time::local_hour};
use crate::feed::{NewsItem, Sentiment};

/// Sentinel that lifts a set restriction.
pub const ALL: &str = "ALL";

/// An inclusive set restriction; [`Selection::All`] means "no restriction".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection<T: Ord> {
    All,
    Only(BTreeSet<T>),
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: Ord> Selection<T> {
    pub fn only<I: IntoIterator<Item = T>>(values: I) -> Self {
        Selection::Only(values.into_iter().collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn allows(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.contains(value),
        }
    }
}

impl Selection<String> {
    /// Builds a category selection from user input; an empty list or any `ALL` entry lifts
    /// the restriction.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for l in labels {
            let l = l.as_ref().trim();
            if l.eq_ignore_ascii_case(ALL) {
                return Selection::All;
            }
            if !l.is_empty() {
                set.insert(l.to_string());
            }
        }
        if set.is_empty() {
            Selection::All
        } else {
            Selection::Only(set)
        }
    }

    /// Case-insensitive membership test for labels.
    pub fn allows_label(&self, label: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.iter().any(|s| s.eq_ignore_ascii_case(label)),
        }
    }
}

/// Ordering of the rendered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Publish time, newest first.
    #[default]
    Time,
    /// Sentiment confidence, highest first.
    Sentiment,
    /// Price change, largest first; unknown changes last.
    PriceChange,
}

impl FromStr for SortKey {
    type Err = SmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TIME" => Ok(SortKey::Time),
            "SENTIMENT" => Ok(SortKey::Sentiment),
            "PRICE" | "CHANGE" | "PRICE_CHANGE" => Ok(SortKey::PriceChange),
            other => Err(SmError::validation(
                "sort",
                format!("expected TIME, SENTIMENT or PRICE, got '{other}'"),
            )),
        }
    }
}

/// Inclusive hour-of-day window; `from > to` wraps past midnight (e.g. 22-2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HourRange {
    from: u32,
    to: u32,
}

impl HourRange {
    /// # Errors
    /// Returns [`SmError::Validation`] if either bound is above 23.
    pub fn new(from: u32, to: u32) -> Result<Self, SmError> {
        if from > 23 || to > 23 {
            return Err(SmError::validation("hours", "hours must be between 0 and 23"));
        }
        Ok(Self { from, to })
    }

    pub fn from_hour(&self) -> u32 {
        self.from
    }

    pub fn to_hour(&self) -> u32 {
        self.to
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.from <= self.to {
            (self.from..=self.to).contains(&hour)
        } else {
            hour >= self.from || hour <= self.to
        }
    }
}

impl FromStr for HourRange {
    type Err = SmError;

    /// Parses `FROM-TO`, e.g. `9-15`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || SmError::validation("hours", format!("expected FROM-TO, got '{s}'"));
        let (a, b) = s.split_once('-').ok_or_else(bad)?;
        let from = a.trim().parse().map_err(|_| bad())?;
        let to = b.trim().parse().map_err(|_| bad())?;
        HourRange::new(from, to)
    }
}

impl fmt::Display for HourRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:59", self.from, self.to)
    }
}

/// Everything the user can narrow a feed by. Compared by value to detect changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Case-insensitive substring matched against symbol, title and company.
    pub search: String,
    pub categories: Selection<String>,
    pub sentiments: Selection<Sentiment>,
    pub sort: SortKey,
    pub hours: Option<HourRange>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    #[must_use]
    pub fn categories(mut self, sel: Selection<String>) -> Self {
        self.categories = sel;
        self
    }

    #[must_use]
    pub fn sentiments(mut self, sel: Selection<Sentiment>) -> Self {
        self.sentiments = sel;
        self
    }

    #[must_use]
    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    #[must_use]
    pub fn hours(mut self, range: Option<HourRange>) -> Self {
        self.hours = range;
        self
    }

    /// Whether `item` passes every restriction (ordering aside).
    pub fn matches(&self, item: &NewsItem, tz: Tz) -> bool {
        let needle = self.search.trim().to_lowercase();
        self.matches_with_needle(item, &needle, tz)
    }

    fn matches_with_needle(&self, item: &NewsItem, needle: &str, tz: Tz) -> bool {
        if !needle.is_empty()
            && ![&item.symbol, &item.title, &item.company]
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
        {
            return false;
        }
        if !self.categories.allows_label(&item.category) {
            return false;
        }
        if !self.sentiments.allows(&item.sentiment) {
            return false;
        }
        if let Some(range) = self.hours {
            match item.published_at {
                Some(ts) if range.contains(local_hour(ts, tz)) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Filters and orders `items`; the sort is stable.
pub fn apply<'a>(items: &'a [NewsItem], filter: &FilterState, tz: Tz) -> Vec<&'a NewsItem> {
    let needle = filter.search.trim().to_lowercase();
    let mut out: Vec<&NewsItem> = items
        .iter()
        .filter(|it| filter.matches_with_needle(it, &needle, tz))
        .collect();
    sort_items(&mut out, filter.sort);
    out
}

/// Orders items by `key`, highest first.
pub fn sort_items(items: &mut [&NewsItem], key: SortKey) {
    match key {
        SortKey::Time => items.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        SortKey::Sentiment => {
            items.sort_by(|a, b| b.sentiment_score.total_cmp(&a.sentiment_score));
        }
        SortKey::PriceChange => items.sort_by(|a, b| desc_none_last(a.price_change, b.price_change)),
    }
}

fn desc_none_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
