//! The user's tagged watchlist, persisted wholesale after every mutation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{SmError, client::constants::WATCHLIST_KEY, storage::KeyValueStore};
use crate::feed::{NewsItem, Sentiment};

/// A saved card plus the user's own sentiment tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub item: NewsItem,
    pub tag: Sentiment,
    pub added_at: DateTime<Utc>,
}

impl WatchlistEntry {
    pub fn id(&self) -> &str {
        &self.item.id
    }
}

/// Ordered list of entries, newest first, unique by item id.
///
/// No size cap is applied.
#[derive(Debug)]
pub struct WatchlistStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    entries: Vec<WatchlistEntry>,
}

impl WatchlistStore {
    /// Opens the watchlist kept under the default key.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Result<Self, SmError> {
        Self::open_with_key(store, WATCHLIST_KEY)
    }

    /// Opens a watchlist kept under `key`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn open_with_key(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Result<Self, SmError> {
        let mut this = Self {
            store,
            key: key.into(),
            entries: Vec::new(),
        };
        this.reload()?;
        Ok(this)
    }

    /// Re-reads the persisted list, discarding in-memory state.
    ///
    /// A document that no longer parses is treated as an empty list.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn reload(&mut self) -> Result<(), SmError> {
        self.entries = match self.store.get(&self.key)? {
            Some(raw) => match serde_json::from_str::<Vec<WatchlistEntry>>(&raw) {
                Ok(mut list) => {
                    dedup(&mut list);
                    list
                }
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %_e, key = %self.key, "discarding unreadable watchlist");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Ok(())
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&WatchlistEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Inserts `item` at the head with `tag`; an existing entry with the same id is replaced
    /// (moving it to the top).
    ///
    /// # Errors
    /// Returns an error if the list cannot be persisted; the in-memory list is already updated.
    pub fn add(&mut self, item: NewsItem, tag: Sentiment) -> Result<(), SmError> {
        self.entries.retain(|e| e.item.id != item.id);
        self.entries.insert(
            0,
            WatchlistEntry {
                item,
                tag,
                added_at: Utc::now(),
            },
        );
        self.persist()
    }

    /// Deletes the entry with `id`. Returns whether one was removed.
    ///
    /// # Errors
    /// Returns an error if the list cannot be persisted.
    pub fn remove(&mut self, id: &str) -> Result<bool, SmError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != id);
        let removed = self.entries.len() != before;
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Empties the list.
    ///
    /// # Errors
    /// Returns an error if the list cannot be persisted.
    pub fn clear(&mut self) -> Result<(), SmError> {
        self.entries.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), SmError> {
        let doc = serde_json::to_string(&self.entries)?;
        self.store.set(&self.key, &doc)
    }
}

fn dedup(list: &mut Vec<WatchlistEntry>) {
    let mut seen = std::collections::HashSet::with_capacity(list.len());
    list.retain(|e| seen.insert(e.item.id.clone()));
}
