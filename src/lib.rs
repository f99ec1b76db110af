//! sm-terminal: async client and view-state engine for the stock-news market terminal.
//!
//! The backend does the heavy lifting (news ingestion, sentiment scoring, auth, OTP delivery);
//! this crate consumes its JSON and keeps the client-side state consistent:
//!
//! - [`feed`]: fetch `/terminal` and `/bsefeed`, normalize records into [`NewsItem`]s, merge
//!   successive snapshots without losing resolved price changes.
//! - [`filter`]: search, category/sentiment/hour filters, ordering and incremental pagination.
//! - [`poller`]: a supervised auto-refresh task with manual refresh and clean shutdown.
//! - [`terminal`]: a ready-made view model tying the above together.
//! - [`watchlist`]: a locally persisted, tagged watchlist.
//! - [`auth`]: OTP/password endpoints, form validation and the login state machine.
//!
//! ```no_run
//! # async fn demo() -> Result<(), sm_terminal::SmError> {
//! use sm_terminal::{FeedBuilder, FeedPoller, SmClient, TerminalView};
//!
//! let client = SmClient::builder().token("...").build()?;
//! let feed = FeedBuilder::terminal(&client);
//! let mut view = TerminalView::new(feed.kind(), client.display_tz());
//! let (handle, mut events) = FeedPoller::new(feed).start()?;
//! while let Some(ev) = events.recv().await {
//!     view.handle_event(ev);
//!     for item in view.visible() {
//!         println!("{} {}", item.symbol, item.title);
//!     }
//! }
//! handle.stop().await;
//! # Ok(()) }
//! ```

pub mod auth;
pub mod chart;
pub mod core;
pub mod feed;
pub mod filter;
pub mod poller;
pub mod terminal;
pub mod watchlist;

pub use core::client::constants::{
    BSE_POLL_INTERVAL, DEFAULT_DISPLAY_TZ, TERMINAL_POLL_INTERVAL, TOKEN_KEY, WATCHLIST_KEY,
};
pub use core::{
    ErrorKind, JsonFileStore, KeyValueStore, MemoryStore, Session, SessionState, SmClient,
    SmClientBuilder, SmError,
};

pub use auth::{AuthResponse, LoginFlow, LoginStep, ProfileForm};
pub use chart::{DailyChange, daily_change};
pub use feed::{FeedBuilder, FeedKind, NewsItem, PriceCache, Sentiment, merge_snapshot};
pub use filter::{FilterState, HourRange, Paginator, ScrollMetrics, Selection, SortKey};
pub use poller::{FeedEvent, FeedPoller, PollerConfig, PollerHandle};
pub use terminal::{TerminalView, ViewStatus};
pub use watchlist::{WatchlistEntry, WatchlistStore};
