//! Centralized constants for default endpoints, storage keys and UA.

use std::time::Duration;

/// Identifies this client to the backend.
pub(crate) const USER_AGENT: &str = concat!("sm-terminal/", env!("CARGO_PKG_VERSION"));

/// Backend REST base; every endpoint path is joined onto it.
pub(crate) const DEFAULT_API_BASE: &str = "http://localhost:4000/api/";

/// Storage key holding the bearer token (the cookie name in the browser build).
pub const TOKEN_KEY: &str = "sm_token";

/// Storage key holding the serialized watchlist.
pub const WATCHLIST_KEY: &str = "sm_watchlist";

/// Timezone used for naive backend timestamps, display formatting and hour-of-day filters.
pub const DEFAULT_DISPLAY_TZ: chrono_tz::Tz = chrono_tz::Asia::Kolkata;

/// Auto-refresh cadence for the general terminal feed.
pub const TERMINAL_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Auto-refresh cadence for the exchange filings feed.
pub const BSE_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Query value selecting the general provider on `/terminal`.
pub(crate) const TERMINAL_SOURCE: &str = "g";
