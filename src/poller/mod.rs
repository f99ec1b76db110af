//! Supervised auto-refresh of one feed.
//!
//! A single background task owns the fetch loop, so two fetches for the same feed never
//! overlap and a slow response can never overwrite a newer one. The task ends when the handle
//! is stopped or dropped, when the event receiver is dropped, or after the credential is
//! rejected.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{
    select,
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};

use crate::core::SmError;
use crate::feed::{FeedBuilder, FeedKind, NewsItem};

/* ---------------- Public API ---------------- */

/// What the poller reports to the view.
#[derive(Debug)]
pub enum FeedEvent {
    /// A fresh normalized snapshot, newest first.
    Snapshot {
        kind: FeedKind,
        items: Vec<NewsItem>,
        fetched_at: DateTime<Utc>,
    },
    /// A fetch failed; show an inline error with a retry action. Polling continues.
    Failed { kind: FeedKind, error: SmError },
    /// The credential was rejected; the session is already cleared and polling has stopped.
    LoggedOut { kind: FeedKind },
}

/// Configure polling behavior.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Auto-refresh cadence.
    pub interval: Duration,
    /// Whether timed refreshes run. Manual refreshes always work. Default: true.
    pub auto_refresh: bool,
}

#[derive(Debug)]
enum Command {
    Refresh,
    SetAutoRefresh(bool),
}

/// A handle for a running poller.
///
/// Dropping the handle stops the poller.
pub struct PollerHandle {
    join: JoinHandle<()>,
    stop_tx: Option<oneshot::Sender<()>>,
    cmd_tx: mpsc::Sender<Command>,
    in_flight: Arc<AtomicBool>,
}

impl PollerHandle {
    /// Requests an immediate fetch.
    ///
    /// Returns `false` (and does nothing) while a fetch is outstanding or the poller is gone.
    pub fn refresh(&self) -> bool {
        if self.in_flight.load(Ordering::Acquire) {
            return false;
        }
        self.cmd_tx.try_send(Command::Refresh).is_ok()
    }

    /// Turns timed refreshes on or off. Turning them on restarts the interval.
    pub fn set_auto_refresh(&self, enabled: bool) -> bool {
        self.cmd_tx
            .try_send(Command::SetAutoRefresh(enabled))
            .is_ok()
    }

    /// Whether a fetch is currently outstanding.
    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Politely ask the poller to stop and wait for it to finish.
    /// An outstanding fetch is abandoned.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.join).await;
    }

    /// Immediately abort the background task (no more events will be sent).
    pub fn abort(self) {
        self.join.abort();
    }
}

/// Builder to start polling one feed.
pub struct FeedPoller {
    feed: FeedBuilder,
    cfg: PollerConfig,
}

impl FeedPoller {
    /// Polls `feed` at its default cadence with auto-refresh on.
    pub fn new(feed: FeedBuilder) -> Self {
        let interval = feed.default_interval();
        Self {
            feed,
            cfg: PollerConfig {
                interval,
                auto_refresh: true,
            },
        }
    }

    /// Poll interval.
    #[must_use]
    pub fn interval(mut self, dur: Duration) -> Self {
        self.cfg.interval = dur;
        self
    }

    /// Start with timed refreshes on or off (default on).
    #[must_use]
    pub fn auto_refresh(mut self, enabled: bool) -> Self {
        self.cfg.auto_refresh = enabled;
        self
    }

    /// Spawns the poller; the first fetch starts immediately.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns [`SmError::Validation`] for a zero interval.
    pub fn start(self) -> Result<(PollerHandle, mpsc::Receiver<FeedEvent>), SmError> {
        if self.cfg.interval.is_zero() {
            return Err(SmError::validation("interval", "poll interval must be non-zero"));
        }

        let (tx, rx) = mpsc::channel::<FeedEvent>(64);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(8);
        let in_flight = Arc::new(AtomicBool::new(false));

        let feed = self.feed;
        let cfg = self.cfg;
        let flag = in_flight.clone();

        let join = tokio::spawn(async move {
            let mut auto = cfg.auto_refresh;
            let mut ticker = interval_at(Instant::now() + cfg.interval, cfg.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // fetch on mount
            if !guarded(&mut stop_rx, poll_once(&feed, &tx, &flag)).await {
                return;
            }

            loop {
                let keep_going = select! {
                    _ = &mut stop_rx => false,
                    cmd = cmd_rx.recv() => match cmd {
                        Some(Command::Refresh) => {
                            ticker.reset();
                            guarded(&mut stop_rx, poll_once(&feed, &tx, &flag)).await
                        }
                        Some(Command::SetAutoRefresh(on)) => {
                            if on && !auto {
                                ticker.reset();
                            }
                            auto = on;
                            true
                        }
                        // handle dropped
                        None => false,
                    },
                    _ = ticker.tick(), if auto => {
                        guarded(&mut stop_rx, poll_once(&feed, &tx, &flag)).await
                    }
                };

                if !keep_going || tx.is_closed() {
                    break;
                }
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(feed = %feed.kind(), "poller stopped");
        });

        Ok((
            PollerHandle {
                join,
                stop_tx: Some(stop_tx),
                cmd_tx,
                in_flight,
            },
            rx,
        ))
    }
}

/* ---------------- Internal ---------------- */

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs `fetch` unless a stop arrives first. Returns whether the loop should continue.
async fn guarded(
    stop_rx: &mut oneshot::Receiver<()>,
    fetch: impl Future<Output = bool>,
) -> bool {
    select! {
        _ = stop_rx => false,
        keep = fetch => keep,
    }
}

/// One fetch + report. Returns whether polling should continue.
async fn poll_once(feed: &FeedBuilder, tx: &mpsc::Sender<FeedEvent>, flag: &AtomicBool) -> bool {
    let kind = feed.kind();
    let result = {
        let _guard = InFlight::enter(flag);
        feed.fetch().await
    };

    match result {
        Ok(items) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(feed = %kind, items = items.len(), "feed snapshot");
            tx.send(FeedEvent::Snapshot {
                kind,
                items,
                fetched_at: Utc::now(),
            })
            .await
            .is_ok()
        }
        Err(SmError::Unauthorized { .. }) => {
            let _ = tx.send(FeedEvent::LoggedOut { kind }).await;
            false
        }
        Err(error) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(feed = %kind, error = %error, "feed fetch failed");
            tx.send(FeedEvent::Failed { kind, error }).await.is_ok()
        }
    }
}
