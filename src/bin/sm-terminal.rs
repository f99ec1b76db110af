//! Command-line front end for the market terminal.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

use sm_terminal::{
    FeedBuilder, FeedKind, FeedPoller, FilterState, HourRange, JsonFileStore, KeyValueStore,
    LoginFlow, LoginStep, NewsItem, Paginator, ProfileForm, Selection, Sentiment, Session,
    SmClient, SortKey, TerminalView, ViewStatus, WatchlistStore, auth, terminal,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Backend REST base URL.
    #[arg(long, env = "SM_API_BASE", global = true)]
    api_base: Option<Url>,

    /// Bearer token to use (stored for later runs).
    #[arg(long, env = "SM_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// File holding the session token and the watchlist.
    #[arg(long, env = "SM_STATE_FILE", global = true, default_value = ".sm-terminal.json")]
    state_file: PathBuf,

    /// Display timezone (IANA name).
    #[arg(long, env = "SM_TZ", global = true)]
    tz: Option<Tz>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch one feed snapshot and print the filtered page.
    Feed(FeedArgs),

    /// Keep polling a feed and reprint the page on every refresh (Ctrl-C to quit).
    Watch {
        #[command(flatten)]
        feed: FeedArgs,

        /// Seconds between refreshes (defaults to the feed's cadence).
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Print today's price change for a symbol.
    Price { symbol: String },

    /// Manage the local watchlist.
    #[command(subcommand)]
    Watchlist(WatchlistCmd),

    /// Log in with phone + OTP (interactive).
    Login,

    /// Forget the stored token.
    Logout,
}

#[derive(Args, Debug, Clone)]
struct FeedArgs {
    /// Which feed: terminal or bse.
    #[arg(long, default_value = "terminal")]
    kind: FeedKind,

    /// First day (DD-MM-YYYY), terminal feed only.
    #[arg(long, value_parser = parse_day)]
    from: Option<NaiveDate>,

    /// Last day (DD-MM-YYYY), terminal feed only.
    #[arg(long, value_parser = parse_day)]
    to: Option<NaiveDate>,

    /// Substring matched against symbol, title and company.
    #[arg(long, default_value = "")]
    search: String,

    /// Category to include (repeatable; ALL for everything).
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Sentiment to include (repeatable).
    #[arg(long = "sentiment")]
    sentiments: Vec<Sentiment>,

    /// TIME, SENTIMENT or PRICE.
    #[arg(long, default_value = "TIME")]
    sort: SortKey,

    /// Hour-of-day window, e.g. 9-15.
    #[arg(long)]
    hours: Option<HourRange>,

    /// Items per page.
    #[arg(long, default_value_t = 20)]
    page_size: usize,

    /// Pages to reveal.
    #[arg(long, default_value_t = 1)]
    pages: usize,

    /// Resolve price changes for the printed items.
    #[arg(long)]
    prices: bool,
}

#[derive(Subcommand, Debug)]
enum WatchlistCmd {
    /// Show saved entries.
    List,
    /// Save a feed item by id with your own sentiment tag.
    Add {
        id: String,
        #[arg(long)]
        tag: Sentiment,
        #[arg(long, default_value = "terminal")]
        kind: FeedKind,
    },
    /// Remove an entry by id.
    Remove { id: String },
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%d-%m-%Y").map_err(|e| format!("expected DD-MM-YYYY: {e}"))
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sm_terminal=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

impl FeedArgs {
    fn filter(&self) -> FilterState {
        let sentiments = if self.sentiments.is_empty() {
            Selection::All
        } else {
            Selection::only(self.sentiments.iter().copied())
        };
        FilterState::new()
            .search(self.search.clone())
            .categories(Selection::from_labels(&self.categories))
            .sentiments(sentiments)
            .sort(self.sort)
            .hours(self.hours)
    }

    fn feed(&self, client: &SmClient) -> FeedBuilder {
        let mut feed = FeedBuilder::new(client, self.kind);
        if let Some(from) = self.from {
            feed = feed.from(from);
        }
        if let Some(to) = self.to {
            feed = feed.to(to);
        }
        feed
    }

    fn view(&self, client: &SmClient) -> TerminalView {
        let mut view = TerminalView::with_paginator(
            self.kind,
            client.display_tz(),
            Paginator::new(self.page_size),
        );
        view.set_filter(self.filter());
        view
    }
}

struct App {
    client: SmClient,
    store: Arc<dyn KeyValueStore>,
}

impl App {
    fn new(cli: &Cli) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&cli.state_file));
        let session = Session::persistent(store.clone())
            .with_context(|| format!("reading {}", cli.state_file.display()))?;
        if let Some(token) = &cli.token {
            session.set_token(token.clone())?;
        }

        let mut builder = SmClient::builder()
            .session(session)
            .timeout(Duration::from_secs(20));
        if let Some(base) = &cli.api_base {
            builder = builder.base_api(base.clone());
        }
        if let Some(tz) = cli.tz {
            builder = builder.display_tz(tz);
        }
        Ok(Self {
            client: builder.build()?,
            store,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    tracing::debug!(?cli.command, "starting");
    let app = App::new(&cli)?;

    match cli.command {
        Commands::Feed(args) => run_feed(&app, &args).await,
        Commands::Watch { feed, interval } => run_watch(&app, &feed, interval).await,
        Commands::Price { symbol } => {
            let change = sm_terminal::daily_change(&app.client, &symbol).await?;
            println!(
                "{symbol}: {:.2} ({:+.2}%) vs {:.2}",
                change.last_price, change.change_pct, change.previous_close
            );
            Ok(())
        }
        Commands::Watchlist(cmd) => run_watchlist(&app, cmd).await,
        Commands::Login => run_login(&app).await,
        Commands::Logout => {
            if !auth::logout(&app.client) {
                println!("No active session.");
                return Ok(());
            }
            println!("Logged out.");
            Ok(())
        }
    }
}

async fn run_feed(app: &App, args: &FeedArgs) -> Result<()> {
    let mut view = args.view(&app.client);
    match args.feed(&app.client).fetch().await {
        Ok(items) => view.apply_snapshot(items, chrono::Utc::now()),
        Err(e) => view.apply_error(&e),
    }
    for _ in 1..args.pages {
        view.load_more();
    }
    if args.prices {
        view.resolve_prices(&app.client, terminal::DEFAULT_PRICE_CONCURRENCY)
            .await;
    }
    render(&view)
}

async fn run_watch(app: &App, args: &FeedArgs, interval: Option<u64>) -> Result<()> {
    let mut view = args.view(&app.client);
    let mut poller = FeedPoller::new(args.feed(&app.client));
    if let Some(secs) = interval {
        poller = poller.interval(Duration::from_secs(secs));
    }
    let (handle, mut events) = poller.start()?;

    loop {
        tokio::select! {
            ev = events.recv() => {
                let Some(ev) = ev else { break };
                view.handle_event(ev);
                if args.prices {
                    view.resolve_prices(&app.client, terminal::DEFAULT_PRICE_CONCURRENCY).await;
                }
                render(&view)?;
                if *view.status() == ViewStatus::LoggedOut {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.stop().await;
    Ok(())
}

async fn run_watchlist(app: &App, cmd: WatchlistCmd) -> Result<()> {
    let mut list = WatchlistStore::open(app.store.clone())?;
    match cmd {
        WatchlistCmd::List => {
            if list.is_empty() {
                println!("Watchlist is empty.");
            }
            for e in list.entries() {
                println!(
                    "{:<8} {:<10} {:<24} {}  [{}]",
                    e.tag.as_str(),
                    e.item.symbol,
                    e.item.id,
                    e.item.title,
                    e.item.published_display
                );
            }
        }
        WatchlistCmd::Add { id, tag, kind } => {
            let items = FeedBuilder::new(&app.client, kind).fetch().await?;
            let Some(item) = items.into_iter().find(|it| it.id == id) else {
                bail!("no {kind} item with id {id} in the current feed");
            };
            list.add(item, tag)?;
            println!("Saved {id} as {tag}.");
        }
        WatchlistCmd::Remove { id } => {
            if list.remove(&id)? {
                println!("Removed {id}.");
            } else {
                println!("{id} is not on the watchlist.");
            }
        }
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    read_answer(&mut io::stdin().lock())
}

fn read_answer(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input closed before login finished");
    }
    Ok(line.trim().to_string())
}

async fn run_login(app: &App) -> Result<()> {
    let mut flow = LoginFlow::new(&app.client);
    loop {
        let outcome = match flow.step() {
            LoginStep::PhoneInput => flow.submit_phone(&prompt("Mobile number")?).await.map(|_| ()),
            LoginStep::OtpVerify => {
                let otp = prompt("OTP (or 'resend')")?;
                if otp.eq_ignore_ascii_case("resend") {
                    flow.resend_otp().await
                } else {
                    flow.submit_otp(&otp).await.map(|_| ())
                }
            }
            LoginStep::ProfileSetup => {
                let form = ProfileForm::new(
                    prompt("Name")?,
                    prompt("Email")?,
                    prompt("Password")?,
                );
                flow.submit_profile(&form).await.map(|_| ())
            }
            LoginStep::Success => break,
        };
        if outcome.is_err()
            && let Some(msg) = flow.error()
        {
            eprintln!("{msg}");
        } else if let Some(notice) = flow.notice() {
            println!("{notice}");
        }
    }
    println!("Logged in.");
    Ok(())
}

fn render(view: &TerminalView) -> Result<()> {
    let mut out = io::stdout().lock();
    match view.status() {
        ViewStatus::Loading => writeln!(out, "Loading...")?,
        ViewStatus::LoggedOut => {
            writeln!(out, "Session expired. Run `sm-terminal login`.")?;
            return Ok(());
        }
        ViewStatus::Error { message, retryable } => {
            writeln!(out, "! {message}{}", if *retryable { " (retry)" } else { "" })?;
        }
        ViewStatus::Ready => {}
    }

    let visible = view.visible();
    for item in &visible {
        writeln!(out, "{}", line(item))?;
    }
    writeln!(
        out,
        "-- {} of {} shown{}",
        visible.len(),
        view.filtered().len(),
        if view.has_more() { ", more available" } else { "" }
    )?;
    Ok(())
}

fn line(item: &NewsItem) -> String {
    let change = item
        .price_change
        .map(|p| format!("{p:+.2}%"))
        .unwrap_or_else(|| "   --".into());
    format!(
        "{}  {:<10} {:>8}  {:<8} {:.2}  {}",
        item.published_display,
        item.symbol,
        change,
        item.sentiment.as_str(),
        item.sentiment_score,
        item.title
    )
}
