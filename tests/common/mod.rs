#![allow(dead_code)]

use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use httpmock::{Method::GET, Mock, MockServer};
use sm_terminal::{FeedKind, NewsItem, Sentiment, Session, SmClient};
use url::Url;

pub fn setup_server() -> MockServer {
    MockServer::start()
}

pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(format!("{name}.json"));
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

pub fn api_base(server: &MockServer) -> Url {
    Url::parse(&format!("{}/api/", server.base_url())).unwrap()
}

/// Client pointed at the mock server with a memory-only session holding `token`.
pub fn client(server: &MockServer, token: &str) -> SmClient {
    SmClient::builder()
        .base_api(api_base(server))
        .token(token)
        .build()
        .unwrap()
}

pub fn client_with_session(server: &MockServer, session: Session) -> SmClient {
    SmClient::builder()
        .base_api(api_base(server))
        .session(session)
        .build()
        .unwrap()
}

pub fn mock_terminal<'a>(server: &'a MockServer, token: &str) -> Mock<'a> {
    let auth = format!("Bearer {token}");
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/terminal")
            .header("authorization", auth);
        then.status(200)
            .header("content-type", "application/json")
            .body(fixture("terminal_feed"));
    })
}

pub fn mock_bse(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/api/bsefeed");
        then.status(200)
            .header("content-type", "application/json")
            .body(fixture("bse_feed"));
    })
}

pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// A hand-built card for pure (offline) tests.
pub fn item(id: &str, symbol: &str, published: Option<&str>) -> NewsItem {
    NewsItem {
        id: id.to_string(),
        feed: FeedKind::Terminal,
        symbol: symbol.to_string(),
        company: format!("{symbol} Ltd"),
        category: "Company Update".to_string(),
        title: format!("{symbol} headline {id}"),
        body: String::new(),
        published_raw: published.unwrap_or_default().to_string(),
        published_at: published.map(ts),
        published_display: published.unwrap_or("N/A").to_string(),
        attachment_url: None,
        sentiment: Sentiment::Neutral,
        sentiment_score: 0.0,
        source: "News".to_string(),
        price_change: None,
    }
}
