use chrono_tz::Asia::Kolkata;
use httpmock::Method::GET;
use sm_terminal::{
    FeedEvent, FeedKind, FilterState, Paginator, ScrollMetrics, Selection, Session, SmError,
    TerminalView, ViewStatus,
};

use crate::common::{client, client_with_session, item, setup_server, ts};

fn many(n: usize) -> Vec<sm_terminal::NewsItem> {
    (0..n)
        .map(|i| {
            let mut it = item(&format!("n{i}"), if i % 2 == 0 { "TCS" } else { "INFY" }, None);
            it.published_at = Some(ts("2026-01-10T10:00:00Z") - chrono::Duration::minutes(i as i64));
            it
        })
        .collect()
}

#[test]
fn starts_loading_then_shows_the_first_page() {
    let mut view = TerminalView::new(FeedKind::Terminal, Kolkata);
    assert_eq!(view.status(), &ViewStatus::Loading);
    assert!(view.visible().is_empty());

    let at = ts("2026-01-10T10:05:00Z");
    view.apply_snapshot(many(45), at);

    assert_eq!(view.status(), &ViewStatus::Ready);
    assert_eq!(view.last_updated(), Some(at));
    assert_eq!(view.visible().len(), 20);
    assert!(view.has_more());
    assert!(view.on_tail_visible());
    assert_eq!(view.visible().len(), 40);
}

#[test]
fn refresh_keeps_revealed_page_but_filter_change_resets_it() {
    let mut view = TerminalView::with_paginator(FeedKind::Terminal, Kolkata, Paginator::new(10));
    view.apply_snapshot(many(30), ts("2026-01-10T10:05:00Z"));
    view.load_more();
    assert_eq!(view.visible().len(), 20);

    view.apply_snapshot(many(30), ts("2026-01-10T10:05:15Z"));
    assert_eq!(view.visible().len(), 20);

    view.set_filter(FilterState::new().search("tcs"));
    assert_eq!(view.filtered().len(), 15);
    assert_eq!(view.visible().len(), 10);

    let near_end = ScrollMetrics {
        offset: 900.0,
        viewport: 100.0,
        content: 1000.0,
    };
    assert!(view.on_scroll(near_end));
    assert_eq!(view.visible().len(), 15);
    assert!(!view.has_more());
}

#[test]
fn errors_keep_items_and_logout_is_terminal() {
    let mut view = TerminalView::new(FeedKind::Bse, Kolkata);
    view.apply_snapshot(many(3), ts("2026-01-10T10:05:00Z"));

    view.handle_event(FeedEvent::Failed {
        kind: FeedKind::Bse,
        error: SmError::Status {
            status: 502,
            url: "http://x/api/bsefeed".into(),
        },
    });
    match view.status() {
        ViewStatus::Error { retryable, .. } => assert!(*retryable),
        other => panic!("unexpected status {other:?}"),
    }
    assert_eq!(view.items().len(), 3);

    // events for the other feed are ignored
    view.handle_event(FeedEvent::LoggedOut {
        kind: FeedKind::Terminal,
    });
    assert!(matches!(view.status(), ViewStatus::Error { .. }));

    view.handle_event(FeedEvent::LoggedOut { kind: FeedKind::Bse });
    assert_eq!(view.status(), &ViewStatus::LoggedOut);
}

#[test]
fn categories_are_distinct_and_sorted() {
    let mut a = item("a", "TCS", None);
    a.category = "Results".into();
    let mut b = item("b", "INFY", None);
    b.category = "Board Meeting".into();
    let c = item("c", "SBIN", None);
    let mut d = item("d", "ITC", None);
    d.category = "Results".into();

    let mut view = TerminalView::new(FeedKind::Terminal, Kolkata);
    view.apply_snapshot(vec![a, b, c, d], ts("2026-01-10T10:05:00Z"));
    assert_eq!(
        view.categories(),
        ["Board Meeting", "Company Update", "Results"]
    );

    view.set_filter(FilterState::new().categories(Selection::from_labels(["results"])));
    assert_eq!(view.filtered().len(), 2);
}

#[tokio::test]
async fn resolved_prices_survive_the_next_snapshot() {
    let server = setup_server();
    let tcs = server.mock(|when, then| {
        when.method(GET).path("/api/chart").query_param("symbol", "TCS");
        then.status(200).body(r#"{"close": 105.0, "previousClose": 100.0}"#);
    });
    let infy = server.mock(|when, then| {
        when.method(GET).path("/api/chart").query_param("symbol", "INFY");
        then.status(500);
    });

    let client = client(&server, "t");
    let mut view = TerminalView::new(FeedKind::Terminal, Kolkata);
    view.apply_snapshot(many(4), ts("2026-01-10T10:05:00Z"));

    let resolved = view.resolve_prices(&client, 4).await;
    assert_eq!(resolved, 1);
    tcs.assert();
    infy.assert();
    assert_eq!(view.prices().get("tcs"), Some(5.0));
    assert!(
        view.items()
            .iter()
            .filter(|i| i.symbol == "TCS")
            .all(|i| i.price_change == Some(5.0))
    );

    // the next poll arrives without price changes
    let mut fresh = many(4);
    fresh.push(item("late", "TCS", Some("2026-01-10T11:00:00Z")));
    view.apply_snapshot(fresh, ts("2026-01-10T10:05:15Z"));
    assert!(
        view.items()
            .iter()
            .filter(|i| i.symbol == "TCS")
            .all(|i| i.price_change == Some(5.0))
    );
    assert_eq!(view.pending_price_symbols(), ["INFY"]);
    assert_eq!(view.status(), &ViewStatus::Ready);
}

#[tokio::test]
async fn price_lookup_rejection_logs_the_view_out() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(GET).path("/api/chart");
        then.status(401);
    });

    let session = Session::with_token("t");
    let client = client_with_session(&server, session.clone());
    let mut view = TerminalView::new(FeedKind::Terminal, Kolkata);
    view.apply_snapshot(many(2), ts("2026-01-10T10:05:00Z"));

    assert_eq!(view.resolve_prices(&client, 2).await, 0);
    assert_eq!(view.status(), &ViewStatus::LoggedOut);
    assert!(!session.is_authenticated());
}
