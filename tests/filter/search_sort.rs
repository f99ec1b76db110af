use chrono_tz::Asia::Kolkata;
use sm_terminal::filter::{self, sort_items};
use sm_terminal::{FilterState, HourRange, NewsItem, Selection, Sentiment, SortKey};

use crate::common::item;

fn sample() -> Vec<NewsItem> {
    let mut a = item("a", "RELIANCE", Some("2026-01-10T04:00:00Z")); // 09:30 IST
    a.sentiment = Sentiment::Bullish;
    a.sentiment_score = 0.9;
    a.category = "Results".into();
    a.price_change = Some(1.5);

    let mut b = item("b", "TCS", Some("2026-01-10T09:30:00Z")); // 15:00 IST
    b.sentiment = Sentiment::Bearish;
    b.sentiment_score = 0.4;
    b.company = "Tata Consultancy Services".into();

    let mut c = item("c", "INFY", Some("2026-01-10T17:36:00Z")); // 23:06 IST
    c.sentiment_score = 0.6;
    c.category = "Order Win".into();
    c.price_change = Some(-3.0);

    let d = item("d", "HDFCBANK", None);
    vec![a, b, c, d]
}

fn ids<'a>(items: &[&'a NewsItem]) -> Vec<&'a str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

#[test]
fn empty_filter_keeps_everything_newest_first() {
    let items = sample();
    let out = filter::apply(&items, &FilterState::default(), Kolkata);
    assert_eq!(ids(&out), ["c", "b", "a", "d"]);
}

#[test]
fn search_matches_symbol_title_and_company_case_insensitively() {
    let items = sample();

    let out = filter::apply(&items, &FilterState::new().search("reliance"), Kolkata);
    assert_eq!(ids(&out), ["a"]);

    let out = filter::apply(&items, &FilterState::new().search("  consultancy "), Kolkata);
    assert_eq!(ids(&out), ["b"]);

    let out = filter::apply(&items, &FilterState::new().search("HEADLINE"), Kolkata);
    assert_eq!(out.len(), 4);

    let out = filter::apply(&items, &FilterState::new().search("no such thing"), Kolkata);
    assert!(out.is_empty());
}

#[test]
fn category_and_sentiment_restrict_independently() {
    let items = sample();

    let f = FilterState::new().categories(Selection::from_labels(["results", "Order Win"]));
    assert_eq!(ids(&filter::apply(&items, &f, Kolkata)), ["c", "a"]);

    let f = FilterState::new().categories(Selection::from_labels(["Results", "ALL"]));
    assert_eq!(filter::apply(&items, &f, Kolkata).len(), 4);

    let f = FilterState::new().sentiments(Selection::only([Sentiment::Neutral]));
    assert_eq!(ids(&filter::apply(&items, &f, Kolkata)), ["c", "d"]);

    let f = FilterState::new()
        .sentiments(Selection::only([Sentiment::Bullish, Sentiment::Bearish]))
        .search("tcs");
    assert_eq!(ids(&filter::apply(&items, &f, Kolkata)), ["b"]);
}

#[test]
fn hour_window_uses_display_timezone_and_drops_unknown_times() {
    let items = sample();

    let f = FilterState::new().hours(Some(HourRange::new(9, 15).unwrap()));
    assert_eq!(ids(&filter::apply(&items, &f, Kolkata)), ["b", "a"]);

    let f = FilterState::new().hours(Some("22-2".parse().unwrap()));
    assert_eq!(ids(&filter::apply(&items, &f, Kolkata)), ["c"]);
}

#[test]
fn hour_range_validates_and_wraps() {
    assert!(HourRange::new(0, 24).is_err());
    assert!("9to15".parse::<HourRange>().is_err());

    let r: HourRange = " 9 - 15 ".parse().unwrap();
    assert!(r.contains(9) && r.contains(15) && !r.contains(16));

    let night = HourRange::new(22, 2).unwrap();
    assert!(night.contains(23) && night.contains(0) && night.contains(2));
    assert!(!night.contains(12));
    assert_eq!(night.to_string(), "22:00-02:59");
}

#[test]
fn sort_by_sentiment_is_descending_and_stable() {
    let items = sample();
    let f = FilterState::new().sort(SortKey::Sentiment);
    let out = filter::apply(&items, &f, Kolkata);
    assert_eq!(ids(&out), ["a", "c", "b", "d"]);
    for w in out.windows(2) {
        assert!(w[0].sentiment_score >= w[1].sentiment_score);
    }

    // equal scores keep input order
    let mut same = vec![item("x", "A", None), item("y", "B", None)];
    same.iter_mut().for_each(|i| i.sentiment_score = 0.5);
    let mut refs: Vec<&NewsItem> = same.iter().collect();
    sort_items(&mut refs, SortKey::Sentiment);
    assert_eq!(ids(&refs), ["x", "y"]);
}

#[test]
fn sort_by_price_change_puts_unknown_last() {
    let items = sample();
    let f = FilterState::new().sort(SortKey::PriceChange);
    assert_eq!(ids(&filter::apply(&items, &f, Kolkata)), ["a", "c", "b", "d"]);
}

#[test]
fn sort_key_parses_user_labels() {
    assert_eq!("time".parse::<SortKey>().unwrap(), SortKey::Time);
    assert_eq!("SENTIMENT".parse::<SortKey>().unwrap(), SortKey::Sentiment);
    assert_eq!("price_change".parse::<SortKey>().unwrap(), SortKey::PriceChange);
    assert!("volume".parse::<SortKey>().is_err());
}
