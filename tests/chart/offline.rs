use httpmock::Method::GET;
use sm_terminal::{ErrorKind, daily_change};

use crate::common::{client, fixture, setup_server};

#[tokio::test]
async fn chart_envelope_yields_daily_change() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/chart")
            .query_param("symbol", "RELIANCE")
            .query_param("interval", "1d")
            .query_param("range", "1d")
            .header("authorization", "Bearer t");
        then.status(200)
            .header("content-type", "application/json")
            .body(fixture("chart_RELIANCE"));
    });

    let client = client(&server, "t");
    let change = daily_change(&client, "RELIANCE").await.unwrap();

    mock.assert();
    assert_eq!(change.last_price, 1530.0);
    assert_eq!(change.previous_close, 1500.0);
    assert!((change.change_pct - 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn missing_meta_falls_back_to_quote_series() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(GET).path("/api/chart");
        then.status(200).body(
            r#"{"chart":{"result":[{"indicators":{"quote":[{"open":[null,200.0],"close":[190.0,null]}]}}]}}"#,
        );
    });

    let client = client(&server, "t");
    let change = daily_change(&client, "TCS").await.unwrap();
    assert_eq!(change.last_price, 190.0);
    assert_eq!(change.previous_close, 200.0);
    assert!((change.change_pct + 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn flat_quote_shape_is_accepted() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(GET).path("/api/chart");
        then.status(200).body(r#"{"price": 99.0, "prevClose": 100.0}"#);
    });

    let client = client(&server, "t");
    let change = daily_change(&client, "INFY").await.unwrap();
    assert!((change.change_pct + 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn chart_error_and_zero_reference_are_data_errors() {
    let server = setup_server();
    server.mock(|when, then| {
        when.method(GET).path("/api/chart").query_param("symbol", "BAD");
        then.status(200).body(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#,
        );
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/chart").query_param("symbol", "ZERO");
        then.status(200).body(r#"{"close": 10.0, "previousClose": 0}"#);
    });

    let client = client(&server, "t");
    let err = daily_change(&client, "BAD").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
    let err = daily_change(&client, "ZERO").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
}
