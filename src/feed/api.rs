use chrono::NaiveDate;

use crate::{
    core::{SmClient, SmError, time::format_query_date},
    feed::{FeedKind, model::NewsItem, normalize},
};

/// `GET {base}/terminal?from=DD-MM-YYYY&to=DD-MM-YYYY&source=<source>`
pub(super) async fn fetch_terminal(
    client: &SmClient,
    from: NaiveDate,
    to: NaiveDate,
    source: &str,
) -> Result<Vec<NewsItem>, SmError> {
    if from > to {
        return Err(SmError::InvalidDates);
    }

    let mut url = client.endpoint("terminal")?;
    url.query_pairs_mut()
        .append_pair("from", &format_query_date(from))
        .append_pair("to", &format_query_date(to))
        .append_pair("source", source);

    let body = client.get_authed(url).await?;
    normalize::normalize_body(FeedKind::Terminal, &body, client.display_tz())
}

/// `GET {base}/bsefeed`
pub(super) async fn fetch_bse(client: &SmClient) -> Result<Vec<NewsItem>, SmError> {
    let url = client.endpoint("bsefeed")?;
    let body = client.get_authed(url).await?;
    normalize::normalize_body(FeedKind::Bse, &body, client.display_tz())
}
