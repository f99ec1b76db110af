use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ChartPayload {
    Envelope(ChartEnvelope),
    Flat(FlatQuote),
}

#[derive(Deserialize)]
pub(crate) struct ChartEnvelope {
    pub(crate) chart: ChartNode,
}

#[derive(Deserialize)]
pub(crate) struct ChartNode {
    #[serde(default)]
    pub(crate) result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub(crate) error: Option<ChartError>,
}

#[derive(Deserialize)]
pub(crate) struct ChartError {
    #[serde(default)]
    pub(crate) code: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct ChartResult {
    #[serde(default)]
    pub(crate) meta: Option<MetaNode>,
    #[serde(default)]
    pub(crate) indicators: Option<Indicators>,
}

#[derive(Deserialize)]
pub(crate) struct MetaNode {
    #[serde(default, rename = "regularMarketPrice")]
    pub(crate) regular_market_price: Option<f64>,
    #[serde(default, rename = "chartPreviousClose")]
    pub(crate) chart_previous_close: Option<f64>,
    #[serde(default, rename = "previousClose")]
    pub(crate) previous_close: Option<f64>,
}

#[derive(Deserialize)]
pub(crate) struct Indicators {
    #[serde(default)]
    pub(crate) quote: Vec<QuoteBlock>,
}

#[derive(Deserialize)]
pub(crate) struct QuoteBlock {
    #[serde(default)]
    pub(crate) open: Vec<Option<f64>>,
    #[serde(default)]
    pub(crate) close: Vec<Option<f64>>,
}

/// Minimal shape some deployments return instead of the chart envelope.
#[derive(Deserialize)]
pub(crate) struct FlatQuote {
    #[serde(default)]
    pub(crate) open: Option<f64>,
    #[serde(default, alias = "price", alias = "last")]
    pub(crate) close: Option<f64>,
    #[serde(default, rename = "previousClose", alias = "previous_close", alias = "prevClose")]
    pub(crate) previous_close: Option<f64>,
}
