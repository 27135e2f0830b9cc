//! Yahoo Finance response shapes.
//!
//! Only the fields the client reads are modelled; everything else in the
//! payload is ignored.

use serde::Deserialize;

/// Error block shared by the chart and quoteSummary envelopes.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// `/v8/finance/chart/{symbol}` envelope.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    pub result: Option<Vec<ChartData>>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartData {
    pub meta: ChartMeta,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub currency: Option<String>,
    pub regular_market_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteSeries {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartData {
    /// Closing prices with gaps (halted sessions) removed.
    pub fn closes(&self) -> Vec<f64> {
        self.indicators
            .quote
            .first()
            .map(|series| series.close.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}

/// `/v10/finance/quoteSummary/{symbol}` envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryBody {
    pub result: Option<Vec<QuoteSummary>>,
    pub error: Option<ApiError>,
}

/// Modules requested from quoteSummary. Any of them may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    #[serde(default)]
    pub price: Option<PriceModule>,
    #[serde(default)]
    pub summary_profile: Option<ProfileModule>,
    #[serde(default)]
    pub summary_detail: Option<DetailModule>,
    #[serde(default)]
    pub default_key_statistics: Option<KeyStatisticsModule>,
    #[serde(default)]
    pub financial_data: Option<FinancialDataModule>,
}

/// Yahoo's `{"raw": 1.5, "fmt": "1.50"}` number wrapper. Missing values
/// arrive as `{}`.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct RawValue {
    pub raw: Option<f64>,
}

/// Flatten an optional wrapper into its raw number.
pub fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceModule {
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub currency: Option<String>,
    pub regular_market_price: Option<RawValue>,
    pub market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileModule {
    pub sector: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailModule {
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<RawValue>,
    pub market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatisticsModule {
    pub price_to_book: Option<RawValue>,
    pub trailing_eps: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDataModule {
    pub current_price: Option<RawValue>,
    pub return_on_equity: Option<RawValue>,
    pub debt_to_equity: Option<RawValue>,
}
