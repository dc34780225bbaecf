use chrono::NaiveDate;
use serde::Deserialize;

/// Decoded shape of a v2 indicator reply: `[page-info, rows]`.
///
/// Error replies are a single-element array instead and intentionally fail
/// to decode as this type.
pub type IndicatorReply = (PageInfo, Option<Vec<IndicatorRow>>);

#[derive(Deserialize, Debug)]
pub struct PageInfo {
    pub page: u32,
    pub pages: u32,
    pub total: u32,
    #[serde(default)]
    pub lastupdated: Option<NaiveDate>,
}

#[derive(Deserialize, Debug)]
pub struct IndicatorRow {
    pub indicator: ObservationRef,
    pub country: ObservationRef,
    #[serde(rename = "countryiso3code", default)]
    pub country_iso3: String,
    pub date: String,
    pub value: Option<f64>,
}

/// The `{id, value}` pairs the API uses for indicator and country labels.
#[derive(Deserialize, Debug)]
pub struct ObservationRef {
    pub id: String,
    pub value: String,
}
