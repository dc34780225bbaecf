use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::providers::{
    IndicatorProvider,
    errors::ProviderError,
    world_bank::response::IndicatorReply,
};

/// Default API root. The v2 JSON surface needs no authentication.
pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";

/// GDP in current US dollars, the indicator this engine was built around.
pub const GDP_CURRENT_USD: &str = "NY.GDP.MKTP.CD";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider backed by the World Bank v2 REST API.
pub struct WorldBankProvider {
    client: Client,
    base_url: String,
    indicator: String,
}

impl WorldBankProvider {
    /// Creates a provider against the public API with the GDP indicator
    /// and a default request timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_settings(DEFAULT_BASE_URL, GDP_CURRENT_USD, DEFAULT_TIMEOUT)
    }

    /// Creates a provider against a custom API root, indicator code, and
    /// per-request timeout. Used when these come from config.
    pub fn with_settings(
        base_url: impl Into<String>,
        indicator: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            indicator: indicator.into(),
        })
    }

    fn endpoint(&self, country_code: &str) -> String {
        format!(
            "{}/country/{}/indicator/{}?format=json",
            self.base_url, country_code, self.indicator
        )
    }
}

/// Pull the newest observation out of a decoded reply.
///
/// The API lists periods newest-first; only the first row counts. A null
/// `value` there (typically the current year, not yet reported) is
/// [`ProviderError::Empty`], not a cue to scan older rows.
fn extract_latest(reply: IndicatorReply, country_code: &str) -> Result<f64, ProviderError> {
    let (_page, rows) = reply;
    let rows = rows.unwrap_or_default();

    let newest = rows.first().ok_or_else(|| {
        ProviderError::Empty(format!("no observations for {country_code}"))
    })?;

    newest.value.ok_or_else(|| {
        ProviderError::Empty(format!(
            "latest period for {country_code} has no reported value"
        ))
    })
}

#[async_trait]
impl IndicatorProvider for WorldBankProvider {
    async fn latest_value(&self, country_code: &str) -> Result<f64, ProviderError> {
        let response = self.client.get(self.endpoint(country_code)).send().await?;

        if !response.status().is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ProviderError::Api(error_msg));
        }

        // Error documents come back as a one-element array even with a 200
        // status; they fail to decode as the two-element reply and surface
        // as a Request error.
        let reply = response.json::<IndicatorReply>().await?;

        extract_latest(reply, country_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_json(rows: &str) -> String {
        format!(
            r#"[
                {{"page":1,"pages":2,"per_page":50,"total":65,"lastupdated":"2025-07-01"}},
                {rows}
            ]"#
        )
    }

    fn row(date: &str, value: &str) -> String {
        format!(
            r#"{{"indicator":{{"id":"NY.GDP.MKTP.CD","value":"GDP (current US$)"}},
                 "country":{{"id":"IN","value":"India"}},
                 "countryiso3code":"IND","date":"{date}","value":{value},
                 "unit":"","obs_status":"","decimal":0}}"#
        )
    }

    #[test]
    fn extracts_the_first_row_value() {
        let body = reply_json(&format!(
            "[{},{}]",
            row("2024", "3912686168565.5"),
            row("2023", "3638898000000.0")
        ));
        let reply: IndicatorReply = serde_json::from_str(&body).unwrap();

        let value = extract_latest(reply, "IN").unwrap();
        assert_eq!(value, 3912686168565.5);
    }

    #[test]
    fn null_value_in_newest_period_is_empty_not_a_scan() {
        let body = reply_json(&format!(
            "[{},{}]",
            row("2025", "null"),
            row("2024", "3912686168565.5")
        ));
        let reply: IndicatorReply = serde_json::from_str(&body).unwrap();

        let err = extract_latest(reply, "IN").unwrap_err();
        assert!(matches!(err, ProviderError::Empty(_)), "got {err:?}");
    }

    #[test]
    fn no_rows_is_empty() {
        for rows in ["[]", "null"] {
            let body = reply_json(rows);
            let reply: IndicatorReply = serde_json::from_str(&body).unwrap();
            let err = extract_latest(reply, "IN").unwrap_err();
            assert!(matches!(err, ProviderError::Empty(_)), "rows {rows}: {err:?}");
        }
    }

    #[test]
    fn error_documents_do_not_decode_as_a_reply() {
        // What the API actually returns for a bad country code (status 200).
        let body = r#"[{"message":[{"id":"120","key":"Invalid value","value":"The provided parameter value is not valid"}]}]"#;
        assert!(serde_json::from_str::<IndicatorReply>(body).is_err());
    }

    #[test]
    fn endpoint_matches_the_v2_shape() {
        let provider =
            WorldBankProvider::with_settings("https://api.worldbank.org/v2/", GDP_CURRENT_USD, DEFAULT_TIMEOUT)
                .unwrap();
        assert_eq!(
            provider.endpoint("IN"),
            "https://api.worldbank.org/v2/country/IN/indicator/NY.GDP.MKTP.CD?format=json"
        );
    }
}
