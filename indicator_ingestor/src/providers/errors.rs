use thiserror::Error;

/// Errors that can occur within an `IndicatorProvider` implementation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout, or a
    /// reply that does not decode as the expected document).
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The datasource's API returned a specific error reply (e.g., a
    /// non-success status for an unknown country code).
    #[error("API error: {0}")]
    Api(String),

    /// The reply decoded fine but carried no usable observation (no rows,
    /// or a null value in the most recent period).
    #[error("no usable observation: {0}")]
    Empty(String),
}
