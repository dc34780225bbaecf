#![cfg(test)]
use indicator_ingestor::providers::{IndicatorProvider, world_bank::WorldBankProvider};
use serial_test::serial;

// These tests hit the public World Bank API and are ignored by default.
// Run them with: cargo test -- --ignored

#[tokio::test]
#[serial]
#[ignore]
async fn test_world_bank_latest_gdp() {
    let provider = WorldBankProvider::new().expect("Failed to create WorldBankProvider");

    let result = provider.latest_value("IN").await;
    assert!(result.is_ok(), "latest_value returned an error: {:?}", result.err());

    let gdp = result.unwrap();
    // India's GDP has been above one trillion USD since 2007; anything
    // smaller means we decoded the wrong field.
    assert!(gdp > 1.0e12, "implausible GDP value: {gdp}");
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_world_bank_invalid_country_code_errors() {
    let provider = WorldBankProvider::new().expect("Failed to create WorldBankProvider");

    // The API answers bad codes with an error document, not a reply.
    let result = provider.latest_value("XONotACountry").await;
    assert!(result.is_err(), "expected an error, got {:?}", result.ok());
}
