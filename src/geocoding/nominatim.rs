//! Geocoder implementation backed by the OpenStreetMap Nominatim HTTP API.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::{GeocodeResult, Geocoder, ProviderError};

/// Number of candidates requested from the provider. Handlers only consume
/// the first; the rest are discarded.
const RESULT_LIMIT: u32 = 5;

/// Geocoder over Nominatim's `/search` and `/reverse` endpoints.
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

/// One place entry in a jsonv2 response. Nominatim sends coordinates as
/// strings.
#[derive(Debug, Deserialize)]
struct PlaceEntry {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimClient {
    /// Create a client against the given base URL.
    ///
    /// The timeout bounds every provider call made through this client.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        // Reject a malformed base URL at startup rather than on first request.
        Url::parse(base_url)?;

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(
        &self,
        url: String,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, ProviderError> {
        let response = self.client.get(&url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http { status });
        }

        let body = response.json::<serde_json::Value>().await?;
        Ok(body)
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ProviderError> {
        debug!(address = %address, "Provider geocode request");

        let body = self
            .fetch(
                format!("{}/search", self.base_url),
                &[
                    ("q", address.to_string()),
                    ("format", "jsonv2".to_string()),
                    ("limit", RESULT_LIMIT.to_string()),
                ],
            )
            .await?;

        if let Some(detail) = payload_error(&body) {
            return Err(ProviderError::Api(detail));
        }

        let entries: Vec<PlaceEntry> = serde_json::from_value(body)
            .map_err(|e| ProviderError::Unknown(format!("malformed provider response: {}", e)))?;

        Ok(entries.iter().filter_map(convert_entry).collect())
    }

    async fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Vec<GeocodeResult>, ProviderError> {
        debug!(lat, lng, "Provider reverse geocode request");

        let body = self
            .fetch(
                format!("{}/reverse", self.base_url),
                &[
                    ("lat", lat.to_string()),
                    ("lon", lng.to_string()),
                    ("format", "jsonv2".to_string()),
                ],
            )
            .await?;

        if let Some(detail) = payload_error(&body) {
            // Nominatim reports "nothing at this point" as an error payload.
            // That is the not-found condition, not a provider fault.
            if detail == "Unable to geocode" {
                return Ok(Vec::new());
            }
            return Err(ProviderError::Api(detail));
        }

        let entry: PlaceEntry = serde_json::from_value(body)
            .map_err(|e| ProviderError::Unknown(format!("malformed provider response: {}", e)))?;

        Ok(convert_entry(&entry).into_iter().collect())
    }
}

/// Extract an error reported inside a 200 payload, if any.
///
/// Nominatim uses both `{"error": "..."}` and `{"error": {"code": ...,
/// "message": "..."}}` shapes depending on the endpoint.
fn payload_error(body: &serde_json::Value) -> Option<String> {
    body.get("error").map(|e| match e.as_str() {
        Some(s) => s.to_string(),
        None => e
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_else(|| e.to_string()),
    })
}

/// Convert a raw entry, dropping it if the coordinate strings don't parse.
fn convert_entry(entry: &PlaceEntry) -> Option<GeocodeResult> {
    match (entry.lat.parse::<f64>(), entry.lon.parse::<f64>()) {
        (Ok(latitude), Ok(longitude)) => Some(GeocodeResult {
            formatted_address: entry.display_name.clone(),
            latitude,
            longitude,
        }),
        _ => {
            warn!(
                lat = %entry.lat,
                lon = %entry.lon,
                "Dropping provider result with unparseable coordinates"
            );
            None
        }
    }
}
