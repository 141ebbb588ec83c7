//! Geocoding provider interface and error taxonomy.

use async_trait::async_trait;
use thiserror::Error;

pub mod nominatim;

pub use nominatim::NominatimClient;

/// A single candidate location returned by a geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Failure modes of a geocoding provider call.
///
/// An empty result list is not an error; handlers treat it as the distinct
/// "not found" condition. None of these are retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request exceeded the configured timeout.
    #[error("Geocoding API request timed out")]
    Timeout,

    /// Network-level failure before an HTTP response was received.
    #[error("Network communication error with geocoding API")]
    Transport(#[source] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("Geocoding API HTTP error: {status}")]
    Http { status: reqwest::StatusCode },

    /// The provider answered 200 but reported an error in the payload.
    #[error("Geocoding API error: {0}")]
    Api(String),

    /// Anything not classified above.
    #[error("An error occurred: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_connect() || err.is_request() {
            ProviderError::Transport(err)
        } else if let Some(status) = err.status() {
            ProviderError::Http { status }
        } else {
            ProviderError::Unknown(err.to_string())
        }
    }
}

/// Forward and reverse geocoding over an external provider.
///
/// Injected into the handlers at construction so tests can substitute a
/// double.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text address to candidate locations.
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ProviderError>;

    /// Resolve a coordinate pair to candidate addresses.
    async fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Vec<GeocodeResult>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_kind() {
        assert_eq!(
            ProviderError::Timeout.to_string(),
            "Geocoding API request timed out"
        );
        assert_eq!(
            ProviderError::Http {
                status: reqwest::StatusCode::BAD_GATEWAY
            }
            .to_string(),
            "Geocoding API HTTP error: 502 Bad Gateway"
        );
        assert_eq!(
            ProviderError::Api("quota exceeded".to_string()).to_string(),
            "Geocoding API error: quota exceeded"
        );
    }
}
