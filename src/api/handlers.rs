//! HTTP request handlers for geocoding and distance queries.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::AppState;
use crate::coords;
use crate::distance;
use crate::error::ApiError;
use crate::models::AddressRecord;

/// Query parameters for `/geocode/`.
#[derive(Debug, Deserialize)]
pub struct GeocodeParams {
    pub address: Option<String>,
}

/// Query parameters for `/reverse-geocode/`.
#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// Query parameters for `/distance/`.
#[derive(Debug, Deserialize)]
pub struct DistanceParams {
    pub lat1: Option<String>,
    pub lng1: Option<String>,
    pub lat2: Option<String>,
    pub lng2: Option<String>,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: usize,
}

/// Health check endpoint.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records: state.store.count(),
    })
}

/// Forward geocode an address and persist the first result.
pub async fn geocode_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<AddressRecord>, ApiError> {
    let address = match params.address {
        Some(a) if !a.is_empty() => a,
        _ => return Err(ApiError::validation("Address parameter is required")),
    };

    debug!(address = %address, "Geocode query");

    let results = state.geocoder.geocode(&address).await?;
    let first = results
        .first()
        .ok_or_else(|| ApiError::not_found("Failed to geocode address"))?;

    let record = state.store.create(AddressRecord::new_point(
        &address,
        Some(first.formatted_address.clone()),
        Some(first.latitude),
        Some(first.longitude),
    ))?;

    info!(
        address = %address,
        lat = first.latitude,
        lng = first.longitude,
        "Geocoded address"
    );

    Ok(Json(record))
}

/// Reverse geocode a coordinate pair and persist the first result.
pub async fn reverse_geocode_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReverseGeocodeParams>,
) -> Result<Json<AddressRecord>, ApiError> {
    let (raw_lat, raw_lng) = match (&params.lat, &params.lng) {
        (Some(lat), Some(lng)) if !lat.is_empty() && !lng.is_empty() => (lat, lng),
        _ => {
            return Err(ApiError::validation(
                "Latitude and longitude parameters are required",
            ))
        }
    };

    let lat = coords::parse_coordinate(raw_lat)
        .map_err(|_| ApiError::validation("Invalid latitude or longitude values"))?;
    let lng = coords::parse_coordinate(raw_lng)
        .map_err(|_| ApiError::validation("Invalid latitude or longitude values"))?;
    coords::validate_range(lat, lng)
        .map_err(|_| ApiError::validation("Invalid latitude or longitude values"))?;

    debug!(lat, lng, "Reverse geocode query");

    let results = state.geocoder.reverse_geocode(lat, lng).await?;
    let first = results
        .first()
        .ok_or_else(|| ApiError::not_found("Failed to reverse geocode"))?;

    // The stored coordinates echo the request input, not the provider's
    // snapped location. Reverse lookups always insert a new row.
    let record = state.store.create(AddressRecord::new_point(
        "",
        Some(first.formatted_address.clone()),
        Some(lat),
        Some(lng),
    ))?;

    info!(lat, lng, "Reverse geocoded point");

    Ok(Json(record))
}

/// Compute the great-circle distance between two coordinate pairs and upsert
/// the result keyed by the coordinate-pair string.
pub async fn distance_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DistanceParams>,
) -> Result<Json<AddressRecord>, ApiError> {
    let lat1 = parse_distance_param(&params.lat1)?;
    let lng1 = parse_distance_param(&params.lng1)?;
    let lat2 = parse_distance_param(&params.lat2)?;
    let lng2 = parse_distance_param(&params.lng2)?;

    coords::validate_range(lat1, lng1)
        .map_err(|_| ApiError::validation("Invalid latitude or longitude values"))?;
    coords::validate_range(lat2, lng2)
        .map_err(|_| ApiError::validation("Invalid latitude or longitude values"))?;

    let km = distance::distance_km(lat1, lng1, lat2, lng2);
    let query = format!("{},{}_{},{}", lat1, lng1, lat2, lng2);

    debug!(query = %query, km, "Distance query");

    let record = state.store.upsert_distance(&query, km)?;

    Ok(Json(record))
}

fn parse_distance_param(raw: &Option<String>) -> Result<f64, ApiError> {
    coords::parse_coordinate(raw.as_deref().unwrap_or(""))
        .map_err(|_| ApiError::validation("Invalid coordinate format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_params_deserialize() {
        let json = r#"{"address": "1600 Amphitheatre Parkway"}"#;
        let params: GeocodeParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.address.as_deref(), Some("1600 Amphitheatre Parkway"));

        let params: GeocodeParams = serde_json::from_str("{}").unwrap();
        assert!(params.address.is_none());
    }

    #[test]
    fn test_distance_params_deserialize() {
        let json = r#"{"lat1": "1", "lng1": "2", "lat2": "3", "lng2": "4"}"#;
        let params: DistanceParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.lat1.as_deref(), Some("1"));
        assert_eq!(params.lng2.as_deref(), Some("4"));

        let params: DistanceParams = serde_json::from_str("{}").unwrap();
        assert!(params.lat1.is_none());
    }

    #[test]
    fn test_distance_query_key_uses_default_float_formatting() {
        let query = format!("{},{}_{},{}", 40.7128, -74.0060, 51.5074, -0.1278);
        assert_eq!(query, "40.7128,-74.006_51.5074,-0.1278");
    }

    #[test]
    fn test_health_response_serialize() {
        let response = HealthResponse {
            status: "ok",
            records: 3,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"ok\""));
        assert!(json.contains("3"));
    }
}
