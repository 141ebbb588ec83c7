//! Address record structure persisted by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted unit of work.
///
/// A record is used in one of two disjoint modes: a single geocoded point
/// (coordinates populated, no distance) or a computed distance between two
/// points (distance populated, no coordinates). All optional fields serialize
/// as `null` when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Opaque identity assigned at creation, immutable.
    pub id: Uuid,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// The raw input that produced this record: the free-text address, an
    /// empty string for reverse-geocoded records, or the synthetic
    /// `"lat1,lng1_lat2,lng2"` key for distance records. Natural key for
    /// distance upserts.
    #[serde(rename = "address")]
    pub query: String,

    /// Human-readable address returned by the geocoding provider.
    pub formatted_address: Option<String>,

    /// Latitude in decimal degrees (-90 to 90).
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees (-180 to 180).
    pub longitude: Option<f64>,

    /// Great-circle distance in kilometers; distance records only.
    pub distance_km: Option<f64>,
}

impl AddressRecord {
    /// Create a geocoded-point record with a fresh id.
    pub fn new_point(
        query: &str,
        formatted_address: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            query: query.to_string(),
            formatted_address,
            latitude,
            longitude,
            distance_km: None,
        }
    }

    /// Create a distance record with a fresh id and no distance set yet.
    pub fn new_distance(query: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            query: query.to_string(),
            formatted_address: None,
            latitude: None,
            longitude: None,
            distance_km: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_record_serializes_query_as_address() {
        let record = AddressRecord::new_point(
            "221B Baker Street",
            Some("221B Baker St, London".to_string()),
            Some(51.5238),
            Some(-0.1586),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["address"], "221B Baker Street");
        assert_eq!(json["formatted_address"], "221B Baker St, London");
        assert!(json.get("query").is_none());
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let record = AddressRecord::new_distance("1,2_3,4");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["formatted_address"].is_null());
        assert!(json["latitude"].is_null());
        assert!(json["longitude"].is_null());
        assert!(json["distance_km"].is_null());
    }

    #[test]
    fn test_round_trip() {
        let mut record = AddressRecord::new_distance("40.7,-74.0_51.5,-0.1");
        record.distance_km = Some(5570.0);
        let json = serde_json::to_string(&record).unwrap();
        let back: AddressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, record.id);
        assert_eq!(back.query, record.query);
        assert_eq!(back.distance_km, Some(5570.0));
    }
}
