use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::listings::ListingService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub listings: ListingService,
}

/// One pet's adoption record. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: uuid::Uuid,
    pub name: String,
    pub age: u32,
    pub breed: String,
    #[serde(default)]
    pub description: String,
    pub image_url: String,
    #[serde(with = "iso_millis")]
    pub added_at: DateTime<Utc>,
}

impl Listing {
    /// Timestamp for a new listing, at the precision it is persisted with.
    pub fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

/// The whole persisted document: `{ "pets": [...] }`, insertion ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetCollection {
    pub pets: Vec<Listing>,
}

impl PetCollection {
    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }
}

// API Request/Response types

#[derive(Debug, Serialize, Deserialize)]
pub struct AddListingResponse {
    pub success: bool,
    pub pet: Listing,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub storage: String,
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-10-18T09:30:00.123Z`.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Listing {
        Listing {
            id: uuid::Uuid::parse_str("6f1c2a4e-0d3b-4c5a-9e7f-1a2b3c4d5e6f").unwrap(),
            name: "Buddy".to_string(),
            age: 3,
            breed: "Golden Retriever".to_string(),
            description: String::new(),
            image_url: "https://petpost-images.s3.us-east-1.amazonaws.com/k.jpg".to_string(),
            added_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_listing_wire_format() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "6f1c2a4e-0d3b-4c5a-9e7f-1a2b3c4d5e6f");
        assert_eq!(json["age"], 3);
        assert_eq!(json["imageUrl"], "https://petpost-images.s3.us-east-1.amazonaws.com/k.jpg");
        assert_eq!(json["addedAt"], "2026-10-18T09:30:00.000Z");
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn test_description_defaults_when_absent() {
        let raw = r#"{
            "id": "6f1c2a4e-0d3b-4c5a-9e7f-1a2b3c4d5e6f",
            "name": "Buddy",
            "age": 3,
            "breed": "Golden Retriever",
            "imageUrl": "https://example.test/k.jpg",
            "addedAt": "2026-10-18T09:30:00.000Z"
        }"#;
        let listing: Listing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.description, "");
        assert_eq!(listing, sample_with_url("https://example.test/k.jpg"));
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let raw = r#"{ "id": "6f1c2a4e-0d3b-4c5a-9e7f-1a2b3c4d5e6f", "name": "Buddy" }"#;
        assert!(serde_json::from_str::<Listing>(raw).is_err());
    }

    #[test]
    fn test_now_is_millisecond_precision() {
        let now = Listing::now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    fn sample_with_url(url: &str) -> Listing {
        Listing {
            image_url: url.to_string(),
            ..sample()
        }
    }
}
