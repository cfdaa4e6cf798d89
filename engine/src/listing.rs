//! Rental listings shown on the browsing screen.

use crate::ListingId;
use serde::{Deserialize, Serialize};

/// A car offered for rent.
///
/// Only `car_type`, `rating`, `drive_type` and `driver_name` take part in
/// filtering; the remaining fields are display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawListing")]
pub struct CarListing {
    /// Unique identifier within the inventory
    pub id: ListingId,
    pub driver_name: String,
    /// Category such as "SUV" or "Sedan"; open set
    pub car_type: String,
    /// Average rating, 0.0 to 5.0
    pub rating: f64,
    /// "Self" or "With Driver". Older payloads call this `availability`.
    pub drive_type: String,
    pub distance: String,
    pub photos: Vec<String>,
    pub contact: String,
    pub cost_per_day: String,
}

/// Wire shape of a listing. Inventory payloads may carry `driveType`,
/// `availability` or both; `driveType` wins when both are present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListing {
    id: ListingId,
    driver_name: String,
    car_type: String,
    rating: f64,
    drive_type: Option<String>,
    availability: Option<String>,
    #[serde(default)]
    distance: String,
    #[serde(default)]
    photos: Vec<String>,
    #[serde(default)]
    contact: String,
    #[serde(default)]
    cost_per_day: String,
}

impl TryFrom<RawListing> for CarListing {
    type Error = String;

    fn try_from(raw: RawListing) -> Result<Self, Self::Error> {
        let drive_type = raw
            .drive_type
            .or(raw.availability)
            .ok_or_else(|| format!("listing {}: missing field `driveType`", raw.id))?;

        Ok(Self {
            id: raw.id,
            driver_name: raw.driver_name,
            car_type: raw.car_type,
            rating: raw.rating,
            drive_type,
            distance: raw.distance,
            photos: raw.photos,
            contact: raw.contact,
            cost_per_day: raw.cost_per_day,
        })
    }
}

impl CarListing {
    /// Create a listing with the filterable fields set and empty display fields.
    pub fn new(
        id: impl Into<ListingId>,
        driver_name: impl Into<String>,
        car_type: impl Into<String>,
        rating: f64,
        drive_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            driver_name: driver_name.into(),
            car_type: car_type.into(),
            rating,
            drive_type: drive_type.into(),
            distance: String::new(),
            photos: Vec::new(),
            contact: String::new(),
            cost_per_day: String::new(),
        }
    }

    /// The image shown on the listing card.
    pub fn cover_photo(&self) -> Option<&str> {
        self.photos.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_inventory_entry() {
        let listing: CarListing = serde_json::from_value(json!({
            "id": "1",
            "driverName": "John Doe",
            "carType": "SUV",
            "rating": 4.5,
            "driveType": "With Driver",
            "distance": "5 miles",
            "contact": "123-456-7890",
            "costPerDay": "$100",
            "photos": ["https://example.com/car1.jpg", "https://example.com/car2.jpg"]
        }))
        .unwrap();

        assert_eq!(listing.driver_name, "John Doe");
        assert_eq!(listing.drive_type, "With Driver");
        assert_eq!(listing.cost_per_day, "$100");
        assert_eq!(listing.cover_photo(), Some("https://example.com/car1.jpg"));
    }

    #[test]
    fn availability_alias() {
        let listing: CarListing = serde_json::from_value(json!({
            "id": "2",
            "driverName": "Jane Smith",
            "carType": "Sedan",
            "rating": 4.2,
            "availability": "Self"
        }))
        .unwrap();

        assert_eq!(listing.drive_type, "Self");
        assert!(listing.photos.is_empty());
        assert_eq!(listing.cover_photo(), None);
    }

    #[test]
    fn accepts_drive_type_and_availability_together() {
        // Shape of the app's bundled mock inventory
        let listing: CarListing = serde_json::from_value(json!({
            "id": "2",
            "driverName": "Jane Smith",
            "carType": "Sedan",
            "rating": 4.2,
            "availability": "Self",
            "distance": "3 miles",
            "contact": "098-765-4321",
            "costPerDay": "$80",
            "photo": "https://example.com/car2.jpg",
            "photos": ["https://example.com/car2.jpg", "https://example.com/car3.jpg"],
            "driveType": "Self"
        }))
        .unwrap();

        assert_eq!(listing.drive_type, "Self");
        assert_eq!(listing.photos.len(), 2);
        assert_eq!(listing.cost_per_day, "$80");
    }

    #[test]
    fn drive_type_wins_over_availability() {
        let listing: CarListing = serde_json::from_value(json!({
            "id": "3",
            "driverName": "Sam Lee",
            "carType": "SUV",
            "rating": 4.0,
            "availability": "Self",
            "driveType": "With Driver"
        }))
        .unwrap();

        assert_eq!(listing.drive_type, "With Driver");
    }

    #[test]
    fn missing_drive_type_is_rejected() {
        let result = serde_json::from_value::<CarListing>(json!({
            "id": "4",
            "driverName": "Sam Lee",
            "carType": "SUV",
            "rating": 4.0
        }));

        let err = result.unwrap_err().to_string();
        assert!(err.contains("missing field `driveType`"));
    }

    #[test]
    fn serializes_drive_type_only() {
        let json = serde_json::to_value(CarListing::new("1", "John Doe", "SUV", 4.5, "Self")).unwrap();
        assert_eq!(json["driveType"], "Self");
        assert!(json.get("availability").is_none());
    }
}
