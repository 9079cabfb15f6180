//! Wire shapes for parking spots.
//!
//! Outbound responses flatten the stored point into `latitude`/`longitude`;
//! inbound writes are validated and turned back into a point before they
//! reach the repository.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::entities::parking_spot;
use crate::error::{AppError, AppResult};
use crate::utils::geo::GeoPoint;

/// Stored in place of a missing formatted address or place id
pub const PLACEHOLDER_TEXT: &str = "N/A";

const MAX_PRICE_PER_HOUR: i64 = 1000;
const MAX_ADDRESS_LEN: usize = 255;
const MAX_CATEGORY_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpotDto {
    pub id: i32,
    pub owner_id: i32,
    pub address: String,
    pub formatted_address: String,
    pub place_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_hour: Decimal,
    #[serde(rename = "type")]
    pub category: String,
    pub total_capacity: i32,
    pub current_capacity: i32,
    pub availability: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
}

impl From<parking_spot::Model> for ParkingSpotDto {
    fn from(spot: parking_spot::Model) -> Self {
        // (0, 0) stands in for "no location stored"
        let (latitude, longitude) = spot
            .location()
            .map(|p| (p.latitude(), p.longitude()))
            .unwrap_or((0.0, 0.0));

        Self {
            id: spot.id,
            owner_id: spot.user_id,
            address: spot.address,
            formatted_address: spot.formatted_address,
            place_id: spot.place_id,
            price_per_hour: spot.price_per_hour,
            category: spot.category,
            total_capacity: spot.total_capacity,
            current_capacity: spot.current_capacity,
            availability: spot.availability,
            latitude,
            longitude,
            description: spot.description,
        }
    }
}

/// A spot in a nearby search, with its distance from the search origin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbySpotDto {
    #[serde(flatten)]
    pub spot: ParkingSpotDto,
    pub distance_meters: f64,
}

/// Body of create and update requests
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpotRequest {
    pub address: String,
    pub formatted_address: Option<String>,
    pub place_id: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_hour: Decimal,
    #[serde(rename = "type")]
    pub category: String,
    pub total_capacity: i32,
    #[serde(default)]
    pub current_capacity: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
}

/// Validated spot fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct SpotFields {
    pub address: String,
    pub formatted_address: String,
    pub place_id: String,
    pub price_per_hour: Decimal,
    pub category: String,
    pub total_capacity: i32,
    pub current_capacity: i32,
    pub location: GeoPoint,
    pub description: String,
}

impl SpotFields {
    /// Availability follows the capacity counters.
    pub fn availability(&self) -> bool {
        self.current_capacity < self.total_capacity
    }
}

impl ParkingSpotRequest {
    pub fn validate(self) -> AppResult<SpotFields> {
        let address = required_text("Address", self.address, MAX_ADDRESS_LEN)?;
        let category = required_text("Type", self.category, MAX_CATEGORY_LEN)?;

        if self.total_capacity < 1 {
            return Err(AppError::BadRequest(
                "Total capacity must be at least 1".to_string(),
            ));
        }
        if self.current_capacity < 0 || self.current_capacity > self.total_capacity {
            return Err(AppError::BadRequest(
                "Current capacity cannot be negative or exceed total capacity".to_string(),
            ));
        }

        let price_per_hour = round_price(self.price_per_hour);
        if price_per_hour < Decimal::ZERO || price_per_hour > Decimal::from(MAX_PRICE_PER_HOUR) {
            return Err(AppError::BadRequest(format!(
                "Price per hour must be between 0 and {}",
                MAX_PRICE_PER_HOUR
            )));
        }

        let location = GeoPoint::from_lng_lat(self.longitude, self.latitude)?;

        let description = self.description.unwrap_or_default();
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AppError::BadRequest(format!(
                "Description cannot exceed {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }

        Ok(SpotFields {
            address,
            formatted_address: or_placeholder(self.formatted_address),
            place_id: or_placeholder(self.place_id),
            price_per_hour,
            category,
            total_capacity: self.total_capacity,
            current_capacity: self.current_capacity,
            location,
            description,
        })
    }
}

/// Two decimal places, half away from zero
pub fn round_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn required_text(field: &str, value: String, max_len: usize) -> AppResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    if value.chars().count() > max_len {
        return Err(AppError::BadRequest(format!(
            "{} cannot exceed {} characters",
            field, max_len
        )));
    }
    Ok(value)
}

fn or_placeholder(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_TEXT.to_string())
}
