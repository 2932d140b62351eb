//! City feed and geolocation clients
//!
//! Both lookups run once at mount and never surface an error: a failed feed
//! reads as no cities, a failed lookup reads as the default map center.

use serde::Deserialize;
use thiserror::Error;

use crate::model::{City, Coordinates};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed location {0:?}")]
    Location(String),
}

// ============================================================================
// City feed
// ============================================================================

#[derive(Debug, Deserialize)]
struct FeedResponse {
    cities: Vec<City>,
}

/// Fetch the city feed, failing on transport, status or decoding errors.
pub async fn fetch_cities(url: &str) -> Result<Vec<City>, ApiError> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let data: FeedResponse = response.json().await?;
    Ok(data.cities)
}

/// Fetch the city feed, degrading to an empty list on any failure.
pub async fn load_all_cities(url: &str) -> Vec<City> {
    match fetch_cities(url).await {
        Ok(cities) => cities,
        Err(error) => {
            tracing::warn!(%error, url, "city feed unavailable, showing no cities");
            Vec::new()
        }
    }
}

// ============================================================================
// Geolocation
// ============================================================================

#[derive(Debug, Deserialize)]
struct LocationResponse {
    loc: String,
}

/// Parse a `"lat,lon"` pair.
pub fn parse_loc(loc: &str) -> Result<Coordinates, ApiError> {
    let mut parts = loc.split(',');
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ApiError::Location(loc.to_string()));
    };
    match (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
        (Ok(latitude), Ok(longitude)) if latitude.is_finite() && longitude.is_finite() => {
            Ok(Coordinates::new(latitude, longitude))
        }
        _ => Err(ApiError::Location(loc.to_string())),
    }
}

pub async fn fetch_location(url: &str) -> Result<Coordinates, ApiError> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let data: LocationResponse = response.json().await?;
    parse_loc(&data.loc)
}

/// Resolve the user's position, degrading to the default map center.
pub async fn locate(url: &str) -> Coordinates {
    match fetch_location(url).await {
        Ok(point) => point,
        Err(error) => {
            tracing::warn!(%error, url, "geolocation unavailable, using default center");
            Coordinates::fallback()
        }
    }
}
