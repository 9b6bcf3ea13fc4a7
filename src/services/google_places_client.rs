// src/services/google_places_client.rs
// DOCUMENTATION: Google Places API client
// PURPOSE: Text search, place details and photo download for the proxy routes

use crate::errors::PlacesError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Fields requested from Place Details
const DETAILS_FIELDS: &str = "name,place_id,geometry,formatted_address,address_components,vicinity,rating,user_ratings_total,price_level,types,business_status,opening_hours,formatted_phone_number,international_phone_number,website,url,reviews,photos";

/// Place lookup collaborator
/// DOCUMENTATION: Handlers depend on this trait, not on GooglePlacesClient,
/// so tests can inject a fake provider through web::Data<dyn PlacesProvider>
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Free-text search, optionally narrowed to a city
    async fn search_places(
        &self,
        query: &str,
        city: Option<&str>,
    ) -> Result<PlaceSearchResult, PlacesError>;

    /// Full details for one Google place id
    async fn place_details(&self, place_id: &str) -> Result<GooglePlace, PlacesError>;

    /// Raw image bytes for a photo reference
    async fn place_photo(&self, photo_reference: &str, max_width: u32)
        -> Result<Bytes, PlacesError>;
}

/// Google Places API client
/// DOCUMENTATION: Handles authentication and API calls to Google Places
pub struct GooglePlacesClient {
    /// HTTP client for making requests
    client: Client,
    /// Google Places API key
    api_key: String,
    /// Base URL for Google Places API
    base_url: String,
}

/// Search result returned to callers of /api/places/search
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaceSearchResult {
    pub results: Vec<GooglePlace>,
    pub next_page_token: Option<String>,
}

/// Raw Text Search response
#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    results: Vec<GooglePlace>,
    status: String,
    next_page_token: Option<String>,
    error_message: Option<String>,
}

/// Raw Place Details response
#[derive(Debug, Deserialize)]
struct DetailsResponse {
    result: Option<GooglePlace>,
    status: String,
    error_message: Option<String>,
}

/// Individual place from Google Places API
/// DOCUMENTATION: Text Search fills a subset; Place Details fills the rest
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GooglePlace {
    /// Google's unique place identifier
    pub place_id: String,
    pub name: Option<String>,
    /// Place types array (e.g., ["restaurant", "food", "point_of_interest"])
    #[serde(default)]
    pub types: Vec<String>,
    pub geometry: Option<GoogleGeometry>,
    pub formatted_address: Option<String>,
    /// Short address, from Place Details
    pub vicinity: Option<String>,
    pub address_components: Option<Vec<GoogleAddressComponent>>,
    pub rating: Option<f32>,
    pub user_ratings_total: Option<i32>,
    /// 0 (free) to 4 (very expensive)
    pub price_level: Option<i32>,
    /// OPERATIONAL, CLOSED_TEMPORARILY, CLOSED_PERMANENTLY
    pub business_status: Option<String>,
    pub opening_hours: Option<GoogleOpeningHours>,
    pub formatted_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub website: Option<String>,
    /// Google Maps URL
    pub url: Option<String>,
    pub reviews: Option<Vec<GoogleReview>>,
    pub photos: Option<Vec<GooglePhoto>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleGeometry {
    pub location: GoogleLocation,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleLocation {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleAddressComponent {
    pub long_name: String,
    pub short_name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleOpeningHours {
    pub open_now: Option<bool>,
    pub weekday_text: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleReview {
    pub author_name: Option<String>,
    /// Rating (1-5)
    pub rating: Option<i32>,
    pub text: Option<String>,
    /// Unix timestamp
    pub time: Option<i64>,
    pub relative_time_description: Option<String>,
    pub profile_photo_url: Option<String>,
}

/// Photo metadata; `photo_reference` is what /api/places/photo takes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GooglePhoto {
    pub photo_reference: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// HTML attributions (required by Google)
    pub html_attributions: Option<Vec<String>>,
}

impl GooglePlacesClient {
    /// Create new Google Places API client
    /// DOCUMENTATION: The timeout bounds every outbound call; no retries are made
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), timeout)
    }

    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Query text sent to Text Search
    /// DOCUMENTATION: A city narrows the search as "<query> in <city>"
    fn search_text(query: &str, city: Option<&str>) -> String {
        match city.map(str::trim).filter(|c| !c.is_empty()) {
            Some(city) => format!("{} in {}", query.trim(), city),
            None => query.trim().to_string(),
        }
    }

    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<reqwest::Response, PlacesError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Google Places API request failed: {}", e);
                PlacesError::Request(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Google Places API error {}: {}", status, body);
            return Err(PlacesError::ExternalApi(format!("HTTP {}: {}", status, body)));
        }

        Ok(response)
    }
}

/// Map the `status` field of a Places response to a result
/// DOCUMENTATION: Google reports most failures with HTTP 200 and a status string
fn check_status(status: &str, error_message: Option<String>) -> Result<(), PlacesError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "OVER_QUERY_LIMIT" => {
            log::error!("Google Places API quota exceeded");
            Err(PlacesError::RateLimitExceeded)
        }
        "NOT_FOUND" => Err(PlacesError::NotFound(
            error_message.unwrap_or_else(|| "place no longer exists".to_string()),
        )),
        "REQUEST_DENIED" | "INVALID_REQUEST" => {
            let msg = error_message.unwrap_or_else(|| status.to_string());
            log::error!("Google Places API request denied: {}", msg);
            Err(PlacesError::ExternalApi(msg))
        }
        other => {
            let msg = error_message.unwrap_or_else(|| format!("Unknown status: {}", other));
            log::error!("Google Places API unexpected status: {}", msg);
            Err(PlacesError::ExternalApi(msg))
        }
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn search_places(
        &self,
        query: &str,
        city: Option<&str>,
    ) -> Result<PlaceSearchResult, PlacesError> {
        let url = format!("{}/textsearch/json", self.base_url);
        let text = Self::search_text(query, city);

        log::debug!("Google Places text search: query={}", text);

        let response = self
            .get(&url, &[("query", text.as_str()), ("key", self.api_key.as_str())])
            .await?;

        let api_response: TextSearchResponse = response
            .json()
            .await
            .map_err(|e| PlacesError::Parse(e.to_string()))?;

        check_status(&api_response.status, api_response.error_message)?;

        log::info!(
            "Google Places search returned {} results",
            api_response.results.len()
        );

        Ok(PlaceSearchResult {
            results: api_response.results,
            next_page_token: api_response.next_page_token,
        })
    }

    async fn place_details(&self, place_id: &str) -> Result<GooglePlace, PlacesError> {
        let url = format!("{}/details/json", self.base_url);

        log::debug!("Google Places details lookup: place_id={}", place_id);

        let response = self
            .get(
                &url,
                &[
                    ("place_id", place_id),
                    ("fields", DETAILS_FIELDS),
                    ("key", self.api_key.as_str()),
                ],
            )
            .await?;

        let api_response: DetailsResponse = response
            .json()
            .await
            .map_err(|e| PlacesError::Parse(e.to_string()))?;

        check_status(&api_response.status, api_response.error_message)?;

        api_response
            .result
            .ok_or_else(|| PlacesError::NotFound(place_id.to_string()))
    }

    async fn place_photo(
        &self,
        photo_reference: &str,
        max_width: u32,
    ) -> Result<Bytes, PlacesError> {
        let url = format!("{}/photo", self.base_url);
        let width = max_width.to_string();

        log::debug!(
            "Google Places photo fetch: reference={}, maxwidth={}",
            photo_reference,
            max_width
        );

        // The photo endpoint answers with a redirect to the image host
        let response = self
            .get(
                &url,
                &[
                    ("maxwidth", width.as_str()),
                    ("photo_reference", photo_reference),
                    ("key", self.api_key.as_str()),
                ],
            )
            .await?;

        response
            .bytes()
            .await
            .map_err(|e| PlacesError::Request(e.to_string()))
    }
}
