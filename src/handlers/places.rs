// src/handlers/places.rs
// DOCUMENTATION: HTTP handlers for place lookups
// PURPOSE: Validate query parameters, call the places provider, return JSON or image bytes

use crate::errors::ApiError;
use crate::handlers::query::FirstQuery;
use crate::services::PlacesProvider;
use actix_web::http::header::{CacheControl, CacheDirective, ContentType};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use validator::Validate;

/// Width used when maxWidth is absent or unusable
pub const DEFAULT_PHOTO_WIDTH: u32 = 400;
/// Largest width the Places photo endpoint accepts
pub const MAX_PHOTO_WIDTH: u32 = 1600;
/// Photos are cached by browsers for 24 hours
const PHOTO_CACHE_SECONDS: u32 = 86_400;

#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    #[validate(
        required(message = "Query parameter is required"),
        length(min = 1, message = "Query parameter is required")
    )]
    pub query: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DetailsParams {
    #[validate(
        required(message = "placeId parameter is required"),
        length(min = 1, message = "placeId parameter is required")
    )]
    pub place_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PhotoParams {
    #[validate(
        required(message = "photoReference parameter is required"),
        length(min = 1, message = "photoReference parameter is required")
    )]
    pub photo_reference: Option<String>,
    /// Kept as text: an unparsable width must not reject the request
    pub max_width: Option<String>,
}

/// Resolve ?maxWidth= to a width the photo endpoint accepts
/// DOCUMENTATION: Missing, non-numeric or zero values use the default;
/// values above the API limit are clamped
pub fn parse_max_width(raw: Option<&str>) -> u32 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return DEFAULT_PHOTO_WIDTH;
    };

    match raw.parse::<u32>() {
        Ok(0) | Err(_) => {
            log::warn!("Invalid maxWidth '{}', using {}", raw, DEFAULT_PHOTO_WIDTH);
            DEFAULT_PHOTO_WIDTH
        }
        Ok(width) => width.min(MAX_PHOTO_WIDTH),
    }
}

/// GET /api/places/search?query=&city=
pub async fn search_places(
    places: web::Data<dyn PlacesProvider>,
    params: FirstQuery<SearchParams>,
) -> Result<impl Responder, ApiError> {
    params.validate()?;
    let SearchParams { query, city } = params.into_inner();
    let query = query.unwrap_or_default();

    let result = places
        .search_places(&query, city.as_deref())
        .await
        .map_err(|e| {
            log::error!("Place search failed (query={:?}, city={:?}): {}", query, city, e);
            ApiError::Upstream("Failed to search places")
        })?;

    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/places/details?placeId=
pub async fn place_details(
    places: web::Data<dyn PlacesProvider>,
    params: FirstQuery<DetailsParams>,
) -> Result<impl Responder, ApiError> {
    params.validate()?;
    let place_id = params.into_inner().place_id.unwrap_or_default();

    let details = places.place_details(&place_id).await.map_err(|e| {
        log::error!("Place details failed (placeId={}): {}", place_id, e);
        ApiError::Upstream("Failed to get place details")
    })?;

    Ok(HttpResponse::Ok().json(details))
}

/// GET /api/places/photo?photoReference=&maxWidth=
pub async fn place_photo(
    places: web::Data<dyn PlacesProvider>,
    params: FirstQuery<PhotoParams>,
) -> Result<impl Responder, ApiError> {
    params.validate()?;
    let PhotoParams {
        photo_reference,
        max_width,
    } = params.into_inner();
    let photo_reference = photo_reference.unwrap_or_default();
    let max_width = parse_max_width(max_width.as_deref());

    let image = places
        .place_photo(&photo_reference, max_width)
        .await
        .map_err(|e| {
            log::error!("Place photo failed (maxWidth={}): {}", max_width, e);
            ApiError::Upstream("Failed to fetch photo")
        })?;

    Ok(HttpResponse::Ok()
        .insert_header(ContentType::jpeg())
        .insert_header(CacheControl(vec![
            CacheDirective::Public,
            CacheDirective::MaxAge(PHOTO_CACHE_SECONDS),
        ]))
        .body(image))
}

/// Configuration for place routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/places")
            .route("/search", web::get().to(search_places))
            .route("/details", web::get().to(place_details))
            .route("/photo", web::get().to(place_photo)),
    );
}
