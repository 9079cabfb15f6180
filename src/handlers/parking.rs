use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use sea_orm::EntityTrait;
use serde::Deserialize;

use crate::db::parking_spots;
use crate::dto::{NearbySpotDto, ParkingSpotDto, ParkingSpotRequest};
use crate::entities::{parking_spot, user};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::utils::access::Caller;
use crate::utils::geo::GeoPoint;
use crate::AppState;

const DEFAULT_MAX_DISTANCE_KM: f64 = 10.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub only_available: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub max_distance_km: Option<f64>,
}

fn to_dtos(spots: Vec<parking_spot::Model>) -> Vec<ParkingSpotDto> {
    spots.into_iter().map(ParkingSpotDto::from).collect()
}

/// List parking spots, optionally only the available ones
pub async fn list_spots(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> AppResult<Json<Vec<ParkingSpotDto>>> {
    let spots = parking_spots::list(&state.db, query.only_available).await?;
    Ok(Json(to_dtos(spots)))
}

/// Available spots around a point, nearest first
pub async fn nearby_spots(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<NearbyQuery>,
) -> AppResult<Json<Vec<NearbySpotDto>>> {
    let origin = GeoPoint::from_lng_lat(query.longitude, query.latitude)?;

    let max_distance_km = query.max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM);
    if !max_distance_km.is_finite() || max_distance_km <= 0.0 {
        return Err(AppError::BadRequest(
            "maxDistanceKm must be a positive number".to_string(),
        ));
    }
    let radius_m = max_distance_km * 1000.0;

    let ranked = parking_spots::find_nearby(&state.db, &origin, radius_m).await?;
    tracing::debug!(
        latitude = origin.latitude(),
        longitude = origin.longitude(),
        max_distance_km,
        results = ranked.len(),
        "Nearby search"
    );

    let responses = ranked
        .into_iter()
        .map(|(spot, distance_meters)| NearbySpotDto {
            spot: spot.into(),
            distance_meters,
        })
        .collect();

    Ok(Json(responses))
}

/// Get a single parking spot
pub async fn get_spot(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<ParkingSpotDto>> {
    let spot = load_spot(&state, id).await?;
    Ok(Json(spot.into()))
}

/// List the caller's own parking spots
pub async fn my_spots(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> AppResult<Json<Vec<ParkingSpotDto>>> {
    let spots = parking_spots::list_by_owner(&state.db, caller.user_id).await?;
    Ok(Json(to_dtos(spots)))
}

/// Create a parking spot owned by the caller
pub async fn create_spot(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    AppJson(payload): AppJson<ParkingSpotRequest>,
) -> AppResult<(StatusCode, Json<ParkingSpotDto>)> {
    let fields = payload.validate()?;

    // A token can outlive its account
    if user::Entity::find_by_id(caller.user_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        tracing::warn!(user_id = caller.user_id, "Spot creation by deleted account");
        return Err(AppError::Unauthorized("Account no longer exists".to_string()));
    }

    let spot = parking_spots::insert(&state.db, caller.user_id, fields).await?;

    tracing::info!(spot_id = spot.id, owner_id = caller.user_id, "Parking spot created");
    Ok((StatusCode::CREATED, Json(spot.into())))
}

/// Replace a parking spot's fields (owner or admin)
pub async fn update_spot(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<ParkingSpotRequest>,
) -> AppResult<Json<ParkingSpotDto>> {
    let spot = load_spot(&state, id).await?;
    caller.ensure_can_modify(&spot)?;

    let fields = payload.validate()?;
    let updated = parking_spots::update(&state.db, spot, fields).await?;

    tracing::info!(spot_id = id, user_id = caller.user_id, "Parking spot updated");
    Ok(Json(updated.into()))
}

/// Delete a parking spot (owner or admin)
pub async fn delete_spot(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<serde_json::Value>> {
    let spot = load_spot(&state, id).await?;
    caller.ensure_can_modify(&spot)?;

    if !parking_spots::delete(&state.db, spot.id).await? {
        return Err(AppError::NotFound("Parking spot not found".to_string()));
    }

    tracing::info!(spot_id = id, user_id = caller.user_id, "Parking spot deleted");
    Ok(Json(serde_json::json!({ "message": "Parking spot deleted successfully" })))
}

/// Existence is checked before any ownership test.
async fn load_spot(state: &AppState, id: i32) -> AppResult<parking_spot::Model> {
    parking_spots::find(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Parking spot not found".to_string()))
}
