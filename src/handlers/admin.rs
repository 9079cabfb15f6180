use axum::{extract::State, Json};

use crate::db::parking_spots;
use crate::dto::ParkingSpotDto;
use crate::error::AppResult;
use crate::AppState;

/// List every parking spot regardless of availability (admin)
pub async fn list_all_spots(State(state): State<AppState>) -> AppResult<Json<Vec<ParkingSpotDto>>> {
    let spots = parking_spots::list(&state.db, false).await?;

    let responses: Vec<ParkingSpotDto> = spots.into_iter().map(ParkingSpotDto::from).collect();

    Ok(Json(responses))
}
