//! Parking-spot persistence and the proximity search.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::dto::SpotFields;
use crate::entities::parking_spot::{self, Column, Entity};
use crate::error::AppResult;
use crate::utils::geo::{bounding_box, GeoPoint};

pub async fn list(db: &DatabaseConnection, only_available: bool) -> AppResult<Vec<parking_spot::Model>> {
    let mut query = Entity::find();
    if only_available {
        query = query.filter(Column::Availability.eq(true));
    }
    Ok(query.order_by_asc(Column::Id).all(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: i32) -> AppResult<Option<parking_spot::Model>> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn list_by_owner(db: &DatabaseConnection, owner_id: i32) -> AppResult<Vec<parking_spot::Model>> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(owner_id))
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Available spots within `radius_m` meters of `origin`, nearest first.
///
/// The store narrows candidates to a bounding box around the search
/// circle; exact great-circle filtering and ordering happen here.
pub async fn find_nearby(
    db: &DatabaseConnection,
    origin: &GeoPoint,
    radius_m: f64,
) -> AppResult<Vec<(parking_spot::Model, f64)>> {
    let bbox = bounding_box(origin, radius_m);

    let mut query = Entity::find()
        .filter(Column::Availability.eq(true))
        .filter(Column::Latitude.between(bbox.lat.0, bbox.lat.1))
        .filter(Column::Longitude.is_not_null());
    if let Some((min_lng, max_lng)) = bbox.lng {
        query = query.filter(Column::Longitude.between(min_lng, max_lng));
    }

    let candidates = query.all(db).await?;
    tracing::debug!(
        candidates = candidates.len(),
        radius_m,
        "Nearby search bounding box scanned"
    );

    Ok(rank_by_distance(candidates, origin, radius_m))
}

/// Keeps spots within the radius and orders them by distance, then id.
pub fn rank_by_distance(
    spots: Vec<parking_spot::Model>,
    origin: &GeoPoint,
    radius_m: f64,
) -> Vec<(parking_spot::Model, f64)> {
    let mut ranked: Vec<_> = spots
        .into_iter()
        .filter_map(|spot| {
            let distance = spot.location()?.distance_meters(origin);
            (distance <= radius_m).then_some((spot, distance))
        })
        .collect();

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.id.cmp(&b.0.id)));
    ranked
}

pub async fn insert(
    db: &DatabaseConnection,
    owner_id: i32,
    fields: SpotFields,
) -> AppResult<parking_spot::Model> {
    let now = Utc::now().fixed_offset();
    let mut spot = parking_spot::ActiveModel {
        user_id: Set(owner_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    apply_fields(&mut spot, fields);

    Ok(spot.insert(db).await?)
}

pub async fn update(
    db: &DatabaseConnection,
    spot: parking_spot::Model,
    fields: SpotFields,
) -> AppResult<parking_spot::Model> {
    let mut active: parking_spot::ActiveModel = spot.into();
    apply_fields(&mut active, fields);
    active.updated_at = Set(Utc::now().fixed_offset());

    Ok(active.update(db).await?)
}

/// Returns whether a row was removed
pub async fn delete(db: &DatabaseConnection, id: i32) -> AppResult<bool> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

fn apply_fields(active: &mut parking_spot::ActiveModel, fields: SpotFields) {
    active.availability = Set(fields.availability());
    active.latitude = Set(Some(fields.location.latitude()));
    active.longitude = Set(Some(fields.location.longitude()));
    active.address = Set(fields.address);
    active.formatted_address = Set(fields.formatted_address);
    active.place_id = Set(fields.place_id);
    active.price_per_hour = Set(fields.price_per_hour);
    active.category = Set(fields.category);
    active.total_capacity = Set(fields.total_capacity);
    active.current_capacity = Set(fields.current_capacity);
    active.description = Set(fields.description);
}
