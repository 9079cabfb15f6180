use sea_orm::entity::prelude::*;

use crate::utils::geo::{GeoPoint, SRID_WGS84};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "parking_spot")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub address: String,
    pub formatted_address: String,
    pub place_id: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price_per_hour: Decimal,
    pub category: String,
    pub total_capacity: i32,
    pub current_capacity: i32,
    pub availability: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Stored location, if both coordinates are present
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.longitude, self.latitude) {
            (Some(x), Some(y)) => Some(GeoPoint {
                x,
                y,
                srid: SRID_WGS84,
            }),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
