use sea_orm_migration::{prelude::*, schema::*};

use super::m20241111_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSpot::Table)
                    .if_not_exists()
                    .col(pk_auto(ParkingSpot::Id))
                    .col(integer(ParkingSpot::UserId).not_null())
                    .col(string_len(ParkingSpot::Address, 255).not_null())
                    .col(string_len(ParkingSpot::FormattedAddress, 255).not_null())
                    .col(string_len(ParkingSpot::PlaceId, 255).not_null())
                    .col(decimal_len(ParkingSpot::PricePerHour, 10, 2).not_null())
                    .col(string_len(ParkingSpot::Category, 50).not_null())
                    .col(integer(ParkingSpot::TotalCapacity).not_null())
                    .col(integer(ParkingSpot::CurrentCapacity).not_null().default(0))
                    .col(boolean(ParkingSpot::Availability).not_null().default(true))
                    // SRID 4326 point, decomposed
                    .col(double_null(ParkingSpot::Latitude))
                    .col(double_null(ParkingSpot::Longitude))
                    .col(string_len(ParkingSpot::Description, 500).not_null().default(""))
                    .col(
                        timestamp_with_time_zone(ParkingSpot::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ParkingSpot::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_spot_user")
                            .from(ParkingSpot::Table, ParkingSpot::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_spot_user_id")
                    .table(ParkingSpot::Table)
                    .col(ParkingSpot::UserId)
                    .to_owned(),
            )
            .await?;

        // Bounding-box prefilter for the nearby query
        manager
            .create_index(
                Index::create()
                    .name("idx_parking_spot_lat_lng")
                    .table(ParkingSpot::Table)
                    .col(ParkingSpot::Latitude)
                    .col(ParkingSpot::Longitude)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSpot::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ParkingSpot {
    Table,
    Id,
    UserId,
    Address,
    FormattedAddress,
    PlaceId,
    PricePerHour,
    Category,
    TotalCapacity,
    CurrentCapacity,
    Availability,
    Latitude,
    Longitude,
    Description,
    CreatedAt,
    UpdatedAt,
}
