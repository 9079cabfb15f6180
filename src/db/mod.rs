pub mod parking_spots;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};

use crate::config::{AdminSeed, Config};
use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::utils::password::hash_password;

pub async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    Database::connect(&config.database_url)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to database: {}", e)))
}

/// Create the admin account unless its username or email is already taken.
///
/// Returns whether an account was inserted.
pub async fn seed_admin(db: &DatabaseConnection, seed: &AdminSeed) -> AppResult<bool> {
    let existing = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(&seed.username))
                .add(user::Column::Email.eq(&seed.email)),
        )
        .one(db)
        .await?;

    if existing.is_some() {
        tracing::debug!(username = %seed.username, "Admin account already present");
        return Ok(false);
    }

    let admin = user::ActiveModel {
        username: Set(seed.username.clone()),
        email: Set(seed.email.clone()),
        password_hash: Set(hash_password(&seed.password)?),
        role: Set(UserRole::Admin.as_str().to_string()),
        created_at: Set(chrono::Utc::now().fixed_offset()),
        ..Default::default()
    };

    admin.insert(db).await?;
    tracing::info!("Admin account created: {}", seed.username);
    Ok(true)
}
