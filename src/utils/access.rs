//! Who may see and change which parking spots.

use crate::entities::{parking_spot, user::UserRole};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;

/// Identity of the caller, resolved from verified token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i32,
    pub role: UserRole,
}

impl Caller {
    pub fn from_claims(claims: &Claims) -> AppResult<Self> {
        Ok(Self {
            user_id: claims.user_id()?,
            role: UserRole::from_label(&claims.role),
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Owners and admins may update or delete a spot.
    pub fn can_modify(&self, spot: &parking_spot::Model) -> bool {
        self.is_admin() || spot.user_id == self.user_id
    }

    pub fn ensure_can_modify(&self, spot: &parking_spot::Model) -> AppResult<()> {
        if self.can_modify(spot) {
            return Ok(());
        }

        tracing::warn!(
            user_id = self.user_id,
            spot_id = spot.id,
            owner_id = spot.user_id,
            "Denied modification of parking spot"
        );
        Err(AppError::Forbidden(
            "You can only modify your own parking spots".to_string(),
        ))
    }
}
