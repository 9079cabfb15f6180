use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::entities::user;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,     // user id
    pub username: String,
    pub email: String,
    pub role: String,
    pub exp: i64,        // expiration timestamp
    pub iat: i64,        // issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    /// Numeric user id carried in `sub`
    pub fn user_id(&self) -> AppResult<i32> {
        self.sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".to_string()))
    }
}

pub fn create_token(user: &user::Model, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let exp = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
        iss: config.jwt_issuer.clone(),
        aud: config.jwt_audience.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    if let Some(issuer) = &config.jwt_issuer {
        validation.set_issuer(&[issuer]);
    }
    match &config.jwt_audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_support::{test_config, test_user};

    #[test]
    fn test_token_roundtrip() {
        let config = test_config();
        let user = test_user(7, "alice", "User");

        let token = create_token(&user, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, "User");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let token = create_token(&test_user(1, "alice", "User"), &config).unwrap();

        let other = Config {
            jwt_secret: "another-secret".to_string(),
            ..config
        };
        assert!(matches!(
            verify_token(&token, &other),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = Config {
            jwt_expiration_hours: -1,
            ..test_config()
        };
        let token = create_token(&test_user(1, "alice", "User"), &config).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_issuer_and_audience_checked_when_configured() {
        let issuing = Config {
            jwt_issuer: Some("parkit".to_string()),
            jwt_audience: Some("parkit-web".to_string()),
            ..test_config()
        };
        let token = create_token(&test_user(1, "alice", "User"), &issuing).unwrap();
        assert!(verify_token(&token, &issuing).is_ok());

        let other_audience = Config {
            jwt_audience: Some("someone-else".to_string()),
            ..issuing.clone()
        };
        assert!(verify_token(&token, &other_audience).is_err());

        let other_issuer = Config {
            jwt_issuer: Some("someone-else".to_string()),
            ..issuing
        };
        assert!(verify_token(&token, &other_issuer).is_err());
    }

    #[test]
    fn test_unparseable_subject() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            username: "x".to_string(),
            email: "x@example.com".to_string(),
            role: "User".to_string(),
            exp: 0,
            iat: 0,
            iss: None,
            aud: None,
        };
        assert!(matches!(claims.user_id(), Err(AppError::Unauthorized(_))));
    }
}
