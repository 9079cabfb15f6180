#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use parkit_backend::{config::Config, entities::user, routes, AppState};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt; // for `app.oneshot()`

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiration_hours: 168,
        jwt_issuer: None,
        jwt_audience: None,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        expose_error_details: false,
        cors_origin: None,
        static_dir: None,
        admin_seed: None,
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(config: Config) -> Self {
        // One pooled connection, so every query sees the same in-memory database
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(options).await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();

        let router = routes::create_router(AppState {
            db: db.clone(),
            config,
        });

        Self { router, db }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> StatusCode {
        let (status, _) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "username": username, "email": email, "password": password })),
            )
            .await;
        status
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Register, log in and return a token
    pub async fn user_token(&self, username: &str) -> String {
        let email = format!("{}@example.com", username);
        assert_eq!(
            self.register(username, &email, "secret1").await,
            StatusCode::OK
        );
        self.login(username, "secret1").await
    }

    /// Register a user, promote them to Admin, and return a fresh token
    pub async fn admin_token(&self, username: &str) -> String {
        let email = format!("{}@example.com", username);
        assert_eq!(
            self.register(username, &email, "secret1").await,
            StatusCode::OK
        );

        let user = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .unwrap()
            .unwrap();
        let mut active: user::ActiveModel = user.into();
        active.role = Set("Admin".to_string());
        active.update(&self.db).await.unwrap();

        self.login(username, "secret1").await
    }

    pub async fn create_spot(&self, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, "/api/parking-spaces", Some(token), Some(body))
            .await
    }
}

pub fn spot_body(latitude: f64, longitude: f64) -> Value {
    json!({
        "address": "12 Grand Parade, Cork",
        "formattedAddress": "12 Grand Parade, Cork, T12 Ireland",
        "placeId": "ChIJ-grand-parade",
        "pricePerHour": 2.50,
        "type": "Covered",
        "totalCapacity": 2,
        "currentCapacity": 0,
        "latitude": latitude,
        "longitude": longitude,
        "description": "Near the English Market"
    })
}
