use std::path::Path;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::handlers::{admin, auth, parking};
use crate::middleware::auth::{auth_middleware, require_admin};
use crate::middleware::error_detail::expose_error_details;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public auth routes
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let session_routes = Router::new()
        .route("/user-role", get(auth::user_role))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Public parking routes (list, nearby search, details)
    let public_spot_routes = Router::new()
        .route("/", get(parking::list_spots))
        .route("/nearby", get(parking::nearby_spots))
        .route("/{id}", get(parking::get_spot));

    // Owner routes (requires auth; ownership checked per spot)
    let owner_spot_routes = Router::new()
        .route("/", post(parking::create_spot))
        .route("/my-spots", get(parking::my_spots))
        .route("/{id}", put(parking::update_spot).delete(parking::delete_spot))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        .route("/parking-spaces", get(admin::list_all_spots))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let mut router = Router::new()
        .nest("/api/auth", auth_routes.merge(session_routes))
        .nest("/api/parking-spaces", public_spot_routes.merge(owner_spot_routes))
        .nest("/api/admin", admin_routes);

    // Frontend bundle, with client-side routes falling back to index.html
    if let Some(dir) = &state.config.static_dir {
        let index = Path::new(dir).join("index.html");
        router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    let router = router.with_state(state.clone());

    if state.config.expose_error_details {
        router.layer(middleware::from_fn(expose_error_details))
    } else {
        router
    }
}
