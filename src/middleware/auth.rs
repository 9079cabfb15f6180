use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::error::{AppError, AppResult};
use crate::utils::access::Caller;
use crate::utils::jwt::verify_token;
use crate::AppState;

/// Extract and validate JWT token from Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    auth: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let TypedHeader(auth) = auth
        .map_err(|_| AppError::Unauthorized("Missing or malformed bearer token".to_string()))?;

    let claims = verify_token(auth.token(), &state.config)?;
    let caller = Caller::from_claims(&claims)?;

    tracing::debug!(user_id = caller.user_id, role = %claims.role, "Authenticated request");

    request.extensions_mut().insert(caller);
    let mut response = next.run(request).await;
    // Read back by the request logger
    response.extensions_mut().insert(caller);
    Ok(response)
}

/// Require admin role
pub async fn require_admin(
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let caller = request
        .extensions()
        .get::<Caller>()
        .ok_or_else(|| AppError::Unauthorized("No authentication found".to_string()))?;

    if !caller.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}
