use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::ErrorDetail;

/// Development-only: rewrite 500 bodies to include the internal error text
pub async fn expose_error_details(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    (
        response.status(),
        Json(json!({
            "message": "An unexpected error occurred",
            "detail": detail,
        })),
    )
        .into_response()
}
