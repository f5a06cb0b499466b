use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;

pub enum AppError {
    InternalServerError,
    Unauthorized,
    NotFound(String),
    Conflict(String),
    UnprocessableEntity(String),
    /// The operation needs an authenticated user. Sends the client to the
    /// login page, keeping the originally requested path in `next`.
    LoginRequired { next: String },
    /// Guard outcome that is not an error: bounce the client elsewhere.
    Redirect(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::LoginRequired { next } => {
                return Redirect::to(&format!("/auth/login?next={}", next)).into_response();
            }
            AppError::Redirect(to) => return Redirect::to(&to).into_response(),
        };

        // Standardized failure response matching ApiResponse structure
        let body = Json(json!({
            "success": false,
            "message": error_message,
            "data": null
        }));

        (status, body).into_response()
    }
}
