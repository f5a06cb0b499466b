use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use sqlx::PgPool;

use crate::{
    auth::{jwt, User},
    error::AppError,
};

/// Start following an author, then return to their profile.
///
/// Following yourself, or an author you already follow, is silently ignored
/// rather than treated as an error.
pub async fn profile_follow(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let author = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&username)
        .fetch_optional(&pool)
        .await
        .map_err(|_| AppError::InternalServerError)?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    if author.id != claims.sub {
        sqlx::query(
            r#"
            INSERT INTO follows (follower_id, author_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, author_id) DO NOTHING
            "#,
        )
        .bind(claims.sub)
        .bind(author.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create follow: {:?}", e);
            AppError::InternalServerError
        })?;
    }

    Ok(Redirect::to(&format!("/profile/{}", author.username)))
}

/// Stop following an author, then return to their profile.
/// Removing an edge that does not exist is a no-op.
pub async fn profile_unfollow(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let author = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&username)
        .fetch_optional(&pool)
        .await
        .map_err(|_| AppError::InternalServerError)?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND author_id = $2")
        .bind(claims.sub)
        .bind(author.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete follow: {:?}", e);
            AppError::InternalServerError
        })?;

    Ok(Redirect::to(&format!("/profile/{}", author.username)))
}
