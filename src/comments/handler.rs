use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
    Json,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::jwt,
    comments::{Comment, CommentAuthor, CommentForm, CommentResponse},
    error::AppError,
};

/// Helper struct for fetching comments with author info.
#[derive(FromRow)]
struct CommentFromDb {
    id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    text: String,
    created_at: chrono::DateTime<chrono::Utc>,
    username: String,
    author_image: Option<String>,
}

impl From<CommentFromDb> for CommentResponse {
    fn from(c: CommentFromDb) -> Self {
        CommentResponse {
            id: c.id,
            post_id: c.post_id,
            author: CommentAuthor {
                id: c.author_id,
                username: c.username,
                image: c.author_image,
            },
            text: c.text,
            created_at: c.created_at,
        }
    }
}

/// Add a comment to a post, then return to the detail view.
///
/// Invalid text is dropped without surfacing an error; the client is
/// redirected to the detail page either way.
pub async fn add_comment(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CommentForm>,
) -> Result<impl IntoResponse, AppError> {
    sqlx::query("SELECT id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(&pool)
        .await
        .map_err(|_| AppError::InternalServerError)?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    if payload.validate().is_ok() {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, author_id, text, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(claims.sub)
        .bind(&payload.text)
        .bind(chrono::Utc::now())
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create comment: {:?}", e);
            AppError::InternalServerError
        })?;

        return Ok(Redirect::to(&format!("/posts/{}", comment.post_id)));
    }

    Ok(Redirect::to(&format!("/posts/{}", post_id)))
}

/// The comments shown on a post's detail page, newest first.
pub(crate) async fn list_for_post(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<CommentResponse>, AppError> {
    let comments = sqlx::query_as::<_, CommentFromDb>(
        r#"
        SELECT
            c.id, c.post_id, c.author_id, c.text, c.created_at,
            u.username, u.image AS author_image
        FROM comments c
        JOIN users u ON c.author_id = u.id
        WHERE c.post_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch comments: {:?}", e);
        AppError::InternalServerError
    })?;

    Ok(comments.into_iter().map(CommentResponse::from).collect())
}
