use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{guard, jwt, User},
    cache::{PageCache, INDEX_CACHE_KEY},
    comments,
    config::settings::Settings,
    error::AppError,
    follows::Follow,
    groups::{Group, GroupRef},
    pagination::{Page, PageQuery, PageWindow},
    posts::{
        AuthorResponse, GroupPageContext, Post, PostDetailContext, PostForm, PostFormContext,
        PostResponse, ProfileContext,
    },
    response::ApiResponse,
};

/// Helper struct for fetching posts joined with author and group info.
#[derive(FromRow)]
struct PostFromDb {
    id: Uuid,
    text: String,
    image: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    // author fields
    author_id: Uuid,
    username: String,
    author_bio: Option<String>,
    author_image: Option<String>,
    // group fields (absent for ungrouped posts)
    group_slug: Option<String>,
    group_title: Option<String>,
}

impl From<PostFromDb> for PostResponse {
    fn from(p: PostFromDb) -> Self {
        let group = match (p.group_slug, p.group_title) {
            (Some(slug), Some(title)) => Some(GroupRef { slug, title }),
            _ => None,
        };
        PostResponse {
            id: p.id,
            author: AuthorResponse {
                id: p.author_id,
                username: p.username,
                bio: p.author_bio,
                image: p.author_image,
            },
            group,
            text: p.text,
            image: p.image,
            created_at: p.created_at,
        }
    }
}

/// Home page: every post, newest first, paginated.
///
/// The whole serialized response is cached under the fixed `index_page` key
/// for the configured TTL. The page number is not part of the key, so any
/// cached variant answers every request until the entry expires or the
/// cache is cleared.
pub async fn index(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    State(cache): State<PageCache>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    if let Some(cached) = cache.get(INDEX_CACHE_KEY) {
        return Ok(([(header::CONTENT_TYPE, cached.content_type)], cached.body).into_response());
    }

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count posts: {:?}", e);
            AppError::InternalServerError
        })?;

    let window = PageWindow::new(total, settings.posts_per_page, query.number());

    let posts = sqlx::query_as::<_, PostFromDb>(
        r#"
        SELECT
            p.id, p.text, p.image, p.created_at,
            u.id AS author_id, u.username, u.bio AS author_bio, u.image AS author_image,
            g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON p.author_id = u.id
        LEFT JOIN groups g ON p.group_id = g.id
        ORDER BY p.created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(window.limit())
    .bind(window.offset())
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch posts: {:?}", e);
        AppError::InternalServerError
    })?;

    let page = Page::assemble(posts.into_iter().map(PostResponse::from).collect(), window);

    let body = serde_json::to_string(&ApiResponse::success(page))
        .map_err(|_| AppError::InternalServerError)?;
    cache.set(INDEX_CACHE_KEY, "application/json", body.clone());

    Ok(([(header::CONTENT_TYPE, "application/json".to_string())], body).into_response())
}

/// Posts belonging to one group, newest first, paginated.
pub async fn group_posts(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let group = sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE slug = $1")
        .bind(&slug)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch group: {:?}", e);
            AppError::InternalServerError
        })?
        .ok_or(AppError::NotFound("Group not found".to_string()))?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id = $1")
        .bind(group.id)
        .fetch_one(&pool)
        .await
        .map_err(|_| AppError::InternalServerError)?;

    let window = PageWindow::new(total, settings.posts_per_page, query.number());

    let posts = sqlx::query_as::<_, PostFromDb>(
        r#"
        SELECT
            p.id, p.text, p.image, p.created_at,
            u.id AS author_id, u.username, u.bio AS author_bio, u.image AS author_image,
            g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON p.author_id = u.id
        LEFT JOIN groups g ON p.group_id = g.id
        WHERE p.group_id = $1
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(group.id)
    .bind(window.limit())
    .bind(window.offset())
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch group posts: {:?}", e);
        AppError::InternalServerError
    })?;

    let page = Page::assemble(posts.into_iter().map(PostResponse::from).collect(), window);

    Ok(ApiResponse::success(GroupPageContext { group, page }))
}

/// An author's profile: their posts plus whether the viewer follows them.
pub async fn profile(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    viewer: Option<jwt::Claims>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let author = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&username)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch author: {:?}", e);
            AppError::InternalServerError
        })?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let post_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
        .bind(author.id)
        .fetch_one(&pool)
        .await
        .map_err(|_| AppError::InternalServerError)?;

    let following = if let Some(claims) = viewer {
        sqlx::query_as::<_, Follow>(
            "SELECT * FROM follows WHERE follower_id = $1 AND author_id = $2",
        )
        .bind(claims.sub)
        .bind(author.id)
        .fetch_optional(&pool)
        .await
        .map_err(|_| AppError::InternalServerError)?
        .is_some()
    } else {
        false
    };

    let window = PageWindow::new(post_count, settings.posts_per_page, query.number());

    let posts = sqlx::query_as::<_, PostFromDb>(
        r#"
        SELECT
            p.id, p.text, p.image, p.created_at,
            u.id AS author_id, u.username, u.bio AS author_bio, u.image AS author_image,
            g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON p.author_id = u.id
        LEFT JOIN groups g ON p.group_id = g.id
        WHERE p.author_id = $1
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(author.id)
    .bind(window.limit())
    .bind(window.offset())
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch profile posts: {:?}", e);
        AppError::InternalServerError
    })?;

    let page = Page::assemble(posts.into_iter().map(PostResponse::from).collect(), window);

    Ok(ApiResponse::success(ProfileContext {
        author: AuthorResponse::from(author),
        post_count,
        following,
        page,
    }))
}

/// One post with its comments and the author's total post count.
pub async fn post_detail(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let post = sqlx::query_as::<_, PostFromDb>(
        r#"
        SELECT
            p.id, p.text, p.image, p.created_at,
            u.id AS author_id, u.username, u.bio AS author_bio, u.image AS author_image,
            g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON p.author_id = u.id
        LEFT JOIN groups g ON p.group_id = g.id
        WHERE p.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch post: {:?}", e);
        AppError::InternalServerError
    })?
    .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let author_post_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(post.author_id)
            .fetch_one(&pool)
            .await
            .map_err(|_| AppError::InternalServerError)?;

    let comments = comments::handler::list_for_post(&pool, id).await?;

    Ok(ApiResponse::success(PostDetailContext {
        post: PostResponse::from(post),
        author_post_count,
        comments,
    }))
}

/// Blank create form: the group choices the author can pick from.
pub async fn create_page(
    State(pool): State<PgPool>,
    _claims: jwt::Claims,
) -> Result<impl IntoResponse, AppError> {
    let groups = fetch_group_choices(&pool).await?;

    Ok(ApiResponse::success(PostFormContext {
        groups,
        post: None,
        is_edit: false,
    }))
}

pub async fn create(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Json(payload): Json<PostForm>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let group_id = resolve_group(&pool, payload.group.as_deref()).await?;

    let author = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(claims.sub)
        .fetch_optional(&pool)
        .await
        .map_err(|_| AppError::InternalServerError)?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    sqlx::query(
        "INSERT INTO posts (author_id, group_id, text, image, created_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(claims.sub)
    .bind(group_id)
    .bind(&payload.text)
    .bind(&payload.image)
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create post: {:?}", e);
        AppError::InternalServerError
    })?;

    Ok(Redirect::to(&format!("/profile/{}", author.username)))
}

/// Edit form for an existing post, prefilled. Author-only.
pub async fn edit_page(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let post = sqlx::query_as::<_, PostFromDb>(
        r#"
        SELECT
            p.id, p.text, p.image, p.created_at,
            u.id AS author_id, u.username, u.bio AS author_bio, u.image AS author_image,
            g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON p.author_id = u.id
        LEFT JOIN groups g ON p.group_id = g.id
        WHERE p.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|_| AppError::InternalServerError)?
    .ok_or(AppError::NotFound("Post not found".to_string()))?;

    guard::require_post_owner(claims.sub, post.author_id, id)?;

    let groups = fetch_group_choices(&pool).await?;

    Ok(ApiResponse::success(PostFormContext {
        groups,
        post: Some(PostResponse::from(post)),
        is_edit: true,
    }))
}

/// Apply an edit. The creation timestamp is immutable; only text, group and
/// image can change.
pub async fn update(
    State(pool): State<PgPool>,
    claims: jwt::Claims,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostForm>,
) -> Result<impl IntoResponse, AppError> {
    let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await
        .map_err(|_| AppError::InternalServerError)?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    guard::require_post_owner(claims.sub, post.author_id, post.id)?;

    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let group_id = resolve_group(&pool, payload.group.as_deref()).await?;

    sqlx::query("UPDATE posts SET text = $1, group_id = $2, image = $3 WHERE id = $4")
        .bind(&payload.text)
        .bind(group_id)
        .bind(&payload.image)
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update post: {:?}", e);
            AppError::InternalServerError
        })?;

    Ok(Redirect::to(&format!("/posts/{}", id)))
}

/// Personalized feed: posts by authors the requester follows.
pub async fn feed(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    claims: jwt::Claims,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM posts p
        JOIN follows f ON p.author_id = f.author_id
        WHERE f.follower_id = $1
        "#,
    )
    .bind(claims.sub)
    .fetch_one(&pool)
    .await
    .map_err(|_| AppError::InternalServerError)?;

    let window = PageWindow::new(total, settings.posts_per_page, query.number());

    let posts = sqlx::query_as::<_, PostFromDb>(
        r#"
        SELECT
            p.id, p.text, p.image, p.created_at,
            u.id AS author_id, u.username, u.bio AS author_bio, u.image AS author_image,
            g.slug AS group_slug, g.title AS group_title
        FROM posts p
        JOIN users u ON p.author_id = u.id
        JOIN follows f ON p.author_id = f.author_id AND f.follower_id = $1
        LEFT JOIN groups g ON p.group_id = g.id
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(claims.sub)
    .bind(window.limit())
    .bind(window.offset())
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch feed: {:?}", e);
        AppError::InternalServerError
    })?;

    let page = Page::assemble(posts.into_iter().map(PostResponse::from).collect(), window);

    Ok(ApiResponse::success(page))
}

async fn fetch_group_choices(pool: &PgPool) -> Result<Vec<Group>, AppError> {
    sqlx::query_as::<_, Group>("SELECT * FROM groups ORDER BY title ASC")
        .fetch_all(pool)
        .await
        .map_err(|_| AppError::InternalServerError)
}

/// Resolve the submitted group slug to its id. An absent or empty slug means
/// the post is ungrouped; an unknown slug is a form-level validation error.
async fn resolve_group(pool: &PgPool, slug: Option<&str>) -> Result<Option<Uuid>, AppError> {
    let slug = match slug {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return Ok(None),
    };

    let row = sqlx::query("SELECT id FROM groups WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(|_| AppError::InternalServerError)?
        .ok_or_else(|| AppError::UnprocessableEntity(format!("Unknown group: {}", slug)))?;

    Ok(Some(row.get("id")))
}
