use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;

pub mod auth;
pub mod cache;
pub mod comments;
pub mod config;
pub mod error;
pub mod follows;
pub mod groups;
pub mod pagination;
pub mod posts;
pub mod response;

use cache::PageCache;
use config::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub settings: Settings,
    pub page_cache: PageCache,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> PgPool {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for Settings {
    fn from_ref(app_state: &AppState) -> Settings {
        app_state.settings.clone()
    }
}

impl FromRef<AppState> for PageCache {
    fn from_ref(app_state: &AppState) -> PageCache {
        app_state.page_cache.clone()
    }
}

pub fn router(app_state: AppState) -> Router {
    let auth_router = Router::new()
        .route("/sign-up", post(auth::handler::signup))
        .route("/sign-in", post(auth::handler::login))
        .route("/login", get(auth::handler::login_page))
        .route("/me", get(auth::handler::get_me));

    let posts_router = Router::new()
        .route(
            "/create",
            get(posts::handler::create_page).post(posts::handler::create),
        )
        .route("/:id", get(posts::handler::post_detail))
        .route(
            "/:id/edit",
            get(posts::handler::edit_page).post(posts::handler::update),
        )
        .route("/:id/comment", post(comments::handler::add_comment));

    let profile_router = Router::new()
        .route("/:username", get(posts::handler::profile))
        .route("/:username/follow", post(follows::handler::profile_follow))
        .route(
            "/:username/unfollow",
            post(follows::handler::profile_unfollow),
        );

    Router::new()
        .route("/", get(posts::handler::index))
        .route("/group/:slug", get(posts::handler::group_posts))
        .route("/follow", get(posts::handler::feed))
        .nest("/auth", auth_router)
        .nest("/posts", posts_router)
        .nest("/profile", profile_router)
        .with_state(app_state)
}
