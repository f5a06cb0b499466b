use std::env;
use std::net::SocketAddr;

#[derive(Clone)]
pub struct Settings {
    pub port: u16,
    pub addr: SocketAddr,
    pub database_url: String,
    pub jwt_secret: String,
    pub posts_per_page: i64,
    pub index_cache_ttl_secs: u64,
}

impl Settings {
    pub fn new() -> Self {
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let posts_per_page: i64 = env::var("POSTS_PER_PAGE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);
        let index_cache_ttl_secs: u64 = env::var("INDEX_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(20);

        Self {
            port,
            addr,
            database_url,
            jwt_secret,
            posts_per_page,
            index_cache_ttl_secs,
        }
    }
}
