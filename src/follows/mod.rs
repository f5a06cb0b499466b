use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod handler;

/// A directed edge meaning "follower sees the author's posts in their
/// personalized feed". The pair is unique and never a self-loop.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub follower_id: Uuid,
    pub author_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
