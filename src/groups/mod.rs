use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named topic/category posts can belong to.
///
/// Rows are provisioned administratively; the in-scope handlers only read
/// them, so the model doubles as its own response shape.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
}

/// Group descriptor embedded in post responses.
#[derive(Debug, Serialize)]
pub struct GroupRef {
    pub slug: String,
    pub title: String,
}
