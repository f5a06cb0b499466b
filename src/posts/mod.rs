use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::User;
use crate::comments::CommentResponse;
use crate::groups::{Group, GroupRef};
use crate::pagination::Page;

pub mod handler;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Submitted fields for creating or editing a post. The group is referenced
/// by slug; absent or empty means the post stays ungrouped.
#[derive(Debug, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, message = "Text cannot be empty"))]
    pub text: String,
    pub group: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author: AuthorResponse,
    pub group: Option<GroupRef>,
    pub text: String,
    pub image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl From<User> for AuthorResponse {
    fn from(user: User) -> Self {
        AuthorResponse {
            id: user.id,
            username: user.username,
            bio: user.bio,
            image: user.image,
        }
    }
}

/// Context for the group listing page.
#[derive(Debug, Serialize)]
pub struct GroupPageContext {
    pub group: Group,
    pub page: Page<PostResponse>,
}

/// Context for an author's profile page.
#[derive(Debug, Serialize)]
pub struct ProfileContext {
    pub author: AuthorResponse,
    pub post_count: i64,
    pub following: bool,
    pub page: Page<PostResponse>,
}

/// Context for the post detail page.
#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub post: PostResponse,
    pub author_post_count: i64,
    pub comments: Vec<CommentResponse>,
}

/// Context for the create/edit form pages.
#[derive(Debug, Serialize)]
pub struct PostFormContext {
    pub groups: Vec<Group>,
    pub post: Option<PostResponse>,
    pub is_edit: bool,
}
