//! Explicit authorization guards, composed at the start of handlers.

use uuid::Uuid;

use crate::error::AppError;

/// Only a post's author may edit it. Anyone else is silently sent to the
/// read-only detail view; the attempt is not an error.
pub fn require_post_owner(viewer: Uuid, author_id: Uuid, post_id: Uuid) -> Result<(), AppError> {
    if viewer == author_id {
        Ok(())
    } else {
        Err(AppError::Redirect(format!("/posts/{}", post_id)))
    }
}
