use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::user::User;

pub(crate) const MAX_TEXT_CHARS: usize = 500;

#[derive(Debug, Clone)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) posted_by: i64,
    pub(crate) text: String,
    pub(crate) img: Option<String>,
    /// Identifier the asset store returned on upload. Rows created before
    /// it was recorded only carry `img`.
    pub(crate) img_asset_id: Option<String>,
    pub(crate) likes: Vec<i64>,
    pub(crate) replies: Vec<Reply>,
    pub(crate) created_at: DateTime<Utc>,
}

/// Reply as stored on a post. `username` and `user_profile_pic` are copied
/// from the author when the reply is written and are never refreshed.
#[derive(Debug, Clone)]
pub(crate) struct Reply {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) text: String,
    pub(crate) user_profile_pic: String,
    pub(crate) username: String,
    pub(crate) created_at: DateTime<Utc>,
}

/// Author display fields captured at reply time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuthorSnapshot {
    pub(crate) user_id: i64,
    pub(crate) username: String,
    pub(crate) profile_pic: String,
}

impl AuthorSnapshot {
    pub(crate) fn of(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            profile_pic: user.profile_pic.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LikeOutcome {
    Liked,
    Unliked,
}

impl LikeOutcome {
    pub(crate) fn message(self) -> &'static str {
        match self {
            Self::Liked => "Post liked successfully",
            Self::Unliked => "Post unliked successfully",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CreatePostRequest {
    pub(crate) posted_by: Option<i64>,
    pub(crate) text: Option<String>,
    pub(crate) img: Option<String>,
}

/// Create request with its required fields present. Text length is checked
/// later, once the author is known to be the requester.
#[derive(Debug, Clone)]
pub(crate) struct PostDraft {
    pub(crate) posted_by: i64,
    pub(crate) text: String,
    pub(crate) img: Option<String>,
}

impl CreatePostRequest {
    pub(crate) fn require_fields(self) -> Result<PostDraft, DomainError> {
        let posted_by = self.posted_by.ok_or_else(fields_required)?;
        let text = self
            .text
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(fields_required)?;
        let img = self
            .img
            .map(|img| img.trim().to_string())
            .filter(|img| !img.is_empty());

        Ok(PostDraft {
            posted_by,
            text,
            img,
        })
    }
}

fn fields_required() -> DomainError {
    DomainError::Validation {
        field: "postedBy",
        message: "Postedby and text fields are required",
    }
}

impl Post {
    pub(crate) fn is_liked_by(&self, user_id: i64) -> bool {
        self.likes.contains(&user_id)
    }

    /// Asset to remove from the asset store when the post goes away.
    pub(crate) fn image_asset_id(&self) -> Option<String> {
        if let Some(asset_id) = self.img_asset_id.as_deref().filter(|id| !id.is_empty()) {
            return Some(asset_id.to_string());
        }
        self.img.as_deref().and_then(asset_id_from_url)
    }

    /// Newest first; ids break ties so the order is total.
    pub(crate) fn newest_first(a: &Post, b: &Post) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }
}

pub(crate) fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(Post::newest_first);
}

/// Last path segment of an asset URL up to its first dot:
/// `https://host/image/upload/v1/abc123.jpg` -> `abc123`.
pub(crate) fn asset_id_from_url(url: &str) -> Option<String> {
    let last_segment = url.trim().trim_end_matches('/').rsplit('/').next()?;
    let id = last_segment.split('.').next()?;
    if id.is_empty() {
        return None;
    }
    Some(id.to_string())
}

/// Stored as received; whitespace only matters for the emptiness check.
pub(crate) fn normalize_post_text(text: &str) -> Result<String, DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "text",
            message: "must not be empty",
        });
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(DomainError::Validation {
            field: "text",
            message: "must be at most 500 characters",
        });
    }
    Ok(text.to_string())
}

pub(crate) fn normalize_reply_text(text: &str) -> Result<String, DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "text",
            message: "text field is required",
        });
    }
    normalize_post_text(text)
}
