use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::{AuthorSnapshot, Post, Reply};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) posted_by: i64,
    pub(crate) text: String,
    pub(crate) img: Option<String>,
    pub(crate) img_asset_id: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct NewReply {
    pub(crate) author: AuthorSnapshot,
    pub(crate) text: String,
}

/// Store for posts together with their likes and replies.
///
/// Like/unlike are plain writes: callers decide which one to issue after
/// reading the post, so two concurrent toggles may race.
#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    /// Adding an existing like is a no-op.
    async fn add_like(&self, post_id: i64, user_id: i64) -> Result<(), DomainError>;
    async fn remove_like(&self, post_id: i64, user_id: i64) -> Result<(), DomainError>;
    async fn add_reply(&self, post_id: i64, input: NewReply) -> Result<Reply, DomainError>;
    /// Posts written by any of `author_ids`, in no particular order.
    async fn list_by_authors(&self, author_ids: &[i64]) -> Result<Vec<Post>, DomainError>;
}
