use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::{StudentDetails, User};

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) name: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) student: Option<StudentDetails>,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProfilePatch {
    pub(crate) name: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) profile_pic: Option<String>,
    pub(crate) profile_pic_asset_id: Option<String>,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, username: &str)
    -> Result<Option<UserCredentials>, DomainError>;
    async fn update_profile(
        &self,
        id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, DomainError>;
    async fn add_follow(&self, follower_id: i64, followee_id: i64) -> Result<(), DomainError>;
    async fn remove_follow(&self, follower_id: i64, followee_id: i64) -> Result<(), DomainError>;
}
