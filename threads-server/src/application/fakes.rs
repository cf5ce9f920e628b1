//! In-memory repositories shared by the service tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::data::asset_store::{AssetStore, UploadedAsset};
use crate::data::post_repository::{NewPost, NewReply, PostRepository};
use crate::data::user_repository::{NewUser, ProfilePatch, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, Reply};
use crate::domain::user::User;

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .expect("valid timestamp")
}

#[derive(Default)]
struct UserStore {
    users: Vec<UserCredentials>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryUserRepo {
    inner: Arc<Mutex<UserStore>>,
}

impl InMemoryUserRepo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a user with a placeholder password hash and returns its id.
    pub(crate) fn seed(&self, username: &str) -> i64 {
        let mut store = self.inner.lock().expect("user store mutex poisoned");
        store.next_id += 1;
        let id = store.next_id;
        let user = User::new(
            id,
            username,
            username,
            format!("{username}@example.com"),
            base_time(),
        )
        .expect("seed user must be valid");
        store.users.push(UserCredentials {
            user,
            password_hash: String::new(),
        });
        id
    }

    pub(crate) fn set_profile_pic(&self, id: i64, url: &str, asset_id: Option<&str>) {
        self.with_user(id, |user| {
            user.profile_pic = url.to_string();
            user.profile_pic_asset_id = asset_id.map(str::to_string);
        });
    }

    pub(crate) fn follow(&self, follower_id: i64, followee_id: i64) {
        self.with_user(follower_id, |user| {
            if !user.following.contains(&followee_id) {
                user.following.push(followee_id);
            }
        });
    }

    pub(crate) fn user(&self, id: i64) -> User {
        self.inner
            .lock()
            .expect("user store mutex poisoned")
            .users
            .iter()
            .find(|creds| creds.user.id == id)
            .map(|creds| creds.user.clone())
            .expect("user must exist")
    }

    pub(crate) fn count(&self) -> usize {
        self.inner
            .lock()
            .expect("user store mutex poisoned")
            .users
            .len()
    }

    fn with_user(&self, id: i64, f: impl FnOnce(&mut User)) -> bool {
        let mut store = self.inner.lock().expect("user store mutex poisoned");
        match store.users.iter_mut().find(|creds| creds.user.id == id) {
            Some(creds) => {
                f(&mut creds.user);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut store = self.inner.lock().expect("user store mutex poisoned");
        if store
            .users
            .iter()
            .any(|creds| creds.user.username == input.username)
        {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        if store.users.iter().any(|creds| creds.user.email == input.email) {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }

        store.next_id += 1;
        let mut user = User::new(
            store.next_id,
            input.name,
            input.username,
            input.email,
            base_time(),
        )?;
        user.student = input.student;
        store.users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let store = self.inner.lock().expect("user store mutex poisoned");
        Ok(store
            .users
            .iter()
            .find(|creds| creds.user.id == id)
            .map(|creds| creds.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let store = self.inner.lock().expect("user store mutex poisoned");
        Ok(store
            .users
            .iter()
            .find(|creds| creds.user.username == username)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, DomainError> {
        let updated = self.with_user(id, |user| {
            if let Some(name) = patch.name {
                user.name = name;
            }
            if let Some(bio) = patch.bio {
                user.bio = bio;
            }
            if let Some(pic) = patch.profile_pic {
                user.profile_pic = pic;
            }
            if let Some(asset_id) = patch.profile_pic_asset_id {
                user.profile_pic_asset_id = Some(asset_id);
            }
        });
        if !updated {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn add_follow(&self, follower_id: i64, followee_id: i64) -> Result<(), DomainError> {
        self.follow(follower_id, followee_id);
        Ok(())
    }

    async fn remove_follow(&self, follower_id: i64, followee_id: i64) -> Result<(), DomainError> {
        self.with_user(follower_id, |user| {
            user.following.retain(|id| *id != followee_id)
        });
        Ok(())
    }
}

#[derive(Default)]
struct PostStore {
    posts: Vec<Post>,
    next_post_id: i64,
    next_reply_id: i64,
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryPostRepo {
    inner: Arc<Mutex<PostStore>>,
}

impl InMemoryPostRepo {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn seed_post(
        &self,
        posted_by: i64,
        text: &str,
        img: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> i64 {
        let mut store = self.inner.lock().expect("post store mutex poisoned");
        store.next_post_id += 1;
        let id = store.next_post_id;
        store.posts.push(Post {
            id,
            posted_by,
            text: text.to_string(),
            img: img.map(str::to_string),
            img_asset_id: None,
            likes: Vec::new(),
            replies: Vec::new(),
            created_at,
        });
        id
    }

    pub(crate) fn count(&self) -> usize {
        self.inner
            .lock()
            .expect("post store mutex poisoned")
            .posts
            .len()
    }

    pub(crate) fn likes(&self, post_id: i64) -> Vec<i64> {
        self.inner
            .lock()
            .expect("post store mutex poisoned")
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .map(|post| post.likes.clone())
            .unwrap_or_default()
    }

    fn with_post<T>(&self, post_id: i64, f: impl FnOnce(&mut Post) -> T) -> Option<T> {
        let mut store = self.inner.lock().expect("post store mutex poisoned");
        store.posts.iter_mut().find(|post| post.id == post_id).map(f)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepo {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut store = self.inner.lock().expect("post store mutex poisoned");
        store.next_post_id += 1;
        let post = Post {
            id: store.next_post_id,
            posted_by: input.posted_by,
            text: input.text,
            img: input.img,
            img_asset_id: input.img_asset_id,
            likes: Vec::new(),
            replies: Vec::new(),
            created_at: base_time() + Duration::minutes(store.next_post_id),
        };
        store.posts.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.with_post(id, |post| post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut store = self.inner.lock().expect("post store mutex poisoned");
        let before = store.posts.len();
        store.posts.retain(|post| post.id != id);
        Ok(store.posts.len() != before)
    }

    async fn add_like(&self, post_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.with_post(post_id, |post| {
            if !post.likes.contains(&user_id) {
                post.likes.push(user_id);
            }
        })
        .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    async fn remove_like(&self, post_id: i64, user_id: i64) -> Result<(), DomainError> {
        self.with_post(post_id, |post| post.likes.retain(|id| *id != user_id))
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    async fn add_reply(&self, post_id: i64, input: NewReply) -> Result<Reply, DomainError> {
        let mut store = self.inner.lock().expect("post store mutex poisoned");
        store.next_reply_id += 1;
        let reply = Reply {
            id: store.next_reply_id,
            user_id: input.author.user_id,
            text: input.text,
            user_profile_pic: input.author.profile_pic,
            username: input.author.username,
            created_at: base_time(),
        };
        let post = store
            .posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .ok_or_else(|| DomainError::post_not_found(post_id))?;
        post.replies.push(reply.clone());
        Ok(reply)
    }

    async fn list_by_authors(&self, author_ids: &[i64]) -> Result<Vec<Post>, DomainError> {
        let store = self.inner.lock().expect("post store mutex poisoned");
        Ok(store
            .posts
            .iter()
            .filter(|post| author_ids.contains(&post.posted_by))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct AssetLog {
    uploads: Vec<String>,
    deletes: Vec<String>,
    fail_deletes: bool,
}

/// Records calls and hands out predictable asset ids: `threads/asset{n}`.
#[derive(Clone, Default)]
pub(crate) struct RecordingAssetStore {
    inner: Arc<Mutex<AssetLog>>,
}

impl RecordingAssetStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_deletes(&self) {
        self.inner
            .lock()
            .expect("asset log mutex poisoned")
            .fail_deletes = true;
    }

    pub(crate) fn uploads(&self) -> Vec<String> {
        self.inner
            .lock()
            .expect("asset log mutex poisoned")
            .uploads
            .clone()
    }

    pub(crate) fn deletes(&self) -> Vec<String> {
        self.inner
            .lock()
            .expect("asset log mutex poisoned")
            .deletes
            .clone()
    }
}

#[async_trait]
impl AssetStore for RecordingAssetStore {
    async fn upload(&self, payload: &str) -> Result<UploadedAsset, DomainError> {
        let mut log = self.inner.lock().expect("asset log mutex poisoned");
        log.uploads.push(payload.to_string());
        let n = log.uploads.len();
        Ok(UploadedAsset {
            url: format!("https://assets.test/threads/asset{n}.png"),
            asset_id: format!("threads/asset{n}"),
        })
    }

    async fn delete(&self, asset_id: &str) -> Result<(), DomainError> {
        let mut log = self.inner.lock().expect("asset log mutex poisoned");
        log.deletes.push(asset_id.to_string());
        if log.fail_deletes {
            return Err(DomainError::Unexpected("asset store unavailable".to_string()));
        }
        Ok(())
    }
}
