//! Client library for `threads-server`.
//!
//! [`ThreadsClient`] keeps the session returned by `signup`/`login` and sends
//! its token on every protected call.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{ThreadsClientError, ThreadsClientResult};
pub use http_client::HttpClient;
pub use models::{
    AuthResponse, Post, Profile, ProfileUpdate, Reply, Session, SignupForm, User,
};

/// Session-aware client for the threads API.
#[derive(Debug, Clone)]
pub struct ThreadsClient {
    http: HttpClient,
    session: Option<Session>,
}

impl ThreadsClient {
    /// Creates a client for the server at `base_url`, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> ThreadsClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            session: None,
        })
    }

    /// Restores a previously saved session.
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Current session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Drops the current session.
    pub fn clear_session(&mut self) {
        self.session = None;
    }

    /// Signs up and keeps the returned session.
    pub async fn signup(&mut self, form: &SignupForm) -> ThreadsClientResult<AuthResponse> {
        let auth = self.http.signup(form).await?;
        self.remember(&auth);
        Ok(auth)
    }

    /// Logs in and keeps the returned session.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> ThreadsClientResult<AuthResponse> {
        let auth = self.http.login(username, password).await?;
        self.remember(&auth);
        Ok(auth)
    }

    /// Public profile by username.
    pub async fn get_profile(&self, username: &str) -> ThreadsClientResult<Profile> {
        self.http.get_profile(username).await
    }

    /// Updates the logged-in user's profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ThreadsClientResult<User> {
        let session = self.require_session()?;
        self.http
            .update_profile(&session.access_token, update)
            .await
    }

    /// Follows or unfollows `user_id`.
    pub async fn toggle_follow(&self, user_id: i64) -> ThreadsClientResult<String> {
        let session = self.require_session()?;
        self.http
            .toggle_follow(&session.access_token, user_id)
            .await
    }

    /// Creates a post as the logged-in user.
    pub async fn create_post(&self, text: &str, img: Option<&str>) -> ThreadsClientResult<Post> {
        let session = self.require_session()?;
        self.http
            .create_post(&session.access_token, session.user_id, text, img)
            .await
    }

    /// Post by id.
    pub async fn get_post(&self, id: i64) -> ThreadsClientResult<Post> {
        self.http.get_post(id).await
    }

    /// Deletes one of the logged-in user's posts.
    pub async fn delete_post(&self, id: i64) -> ThreadsClientResult<String> {
        let session = self.require_session()?;
        self.http.delete_post(&session.access_token, id).await
    }

    /// Likes or unlikes a post.
    pub async fn toggle_like(&self, id: i64) -> ThreadsClientResult<String> {
        let session = self.require_session()?;
        self.http.toggle_like(&session.access_token, id).await
    }

    /// Replies to a post.
    pub async fn reply(&self, id: i64, text: &str) -> ThreadsClientResult<Reply> {
        let session = self.require_session()?;
        self.http.reply(&session.access_token, id, text).await
    }

    /// Feed of the logged-in user.
    pub async fn feed(&self) -> ThreadsClientResult<Vec<Post>> {
        let session = self.require_session()?;
        self.http.feed(&session.access_token).await
    }

    /// Posts of `username`.
    pub async fn user_posts(&self, username: &str) -> ThreadsClientResult<Vec<Post>> {
        self.http.user_posts(username).await
    }

    /// AR lens embed snippets.
    pub async fn lenses(&self) -> ThreadsClientResult<Vec<String>> {
        self.http.lenses().await
    }

    fn remember(&mut self, auth: &AuthResponse) {
        self.session = Some(Session {
            access_token: auth.access_token.clone(),
            user_id: auth.user.id,
        });
    }

    fn require_session(&self) -> ThreadsClientResult<&Session> {
        self.session
            .as_ref()
            .ok_or_else(ThreadsClientError::no_session)
    }
}
