use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{ThreadsClientError, ThreadsClientResult};
use crate::models::{AuthResponse, Post, Profile, ProfileUpdate, Reply, SignupForm, User};

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePostRequestDto<'a> {
    posted_by: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    img: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ReplyRequestDto<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponseDto {
    message: String,
}

#[derive(Debug, Deserialize)]
struct LensesResponseDto {
    embeds: Vec<String>,
}

/// HTTP client for the `threads-server` REST API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Builds a client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> ThreadsClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> ThreadsClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body.error,
            Err(_) => None,
        };
        ThreadsClientError::from_http_status(status, message)
    }

    async fn send<TRes: DeserializeOwned>(request: RequestBuilder) -> ThreadsClientResult<TRes> {
        let response = request
            .send()
            .await
            .map_err(ThreadsClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(ThreadsClientError::from_reqwest)
    }

    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> ThreadsClientResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        Self::send(self.request(method, path, token).json(body)).await
    }

    async fn send_empty<TRes: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> ThreadsClientResult<TRes> {
        Self::send(self.request(method, path, token)).await
    }

    /// Creates an account and returns its token and user.
    pub async fn signup(&self, form: &SignupForm) -> ThreadsClientResult<AuthResponse> {
        self.send_json(Method::POST, "/api/users/signup", form, None)
            .await
    }

    /// Logs in and returns a fresh token and the user.
    pub async fn login(&self, username: &str, password: &str) -> ThreadsClientResult<AuthResponse> {
        let payload = LoginRequestDto { username, password };
        self.send_json(Method::POST, "/api/users/login", &payload, None)
            .await
    }

    /// Public profile by username.
    pub async fn get_profile(&self, username: &str) -> ThreadsClientResult<Profile> {
        self.send_empty(Method::GET, &format!("/api/users/profile/{username}"), None)
            .await
    }

    /// Updates the caller's profile.
    pub async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> ThreadsClientResult<User> {
        self.send_json(Method::PUT, "/api/users/update", update, Some(token))
            .await
    }

    /// Follows `user_id`, or unfollows when already following. Returns the
    /// server message.
    pub async fn toggle_follow(&self, token: &str, user_id: i64) -> ThreadsClientResult<String> {
        let dto: MessageResponseDto = self
            .send_empty(
                Method::POST,
                &format!("/api/users/follow/{user_id}"),
                Some(token),
            )
            .await?;
        Ok(dto.message)
    }

    /// Creates a post authored by `posted_by`, which must be the token's user.
    pub async fn create_post(
        &self,
        token: &str,
        posted_by: i64,
        text: &str,
        img: Option<&str>,
    ) -> ThreadsClientResult<Post> {
        let payload = CreatePostRequestDto {
            posted_by,
            text,
            img,
        };
        self.send_json(Method::POST, "/api/posts/create", &payload, Some(token))
            .await
    }

    /// Post by id.
    pub async fn get_post(&self, id: i64) -> ThreadsClientResult<Post> {
        self.send_empty(Method::GET, &format!("/api/posts/{id}"), None)
            .await
    }

    /// Deletes one of the caller's posts.
    pub async fn delete_post(&self, token: &str, id: i64) -> ThreadsClientResult<String> {
        let dto: MessageResponseDto = self
            .send_empty(Method::DELETE, &format!("/api/posts/{id}"), Some(token))
            .await?;
        Ok(dto.message)
    }

    /// Likes the post, or removes the like when already present.
    pub async fn toggle_like(&self, token: &str, id: i64) -> ThreadsClientResult<String> {
        let dto: MessageResponseDto = self
            .send_empty(Method::POST, &format!("/api/posts/{id}/like"), Some(token))
            .await?;
        Ok(dto.message)
    }

    /// Appends a reply to the post.
    pub async fn reply(&self, token: &str, id: i64, text: &str) -> ThreadsClientResult<Reply> {
        let payload = ReplyRequestDto { text };
        self.send_json(
            Method::POST,
            &format!("/api/posts/{id}/reply"),
            &payload,
            Some(token),
        )
        .await
    }

    /// Posts of everyone the caller follows, newest first.
    pub async fn feed(&self, token: &str) -> ThreadsClientResult<Vec<Post>> {
        self.send_empty(Method::GET, "/api/posts/feed", Some(token))
            .await
    }

    /// Posts of one user, newest first.
    pub async fn user_posts(&self, username: &str) -> ThreadsClientResult<Vec<Post>> {
        self.send_empty(Method::GET, &format!("/api/posts/user/{username}"), None)
            .await
    }

    /// HTML embed snippets of the AR lenses.
    pub async fn lenses(&self) -> ThreadsClientResult<Vec<String>> {
        let dto: LensesResponseDto = self.send_empty(Method::GET, "/api/getar", None).await?;
        Ok(dto.embeds)
    }
}
