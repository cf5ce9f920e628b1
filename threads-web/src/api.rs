use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{
    AuthResponse, CreatePostRequest, LensesResponse, LoginRequest, MessageResponse, Post, Profile,
    Reply, ReplyRequest, SignupRequest,
};

const API_BASE_URL: &str = match option_env!("WASM_API_BASE_URL") {
    Some(value) => value,
    None => "http://127.0.0.1:5000",
};

#[derive(Debug, Clone)]
pub(crate) enum ApiError {
    Network(String),
    Http { status: u16, message: String },
    Decode(String),
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http { status, message } => write!(f, "http error {status}: {message}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

fn endpoint(path: &str) -> String {
    format!(
        "{}/{}",
        API_BASE_URL.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn authorized(request: RequestBuilder, token: &str) -> RequestBuilder {
    request.header("Authorization", &format!("Bearer {token}"))
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

async fn parse_error_body(response: Response) -> ApiError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let fallback = match status {
        400 => "Invalid request".to_string(),
        401 => "Please log in first".to_string(),
        404 => "Not found".to_string(),
        409 => "Username or email is already taken".to_string(),
        500..=599 => "Server error".to_string(),
        _ => format!("HTTP error {status}"),
    };

    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(fallback);

    ApiError::Http { status, message }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

async fn send_json<B: Serialize, T: DeserializeOwned>(
    request: RequestBuilder,
    body: &B,
) -> Result<T, ApiError> {
    let response = request
        .json(body)
        .map_err(|err| ApiError::Network(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn signup(form: &SignupRequest) -> Result<AuthResponse, ApiError> {
    send_json(Request::post(&endpoint("/api/users/signup")), form).await
}

pub(crate) async fn login(username: &str, password: &str) -> Result<AuthResponse, ApiError> {
    let payload = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };
    send_json(Request::post(&endpoint("/api/users/login")), &payload).await
}

pub(crate) async fn get_profile(username: &str) -> Result<Profile, ApiError> {
    send(Request::get(&endpoint(&format!("/api/users/profile/{username}")))).await
}

pub(crate) async fn toggle_follow(token: &str, user_id: i64) -> Result<String, ApiError> {
    let request = Request::post(&endpoint(&format!("/api/users/follow/{user_id}")));
    let body: MessageResponse = send(authorized(request, token)).await?;
    Ok(body.message)
}

pub(crate) async fn create_post(
    token: &str,
    posted_by: i64,
    text: &str,
    img: Option<String>,
) -> Result<Post, ApiError> {
    let payload = CreatePostRequest {
        posted_by,
        text: text.to_string(),
        img,
    };
    let request = Request::post(&endpoint("/api/posts/create"));
    send_json(authorized(request, token), &payload).await
}

pub(crate) async fn delete_post(token: &str, id: i64) -> Result<(), ApiError> {
    let request = Request::delete(&endpoint(&format!("/api/posts/{id}")));
    let _: MessageResponse = send(authorized(request, token)).await?;
    Ok(())
}

pub(crate) async fn toggle_like(token: &str, id: i64) -> Result<String, ApiError> {
    let request = Request::post(&endpoint(&format!("/api/posts/{id}/like")));
    let body: MessageResponse = send(authorized(request, token)).await?;
    Ok(body.message)
}

pub(crate) async fn reply(token: &str, id: i64, text: &str) -> Result<Reply, ApiError> {
    let payload = ReplyRequest {
        text: text.to_string(),
    };
    let request = Request::post(&endpoint(&format!("/api/posts/{id}/reply")));
    send_json(authorized(request, token), &payload).await
}

pub(crate) async fn feed(token: &str) -> Result<Vec<Post>, ApiError> {
    let request = Request::get(&endpoint("/api/posts/feed"));
    send(authorized(request, token)).await
}

pub(crate) async fn user_posts(username: &str) -> Result<Vec<Post>, ApiError> {
    send(Request::get(&endpoint(&format!("/api/posts/user/{username}")))).await
}

pub(crate) async fn lenses() -> Result<Vec<String>, ApiError> {
    let body: LensesResponse = send(Request::get(&endpoint("/api/getar"))).await?;
    Ok(body.embeds)
}
