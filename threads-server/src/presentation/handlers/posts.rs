use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::post::{CreatePostRequest, Post, Reply};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

/// Fields are optional on the wire so that a missing one surfaces as the
/// domain's "required" error rather than a JSON rejection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePostDto {
    pub(crate) posted_by: Option<i64>,
    pub(crate) text: Option<String>,
    /// Data URI or remote URL of the image to attach.
    pub(crate) img: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateReplyDto {
    pub(crate) text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReplyDto {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) text: String,
    pub(crate) user_profile_pic: String,
    pub(crate) username: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) posted_by: i64,
    pub(crate) text: String,
    pub(crate) img: Option<String>,
    pub(crate) likes: Vec<i64>,
    pub(crate) replies: Vec<ReplyDto>,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct MessageDto {
    pub(crate) message: String,
}

impl MessageDto {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<Reply> for ReplyDto {
    fn from(reply: Reply) -> Self {
        Self {
            id: reply.id,
            user_id: reply.user_id,
            text: reply.text,
            user_profile_pic: reply.user_profile_pic,
            username: reply.username,
            created_at: reply.created_at,
        }
    }
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            posted_by: post.posted_by,
            text: post.text,
            img: post.img,
            likes: post.likes,
            replies: post.replies.into_iter().map(ReplyDto::from).collect(),
            created_at: post.created_at,
        }
    }
}

fn into_dtos(posts: Vec<Post>) -> Vec<PostDto> {
    posts.into_iter().map(PostDto::from).collect()
}

#[utoipa::path(
    post,
    path = "/api/posts/create",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Author not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let req = CreatePostRequest {
        posted_by: dto.posted_by,
        text: dto.text,
        img: dto.img,
    };

    let post = state.post_service.create_post(auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(post))))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PostDto>> {
    let post = state.post_service.get_post(id).await?;
    Ok(Json(PostDto::from(post)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post deleted", body = MessageDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageDto>> {
    state.post_service.delete_post(auth.user_id, id).await?;
    Ok(Json(MessageDto::new("Post deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Like toggled", body = MessageDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageDto>> {
    let outcome = state.post_service.toggle_like(auth.user_id, id).await?;
    Ok(Json(MessageDto::new(outcome.message())))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/reply",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = CreateReplyDto,
    responses(
        (status = 200, description = "Reply added", body = ReplyDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn reply_to_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(dto): Json<CreateReplyDto>,
) -> AppResult<Json<ReplyDto>> {
    let text = dto.text.unwrap_or_default();
    let reply = state
        .post_service
        .add_reply(auth.user_id, id, &text)
        .await?;
    Ok(Json(ReplyDto::from(reply)))
}

#[utoipa::path(
    get,
    path = "/api/posts/feed",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Posts of followed users, newest first", body = [PostDto]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn feed(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<PostDto>>> {
    let posts = state.post_service.feed(auth.user_id).await?;
    Ok(Json(into_dtos(posts)))
}

#[utoipa::path(
    get,
    path = "/api/posts/user/{username}",
    tag = "posts",
    params(
        ("username" = String, Path, description = "Author username")
    ),
    responses(
        (status = 200, description = "Posts of the user, newest first", body = [PostDto]),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn user_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<Vec<PostDto>>> {
    let posts = state.post_service.user_timeline(&username).await?;
    Ok(Json(into_dtos(posts)))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::{CreatePostDto, PostDto};
    use crate::domain::post::{Post, Reply};

    #[test]
    fn post_serializes_with_camel_case_fields() {
        let created_at = Utc
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .expect("valid ts");
        let post = Post {
            id: 3,
            posted_by: 1,
            text: "hello".to_string(),
            img: None,
            img_asset_id: Some("threads/internal".to_string()),
            likes: vec![2],
            replies: vec![Reply {
                id: 9,
                user_id: 2,
                text: "hi".to_string(),
                user_profile_pic: String::new(),
                username: "bob".to_string(),
                created_at,
            }],
            created_at,
        };

        let value = serde_json::to_value(PostDto::from(post)).expect("must serialize");
        assert_eq!(value["postedBy"], json!(1));
        assert_eq!(value["likes"], json!([2]));
        assert_eq!(value["replies"][0]["userProfilePic"], json!(""));
        assert_eq!(value["replies"][0]["username"], json!("bob"));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("imgAssetId").is_none());
    }

    #[test]
    fn create_dto_tolerates_missing_fields() {
        let dto: CreatePostDto =
            serde_json::from_value(json!({ "postedBy": 4 })).expect("must deserialize");
        assert_eq!(dto.posted_by, Some(4));
        assert!(dto.text.is_none());
    }
}
