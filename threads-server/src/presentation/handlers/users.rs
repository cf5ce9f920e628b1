use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::user_service::AuthResult;
use crate::domain::user::{LoginRequest, SignupRequest, UpdateProfileRequest, User};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::posts::MessageDto;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignupDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) name: String,
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
    #[serde(default)]
    pub(crate) is_student: bool,
    #[validate(length(max = 128))]
    pub(crate) school: Option<String>,
    #[validate(length(max = 128))]
    pub(crate) programs: Option<String>,
    #[validate(length(max = 128))]
    pub(crate) batch: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct LoginDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) username: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProfileDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) name: Option<String>,
    #[validate(length(max = 500))]
    pub(crate) bio: Option<String>,
    /// Data URI or remote URL of the new picture.
    pub(crate) profile_pic: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponseDto {
    pub(crate) access_token: String,
    pub(crate) user: UserDto,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) profile_pic: String,
    pub(crate) bio: String,
    pub(crate) is_student: bool,
    pub(crate) school: Option<String>,
    pub(crate) programs: Option<String>,
    pub(crate) batch: Option<String>,
    pub(crate) following: Vec<i64>,
    pub(crate) created_at: DateTime<Utc>,
}

/// Public view of a user: no email.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfileDto {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) username: String,
    pub(crate) profile_pic: String,
    pub(crate) bio: String,
    pub(crate) is_student: bool,
    pub(crate) school: Option<String>,
    pub(crate) programs: Option<String>,
    pub(crate) batch: Option<String>,
    pub(crate) following: Vec<i64>,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        let is_student = user.student.is_some();
        let student = user.student.unwrap_or_default();
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            profile_pic: user.profile_pic,
            bio: user.bio,
            is_student,
            school: student.school,
            programs: student.programs,
            batch: student.batch,
            following: user.following,
            created_at: user.created_at,
        }
    }
}

impl From<User> for ProfileDto {
    fn from(user: User) -> Self {
        let UserDto {
            id,
            name,
            username,
            profile_pic,
            bio,
            is_student,
            school,
            programs,
            batch,
            following,
            created_at,
            ..
        } = UserDto::from(user);

        Self {
            id,
            name,
            username,
            profile_pic,
            bio,
            is_student,
            school,
            programs,
            batch,
            following,
            created_at,
        }
    }
}

impl From<AuthResult> for AuthResponseDto {
    fn from(result: AuthResult) -> Self {
        Self {
            access_token: result.access_token,
            user: result.user.into(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users/signup",
    tag = "users",
    request_body = SignupDto,
    responses(
        (status = 201, description = "Signed up successfully", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn signup(
    State(state): State<AppState>,
    Json(dto): Json<SignupDto>,
) -> AppResult<(StatusCode, Json<AuthResponseDto>)> {
    dto.validate()?;

    let req = SignupRequest {
        name: dto.name,
        username: dto.username,
        email: dto.email,
        password: dto.password,
        is_student: dto.is_student,
        school: dto.school,
        programs: dto.programs,
        batch: dto.batch,
    };

    let result = state.user_service.signup(req).await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "users",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> AppResult<Json<AuthResponseDto>> {
    dto.validate()?;

    let req = LoginRequest {
        username: dto.username,
        password: dto.password,
    };

    let result = state.user_service.login(req).await?;
    Ok(Json(result.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/profile/{username}",
    tag = "users",
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 200, description = "Profile found", body = ProfileDto),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<ProfileDto>> {
    let user = state.user_service.get_profile(&username).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/users/update",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(dto): Json<UpdateProfileDto>,
) -> AppResult<Json<UserDto>> {
    dto.validate()?;

    let req = UpdateProfileRequest {
        name: dto.name,
        bio: dto.bio,
        profile_pic: dto.profile_pic,
    };

    let user = state.user_service.update_profile(auth.user_id, req).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/users/follow/{id}",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "User to follow or unfollow")
    ),
    responses(
        (status = 200, description = "Follow toggled", body = MessageDto),
        (status = 400, description = "Cannot follow yourself"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn toggle_follow(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageDto>> {
    let outcome = state.user_service.toggle_follow(auth.user_id, id).await?;
    tracing::debug!(username = %auth.username, target_id = id, ?outcome, "follow toggled");
    Ok(Json(MessageDto::new(outcome.message())))
}
