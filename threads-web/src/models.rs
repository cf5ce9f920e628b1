use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub profile_pic: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub is_student: bool,
    pub school: Option<String>,
    pub programs: Option<String>,
    pub batch: Option<String>,
    #[serde(default)]
    pub following: Vec<i64>,
    pub created_at: String,
}

/// Public view of a user, as returned by the profile lookup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub profile_pic: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub following: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub user_profile_pic: String,
    pub username: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub posted_by: i64,
    pub text: String,
    pub img: Option<String>,
    pub likes: Vec<i64>,
    pub replies: Vec<Reply>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LensesResponse {
    pub embeds: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_student: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub posted_by: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyRequest {
    pub text: String,
}
