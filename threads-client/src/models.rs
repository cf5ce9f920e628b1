use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account of the logged-in user, as returned by signup, login and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique login.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Profile picture URL, empty when unset.
    pub profile_pic: String,
    /// Free-form bio.
    pub bio: String,
    /// Whether the student fields below were provided at signup.
    pub is_student: bool,
    /// School, for students.
    pub school: Option<String>,
    /// Programs, for students.
    pub programs: Option<String>,
    /// Batch, for students.
    pub batch: Option<String>,
    /// Ids of users this user follows.
    pub following: Vec<i64>,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
}

/// Public profile of any user. Same as [`User`] without the email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// User id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique login.
    pub username: String,
    /// Profile picture URL, empty when unset.
    pub profile_pic: String,
    /// Free-form bio.
    pub bio: String,
    /// Whether the user signed up as a student.
    pub is_student: bool,
    /// School, for students.
    pub school: Option<String>,
    /// Programs, for students.
    pub programs: Option<String>,
    /// Batch, for students.
    pub batch: Option<String>,
    /// Ids of users this user follows.
    pub following: Vec<i64>,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
}

/// Reply attached to a post. Author fields are a copy taken when it was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// Reply id.
    pub id: i64,
    /// Author id.
    pub user_id: i64,
    /// Reply text.
    pub text: String,
    /// Author picture at reply time.
    pub user_profile_pic: String,
    /// Author username at reply time.
    pub username: String,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
}

/// A post with its likes and replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post id.
    pub id: i64,
    /// Author id.
    pub posted_by: i64,
    /// Post text, at most 500 characters.
    pub text: String,
    /// Image URL, if the post has one.
    pub img: Option<String>,
    /// Ids of users who liked the post.
    pub likes: Vec<i64>,
    /// Replies in the order they were written.
    pub replies: Vec<Reply>,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
}

/// Answer of signup and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// The authenticated user.
    pub user: User,
}

/// Signup form.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    /// Display name.
    pub name: String,
    /// Unique login, 3..64 characters.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password, 8..128 characters.
    pub password: String,
    /// Set to send the student fields.
    pub is_student: bool,
    /// School, for students.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    /// Programs, for students.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programs: Option<String>,
    /// Batch, for students.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
}

/// Profile changes. `None` fields are left as they are.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New bio, at most 500 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New picture as a data URI or remote URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

/// Token plus the id it was issued for. Persisted by the CLI between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// JWT access token.
    pub access_token: String,
    /// Id of the logged-in user.
    pub user_id: i64,
}
