use chrono::{DateTime, Utc};
use validator::ValidateEmail;

use super::error::DomainError;
use super::post::asset_id_from_url;

const MAX_BIO_CHARS: usize = 500;
const MAX_STUDENT_FIELD_CHARS: usize = 128;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StudentDetails {
    pub(crate) school: Option<String>,
    pub(crate) programs: Option<String>,
    pub(crate) batch: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct SignupRequest {
    pub(crate) name: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) is_student: bool,
    pub(crate) school: Option<String>,
    pub(crate) programs: Option<String>,
    pub(crate) batch: Option<String>,
}

/// Signup request after normalization. Student fields are folded into
/// `student` and dropped entirely for non-students.
#[derive(Debug, Clone)]
pub(crate) struct ValidSignup {
    pub(crate) name: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) student: Option<StudentDetails>,
}

impl SignupRequest {
    pub(crate) fn validate(self) -> Result<ValidSignup, DomainError> {
        let name = normalize_name(&self.name)?;
        let username = normalize_username(&self.username)?;
        let email = normalize_email(&self.email)?;
        let password_len = self.password.chars().count();
        if !(8..=128).contains(&password_len) {
            return Err(DomainError::Validation {
                field: "password",
                message: "must be 8..128 chars",
            });
        }

        let student = if self.is_student {
            Some(StudentDetails {
                school: normalize_optional("school", self.school)?,
                programs: normalize_optional("programs", self.programs)?,
                batch: normalize_optional("batch", self.batch)?,
            })
        } else {
            None
        };

        Ok(ValidSignup {
            name,
            username,
            email,
            password: self.password,
            student,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = self.username.trim();
        if username.is_empty() || username.len() > 64 {
            return Err(DomainError::Validation {
                field: "username",
                message: "must be 1..64 chars",
            });
        }

        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            username: username.to_string(),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UpdateProfileRequest {
    pub(crate) name: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) profile_pic: Option<String>,
}

impl UpdateProfileRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let name = self.name.as_deref().map(normalize_name).transpose()?;
        let bio = match self.bio {
            Some(bio) => {
                let bio = bio.trim().to_string();
                if bio.chars().count() > MAX_BIO_CHARS {
                    return Err(DomainError::Validation {
                        field: "bio",
                        message: "must be at most 500 chars",
                    });
                }
                Some(bio)
            }
            None => None,
        };
        let profile_pic = self
            .profile_pic
            .map(|pic| pic.trim().to_string())
            .filter(|pic| !pic.is_empty());

        Ok(Self {
            name,
            bio,
            profile_pic,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) profile_pic: String,
    /// Asset store id of `profile_pic`, when it was uploaded through us.
    pub(crate) profile_pic_asset_id: Option<String>,
    pub(crate) bio: String,
    pub(crate) student: Option<StudentDetails>,
    pub(crate) following: Vec<i64>,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }

        Ok(Self {
            id,
            name: name.into(),
            username: normalize_username(&username.into())?,
            email: normalize_email(&email.into())?,
            profile_pic: String::new(),
            profile_pic_asset_id: None,
            bio: String::new(),
            student: None,
            following: Vec::new(),
            created_at,
        })
    }

    /// Asset to remove once the picture is replaced. Pictures set before ids
    /// were stored fall back to the id in their URL.
    pub(crate) fn profile_pic_asset(&self) -> Option<String> {
        if let Some(asset_id) = self
            .profile_pic_asset_id
            .as_deref()
            .filter(|id| !id.is_empty())
        {
            return Some(asset_id.to_string());
        }
        asset_id_from_url(&self.profile_pic)
    }

    pub(crate) fn is_following(&self, user_id: i64) -> bool {
        self.following.contains(&user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FollowOutcome {
    Followed,
    Unfollowed,
}

impl FollowOutcome {
    pub(crate) fn message(self) -> &'static str {
        match self {
            Self::Followed => "User followed successfully",
            Self::Unfollowed => "User unfollowed successfully",
        }
    }
}

fn normalize_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    let len = name.chars().count();
    if len == 0 || len > 64 {
        return Err(DomainError::Validation {
            field: "name",
            message: "must be 1..64 chars",
        });
    }
    Ok(name.to_string())
}

fn normalize_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    let len = username.chars().count();
    if !(3..=64).contains(&len) {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 3..64 chars",
        });
    }
    if username.chars().any(char::is_whitespace) {
        return Err(DomainError::Validation {
            field: "username",
            message: "must not contain whitespace",
        });
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email)
}

fn normalize_optional(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, DomainError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.chars().count() > MAX_STUDENT_FIELD_CHARS {
        return Err(DomainError::Validation {
            field,
            message: "must be at most 128 chars",
        });
    }
    Ok(Some(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{
        SignupRequest, UpdateProfileRequest, User, normalize_email, normalize_username,
    };
    use chrono::Utc;

    fn signup(password: &str, is_student: bool) -> SignupRequest {
        SignupRequest {
            name: "  Ada Lovelace ".to_string(),
            username: "ada".to_string(),
            email: "ADA@example.com".to_string(),
            password: password.to_string(),
            is_student,
            school: Some(" Engineering ".to_string()),
            programs: Some("".to_string()),
            batch: Some("2026".to_string()),
        }
    }

    #[test]
    fn user_new_rejects_non_positive_id() {
        let result = User::new(0, "Name", "valid_user", "test@example.com", Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let value = normalize_email("  TeSt@Example.COM ").expect("must be valid");
        assert_eq!(value, "test@example.com");
    }

    #[test]
    fn username_rules_are_applied() {
        assert!(normalize_username("ab").is_err());
        assert!(normalize_username("two words").is_err());
        assert!(normalize_username("valid_user").is_ok());
    }

    #[test]
    fn username_length_counts_characters() {
        let cyrillic = "ж".repeat(40);
        assert_eq!(normalize_username(&cyrillic).expect("40 chars are allowed"), cyrillic);
        assert!(normalize_username(&"ж".repeat(65)).is_err());
        assert!(normalize_username("жж").is_err());
    }

    #[test]
    fn signup_password_length_is_checked() {
        assert!(signup("short", false).validate().is_err());

        let validated = signup("very-secure-password", false)
            .validate()
            .expect("must be valid");
        assert_eq!(validated.name, "Ada Lovelace");
        assert_eq!(validated.email, "ada@example.com");
        assert!(validated.student.is_none());
    }

    #[test]
    fn signup_keeps_student_details_only_for_students() {
        let validated = signup("very-secure-password", true)
            .validate()
            .expect("must be valid");

        let student = validated.student.expect("student details expected");
        assert_eq!(student.school.as_deref(), Some("Engineering"));
        assert_eq!(student.programs, None);
        assert_eq!(student.batch.as_deref(), Some("2026"));
    }

    #[test]
    fn signup_rejects_invalid_email() {
        let mut req = signup("very-secure-password", false);
        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_profile_rejects_long_bio() {
        let req = UpdateProfileRequest {
            bio: Some("b".repeat(501)),
            ..UpdateProfileRequest::default()
        };
        assert!(req.validate().is_err());
    }
}
