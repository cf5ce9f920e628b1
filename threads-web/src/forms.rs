use crate::models::{Post, SignupRequest};

pub(crate) const MAX_POST_CHARS: usize = 500;

pub(crate) fn trimmed_or_none(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Client-side checks that mirror the server's signup rules.
pub(crate) fn validate_signup(form: &SignupRequest) -> Result<(), &'static str> {
    if form.name.trim().is_empty()
        || form.username.trim().is_empty()
        || form.email.trim().is_empty()
        || form.password.is_empty()
    {
        return Err("Please fill in all fields");
    }
    if !form.email.contains('@') {
        return Err("Email looks invalid");
    }
    if form.password.chars().count() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Drops the student fields unless the student box is ticked.
#[allow(clippy::too_many_arguments)]
pub(crate) fn build_signup(
    name: &str,
    username: &str,
    email: &str,
    password: &str,
    is_student: bool,
    school: &str,
    programs: &str,
    batch: &str,
) -> SignupRequest {
    let student_field = |value: &str| {
        if is_student {
            trimmed_or_none(value)
        } else {
            None
        }
    };

    SignupRequest {
        name: name.trim().to_string(),
        username: username.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
        is_student,
        school: student_field(school),
        programs: student_field(programs),
        batch: student_field(batch),
    }
}

pub(crate) fn validate_post_text(text: &str) -> Result<(), &'static str> {
    if text.trim().is_empty() {
        return Err("Write something first");
    }
    if text.chars().count() > MAX_POST_CHARS {
        return Err("Posts are limited to 500 characters");
    }
    Ok(())
}

pub(crate) fn remaining_chars(text: &str) -> i64 {
    MAX_POST_CHARS as i64 - text.chars().count() as i64
}

pub(crate) fn is_liked_by(post: &Post, user_id: Option<i64>) -> bool {
    user_id.is_some_and(|id| post.likes.contains(&id))
}

/// Applies a like toggle locally after the server confirmed it.
pub(crate) fn toggle_like_locally(posts: &mut [Post], post_id: i64, user_id: i64) {
    if let Some(post) = posts.iter_mut().find(|post| post.id == post_id) {
        if let Some(pos) = post.likes.iter().position(|id| *id == user_id) {
            post.likes.remove(pos);
        } else {
            post.likes.push(user_id);
        }
    }
}

pub(crate) fn toggle_following_locally(following: &mut Vec<i64>, target_id: i64) {
    if let Some(pos) = following.iter().position(|id| *id == target_id) {
        following.remove(pos);
    } else {
        following.push(target_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(id: i64, likes: Vec<i64>) -> Post {
        Post {
            id,
            posted_by: 1,
            text: "hello".to_string(),
            img: None,
            likes,
            replies: Vec::new(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn build_signup_keeps_student_fields_only_for_students() {
        let student = build_signup(
            " Ada ", "ada", "ada@example.com", "password1", true, "Engineering", " ", "2026",
        );
        assert_eq!(student.name, "Ada");
        assert_eq!(student.school.as_deref(), Some("Engineering"));
        assert_eq!(student.programs, None);
        assert_eq!(student.batch.as_deref(), Some("2026"));

        let regular = build_signup(
            "Ada", "ada", "ada@example.com", "password1", false, "Engineering", "CS", "2026",
        );
        assert!(!regular.is_student);
        assert_eq!(regular.school, None);
        assert_eq!(regular.programs, None);
        assert_eq!(regular.batch, None);
    }

    #[test]
    fn validate_signup_requires_every_field() {
        let form = build_signup("", "ada", "ada@example.com", "password1", false, "", "", "");
        assert_eq!(validate_signup(&form), Err("Please fill in all fields"));
    }

    #[test]
    fn validate_signup_checks_email_and_password() {
        let bad_email = build_signup("Ada", "ada", "ada.example.com", "password1", false, "", "", "");
        assert_eq!(validate_signup(&bad_email), Err("Email looks invalid"));

        let short = build_signup("Ada", "ada", "ada@example.com", "short", false, "", "", "");
        assert_eq!(
            validate_signup(&short),
            Err("Password must be at least 8 characters")
        );

        let ok = build_signup("Ada", "ada", "ada@example.com", "password1", false, "", "", "");
        assert!(validate_signup(&ok).is_ok());
    }

    #[test]
    fn signup_request_serializes_camel_case_without_empty_student_fields() {
        let form = build_signup("Ada", "ada", "ada@example.com", "password1", true, "Eng", "", "");
        let value = serde_json::to_value(&form).expect("must serialize");
        assert_eq!(value["isStudent"], serde_json::json!(true));
        assert_eq!(value["school"], serde_json::json!("Eng"));
        assert!(value.get("programs").is_none());
    }

    #[test]
    fn post_text_limits_count_characters() {
        assert!(validate_post_text("   ").is_err());
        assert!(validate_post_text(&"ж".repeat(MAX_POST_CHARS)).is_ok());
        assert!(validate_post_text(&"a".repeat(MAX_POST_CHARS + 1)).is_err());
        assert_eq!(remaining_chars("héllo"), 495);
        assert_eq!(remaining_chars(&"a".repeat(510)), -10);
    }

    #[test]
    fn like_toggle_adds_then_removes() {
        let mut posts = vec![sample_post(1, vec![]), sample_post(2, vec![9])];

        toggle_like_locally(&mut posts, 1, 5);
        assert!(is_liked_by(&posts[0], Some(5)));

        toggle_like_locally(&mut posts, 1, 5);
        assert!(!is_liked_by(&posts[0], Some(5)));

        toggle_like_locally(&mut posts, 2, 9);
        assert!(posts[1].likes.is_empty());
        assert!(!is_liked_by(&posts[1], None));
    }

    #[test]
    fn like_toggle_ignores_unknown_post() {
        let mut posts = vec![sample_post(1, vec![3])];
        toggle_like_locally(&mut posts, 42, 3);
        assert_eq!(posts[0].likes, vec![3]);
    }

    #[test]
    fn following_toggle_is_a_set() {
        let mut following = vec![2];
        toggle_following_locally(&mut following, 3);
        assert_eq!(following, vec![2, 3]);
        toggle_following_locally(&mut following, 2);
        assert_eq!(following, vec![3]);
    }
}
