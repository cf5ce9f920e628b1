use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::health::HealthDto;
use crate::presentation::handlers::lenses::LensEmbedsDto;
use crate::presentation::handlers::posts::{
    CreatePostDto, CreateReplyDto, MessageDto, PostDto, ReplyDto,
};
use crate::presentation::handlers::users::{
    AuthResponseDto, LoginDto, ProfileDto, SignupDto, UpdateProfileDto, UserDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::posts::toggle_like,
        crate::presentation::handlers::posts::reply_to_post,
        crate::presentation::handlers::posts::feed,
        crate::presentation::handlers::posts::user_posts,
        crate::presentation::handlers::users::signup,
        crate::presentation::handlers::users::login,
        crate::presentation::handlers::users::get_profile,
        crate::presentation::handlers::users::update_profile,
        crate::presentation::handlers::users::toggle_follow,
        crate::presentation::handlers::lenses::get_lenses,
        crate::presentation::handlers::health::healthz
    ),
    components(
        schemas(
            CreatePostDto,
            CreateReplyDto,
            PostDto,
            ReplyDto,
            MessageDto,
            SignupDto,
            LoginDto,
            UpdateProfileDto,
            AuthResponseDto,
            UserDto,
            ProfileDto,
            LensEmbedsDto,
            HealthDto
        )
    ),
    tags(
        (name = "posts", description = "Posts, likes, replies and feeds"),
        (name = "users", description = "Accounts, profiles and follows"),
        (name = "lenses", description = "AR lens embeds"),
        (name = "health", description = "Liveness check")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/posts/create",
            "/api/posts/{id}",
            "/api/posts/{id}/like",
            "/api/posts/{id}/reply",
            "/api/posts/feed",
            "/api/posts/user/{username}",
            "/api/users/signup",
            "/api/users/login",
            "/api/users/profile/{username}",
            "/api/users/update",
            "/api/users/follow/{id}",
            "/api/getar",
            "/healthz",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
