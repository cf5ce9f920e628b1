use std::sync::Arc;

use crate::application::post_service::PostService;
use crate::application::user_service::UserService;
use crate::data::repositories::cloudinary::CloudinaryAssetStore;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

pub(crate) type AppPostService =
    PostService<PostgresPostRepository, PostgresUserRepository, CloudinaryAssetStore>;
pub(crate) type AppUserService = UserService<PostgresUserRepository, CloudinaryAssetStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) post_service: Arc<AppPostService>,
    pub(crate) user_service: Arc<AppUserService>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(
        post_service: Arc<AppPostService>,
        user_service: Arc<AppUserService>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            post_service,
            user_service,
            jwt,
        }
    }
}
