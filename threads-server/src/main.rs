use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::post_service::PostService;
use application::user_service::UserService;
use data::repositories::cloudinary::CloudinaryAssetStore;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let assets = CloudinaryAssetStore::new(&settings.asset_store)?;
    let jwt = JwtService::new(&settings.jwt_secret, settings.jwt_ttl_seconds);

    let users = PostgresUserRepository::new(pool.clone());
    let posts = PostgresPostRepository::new(pool);

    let state = AppState::new(
        Arc::new(PostService::new(posts, users.clone(), assets.clone())),
        Arc::new(UserService::new(users, assets, jwt.clone())),
        Arc::new(jwt),
    );

    info!("threads server starting");
    server::run_http(&settings, state).await
}
