use axum::{Router, routing::get};

use super::AppState;
use super::handlers::health::healthz;
use super::handlers::lenses::get_lenses;

pub(crate) mod posts;
pub(crate) mod users;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/getar", get(get_lenses))
        .nest("/api/posts", posts::router(state.clone()))
        .nest("/api/users", users::router(state.clone()))
        .with_state(state)
}
