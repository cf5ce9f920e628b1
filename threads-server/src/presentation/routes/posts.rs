use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};

use crate::presentation::AppState;
use crate::presentation::handlers::posts::{
    create_post, delete_post, feed, get_post, reply_to_post, toggle_like, user_posts,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/{id}", get(get_post))
        .route("/user/{username}", get(user_posts));

    let protected = Router::new()
        .route("/create", post(create_post))
        .route("/feed", get(feed))
        .route("/{id}", delete(delete_post))
        .route("/{id}/like", post(toggle_like))
        .route("/{id}/reply", post(reply_to_post))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
