use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};

use crate::presentation::AppState;
use crate::presentation::handlers::users::{
    get_profile, login, signup, toggle_follow, update_profile,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/profile/{username}", get(get_profile));

    let protected = Router::new()
        .route("/update", put(update_profile))
        .route("/follow/{id}", post(toggle_follow))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    public.merge(protected)
}
