use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::timeout::error::Elapsed;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::settings::Settings;
use crate::presentation::middleware::cors::apply_cors;
use crate::presentation::middleware::trace::apply_trace;
use crate::presentation::openapi::ApiDoc;
use crate::presentation::{AppState, routes};

pub(crate) async fn run_http(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let app = apply_limits(app, settings);
    let app = apply_trace(app);
    let app = apply_cors(app, &settings.cors_origins)?;

    let listener = TcpListener::bind(&settings.http_addr).await?;

    info!("HTTP server listening on {}", settings.http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub(crate) fn build_router(state: AppState) -> Router {
    routes::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Body size is capped by `RequestBodyLimitLayer` alone; images arrive inline
/// as data URIs. The concurrency semaphore is shared by every route.
fn apply_limits(router: Router, settings: &Settings) -> Router {
    router.layer(DefaultBodyLimit::disable()).layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(GlobalConcurrencyLimitLayer::new(
                settings.http_concurrency_limit,
            ))
            .timeout(Duration::from_secs(settings.http_request_timeout_secs))
            .layer(RequestBodyLimitLayer::new(
                settings.http_request_body_limit_bytes,
            )),
    )
}

async fn handle_middleware_error(err: tower::BoxError) -> (StatusCode, String) {
    if err.is::<Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("unhandled internal error: {err}"),
        )
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
