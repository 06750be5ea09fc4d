//! REST API module using Axum
//!
//! Provides HTTP endpoints for the irrigation advisor:
//! - Server-rendered dashboard at `/`
//! - JSON API under `/api/v1` with a consistent envelope
//! - Static assets served via `rust-embed` (compiled into the binary)

pub mod dashboard;
pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::AdvisorState;

use axum::extract::Path;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use rust_embed::Embed;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Dashboard assets compiled from `static/`.
#[derive(Embed)]
#[folder = "static/"]
struct DashboardAssets;

/// GET /static/*path - Serve an embedded asset
async fn serve_asset(Path(path): Path<String>) -> Response {
    match DashboardAssets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "asset not found").into_response(),
    }
}

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// `server.cors_origins` lists extra origins for development.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    if origins.is_empty() {
        return base;
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.trim().parse().ok())
        .collect();
    tracing::info!(origins = ?origins, "CORS: allowing configured origins");
    base.allow_origin(allowed)
}

/// Create the complete application router.
pub fn create_app(state: AdvisorState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors_origins);

    Router::new()
        .nest("/api/v1", routes::api_routes(state.clone()))
        .merge(routes::root_routes(state))
        .route("/static/*path", get(serve_asset))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
