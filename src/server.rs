use std::sync::Arc;

use axum::{
    extract::Request,
    handler::HandlerWithoutStateExt,
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN},
        HeaderValue, Method, StatusCode, Uri,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::ApiError;
use crate::routes_itineraries;

pub const ALLOWED_METHODS: &str = "GET, POST, DELETE, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Build the full application: API routes, static files from the root,
/// CORS on every response.
pub fn app(config: Config) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    // Only GET/HEAD reach the file service; any other method on a
    // non-API path ends up in `not_found`.
    let static_files = ServeDir::new(state.config.root())
        .call_fallback_on_method_not_allowed(true)
        .fallback(not_found.into_service());

    // Routes carry their full path so a non-POST request reaches the file
    // service with its URI intact, the same as any other GET.
    Router::new()
        .route(
            "/api/save-itinerary",
            post(routes_itineraries::save_itinerary).fallback_service(static_files.clone()),
        )
        .route(
            "/api/delete-itinerary",
            post(routes_itineraries::delete_itinerary).fallback_service(static_files.clone()),
        )
        .fallback_service(static_files)
        .with_state(state)
        .layer(middleware::from_fn(preflight))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
}

// Answers every OPTIONS request, whatever the path.
async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return (
            StatusCode::OK,
            [
                (ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS),
                (ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
            ],
        )
            .into_response();
    }
    next.run(request).await
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Endpoint not found: {}", uri.path()))
}
