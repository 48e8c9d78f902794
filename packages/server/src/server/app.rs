//! Application setup and router configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, patch},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domains::auth::JwtService;
use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    create_adoption_handler, create_case_handler, delete_adoption_handler, delete_case_handler,
    get_case_handler, health_handler, list_adoptions_handler, list_cases_handler,
    nearby_cases_handler, update_case_handler, update_case_status_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router
///
/// Rate limiting needs the peer address and is layered on in `main`.
pub fn build_app(
    deps: ServerDeps,
    jwt_service: Arc<JwtService>,
    allowed_origins: &[String],
) -> Router {
    let app_state = AppState {
        deps,
        jwt_service: jwt_service.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/cases", get(list_cases_handler).post(create_case_handler))
        .route(
            "/cases/:id",
            get(get_case_handler)
                .put(update_case_handler)
                .delete(delete_case_handler),
        )
        .route("/cases/:id/status", patch(update_case_status_handler))
        .route(
            "/adoptions",
            get(list_adoptions_handler).post(create_adoption_handler),
        )
        .route(
            "/adoptions/:id",
            axum::routing::delete(delete_adoption_handler),
        )
        .route("/ngo/nearby-cases", get(nearby_cases_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Any origin when none are configured (development), otherwise the list.
fn allow_origin(allowed_origins: &[String]) -> AllowOrigin {
    if allowed_origins.is_empty() {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(origins)
}
