use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::require_auth;
use crate::middleware::role::{require_admin, require_staff};
use crate::modules::auth::init_auth_router;
use crate::modules::clearance_records::{
    init_clearance_records_router, init_session_records_router,
};
use crate::modules::clearance_requests::init_clearance_requests_router;
use crate::modules::notifications::init_notifications_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    // route_layer wraps outward: the role gate runs after require_auth
    let staff_routes = Router::new()
        .merge(init_clearance_requests_router())
        .merge(init_clearance_records_router())
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let admin_routes = init_session_records_router()
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let notification_routes = init_notifications_router()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/notifications", notification_routes)
                .merge(staff_routes)
                .merge(admin_routes),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
