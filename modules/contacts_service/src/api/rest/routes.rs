//! Route registration for the REST API

use super::{docs, handlers, state::AppState};
use crate::config::ServerConfig;
use axum::{
    http::HeaderValue,
    routing::{get, patch, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the complete HTTP router: `/api`, docs and health probe
pub fn build_router(state: Arc<AppState>, server: &ServerConfig) -> Router {
    let auth = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/confirmed_email/{token}", get(handlers::confirmed_email))
        .route("/request_email", post(handlers::request_email))
        .route("/reset_password", post(handlers::reset_password))
        .route(
            "/confirm_reset_password/{token}",
            get(handlers::confirm_reset_password),
        );

    let users = Router::new()
        .route("/me", get(handlers::me))
        .route("/avatar", patch(handlers::update_avatar));

    let api = Router::new()
        .nest("/auth", auth)
        .nest("/users", users)
        .route(
            "/contacts",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        .route(
            "/contacts/",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        .route("/contacts/birthdays", get(handlers::upcoming_birthdays))
        .route(
            "/contacts/{contact_id}",
            get(handlers::get_contact)
                .put(handlers::update_contact)
                .delete(handlers::remove_contact),
        );

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health))
        .route("/docs", get(docs::swagger_ui))
        .route("/openapi.json", get(docs::openapi_json))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}
