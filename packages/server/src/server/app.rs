//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    create_member_handler, delete_family_handler, delete_member_handler, get_member_handler,
    health_handler, link_spouses_handler, list_family_handler, list_members_handler,
    update_member_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
pub fn build_app(deps: Arc<ServerDeps>) -> Router {
    let state = AppState { deps };

    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    let api = Router::new()
        .route(
            "/members",
            get(list_members_handler).post(create_member_handler),
        )
        .route(
            "/members/family/:family_id",
            get(list_family_handler).delete(delete_family_handler),
        )
        .route(
            "/members/:member_id",
            get(get_member_handler)
                .put(update_member_handler)
                .delete(delete_member_handler),
        )
        .route(
            "/members/:member_id/spouse/:spouse_id",
            post(link_spouses_handler),
        );

    Router::new()
        .nest("/api", api)
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
