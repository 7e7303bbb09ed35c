// src/routes.rs

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers};

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        // --- Públicas ---
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        // --- Exigem requisitante (token ou ?user_id=) ---
        .route("/me", get(handlers::auth::get_me))
        .route(
            "/complaints",
            get(handlers::complaints::list_complaints).post(handlers::complaints::create_complaint),
        )
        .route("/complaints/{id}", put(handlers::complaints::update_complaint))
        .route("/users", get(handlers::users::list_users))
        .route("/users/{id}", delete(handlers::users::delete_user))
        .route("/users/{id}/role", put(handlers::users::change_role))
        .route("/blocks", get(handlers::blocks::list_blocks));

    Router::new()
        .nest("/api", api_routes)
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(app_state)
}

/// CORS para o front-end: uma origem específica ou qualquer origem.
pub fn cors_layer(allowed_origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT_LANGUAGE]);

    Ok(match allowed_origin {
        Some(origin) => layer.allow_origin(origin.parse::<HeaderValue>()?),
        None => layer.allow_origin(Any),
    })
}
