pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod receipts;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    http::{header, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use receiptr_core::middleware::request_id::{request_id_middleware, REQUEST_ID_HEADER};
use receiptr_core::middleware::security_headers::security_headers_middleware;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ReceiptrConfig;
use crate::services::{Database, EmailProvider, JwtService};

#[derive(Clone)]
pub struct AppState {
    pub config: ReceiptrConfig,
    pub db: Database,
    pub jwt: JwtService,
    pub email: Arc<dyn EmailProvider>,
}

pub fn build_router(state: AppState) -> Router {
    // Account-scoped routes sit behind the Bearer-token middleware.
    let protected = Router::new()
        .route(
            "/receipts",
            post(handlers::receipts::create_receipt).get(handlers::receipts::list_receipts),
        )
        .route(
            "/users/me",
            get(handlers::users::get_me).patch(handlers::users::update_me),
        )
        .route("/users/me/template", put(handlers::users::update_template))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    // Public surface: registration, login, the anonymous trial calculator,
    // and shared receipts (viewing and emailing them needs no account).
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::health::metrics_endpoint))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/receipts/trial", post(handlers::receipts::trial_receipt))
        .route(
            "/receipts/:receipt_number",
            get(handlers::receipts::get_shared_receipt),
        )
        .route(
            "/receipts/:receipt_number/email",
            post(handlers::receipts::email_receipt),
        );

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        )
}
