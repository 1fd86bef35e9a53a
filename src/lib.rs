//! # Translator Finder
//!
//! Server-rendered directory where clients find translators and rate them.
//! Translators and clients register, edit role-specific profiles, and clients
//! leave 1-5 star reviews that feed each translator's average rating.

pub mod accounts;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod guard;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod reviews;
pub mod routes;
pub mod security;
pub mod session;
pub mod state;
pub mod views;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with the full middleware stack.
///
/// Outermost first: tracing, security headers, session, CSRF token issue,
/// locale, error pages, then the routes. `/auth` adds rate limiting and
/// CSRF verification; `/reviews` adds CSRF verification.
pub fn app(state: AppState) -> Router {
    let production = state.config.is_production();
    let public_dir = state.config.public_dir.clone();

    let router = Router::new()
        .route("/", get(routes::home))
        .route("/health", get(routes::health))
        .nest("/auth", routes::auth::router(state.clone()))
        .nest("/translators", routes::translators::router())
        .nest("/reviews", routes::reviews::router(state.clone()))
        .nest_service("/public", ServeDir::new(public_dir))
        .fallback(routes::not_found)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::error_pages::render_errors,
        ))
        .layer(from_fn(middleware::locale::resolve_locale))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::csrf::issue_token,
        ))
        .layer(from_fn_with_state(state.clone(), session::session_layer));

    middleware::headers::apply(router, production)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
