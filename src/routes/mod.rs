//! HTTP handlers, grouped by area.

pub mod auth;
pub mod reviews;
pub mod translators;

use crate::error::AppError;
use crate::views::{self, ViewContext};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// 302 redirect. `axum::response::Redirect::to` answers 303.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

pub async fn home(ctx: ViewContext) -> Html<String> {
    Html(views::home(&ctx))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found() -> AppError {
    AppError::not_found("Page not found")
}
