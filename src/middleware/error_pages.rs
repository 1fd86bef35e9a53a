//! Turns [`ErrorReport`]s into rendered, localized error pages.

use crate::config::Config;
use crate::error::ErrorReport;
use crate::session::Session;
use crate::views::{self, ViewContext};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Text shown for a report; server error details stay hidden outside development.
pub fn display_message<'a>(report: &'a ErrorReport, config: &Config) -> &'a str {
    if report.internal && !config.is_development() {
        GENERIC_ERROR_MESSAGE
    } else {
        &report.message
    }
}

pub async fn render_errors(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    let mut ctx = ViewContext::from_extensions(request.extensions(), request.uri().path());
    let session = request.extensions().get::<Session>().cloned();

    let response = next.run(request).await;

    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    // The handler may have changed who is logged in.
    if let Some(session) = session {
        ctx.user = session.user();
    }

    let html = views::error_page(&ctx, report.status, display_message(&report, &config));

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    parts.headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    Response::from_parts(parts, Body::from(html))
}
