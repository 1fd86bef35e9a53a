//! Double-submit CSRF protection.
//!
//! A random token lives in the signed `_csrf` cookie. Every rendered form
//! carries the same token in a hidden `_csrf` field; state-changing requests
//! on protected routers must echo it back.

use crate::config::Config;
use crate::error::AppError;
use crate::security::{constant_time_compare, generate_csrf_token};
use crate::state::CsrfKey;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use std::sync::Arc;
use tracing::warn;

pub const CSRF_COOKIE: &str = "_csrf";
pub const CSRF_FIELD: &str = "_csrf";
pub const INVALID_CSRF_TOKEN: &str = "Invalid CSRF token";

/// Form bodies on this site are small; anything larger is refused outright.
const MAX_FORM_BYTES: usize = 64 * 1024;

/// The token for the current request, rendered into forms by the views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsrfToken(pub String);

fn csrf_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.is_production())
        .build()
}

/// Middleware: make sure the client has a token cookie and expose the token.
pub async fn issue_token(
    State(config): State<Arc<Config>>,
    jar: SignedCookieJar<CsrfKey>,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = jar
        .get(CSRF_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty());

    let (token, fresh) = match existing {
        Some(token) => (token, false),
        None => (generate_csrf_token(), true),
    };
    request.extensions_mut().insert(CsrfToken(token.clone()));

    let response = next.run(request).await;

    if fresh {
        (jar.add(csrf_cookie(token, &config)), response).into_response()
    } else {
        response
    }
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Pull the `_csrf` field out of a urlencoded body.
fn submitted_token(body: &[u8]) -> Option<String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .ok()?
        .into_iter()
        .find(|(name, _)| name == CSRF_FIELD)
        .map(|(_, value)| value)
}

/// Middleware: reject unsafe requests whose form token does not match the cookie.
///
/// The body is buffered to read the field and handed on unchanged.
pub async fn verify_token(jar: SignedCookieJar<CsrfKey>, request: Request, next: Next) -> Response {
    if is_safe(request.method()) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_FORM_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return AppError::validation("Request body too large").into_response(),
    };

    let expected = jar.get(CSRF_COOKIE).map(|cookie| cookie.value().to_string());
    let valid = match (submitted_token(&bytes), expected) {
        (Some(submitted), Some(expected)) if !expected.is_empty() => {
            constant_time_compare(&submitted, &expected)
        }
        _ => false,
    };

    if !valid {
        warn!(path = %parts.uri.path(), "Rejected request with invalid CSRF token");
        return AppError::Forbidden(INVALID_CSRF_TOKEN.to_string()).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
