//! Cookie-backed sessions.
//!
//! The whole session lives in one encrypted cookie (`tf_session`). The
//! session layer decodes it into a [`Session`] handle stored in the request
//! extensions; handlers and inner middleware mutate the handle, and once the
//! response comes back the layer writes the cookie again only if something
//! changed (or removes it after [`Session::destroy`]).

use crate::config::Config;
use crate::error::AppError;
use crate::models::Role;
use crate::state::SessionKey;
use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::error;

pub const SESSION_COOKIE: &str = "tf_session";

/// The logged-in identity cached in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Everything persisted in the session cookie.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    data: SessionData,
    modified: bool,
    destroyed: bool,
}

/// What the session layer has to do with the cookie after the handler ran.
#[derive(Debug, PartialEq)]
pub enum SessionChange {
    Unchanged,
    Updated(SessionData),
    Destroyed,
}

/// Per-request handle on the session. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    pub fn new(data: SessionData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                data,
                ..SessionState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.lock().data.user.clone()
    }

    pub fn lang(&self) -> Option<String> {
        self.lock().data.lang.clone()
    }

    /// Mark the session as authenticated
    pub fn set_user(&self, user: SessionUser) {
        let mut state = self.lock();
        state.data.user = Some(user);
        state.modified = true;
        state.destroyed = false;
    }

    pub fn set_lang(&self, code: &str) {
        let mut state = self.lock();
        if state.data.lang.as_deref() != Some(code) {
            state.data.lang = Some(code.to_string());
            state.modified = true;
            state.destroyed = false;
        }
    }

    /// Refresh the cached name/email after a profile edit
    pub fn update_identity(&self, name: &str, email: &str) {
        let mut state = self.lock();
        if let Some(user) = state.data.user.as_mut() {
            user.name = name.to_string();
            user.email = email.to_string();
            state.modified = true;
        }
    }

    /// Drop all session state, including the chosen language.
    pub fn destroy(&self) {
        let mut state = self.lock();
        state.data = SessionData::default();
        state.modified = false;
        state.destroyed = true;
    }

    pub fn take_change(&self) -> SessionChange {
        let mut state = self.lock();
        if state.destroyed {
            state.destroyed = false;
            SessionChange::Destroyed
        } else if state.modified {
            state.modified = false;
            SessionChange::Updated(state.data.clone())
        } else {
            SessionChange::Unchanged
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::internal("session layer is not installed"))
    }
}

fn session_cookie(value: String, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.is_production())
        .build()
}

/// Middleware: load the session cookie, expose the handle, write it back.
///
/// An undecryptable or malformed cookie is treated as an empty session.
pub async fn session_layer(
    State(config): State<Arc<Config>>,
    jar: PrivateCookieJar<SessionKey>,
    mut request: Request,
    next: Next,
) -> Response {
    let data = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| serde_json::from_str::<SessionData>(cookie.value()).ok())
        .unwrap_or_default();

    let session = Session::new(data);
    request.extensions_mut().insert(session.clone());

    let response = next.run(request).await;

    match session.take_change() {
        SessionChange::Unchanged => response,
        SessionChange::Destroyed => {
            let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
            (jar, response).into_response()
        }
        SessionChange::Updated(data) => match serde_json::to_string(&data) {
            Ok(value) => {
                let jar = jar.add(session_cookie(value, &config));
                (jar, response).into_response()
            }
            Err(e) => {
                error!("Failed to encode session: {}", e);
                response
            }
        },
    }
}
