//! Shared application state handed to every handler and middleware.

use crate::config::Config;
use crate::db::Database;
use crate::middleware::rate_limit::RateLimiter;
use crate::security::derive_cookie_key;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

/// Key for the encrypted session cookie.
#[derive(Clone)]
pub struct SessionKey(Key);

/// Key for the signed CSRF cookie.
#[derive(Clone)]
pub struct CsrfKey(Key);

impl From<SessionKey> for Key {
    fn from(key: SessionKey) -> Self {
        key.0
    }
}

impl From<CsrfKey> for Key {
    fn from(key: CsrfKey) -> Self {
        key.0
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub session_key: SessionKey,
    pub csrf_key: CsrfKey,
    pub auth_limiter: RateLimiter,
}

impl AppState {
    /// Derive cookie keys and build the auth rate limiter from `config`
    pub fn new(config: Config, db: Database) -> Self {
        let session_key = SessionKey(derive_cookie_key(&config.session_secret));
        let csrf_key = CsrfKey(derive_cookie_key(&config.csrf_secret));
        let auth_limiter =
            RateLimiter::new(config.auth_rate_limit_max, config.auth_rate_limit_window);

        Self {
            config: Arc::new(config),
            db,
            session_key,
            csrf_key,
            auth_limiter,
        }
    }
}

impl FromRef<AppState> for SessionKey {
    fn from_ref(state: &AppState) -> Self {
        state.session_key.clone()
    }
}

impl FromRef<AppState> for CsrfKey {
    fn from_ref(state: &AppState) -> Self {
        state.csrf_key.clone()
    }
}

impl FromRef<AppState> for RateLimiter {
    fn from_ref(state: &AppState) -> Self {
        state.auth_limiter.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
