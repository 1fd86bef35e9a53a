//! Extractors that gate handlers on login state and role.

use crate::error::AppError;
use crate::models::Role;
use crate::session::{Session, SessionUser};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Any logged-in user. Anonymous requests are sent to the login form.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        session.user().map(Self).ok_or(AppError::LoginRequired)
    }
}

/// A logged-in client. Everyone else gets "Access denied".
#[derive(Debug, Clone)]
pub struct ClientUser(pub SessionUser);

#[async_trait]
impl<S> FromRequestParts<S> for ClientUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        match session.user() {
            Some(user) if user.role == Role::Client => Ok(Self(user)),
            _ => Err(AppError::forbidden()),
        }
    }
}
