//! `/auth`: register, login, logout and profile.

use super::found;
use crate::accounts::{self, LoginInput, ProfileInput, RegisterInput};
use crate::error::AppError;
use crate::guard::AuthenticatedUser;
use crate::middleware::csrf::verify_token;
use crate::middleware::rate_limit::rate_limit;
use crate::session::Session;
use crate::state::AppState;
use crate::views::{self, Notice, ViewContext};
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use axum_extra::extract::WithRejection;

/// Every route here is rate limited; unsafe methods also need a CSRF token.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .route("/profile", get(profile).post(update_profile))
        .layer(from_fn_with_state(state.clone(), verify_token))
        .layer(from_fn_with_state(state, rate_limit))
}

async fn register_form(ctx: ViewContext) -> Html<String> {
    Html(views::auth::register(&ctx, None, None))
}

async fn register(
    State(state): State<AppState>,
    session: Session,
    ctx: ViewContext,
    WithRejection(Form(input), _): WithRejection<Form<RegisterInput>, AppError>,
) -> Result<Response, AppError> {
    match accounts::register(&state.db, state.config.password_hash_memory_kib, &input).await {
        Ok(user) => {
            session.set_user(user);
            Ok(found("/"))
        }
        Err(err) if err.is_user_error() => {
            let message = err.to_string();
            let html = views::auth::register(&ctx, Some(&input), Some(Notice::Error(&message)));
            Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
        }
        Err(err) => Err(err),
    }
}

async fn login_form(ctx: ViewContext) -> Html<String> {
    Html(views::auth::login(&ctx, None, None))
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    ctx: ViewContext,
    WithRejection(Form(input), _): WithRejection<Form<LoginInput>, AppError>,
) -> Result<Response, AppError> {
    match accounts::login(&state.db, state.config.password_hash_memory_kib, &input).await {
        Ok(user) => {
            session.set_user(user);
            Ok(found("/"))
        }
        Err(err) if err.is_user_error() => {
            let message = err.to_string();
            let html = views::auth::login(
                &ctx,
                input.email.as_deref(),
                Some(Notice::Error(&message)),
            );
            Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
        }
        Err(err) => Err(err),
    }
}

async fn logout(session: Session) -> Response {
    session.destroy();
    found("/")
}

async fn profile(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ctx: ViewContext,
) -> Result<Html<String>, AppError> {
    let page = accounts::get_profile(&state.db, &user).await?;
    Ok(Html(views::auth::profile(&ctx, &page, None)))
}

async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    session: Session,
    mut ctx: ViewContext,
    WithRejection(Form(input), _): WithRejection<Form<ProfileInput>, AppError>,
) -> Result<Response, AppError> {
    let update = input.into_update(user.role);

    match accounts::update_profile(&state.db, &user, &update).await {
        Ok(()) => {
            session.update_identity(update.name(), update.email());
            ctx.user = session.user();

            let page = accounts::get_profile(&state.db, &user).await?;
            let message = ctx.strings().profile_updated;
            let html = views::auth::profile(&ctx, &page, Some(Notice::Success(message)));
            Ok(Html(html).into_response())
        }
        Err(err) if err.is_user_error() => {
            let page = accounts::get_profile(&state.db, &user).await?;
            let message = err.to_string();
            let html = views::auth::profile(&ctx, &page, Some(Notice::Error(&message)));
            Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
        }
        Err(err) => Err(err),
    }
}
