//! `/reviews`: review submission (clients only, CSRF protected).

use super::found;
use crate::error::AppError;
use crate::guard::ClientUser;
use crate::middleware::csrf::verify_token;
use crate::reviews::{self, ReviewInput};
use crate::state::AppState;
use axum::extract::State;
use axum::middleware::from_fn_with_state;
use axum::response::Response;
use axum::routing::post;
use axum::{Form, Router};
use axum_extra::extract::WithRejection;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(submit))
        .layer(from_fn_with_state(state, verify_token))
}

async fn submit(
    State(state): State<AppState>,
    ClientUser(client): ClientUser,
    WithRejection(Form(input), _): WithRejection<Form<ReviewInput>, AppError>,
) -> Result<Response, AppError> {
    let review = input.parse()?;
    reviews::submit_review(&state.db, &client, &review).await?;
    Ok(found(&format!("/translators/{}", review.translator_id)))
}
