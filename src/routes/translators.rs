//! `/translators`: public directory.

use crate::directory::{self, parse_translator_id};
use crate::error::AppError;
use crate::state::AppState;
use crate::views::{self, ViewContext};
use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/:id", get(detail))
}

async fn list(State(state): State<AppState>, ctx: ViewContext) -> Result<Html<String>, AppError> {
    let translators = directory::list_translators(&state.db).await?;
    Ok(Html(views::translators::list(&ctx, &translators)))
}

async fn detail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ctx: ViewContext,
) -> Result<Html<String>, AppError> {
    let id = parse_translator_id(&raw_id)?;
    let page = directory::translator_detail(&state.db, id).await?;
    Ok(Html(views::translators::detail(&ctx, &page)))
}
