//! Client reviews of translators. Append-only.

use crate::db::Database;
use crate::directory::TRANSLATOR_NOT_FOUND;
use crate::error::AppError;
use crate::models::Role;
use crate::session::SessionUser;
use serde::Deserialize;
use tracing::info;

pub const INVALID_REVIEW_DATA: &str = "Invalid review data";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewInput {
    pub translator_id: Option<String>,
    pub rating: Option<String>,
    pub comment: Option<String>,
}

/// A review that passed input validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub translator_id: i64,
    pub rating: i64,
    pub comment: String,
}

impl ReviewInput {
    /// Translator id must be an integer and rating an integer in 1..=5.
    pub fn parse(&self) -> Result<NewReview, AppError> {
        let invalid = || AppError::validation(INVALID_REVIEW_DATA);

        let translator_id = self
            .translator_id
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .ok_or_else(invalid)?;
        let rating = self
            .rating
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(invalid)?;

        Ok(NewReview {
            translator_id,
            rating,
            comment: self.comment.clone().unwrap_or_default(),
        })
    }
}

/// A profile vanishing between the existence check and the insert shows up
/// as a foreign key violation.
fn missing_translator(err: sqlx::Error) -> AppError {
    match AppError::from(err) {
        AppError::NotFound(_) => AppError::not_found(TRANSLATOR_NOT_FOUND),
        other => other,
    }
}

/// Record a review by `author`, who must be a client.
pub async fn submit_review(
    db: &Database,
    author: &SessionUser,
    review: &NewReview,
) -> Result<i64, AppError> {
    if author.role != Role::Client {
        return Err(AppError::forbidden());
    }

    if !db.translator_exists(review.translator_id).await? {
        return Err(AppError::not_found(TRANSLATOR_NOT_FOUND));
    }

    let id = db
        .insert_review(
            review.translator_id,
            author.id,
            review.rating,
            &review.comment,
        )
        .await
        .map_err(missing_translator)?;

    info!(
        review_id = id,
        translator_id = review.translator_id,
        rating = review.rating,
        "Review submitted"
    );
    Ok(id)
}
