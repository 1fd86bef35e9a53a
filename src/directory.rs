//! Public translator directory and detail pages.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{ReviewWithAuthor, TranslatorListing};

pub const INVALID_TRANSLATOR_ID: &str = "Invalid translator ID";
pub const TRANSLATOR_NOT_FOUND: &str = "Translator not found";

/// A translator with its reviews, newest first.
#[derive(Debug, Clone)]
pub struct TranslatorPage {
    pub translator: TranslatorListing,
    pub reviews: Vec<ReviewWithAuthor>,
}

/// Parse a path segment as a translator id; only positive integers pass.
pub fn parse_translator_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::validation(INVALID_TRANSLATOR_ID))
}

pub async fn list_translators(db: &Database) -> Result<Vec<TranslatorListing>, AppError> {
    Ok(db.list_translators().await?)
}

pub async fn translator_detail(db: &Database, id: i64) -> Result<TranslatorPage, AppError> {
    let translator = db
        .get_translator(id)
        .await?
        .ok_or_else(|| AppError::not_found(TRANSLATOR_NOT_FOUND))?;
    let reviews = db.reviews_for_translator(id).await?;

    Ok(TranslatorPage {
        translator,
        reviews,
    })
}
