//! Internationalization (i18n) for the rendered UI.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported languages and their metadata
//! - `language`: Type-safe Language type validated against the registry
//! - `strings`: Compiled-in UI strings per language
//!
//! Per-request resolution (query > session > cookie > default) lives in
//! `middleware::locale`.

mod language;
mod registry;
mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::LanguageStrings;
