//! # Middleware Stack
//!
//! Applied in `app()` from the outside in:
//! - [`headers`]: security response headers.
//! - `session::session_layer`: cookie-backed session handle.
//! - [`csrf`]: double-submit token issue (everywhere) and verify (`/auth`, `/reviews`).
//! - [`locale`]: per-request UI language.
//! - [`error_pages`]: renders error reports as localized pages.
//! - [`rate_limit`]: fixed-window limiter on `/auth`.

pub mod csrf;
pub mod error_pages;
pub mod headers;
pub mod locale;
pub mod rate_limit;
