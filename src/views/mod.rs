//! Server-rendered HTML pages.
//!
//! Every page is a plain function from a [`ViewContext`] plus page data to
//! an HTML string. All user-controlled text goes through [`escape`].

pub mod auth;
pub mod translators;

use crate::i18n::{Language, LanguageRegistry, LanguageStrings};
use crate::middleware::csrf::{CsrfToken, CSRF_FIELD};
use crate::models::Role;
use crate::session::{Session, SessionUser};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Extensions, StatusCode};
use std::convert::Infallible;
use std::fmt::Write;

/// Request-scoped data every page needs: who is logged in, the UI
/// language, the CSRF token for forms and the current path.
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub user: Option<SessionUser>,
    pub lang: Language,
    pub csrf_token: String,
    pub path: String,
}

impl ViewContext {
    pub fn from_extensions(extensions: &Extensions, path: &str) -> Self {
        Self {
            user: extensions.get::<Session>().and_then(Session::user),
            lang: extensions.get::<Language>().copied().unwrap_or_default(),
            csrf_token: extensions
                .get::<CsrfToken>()
                .map(|token| token.0.clone())
                .unwrap_or_default(),
            path: path.to_string(),
        }
    }

    pub fn strings(&self) -> &'static LanguageStrings {
        self.lang.strings()
    }

    pub fn is_client(&self) -> bool {
        matches!(&self.user, Some(user) if user.role == Role::Client)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ViewContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_extensions(&parts.extensions, parts.uri.path()))
    }
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inline status line shown above a form.
#[derive(Debug, Clone, Copy)]
pub enum Notice<'a> {
    Error(&'a str),
    Success(&'a str),
}

pub(crate) fn notice_html(notice: Option<Notice<'_>>) -> String {
    match notice {
        Some(Notice::Error(msg)) => format!(r#"<p class="notice error">{}</p>"#, escape(msg)),
        Some(Notice::Success(msg)) => format!(r#"<p class="notice success">{}</p>"#, escape(msg)),
        None => String::new(),
    }
}

pub(crate) fn csrf_input(ctx: &ViewContext) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        CSRF_FIELD,
        escape(&ctx.csrf_token)
    )
}

fn nav(ctx: &ViewContext) -> String {
    let s = ctx.strings();
    let mut html = format!(
        r#"<a href="/">{}</a> <a href="/translators">{}</a>"#,
        escape(s.nav_home),
        escape(s.nav_translators)
    );

    match &ctx.user {
        Some(user) => {
            let greeting =
                LanguageStrings::format(s.signed_in_as, &[("name", user.name.as_str())]);
            let _ = write!(
                html,
                r#" <a href="/auth/profile">{}</a> <a href="/auth/logout">{}</a> <span class="whoami">{}</span>"#,
                escape(s.nav_profile),
                escape(s.nav_logout),
                escape(&greeting)
            );
        }
        None => {
            let _ = write!(
                html,
                r#" <a href="/auth/login">{}</a> <a href="/auth/register">{}</a>"#,
                escape(s.nav_login),
                escape(s.nav_register)
            );
        }
    }
    html
}

fn language_switcher(ctx: &ViewContext) -> String {
    let links: Vec<String> = LanguageRegistry::get()
        .list_enabled()
        .into_iter()
        .map(|config| {
            let class = if config.code == ctx.lang.code() {
                r#" class="active""#
            } else {
                ""
            };
            format!(
                r#"<a href="{}?lang={}"{}>{}</a>"#,
                escape(&ctx.path),
                config.code,
                class,
                escape(config.native_name)
            )
        })
        .collect();

    format!(
        r#"<div class="languages">{}: {}</div>"#,
        escape(ctx.strings().language_label),
        links.join(" | ")
    )
}

/// Wrap page content in the shared document shell
pub fn layout(ctx: &ViewContext, title: &str, body: &str) -> String {
    let s = ctx.strings();
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - {app}</title>
<link rel="stylesheet" href="/public/styles.css">
</head>
<body>
<header>
<a class="brand" href="/">{app}</a>
<nav>{nav}</nav>
{switcher}
</header>
<main>
{body}
</main>
</body>
</html>
"#,
        lang = ctx.lang.code(),
        title = escape(title),
        app = escape(s.app_name),
        nav = nav(ctx),
        switcher = language_switcher(ctx),
        body = body,
    )
}

pub fn home(ctx: &ViewContext) -> String {
    let s = ctx.strings();
    let mut body = format!(
        r#"<section class="hero">
<h1>{}</h1>
<p>{}</p>
<a class="button" href="/translators">{}</a>"#,
        escape(s.app_name),
        escape(s.home_tagline),
        escape(s.home_browse)
    );
    if ctx.user.is_none() {
        let _ = write!(
            body,
            r#" <a class="button secondary" href="/auth/register">{}</a>"#,
            escape(s.home_join)
        );
    }
    body.push_str("\n</section>");

    layout(ctx, s.nav_home, &body)
}

pub fn error_page(ctx: &ViewContext, status: StatusCode, message: &str) -> String {
    let s = ctx.strings();
    let body = format!(
        r#"<section class="error">
<h1>{} {}</h1>
<p>{}</p>
<a href="/">{}</a>
</section>"#,
        escape(s.error_title),
        status.as_u16(),
        escape(message),
        escape(s.back_home)
    );
    layout(ctx, s.error_title, &body)
}
