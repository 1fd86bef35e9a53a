//! Per-request UI language.
//!
//! Resolution order: `?lang=` query parameter, then the session, then the
//! `lang` cookie, then the canonical language. A supported query value is
//! remembered in both the session and the cookie; an unsupported one falls
//! straight back to the canonical language.

use crate::i18n::Language;
use crate::session::Session;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

pub const LANG_COOKIE: &str = "lang";
pub const LANG_PARAM: &str = "lang";

/// Where the resolved language came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    Query,
    Session,
    Cookie,
    Default,
}

fn query_lang(query: Option<&str>) -> Option<String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query?)
        .ok()?
        .into_iter()
        .find(|(name, _)| name == LANG_PARAM)
        .map(|(_, value)| value)
}

/// Pick the language for a request from its three possible sources.
pub fn resolve(
    query: Option<&str>,
    session: Option<&str>,
    cookie: Option<&str>,
) -> (Language, LocaleSource) {
    if let Some(requested) = query {
        return match Language::from_code(requested) {
            Ok(lang) => (lang, LocaleSource::Query),
            Err(_) => (Language::canonical(), LocaleSource::Default),
        };
    }

    if let Some(lang) = session.and_then(|code| Language::from_code(code).ok()) {
        return (lang, LocaleSource::Session);
    }

    if let Some(lang) = cookie.and_then(|code| Language::from_code(code).ok()) {
        return (lang, LocaleSource::Cookie);
    }

    (Language::canonical(), LocaleSource::Default)
}

fn lang_cookie(lang: Language) -> Cookie<'static> {
    Cookie::build((LANG_COOKIE, lang.code()))
        .path("/")
        .max_age(time::Duration::days(365))
        .build()
}

/// Middleware: resolve the language and put it in the request extensions.
pub async fn resolve_locale(jar: CookieJar, mut request: Request, next: Next) -> Response {
    let session = request.extensions().get::<Session>().cloned();
    let requested = query_lang(request.uri().query());
    let session_lang = session.as_ref().and_then(Session::lang);
    let cookie_lang = jar.get(LANG_COOKIE).map(|cookie| cookie.value().to_string());

    let (lang, source) = resolve(
        requested.as_deref(),
        session_lang.as_deref(),
        cookie_lang.as_deref(),
    );
    request.extensions_mut().insert(lang);

    if source != LocaleSource::Query {
        return next.run(request).await;
    }

    if let Some(session) = &session {
        session.set_lang(lang.code());
    }
    let response = next.run(request).await;
    (jar.add(lang_cookie(lang)), response).into_response()
}
