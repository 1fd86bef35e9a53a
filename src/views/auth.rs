//! Register, login and profile pages.

use super::{csrf_input, escape, layout, notice_html, Notice, ViewContext};
use crate::accounts::{ProfilePage, RegisterInput};
use crate::i18n::LanguageStrings;
use crate::models::{AuthoredReview, ClientProfile, TranslatorProfile, User};
use std::fmt::Write;

fn text_field(label: &str, name: &str, kind: &str, value: &str, required: bool) -> String {
    format!(
        r#"<label>{label}<input type="{kind}" name="{name}" value="{value}"{req}></label>"#,
        label = escape(label),
        kind = kind,
        name = name,
        value = escape(value),
        req = if required { " required" } else { "" },
    )
}

fn text_area(label: &str, name: &str, value: &str) -> String {
    format!(
        r#"<label>{}<textarea name="{}">{}</textarea></label>"#,
        escape(label),
        name,
        escape(value)
    )
}

/// Registration form, optionally refilled after a failed attempt.
/// The password is never echoed back.
pub fn register(ctx: &ViewContext, input: Option<&RegisterInput>, notice: Option<Notice<'_>>) -> String {
    let s = ctx.strings();
    let input = input.cloned().unwrap_or_default();
    let value = |field: &Option<String>| field.clone().unwrap_or_default();
    let checked = |r: &str| {
        if input.role.as_deref() == Some(r) {
            " checked"
        } else {
            ""
        }
    };

    let body = format!(
        r#"<h1>{title}</h1>
{notice}
<form method="post" action="/auth/register" class="stacked">
{csrf}
{email}
{password}
{name}
<fieldset>
<legend>{role_label}</legend>
<label><input type="radio" name="role" value="client"{client_checked}> {client}</label>
<label><input type="radio" name="role" value="translator"{translator_checked}> {translator}</label>
</fieldset>
<fieldset>
<legend>{translator_section}</legend>
{languages}
{bio}
{experience}
{rate}
</fieldset>
<button type="submit">{submit}</button>
</form>
<p>{have_account} <a href="/auth/login">{login}</a></p>"#,
        title = escape(s.register_title),
        notice = notice_html(notice),
        csrf = csrf_input(ctx),
        email = text_field(s.field_email, "email", "email", &value(&input.email), true),
        password = text_field(s.field_password, "password", "password", "", true),
        name = text_field(s.field_name, "name", "text", &value(&input.name), true),
        role_label = escape(s.field_role),
        client_checked = checked("client"),
        client = escape(s.role_client),
        translator_checked = checked("translator"),
        translator = escape(s.role_translator),
        translator_section = escape(s.register_translator_section),
        languages = text_field(s.field_languages, "languages", "text", &value(&input.languages), false),
        bio = text_area(s.field_bio, "bio", &value(&input.bio)),
        experience = text_field(
            s.field_experience,
            "experience_years",
            "number",
            &value(&input.experience_years),
            false
        ),
        rate = text_field(s.field_hourly_rate, "hourly_rate", "number", &value(&input.hourly_rate), false),
        submit = escape(s.register_submit),
        have_account = escape(s.register_have_account),
        login = escape(s.nav_login),
    );

    layout(ctx, s.register_title, &body)
}

pub fn login(ctx: &ViewContext, email: Option<&str>, notice: Option<Notice<'_>>) -> String {
    let s = ctx.strings();
    let body = format!(
        r#"<h1>{title}</h1>
{notice}
<form method="post" action="/auth/login" class="stacked">
{csrf}
{email}
{password}
<button type="submit">{submit}</button>
</form>
<p>{no_account} <a href="/auth/register">{register}</a></p>"#,
        title = escape(s.login_title),
        notice = notice_html(notice),
        csrf = csrf_input(ctx),
        email = text_field(s.field_email, "email", "email", email.unwrap_or(""), true),
        password = text_field(s.field_password, "password", "password", "", true),
        submit = escape(s.login_submit),
        no_account = escape(s.login_no_account),
        register = escape(s.nav_register),
    );

    layout(ctx, s.login_title, &body)
}

fn translator_fields(s: &LanguageStrings, profile: &TranslatorProfile) -> String {
    [
        text_field(s.field_languages, "languages", "text", &profile.languages, true),
        text_area(s.field_bio, "bio", &profile.bio),
        text_field(
            s.field_experience,
            "experience_years",
            "number",
            &profile.experience_years.to_string(),
            false,
        ),
        text_field(
            s.field_hourly_rate,
            "hourly_rate",
            "number",
            &profile.hourly_rate.to_string(),
            false,
        ),
    ]
    .join("\n")
}

fn client_fields(s: &LanguageStrings, profile: &ClientProfile) -> String {
    [
        text_field(s.field_phone, "phone", "tel", &profile.phone, false),
        text_field(s.field_company, "company", "text", &profile.company, false),
        text_field(
            s.field_preferred_languages,
            "preferred_languages",
            "text",
            &profile.preferred_languages,
            false,
        ),
        text_area(s.field_notes, "notes", &profile.notes),
    ]
    .join("\n")
}

fn authored_reviews(s: &LanguageStrings, reviews: &[AuthoredReview]) -> String {
    let mut html = format!("<h2>{}</h2>\n", escape(s.profile_my_reviews));
    if reviews.is_empty() {
        let _ = write!(html, "<p>{}</p>", escape(s.profile_no_reviews));
        return html;
    }

    html.push_str(r#"<ul class="reviews">"#);
    for review in reviews {
        let _ = write!(
            html,
            r#"<li><a href="/translators/{}">{}</a> <span class="rating">{}/5</span> <time>{}</time><p>{}</p></li>"#,
            review.translator_id,
            escape(&review.translator_name),
            review.rating,
            review.created_at.format("%Y-%m-%d"),
            escape(&review.comment)
        );
    }
    html.push_str("</ul>");
    html
}

fn identity_fields(s: &LanguageStrings, user: &User) -> String {
    format!(
        "{}\n{}",
        text_field(s.field_name, "name", "text", &user.name, true),
        text_field(s.field_email, "email", "email", &user.email, true)
    )
}

/// Role-specific profile editor. Clients also see the reviews they wrote.
pub fn profile(ctx: &ViewContext, page: &ProfilePage, notice: Option<Notice<'_>>) -> String {
    let s = ctx.strings();
    let user = page.user();

    let (role_fields, extra) = match page {
        ProfilePage::Translator { profile, .. } => (translator_fields(s, profile), String::new()),
        ProfilePage::Client {
            profile, reviews, ..
        } => (client_fields(s, profile), authored_reviews(s, reviews)),
    };

    let body = format!(
        r#"<h1>{title}</h1>
{notice}
<form method="post" action="/auth/profile" class="stacked">
{csrf}
{identity}
{role_fields}
<button type="submit">{save}</button>
</form>
{extra}"#,
        title = escape(s.profile_title),
        notice = notice_html(notice),
        csrf = csrf_input(ctx),
        identity = identity_fields(s, user),
        role_fields = role_fields,
        save = escape(s.profile_save),
        extra = extra,
    );

    layout(ctx, s.profile_title, &body)
}
