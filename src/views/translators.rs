//! Directory listing and translator detail pages.

use super::{csrf_input, escape, layout, ViewContext};
use crate::directory::TranslatorPage;
use crate::i18n::LanguageStrings;
use crate::models::{AverageRating, RatingSummary, ReviewWithAuthor, TranslatorListing};
use std::fmt::Write;

fn rating_badge(s: &LanguageStrings, rating: &RatingSummary) -> String {
    match rating.average() {
        AverageRating::NoReviews => format!(r#"<span class="rating none">{}</span>"#, escape(s.no_reviews)),
        AverageRating::Rated(avg) => {
            let count = s.reviews_counted(rating.review_count);
            format!(
                r#"<span class="rating" title="{}">&#9733; {}</span> <span class="count">({})</span>"#,
                escape(s.average_rating),
                avg,
                escape(&count)
            )
        }
    }
}

fn facts(s: &LanguageStrings, listing: &TranslatorListing) -> String {
    let years = LanguageStrings::format(
        s.years_experience,
        &[("years", listing.experience_years.to_string().as_str())],
    );
    let rate = LanguageStrings::format(
        s.hourly_rate,
        &[("rate", listing.hourly_rate.to_string().as_str())],
    );
    format!(
        r#"<p class="languages">{}</p>
<p class="facts">{} &middot; {}</p>"#,
        escape(&listing.languages),
        escape(&years),
        escape(&rate)
    )
}

pub fn list(ctx: &ViewContext, translators: &[TranslatorListing]) -> String {
    let s = ctx.strings();
    let mut body = format!("<h1>{}</h1>\n", escape(s.translators_title));

    if translators.is_empty() {
        let _ = write!(body, r#"<p class="empty">{}</p>"#, escape(s.translators_empty));
        return layout(ctx, s.translators_title, &body);
    }

    body.push_str(r#"<div class="cards">"#);
    for translator in translators {
        let _ = write!(
            body,
            r#"
<article class="card">
<h2><a href="/translators/{id}">{name}</a></h2>
{facts}
<p>{rating}</p>
<a href="/translators/{id}">{view}</a>
</article>"#,
            id = translator.id,
            name = escape(&translator.name),
            facts = facts(s, translator),
            rating = rating_badge(s, &translator.rating),
            view = escape(s.view_profile),
        );
    }
    body.push_str("\n</div>");

    layout(ctx, s.translators_title, &body)
}

fn review_list(s: &LanguageStrings, reviews: &[ReviewWithAuthor]) -> String {
    if reviews.is_empty() {
        return format!("<p>{}</p>", escape(s.reviews_empty));
    }

    let mut html = String::from(r#"<ul class="reviews">"#);
    for review in reviews {
        let _ = write!(
            html,
            r#"<li><strong>{}</strong> <span class="rating">{}/5</span> <time>{}</time><p>{}</p></li>"#,
            escape(&review.client_name),
            review.rating,
            review.created_at.format("%Y-%m-%d"),
            escape(&review.comment)
        );
    }
    html.push_str("</ul>");
    html
}

fn review_form(ctx: &ViewContext, translator_id: i64) -> String {
    let s = ctx.strings();
    let options: String = (1..=5)
        .rev()
        .map(|n| format!(r#"<option value="{n}">{n}</option>"#))
        .collect();

    format!(
        r#"<h2>{title}</h2>
<form method="post" action="/reviews" class="stacked">
{csrf}
<input type="hidden" name="translator_id" value="{id}">
<label>{rating}<select name="rating" required>{options}</select></label>
<label>{comment}<textarea name="comment"></textarea></label>
<button type="submit">{submit}</button>
</form>"#,
        title = escape(s.review_leave),
        csrf = csrf_input(ctx),
        id = translator_id,
        rating = escape(s.field_rating),
        options = options,
        comment = escape(s.field_comment),
        submit = escape(s.review_submit),
    )
}

/// Translator detail. Logged-in clients get the review form.
pub fn detail(ctx: &ViewContext, page: &TranslatorPage) -> String {
    let s = ctx.strings();
    let t = &page.translator;

    let form = if ctx.is_client() {
        review_form(ctx, t.id)
    } else if ctx.user.is_none() {
        format!(
            r#"<p><a href="/auth/login">{}</a></p>"#,
            escape(s.review_login_hint)
        )
    } else {
        String::new()
    };

    let body = format!(
        r#"<p><a href="/translators">&larr; {back}</a></p>
<article class="translator">
<h1>{name}</h1>
<p class="contact"><a href="mailto:{email}">{email}</a></p>
{facts}
<p>{rating}</p>
<div class="bio">{bio}</div>
</article>
<section>
<h2>{reviews_title}</h2>
{reviews}
</section>
{form}"#,
        back = escape(s.back_to_list),
        name = escape(&t.name),
        email = escape(&t.email),
        facts = facts(s, t),
        rating = rating_badge(s, &t.rating),
        bio = escape(&t.bio),
        reviews_title = escape(s.reviews_title),
        reviews = review_list(s, &page.reviews),
        form = form,
    );

    layout(ctx, &t.name, &body)
}
