//! Domain records shared by the persistence layer, the flows and the views.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default language pair for translators that register without listing any.
pub const DEFAULT_TRANSLATOR_LANGUAGES: &str = "Vietnamese, Czech";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Translator,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Translator => "translator",
            Role::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translator" => Ok(Role::Translator),
            "client" => Ok(Role::Client),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslatorProfile {
    pub id: i64,
    pub user_id: i64,
    pub languages: String,
    pub bio: String,
    pub experience_years: i64,
    pub hourly_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientProfile {
    pub phone: String,
    pub company: String,
    pub preferred_languages: String,
    pub notes: String,
}

/// Translator fields accepted at registration and on profile edit.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatorDetails {
    pub languages: String,
    pub bio: String,
    pub experience_years: i64,
    pub hourly_rate: f64,
}

impl Default for TranslatorDetails {
    fn default() -> Self {
        Self {
            languages: DEFAULT_TRANSLATOR_LANGUAGES.to_string(),
            bio: String::new(),
            experience_years: 0,
            hourly_rate: 0.0,
        }
    }
}

/// A translator as shown in the directory: profile, owner identity and ratings.
#[derive(Debug, Clone)]
pub struct TranslatorListing {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub languages: String,
    pub bio: String,
    pub experience_years: i64,
    pub hourly_rate: f64,
    pub rating: RatingSummary,
}

/// A review on a translator's page, with the author's display name.
#[derive(Debug, Clone)]
pub struct ReviewWithAuthor {
    pub rating: i64,
    pub comment: String,
    pub created_at: NaiveDateTime,
    pub client_name: String,
}

/// A review listed on its author's profile page.
#[derive(Debug, Clone)]
pub struct AuthoredReview {
    pub translator_id: i64,
    pub translator_name: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

/// Review count and rating sum for one translator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingSummary {
    pub review_count: i64,
    pub rating_sum: i64,
}

/// Displayed average rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AverageRating {
    NoReviews,
    Rated(String),
}

impl RatingSummary {
    pub fn new(review_count: i64, rating_sum: i64) -> Self {
        Self {
            review_count,
            rating_sum,
        }
    }

    /// Mean rating rounded half-up to one decimal place.
    ///
    /// Works on tenths in integer arithmetic so `4.25` becomes `4.3`
    /// rather than whatever the nearest binary float rounds to.
    pub fn average(&self) -> AverageRating {
        if self.review_count <= 0 {
            return AverageRating::NoReviews;
        }
        let tenths = (self.rating_sum * 20 + self.review_count) / (2 * self.review_count);
        AverageRating::Rated(format!("{}.{}", tenths / 10, tenths % 10))
    }
}

/// Profile edit submitted by the logged-in user, tagged by role.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileUpdate {
    Translator {
        name: String,
        email: String,
        details: TranslatorDetails,
    },
    Client {
        name: String,
        email: String,
        profile: ClientProfile,
    },
}

impl ProfileUpdate {
    pub fn name(&self) -> &str {
        match self {
            ProfileUpdate::Translator { name, .. } | ProfileUpdate::Client { name, .. } => name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            ProfileUpdate::Translator { email, .. } | ProfileUpdate::Client { email, .. } => email,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            ProfileUpdate::Translator { .. } => Role::Translator,
            ProfileUpdate::Client { .. } => Role::Client,
        }
    }

    /// Role-specific required-field check.
    pub fn validate(&self) -> Result<(), &'static str> {
        let base_ok = !self.name().trim().is_empty() && !self.email().trim().is_empty();
        let ok = match self {
            ProfileUpdate::Translator { details, .. } => {
                base_ok && !details.languages.trim().is_empty()
            }
            ProfileUpdate::Client { .. } => base_ok,
        };
        if ok {
            Ok(())
        } else {
            match self {
                ProfileUpdate::Translator { .. } => Err("Name, email and languages are required"),
                ProfileUpdate::Client { .. } => Err("Name and email are required"),
            }
        }
    }
}

/// Lenient non-negative integer parse; blanks, junk and negatives become 0.
pub fn parse_years(input: Option<&str>) -> i64 {
    input
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 0)
        .unwrap_or(0)
}

/// Lenient non-negative rate parse; blanks, junk, NaN and negatives become 0.
pub fn parse_rate(input: Option<&str>) -> f64 {
    input
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}
