//! Registration, login and profile management.

use crate::db::{Database, NewUser};
use crate::error::AppError;
use crate::models::{
    parse_rate, parse_years, AuthoredReview, ClientProfile, ProfileUpdate, Role,
    TranslatorDetails, TranslatorProfile, User, DEFAULT_TRANSLATOR_LANGUAGES,
};
use crate::security::{hash_password, verify_password};
use crate::session::SessionUser;
use serde::Deserialize;
use tracing::{info, warn};

pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const INVALID_ROLE: &str = "Invalid role";
pub const EMAIL_TAKEN: &str = "Email already registered";
pub const LOGIN_FIELDS_REQUIRED: &str = "Email and password are required";

/// Registration form as submitted. Translator fields are ignored for clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub languages: Option<String>,
    pub bio: Option<String>,
    pub experience_years: Option<String>,
    pub hourly_rate: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile form as submitted; which fields matter depends on the role.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub languages: Option<String>,
    pub bio: Option<String>,
    pub experience_years: Option<String>,
    pub hourly_rate: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub preferred_languages: Option<String>,
    pub notes: Option<String>,
}

impl ProfileInput {
    /// Interpret the form for a user of `role`
    pub fn into_update(self, role: Role) -> ProfileUpdate {
        let name = self.name.unwrap_or_default();
        let email = self.email.unwrap_or_default();
        match role {
            Role::Translator => ProfileUpdate::Translator {
                name,
                email,
                details: TranslatorDetails {
                    languages: self.languages.unwrap_or_default(),
                    bio: self.bio.unwrap_or_default(),
                    experience_years: parse_years(self.experience_years.as_deref()),
                    hourly_rate: parse_rate(self.hourly_rate.as_deref()),
                },
            },
            Role::Client => ProfileUpdate::Client {
                name,
                email,
                profile: ClientProfile {
                    phone: self.phone.unwrap_or_default(),
                    company: self.company.unwrap_or_default(),
                    preferred_languages: self.preferred_languages.unwrap_or_default(),
                    notes: self.notes.unwrap_or_default(),
                },
            },
        }
    }
}

/// Everything the profile page shows, per role.
#[derive(Debug, Clone)]
pub enum ProfilePage {
    Translator {
        user: User,
        profile: TranslatorProfile,
    },
    Client {
        user: User,
        profile: ClientProfile,
        reviews: Vec<AuthoredReview>,
    },
}

impl ProfilePage {
    pub fn user(&self) -> &User {
        match self {
            ProfilePage::Translator { user, .. } | ProfilePage::Client { user, .. } => user,
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// The UNIQUE index on `users.email` is the final word on duplicates.
fn email_conflict(err: sqlx::Error) -> AppError {
    match AppError::from(err) {
        AppError::Conflict(_) => AppError::conflict(EMAIL_TAKEN),
        other => other,
    }
}

fn session_user(user: &User) -> SessionUser {
    SessionUser {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
    }
}

// ==================== Register / Login ====================

/// Create an account (and translator profile) and return the identity to
/// store in the session.
pub async fn register(
    db: &Database,
    hash_memory_kib: u32,
    input: &RegisterInput,
) -> Result<SessionUser, AppError> {
    let (Some(email), Some(password), Some(name), Some(role)) = (
        present(&input.email),
        present(&input.password),
        present(&input.name),
        present(&input.role),
    ) else {
        return Err(AppError::validation(ALL_FIELDS_REQUIRED));
    };

    let role: Role = role.parse().map_err(|_| AppError::validation(INVALID_ROLE))?;

    if db.email_in_use(email, None).await? {
        return Err(AppError::conflict(EMAIL_TAKEN));
    }

    let password_hash = hash_password(password, hash_memory_kib).await?;

    let details = match role {
        Role::Translator => Some(TranslatorDetails {
            languages: present(&input.languages)
                .unwrap_or(DEFAULT_TRANSLATOR_LANGUAGES)
                .to_string(),
            bio: input.bio.clone().unwrap_or_default(),
            experience_years: parse_years(input.experience_years.as_deref()),
            hourly_rate: parse_rate(input.hourly_rate.as_deref()),
        }),
        Role::Client => None,
    };

    let new_user = NewUser {
        email,
        password_hash: &password_hash,
        name,
        role,
    };
    let id = db
        .create_user(&new_user, details.as_ref())
        .await
        .map_err(email_conflict)?;

    info!(user_id = id, role = %role, "Registered new user");

    Ok(SessionUser {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role,
    })
}

/// Check credentials. Unknown email and wrong password fail identically,
/// and both pay for one Argon2 run at `hash_memory_kib`.
pub async fn login(
    db: &Database,
    hash_memory_kib: u32,
    input: &LoginInput,
) -> Result<SessionUser, AppError> {
    let (Some(email), Some(password)) = (present(&input.email), present(&input.password)) else {
        return Err(AppError::validation(LOGIN_FIELDS_REQUIRED));
    };

    let Some(user) = db.find_user_by_email(email).await? else {
        hash_password(password, hash_memory_kib).await?;
        warn!(email, "Login failed");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash).await? {
        warn!(email, "Login failed");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = user.id, "User logged in");
    Ok(session_user(&user))
}

// ==================== Profile ====================

/// Load the profile page for the logged-in user.
///
/// The user row is re-read so a stale session cannot act on a changed role.
pub async fn get_profile(db: &Database, current: &SessionUser) -> Result<ProfilePage, AppError> {
    let user = db
        .find_user_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if user.role != current.role {
        return Err(AppError::forbidden());
    }

    match user.role {
        Role::Translator => {
            let profile = db
                .translator_profile_for_user(user.id)
                .await?
                .ok_or_else(|| AppError::not_found("Translator profile not found"))?;
            Ok(ProfilePage::Translator { user, profile })
        }
        Role::Client => {
            let profile = db.ensure_client_profile(user.id).await?;
            let reviews = db.reviews_by_client(user.id).await?;
            Ok(ProfilePage::Client {
                user,
                profile,
                reviews,
            })
        }
    }
}

/// Apply a profile edit. Nothing is written unless every check passes.
pub async fn update_profile(
    db: &Database,
    current: &SessionUser,
    update: &ProfileUpdate,
) -> Result<(), AppError> {
    if update.role() != current.role {
        return Err(AppError::forbidden());
    }

    update.validate().map_err(AppError::validation)?;

    if db.email_in_use(update.email(), Some(current.id)).await? {
        return Err(AppError::conflict(EMAIL_TAKEN));
    }

    match update {
        ProfileUpdate::Translator {
            name,
            email,
            details,
        } => db
            .update_translator(current.id, name, email, details)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => AppError::not_found("Translator profile not found"),
                other => email_conflict(other),
            })?,
        ProfileUpdate::Client {
            name,
            email,
            profile,
        } => db
            .update_client(current.id, name, email, profile)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => AppError::not_found("User not found"),
                other => email_conflict(other),
            })?,
    }

    info!(user_id = current.id, role = %current.role, "Profile updated");
    Ok(())
}
