use crate::models::{
    AuthoredReview, ClientProfile, RatingSummary, ReviewWithAuthor, Role, TranslatorDetails,
    TranslatorListing, TranslatorProfile, User,
};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL,
        name TEXT NOT NULL,
        role TEXT NOT NULL CHECK(role IN ('translator', 'client')),
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )",
    "CREATE TABLE IF NOT EXISTS translator_profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER UNIQUE NOT NULL,
        languages TEXT NOT NULL,
        bio TEXT NOT NULL DEFAULT '',
        experience_years INTEGER NOT NULL DEFAULT 0 CHECK(experience_years >= 0),
        hourly_rate REAL NOT NULL DEFAULT 0 CHECK(hourly_rate >= 0),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )",
    "CREATE TABLE IF NOT EXISTS reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        translator_id INTEGER NOT NULL,
        client_id INTEGER NOT NULL,
        rating INTEGER NOT NULL CHECK(rating >= 1 AND rating <= 5),
        comment TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY (translator_id) REFERENCES translator_profiles(id),
        FOREIGN KEY (client_id) REFERENCES users(id)
    )",
    "CREATE TABLE IF NOT EXISTS client_profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER UNIQUE NOT NULL,
        phone TEXT NOT NULL DEFAULT '',
        company TEXT NOT NULL DEFAULT '',
        preferred_languages TEXT NOT NULL DEFAULT '',
        notes TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )",
];

const LISTING_COLUMNS: &str = "
    SELECT tp.id, u.name, u.email, tp.languages, tp.bio, tp.experience_years, tp.hourly_rate,
           COUNT(r.id) AS review_count, COALESCE(SUM(r.rating), 0) AS rating_sum
    FROM translator_profiles tp
    JOIN users u ON tp.user_id = u.id
    LEFT JOIN reviews r ON r.translator_id = tp.id";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password: String,
    name: String,
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;
        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password,
            name: row.name,
            role,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: i64,
    name: String,
    email: String,
    languages: String,
    bio: String,
    experience_years: i64,
    hourly_rate: f64,
    review_count: i64,
    rating_sum: i64,
}

impl From<ListingRow> for TranslatorListing {
    fn from(row: ListingRow) -> Self {
        TranslatorListing {
            id: row.id,
            name: row.name,
            email: row.email,
            languages: row.languages,
            bio: row.bio,
            experience_years: row.experience_years,
            hourly_rate: row.hourly_rate,
            rating: RatingSummary::new(row.review_count, row.rating_sum),
        }
    }
}

/// Fields needed to create an account. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub role: Role,
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists
    pub async fn new(database_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context(format!("Failed to open database at {}", database_path))?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .context("Failed to create schema")?;
        }

        info!("Database ready at {}", database_path);
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ==================== Users ====================

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password, name, role FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password, name, role FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Whether `email` belongs to an account other than `exclude_id`
    pub async fn email_in_use(
        &self,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND id != ?")
                .bind(email)
                .bind(exclude_id.unwrap_or(0))
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Insert a user, plus its translator profile when `translator` is given.
    /// Both rows land in one transaction. Returns the new user id.
    pub async fn create_user(
        &self,
        user: &NewUser<'_>,
        translator: Option<&TranslatorDetails>,
    ) -> Result<i64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let user_id = sqlx::query(
            "INSERT INTO users (email, password, name, role) VALUES (?, ?, ?, ?)",
        )
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.name)
        .bind(user.role.as_str())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        if let Some(details) = translator {
            sqlx::query(
                "INSERT INTO translator_profiles (user_id, languages, bio, experience_years, hourly_rate)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(user_id)
            .bind(&details.languages)
            .bind(&details.bio)
            .bind(details.experience_years)
            .bind(details.hourly_rate)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(user_id)
    }

    // ==================== Translator Profiles ====================

    /// All translators, newest first, with rating aggregates
    pub async fn list_translators(&self) -> Result<Vec<TranslatorListing>, sqlx::Error> {
        let sql = format!(
            "{} GROUP BY tp.id ORDER BY tp.created_at DESC, tp.id DESC",
            LISTING_COLUMNS
        );
        let rows = sqlx::query_as::<_, ListingRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(TranslatorListing::from).collect())
    }

    pub async fn get_translator(&self, id: i64) -> Result<Option<TranslatorListing>, sqlx::Error> {
        let sql = format!("{} WHERE tp.id = ? GROUP BY tp.id", LISTING_COLUMNS);
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TranslatorListing::from))
    }

    pub async fn translator_exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM translator_profiles WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn translator_profile_for_user(
        &self,
        user_id: i64,
    ) -> Result<Option<TranslatorProfile>, sqlx::Error> {
        let row: Option<(i64, i64, String, String, i64, f64)> = sqlx::query_as(
            "SELECT id, user_id, languages, bio, experience_years, hourly_rate
             FROM translator_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(id, user_id, languages, bio, experience_years, hourly_rate)| TranslatorProfile {
                id,
                user_id,
                languages,
                bio,
                experience_years,
                hourly_rate,
            },
        ))
    }

    /// Update a translator's identity and profile in one transaction.
    ///
    /// Fails with `RowNotFound` (and writes nothing) when the user has no
    /// translator profile.
    pub async fn update_translator(
        &self,
        user_id: i64,
        name: &str,
        email: &str,
        details: &TranslatorDetails,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
            .bind(name)
            .bind(email)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let updated = sqlx::query(
            "UPDATE translator_profiles
             SET languages = ?, bio = ?, experience_years = ?, hourly_rate = ?
             WHERE user_id = ?",
        )
        .bind(&details.languages)
        .bind(&details.bio)
        .bind(details.experience_years)
        .bind(details.hourly_rate)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Err(sqlx::Error::RowNotFound);
        }

        tx.commit().await
    }

    // ==================== Client Profiles ====================

    /// Fetch a client's profile, creating an empty one on first access
    pub async fn ensure_client_profile(&self, user_id: i64) -> Result<ClientProfile, sqlx::Error> {
        sqlx::query("INSERT INTO client_profiles (user_id) VALUES (?) ON CONFLICT(user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let (phone, company, preferred_languages, notes): (String, String, String, String) =
            sqlx::query_as(
                "SELECT phone, company, preferred_languages, notes
                 FROM client_profiles WHERE user_id = ?",
            )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(ClientProfile {
            phone,
            company,
            preferred_languages,
            notes,
        })
    }

    /// Update a client's identity and upsert its profile in one transaction
    pub async fn update_client(
        &self,
        user_id: i64,
        name: &str,
        email: &str,
        profile: &ClientProfile,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
            .bind(name)
            .bind(email)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Err(sqlx::Error::RowNotFound);
        }

        sqlx::query(
            "INSERT INTO client_profiles (user_id, phone, company, preferred_languages, notes)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                phone = excluded.phone,
                company = excluded.company,
                preferred_languages = excluded.preferred_languages,
                notes = excluded.notes",
        )
        .bind(user_id)
        .bind(&profile.phone)
        .bind(&profile.company)
        .bind(&profile.preferred_languages)
        .bind(&profile.notes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    // ==================== Reviews ====================

    pub async fn insert_review(
        &self,
        translator_id: i64,
        client_id: i64,
        rating: i64,
        comment: &str,
    ) -> Result<i64, sqlx::Error> {
        let id = sqlx::query(
            "INSERT INTO reviews (translator_id, client_id, rating, comment) VALUES (?, ?, ?, ?)",
        )
        .bind(translator_id)
        .bind(client_id)
        .bind(rating)
        .bind(comment)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    /// Reviews of one translator, newest first
    pub async fn reviews_for_translator(
        &self,
        translator_id: i64,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        let rows: Vec<(i64, String, NaiveDateTime, String)> = sqlx::query_as(
            "SELECT r.rating, r.comment, r.created_at, u.name
             FROM reviews r
             JOIN users u ON r.client_id = u.id
             WHERE r.translator_id = ?
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(translator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(rating, comment, created_at, client_name)| ReviewWithAuthor {
                rating,
                comment,
                created_at,
                client_name,
            })
            .collect())
    }

    /// Reviews written by one client, newest first
    pub async fn reviews_by_client(
        &self,
        client_id: i64,
    ) -> Result<Vec<AuthoredReview>, sqlx::Error> {
        let rows: Vec<(i64, String, i64, String, NaiveDateTime)> = sqlx::query_as(
            "SELECT tp.id, u.name, r.rating, r.comment, r.created_at
             FROM reviews r
             JOIN translator_profiles tp ON r.translator_id = tp.id
             JOIN users u ON tp.user_id = u.id
             WHERE r.client_id = ?
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(translator_id, translator_name, rating, comment, created_at)| AuthoredReview {
                    translator_id,
                    translator_name,
                    rating,
                    comment,
                    created_at,
                },
            )
            .collect())
    }
}
