use anyhow::{bail, Context, Result};
use std::time::Duration;

const DEV_SESSION_SECRET: &str = "translator-finder-dev-session-secret";
const DEV_CSRF_SECRET: &str = "translator-finder-dev-csrf-secret";

/// Deployment environment, taken from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => bail!("Invalid APP_ENV: {}. Expected development, production or test", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub public_dir: String,
    pub environment: Environment,

    // Database
    pub database_path: String,

    // Secrets for cookie signing/encryption
    pub session_secret: String,
    pub csrf_secret: String,

    // Password hashing (Argon2id memory cost in KiB)
    pub password_hash_memory_kib: u32,

    // Rate limiting on /auth
    pub auth_rate_limit_max: u32,
    pub auth_rate_limit_window: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let environment = match std::env::var("APP_ENV") {
            Ok(value) => Environment::parse(&value)?,
            Err(_) => Environment::Development,
        };

        let session_secret = std::env::var("SESSION_SECRET").ok().filter(|s| !s.is_empty());
        let csrf_secret = std::env::var("CSRF_SECRET").ok().filter(|s| !s.is_empty());

        // Dev defaults are never acceptable for a public deployment.
        if environment == Environment::Production
            && (session_secret.is_none() || csrf_secret.is_none())
        {
            bail!("SESSION_SECRET and CSRF_SECRET environment variables must be set in production.");
        }

        let password_hash_memory_kib = match std::env::var("PASSWORD_HASH_MEMORY_KIB") {
            Ok(value) => value
                .parse::<u32>()
                .context("PASSWORD_HASH_MEMORY_KIB must be an integer")?,
            Err(_) => argon2::Params::DEFAULT_M_COST,
        };
        if password_hash_memory_kib < argon2::Params::MIN_M_COST {
            bail!(
                "PASSWORD_HASH_MEMORY_KIB must be at least {}, got {}",
                argon2::Params::MIN_M_COST,
                password_hash_memory_kib
            );
        }

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            public_dir: std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string()),
            environment,

            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "translator_finder.db".to_string()),

            session_secret: session_secret.unwrap_or_else(|| DEV_SESSION_SECRET.to_string()),
            csrf_secret: csrf_secret.unwrap_or_else(|| DEV_CSRF_SECRET.to_string()),

            password_hash_memory_kib,

            auth_rate_limit_max: std::env::var("AUTH_RATE_LIMIT_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            auth_rate_limit_window: Duration::from_secs(
                std::env::var("AUTH_RATE_LIMIT_WINDOW_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(15 * 60),
            ),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
