use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_JWT_ISSUER: &str = "bookstore-api";
pub const DEFAULT_JWT_AUDIENCE: &str = "bookstore-client";
pub const DEFAULT_JWT_DURATION_MINUTES: i64 = 60;
pub const DEFAULT_COVER_IMAGE_DIR: &str = "./bookcoverimages";
pub const DEFAULT_BCRYPT_COST: u32 = 12;
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;
/// One minute up to one year.
const JWT_DURATION_RANGE: std::ops::RangeInclusive<i64> = 1..=525_600;

/// Which repository implementation backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Volatile store, lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(AppError::Configuration(format!(
                "STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

/// Settings used to sign and validate access tokens.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt: JwtSettings,
    pub bcrypt_cost: u32,
    pub cover_image_dir: PathBuf,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
    /// Seeded administrator account (email, password).
    pub admin_account: Option<(String, String)>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Postgres,
        };

        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(AppError::Configuration(
                "DATABASE_URL must be set when STORAGE_BACKEND is 'postgres'".into(),
            ));
        }

        let secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::Configuration("JWT_SECRET must be set".into()))?;
        if secret.trim().is_empty() {
            return Err(AppError::Configuration("JWT_SECRET must not be empty".into()));
        }

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty() && origin != "*")
                    .collect()
            })
            .unwrap_or_default();

        let bcrypt_cost = parse_var("BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(AppError::Configuration(format!(
                "BCRYPT_COST must be between {} and {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end()
            )));
        }

        let jwt_duration_minutes = parse_var("JWT_DURATION_MINUTES", DEFAULT_JWT_DURATION_MINUTES)?;
        if !JWT_DURATION_RANGE.contains(&jwt_duration_minutes) {
            return Err(AppError::Configuration(format!(
                "JWT_DURATION_MINUTES must be between {} and {}",
                JWT_DURATION_RANGE.start(),
                JWT_DURATION_RANGE.end()
            )));
        }

        let admin_account = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some((email, password)),
            _ => None,
        };

        Ok(Self {
            storage_backend,
            database_url,
            database_max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
            server_port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            jwt: JwtSettings {
                secret,
                issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_JWT_ISSUER.to_string()),
                audience: env::var("JWT_AUDIENCE")
                    .unwrap_or_else(|_| DEFAULT_JWT_AUDIENCE.to_string()),
                duration_minutes: jwt_duration_minutes,
            },
            bcrypt_cost,
            cover_image_dir: env::var("COVER_IMAGE_DIR")
                .unwrap_or_else(|_| DEFAULT_COVER_IMAGE_DIR.to_string())
                .into(),
            cors_allowed_origins,
            admin_account,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| {
            AppError::Configuration(format!("{} has an invalid value '{}'", name, value))
        }),
        Err(_) => Ok(default),
    }
}
