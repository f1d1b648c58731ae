pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::{Administrator, AuthenticatedUser};
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password, PasswordHasher};
pub use token::{Claims, TokenService};

lazy_static! {
    // Letters (any script), spaces, apostrophes, hyphens and dots.
    static ref PERSON_NAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[\p{L}][\p{L} .'-]*$").unwrap();
}

/// Represents the payload for a login request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new account registration.
///
/// Accounts created this way are always `User`s. Administrators come from the
/// `ADMIN_EMAIL`/`ADMIN_PASSWORD` seed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email, length(max = 256))]
    pub email: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[validate(
        length(min = 1, max = 50),
        regex(path = "PERSON_NAME_REGEX", message = "First name contains invalid characters")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, max = 50),
        regex(path = "PERSON_NAME_REGEX", message = "Last name contains invalid characters")
    )]
    pub last_name: String,
}

/// Response returned after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: i32,
    /// The bearer token to send in the `Authorization` header.
    pub token: String,
    pub email: String,
}
