use crate::config::JwtSettings;
use crate::error::AppError;
use crate::models::{Role, User};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the account email.
    pub sub: String,
    /// Unique token id.
    pub jti: String,
    pub email: String,
    /// Account id.
    pub uid: i32,
    pub role: Role,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Signs and verifies access tokens with a shared HMAC secret.
///
/// Registered once as `web::Data` and looked up by `AuthMiddleware`.
pub struct TokenService {
    settings: JwtSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(settings: JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            settings,
        }
    }

    /// Issues a token for `user` valid for the configured duration.
    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let expiration = chrono::Duration::try_minutes(self.settings.duration_minutes)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AppError::InternalServerError("Token expiry overflows".into()))?;

        let claims = Claims {
            sub: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            email: user.email.clone(),
            uid: user.id,
            role: user.role,
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature, expiry, issuer and audience and returns the decoded claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(AppError::from)
    }
}
