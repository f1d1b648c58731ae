use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;
use crate::models::Role;

/// The caller identified by `AuthMiddleware`.
///
/// Extraction fails with `401 Unauthorized` when no claims are present in the
/// request extensions, which means the route is not wrapped by the middleware.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }

    fn from_http_request(req: &HttpRequest) -> Result<Self, AppError> {
        req.extensions()
            .get::<Claims>()
            .map(|claims| AuthenticatedUser {
                id: claims.uid,
                email: claims.email.clone(),
                role: claims.role,
            })
            .ok_or_else(|| {
                AppError::Unauthorized(
                    "User not found in request. Ensure AuthMiddleware is active.".to_string(),
                )
            })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req).map_err(ActixError::from))
    }
}

/// An authenticated caller holding the `Administrator` role.
///
/// Fails with `401` when unauthenticated and `403 Forbidden` for any other role.
#[derive(Debug, Clone, PartialEq)]
pub struct Administrator(pub AuthenticatedUser);

impl FromRequest for Administrator {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = AuthenticatedUser::from_http_request(req).and_then(|user| {
            if user.is_administrator() {
                Ok(Administrator(user))
            } else {
                log::warn!(
                    "{} attempted {} {} without Administrator role",
                    user.email,
                    req.method(),
                    req.path()
                );
                Err(AppError::Forbidden("Administrator role required".into()))
            }
        });
        ready(result.map_err(ActixError::from))
    }
}
