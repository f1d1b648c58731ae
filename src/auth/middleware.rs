use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenService;
use crate::error::AppError;

/// Paths under the protected scope that are reachable without a token.
const PUBLIC_PATHS: &[&str] = &["/api/auth/login", "/api/auth/register"];

/// Requires a valid bearer token on every request it wraps, except [`PUBLIC_PATHS`].
///
/// On success the decoded `Claims` are stored in the request extensions for the
/// `AuthenticatedUser` and `Administrator` extractors.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path();
        if PUBLIC_PATHS.iter().any(|public| path.starts_with(public)) {
            return Box::pin(self.service.call(req));
        }

        let Some(tokens) = req.app_data::<web::Data<TokenService>>().cloned() else {
            let app_err = AppError::InternalServerError("TokenService is not registered".into());
            return Box::pin(async move { Err(app_err.into()) });
        };

        let bearer = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let claims = match bearer {
            Some(token) => tokens.verify_token(token.trim()),
            None => Err(AppError::Unauthorized("Missing token".into())),
        };

        match claims {
            Ok(claims) => {
                log::debug!("Authenticated {} for {} {}", claims.email, req.method(), path);
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(app_err) => {
                log::warn!("Rejected {} {}: {}", req.method(), path, app_err);
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
