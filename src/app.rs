//! Wiring shared by the binary and the integration tests.
//!
//! Middleware that has to sit on the `App` itself (CORS, access logging) is added by
//! the caller; everything else is registered by [`AppState::configure`].

use actix_cors::Cors;
use actix_web::{http::header, web};

use crate::auth::{AuthMiddleware, PasswordHasher, TokenService};
use crate::config::Config;
use crate::repository::Repositories;
use crate::routes::{self, health, images};
use crate::storage::CoverImageStore;

/// Application data handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub repositories: web::Data<Repositories>,
    pub tokens: web::Data<TokenService>,
    pub hasher: web::Data<PasswordHasher>,
    pub images: web::Data<CoverImageStore>,
}

impl AppState {
    pub fn new(repositories: Repositories, config: &Config) -> Self {
        Self {
            repositories: web::Data::new(repositories),
            tokens: web::Data::new(TokenService::new(config.jwt.clone())),
            hasher: web::Data::new(PasswordHasher::new(config.bcrypt_cost)),
            images: web::Data::new(CoverImageStore::new(config.cover_image_dir.clone())),
        }
    }

    /// Registers the app data, the public routes and the token-protected `/api` scope.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.repositories.clone())
            .app_data(self.tokens.clone())
            .app_data(self.hasher.clone())
            .app_data(self.images.clone());
        routes::extractor_config(cfg);
        cfg.service(health::health)
            .service(images::get_cover)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            );
    }
}

/// CORS policy: any origin when `allowed_origins` is empty, otherwise only those listed.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allow_any_method()
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::LOCATION])
        .max_age(3600)
}
