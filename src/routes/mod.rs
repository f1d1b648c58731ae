pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod images;

use actix_web::{error, web, HttpRequest};

use crate::error::AppError;

/// Registers everything under `/api`. The caller wraps the scope in `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login),
    )
    .service(
        web::scope("/authors")
            .service(authors::get_authors)
            .service(authors::get_author_page)
            .service(authors::get_author)
            .service(authors::create_author)
            .service(authors::update_author)
            .service(authors::delete_author),
    )
    .service(
        web::scope("/books")
            .service(books::get_books)
            .service(books::get_book_page)
            .service(books::get_book)
            .service(books::create_book)
            .service(books::update_book)
            .service(books::delete_book),
    );
}

/// Extractor settings that turn unreadable bodies and query strings into
/// `400` responses with the usual `{"error": ...}` body.
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error));
}

fn json_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected JSON body for {} {}: {}", req.method(), req.path(), err);
    AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected query for {} {}: {}", req.method(), req.path(), err);
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}
