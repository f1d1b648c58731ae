use crate::{
    auth::{Administrator, AuthenticatedUser},
    error::AppError,
    models::{
        AuthorCreateDto, AuthorDetailsDto, AuthorReadOnlyDto, AuthorUpdateDto, BookReadOnlyDto,
        QueryParameters,
    },
    repository::Repositories,
};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Lists all authors.
///
/// ## Responses:
/// - `200 OK`: JSON array of `AuthorReadOnlyDto`, ordered by id.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_authors(
    repos: web::Data<Repositories>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    log::info!("{} requested all authors", user.email);
    let authors = repos.authors.get_all().await?;
    let authors: Vec<AuthorReadOnlyDto> = authors.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(authors))
}

/// Lists one page of authors.
///
/// ## Query Parameters:
/// - `startIndex` (optional, default 0): offset of the first author.
/// - `pageSize` (optional, default 50, at most 100).
///
/// ## Responses:
/// - `200 OK`: `VirtualizeResponse` with `items` and `totalSize`.
/// - `400 Bad Request`: out-of-range paging values.
#[get("/page")]
pub async fn get_author_page(
    repos: web::Data<Repositories>,
    query: web::Query<QueryParameters>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let params = query.into_inner();
    params.validate()?;
    log::info!(
        "{} requested authors from {} (page size {})",
        user.email,
        params.start_index,
        params.page_size
    );
    let page = repos.authors.get_page(params).await?;
    Ok(HttpResponse::Ok().json(page.map(AuthorReadOnlyDto::from)))
}

/// Retrieves one author together with their books.
///
/// ## Responses:
/// - `200 OK`: `AuthorDetailsDto`.
/// - `404 Not Found`: no author with this id.
#[get("/{id}")]
pub async fn get_author(
    repos: web::Data<Repositories>,
    author_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = author_id.into_inner();
    log::info!("{} requested author {}", user.email, id);

    let Some(author) = repos.authors.get(id).await? else {
        log::warn!("Author {} not found", id);
        return Err(AppError::NotFound("Author not found".into()));
    };
    let books = repos.books.get_by_author(id).await?;
    let books: Vec<BookReadOnlyDto> = books.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(AuthorDetailsDto::new(author, books)))
}

/// Creates an author. Administrators only.
///
/// ## Responses:
/// - `201 Created`: the new `AuthorReadOnlyDto`, with a `Location` header.
/// - `400 Bad Request`: validation failure.
/// - `403 Forbidden`: caller is not an Administrator.
#[post("")]
pub async fn create_author(
    repos: web::Data<Repositories>,
    author_data: web::Json<AuthorCreateDto>,
    admin: Administrator,
) -> Result<impl Responder, AppError> {
    author_data.validate()?;

    let author = repos.authors.add(author_data.into_inner().into()).await?;
    log::info!("{} created author {}", admin.0.email, author.id);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/authors/{}", author.id)))
        .json(AuthorReadOnlyDto::from(author)))
}

/// Replaces an author. Administrators only.
///
/// ## Responses:
/// - `204 No Content`: updated.
/// - `400 Bad Request`: validation failure or the body id differs from the path id.
/// - `404 Not Found`: no author with this id.
#[put("/{id}")]
pub async fn update_author(
    repos: web::Data<Repositories>,
    author_id: web::Path<i32>,
    author_data: web::Json<AuthorUpdateDto>,
    admin: Administrator,
) -> Result<impl Responder, AppError> {
    let id = author_id.into_inner();
    if author_data.id != id {
        log::warn!("Update author: path id {} differs from body id {}", id, author_data.id);
        return Err(AppError::BadRequest("Author id does not match".into()));
    }
    author_data.validate()?;

    match repos.authors.update(id, author_data.into_inner().into()).await? {
        Some(_) => {
            log::info!("{} updated author {}", admin.0.email, id);
            Ok(HttpResponse::NoContent().finish())
        }
        None => {
            log::warn!("Update author: {} not found", id);
            Err(AppError::NotFound("Author not found".into()))
        }
    }
}

/// Deletes an author. Their books are kept without an author. Administrators only.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found`: no author with this id.
#[delete("/{id}")]
pub async fn delete_author(
    repos: web::Data<Repositories>,
    author_id: web::Path<i32>,
    admin: Administrator,
) -> Result<impl Responder, AppError> {
    let id = author_id.into_inner();

    if !repos.authors.delete(id).await? {
        log::warn!("Delete author: {} not found", id);
        return Err(AppError::NotFound("Author not found".into()));
    }

    log::info!("{} deleted author {}", admin.0.email, id);
    Ok(HttpResponse::NoContent().finish())
}
