use crate::{
    auth::{Administrator, AuthenticatedUser},
    error::AppError,
    models::{
        BookChanges, BookCreateDto, BookDetailsDto, BookReadOnlyDto, BookUpdateDto,
        QueryParameters,
    },
    repository::Repositories,
    storage::CoverImageStore,
};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Lists all books with the name of their author.
///
/// ## Responses:
/// - `200 OK`: JSON array of `BookReadOnlyDto`, ordered by id.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_books(
    repos: web::Data<Repositories>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    log::info!("{} requested all books", user.email);
    let books = repos.books.get_all().await?;
    let books: Vec<BookReadOnlyDto> = books.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(books))
}

/// Lists one page of books. Takes the same `startIndex`/`pageSize` query as the author page.
#[get("/page")]
pub async fn get_book_page(
    repos: web::Data<Repositories>,
    query: web::Query<QueryParameters>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let params = query.into_inner();
    params.validate()?;
    log::info!(
        "{} requested books from {} (page size {})",
        user.email,
        params.start_index,
        params.page_size
    );
    let page = repos.books.get_page(params).await?;
    Ok(HttpResponse::Ok().json(page.map(BookReadOnlyDto::from)))
}

/// Retrieves one book.
///
/// ## Responses:
/// - `200 OK`: `BookDetailsDto`.
/// - `404 Not Found`: no book with this id.
#[get("/{id}")]
pub async fn get_book(
    repos: web::Data<Repositories>,
    book_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = book_id.into_inner();
    log::info!("{} requested book {}", user.email, id);

    match repos.books.get(id).await? {
        Some(book) => Ok(HttpResponse::Ok().json(BookDetailsDto::from(book))),
        None => {
            log::warn!("Book {} not found", id);
            Err(AppError::NotFound("Book not found".into()))
        }
    }
}

/// Creates a book, storing the uploaded cover if one is given. Administrators only.
///
/// ## Request Body:
/// A `BookCreateDto`. `imageData` is the base64 cover and `originalImageName`
/// provides its extension.
///
/// ## Responses:
/// - `201 Created`: the new `BookDetailsDto`, with a `Location` header.
/// - `400 Bad Request`: validation failure, unknown author, duplicate ISBN or bad image.
/// - `403 Forbidden`: caller is not an Administrator.
#[post("")]
pub async fn create_book(
    repos: web::Data<Repositories>,
    images: web::Data<CoverImageStore>,
    book_data: web::Json<BookCreateDto>,
    admin: Administrator,
) -> Result<impl Responder, AppError> {
    book_data.validate()?;
    ensure_author_exists(&repos, book_data.author_id).await?;

    let dto = book_data.into_inner();
    let image = store_cover(
        &images,
        dto.image_data.as_deref(),
        dto.original_image_name.as_deref(),
    )
    .await?;

    let book = match repos.books.add(BookChanges::from_create(dto, image.clone())).await {
        Ok(book) => book,
        Err(e) => {
            discard_cover(&images, image.as_deref()).await;
            return Err(e);
        }
    };
    log::info!("{} created book {} ({})", admin.0.email, book.id, book.isbn);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/books/{}", book.id)))
        .json(BookDetailsDto::from(book)))
}

/// Replaces a book. A new cover replaces and deletes the old one; without
/// `imageData` the current cover is kept. Administrators only.
///
/// ## Responses:
/// - `204 No Content`: updated.
/// - `400 Bad Request`: validation failure, id mismatch, unknown author, duplicate ISBN.
/// - `404 Not Found`: no book with this id.
#[put("/{id}")]
pub async fn update_book(
    repos: web::Data<Repositories>,
    images: web::Data<CoverImageStore>,
    book_id: web::Path<i32>,
    book_data: web::Json<BookUpdateDto>,
    admin: Administrator,
) -> Result<impl Responder, AppError> {
    let id = book_id.into_inner();
    if book_data.id != id {
        log::warn!("Update book: path id {} differs from body id {}", id, book_data.id);
        return Err(AppError::BadRequest("Book id does not match".into()));
    }
    book_data.validate()?;

    let Some(existing) = repos.books.get(id).await? else {
        log::warn!("Update book: {} not found", id);
        return Err(AppError::NotFound("Book not found".into()));
    };
    ensure_author_exists(&repos, book_data.author_id).await?;

    let dto = book_data.into_inner();
    let new_image = store_cover(
        &images,
        dto.image_data.as_deref(),
        dto.original_image_name.as_deref(),
    )
    .await?;
    let image = new_image.clone().or_else(|| existing.image.clone());

    match repos.books.update(id, BookChanges::from_update(dto, image)).await {
        Ok(Some(_)) => {
            if new_image.is_some() {
                discard_cover(&images, existing.image.as_deref()).await;
            }
            log::info!("{} updated book {}", admin.0.email, id);
            Ok(HttpResponse::NoContent().finish())
        }
        Ok(None) => {
            discard_cover(&images, new_image.as_deref()).await;
            Err(AppError::NotFound("Book not found".into()))
        }
        Err(e) => {
            discard_cover(&images, new_image.as_deref()).await;
            Err(e)
        }
    }
}

/// Deletes a book and its cover. Administrators only.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found`: no book with this id.
#[delete("/{id}")]
pub async fn delete_book(
    repos: web::Data<Repositories>,
    images: web::Data<CoverImageStore>,
    book_id: web::Path<i32>,
    admin: Administrator,
) -> Result<impl Responder, AppError> {
    let id = book_id.into_inner();

    let Some(book) = repos.books.get(id).await? else {
        log::warn!("Delete book: {} not found", id);
        return Err(AppError::NotFound("Book not found".into()));
    };
    if !repos.books.delete(id).await? {
        return Err(AppError::NotFound("Book not found".into()));
    }
    discard_cover(&images, book.image.as_deref()).await;

    log::info!("{} deleted book {}", admin.0.email, id);
    Ok(HttpResponse::NoContent().finish())
}

async fn ensure_author_exists(repos: &Repositories, author_id: i32) -> Result<(), AppError> {
    if repos.authors.exists(author_id).await? {
        Ok(())
    } else {
        log::warn!("Book refers to missing author {}", author_id);
        Err(AppError::BadRequest(format!("Author {} does not exist", author_id)))
    }
}

async fn store_cover(
    images: &CoverImageStore,
    image_data: Option<&str>,
    original_name: Option<&str>,
) -> Result<Option<String>, AppError> {
    match image_data.filter(|data| !data.trim().is_empty()) {
        Some(data) => images.save(data, original_name).await.map(Some),
        None => Ok(None),
    }
}

/// Best-effort removal; a leftover file is logged, never surfaced to the client.
async fn discard_cover(images: &CoverImageStore, image: Option<&str>) {
    if let Some(path) = image {
        if let Err(e) = images.remove(path).await {
            log::error!("Failed to remove cover image {}: {}", path, e);
        }
    }
}
