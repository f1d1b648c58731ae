use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A book row joined with the name of its author.
///
/// `author_id` is null once the author has been deleted.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub price: f64,
    pub author_id: Option<i32>,
    pub author_first_name: Option<String>,
    pub author_last_name: Option<String>,
}

/// Payload for creating a book.
///
/// `image_data` is the base64-encoded cover; `original_image_name` only supplies its
/// file extension.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookCreateDto {
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(range(min = 1000))]
    pub year: i32,
    #[validate(length(min = 1, max = 50))]
    pub isbn: String,
    #[validate(length(min = 10, max = 250))]
    pub summary: Option<String>,
    pub image_data: Option<String>,
    pub original_image_name: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 1))]
    pub author_id: i32,
}

/// Payload for replacing a book. `id` must match the id in the request path.
///
/// When `image_data` is absent the current cover is kept.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdateDto {
    pub id: i32,
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(range(min = 1000))]
    pub year: i32,
    #[validate(length(min = 1, max = 50))]
    pub isbn: String,
    #[validate(length(min = 10, max = 250))]
    pub summary: Option<String>,
    pub image_data: Option<String>,
    pub original_image_name: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 1))]
    pub author_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookReadOnlyDto {
    pub id: i32,
    pub title: String,
    pub image: Option<String>,
    pub price: f64,
    pub author_id: Option<i32>,
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetailsDto {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub price: f64,
    pub author_id: Option<i32>,
    pub author_name: Option<String>,
}

/// Fields written when inserting or updating a book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookChanges {
    pub title: String,
    pub year: i32,
    pub isbn: String,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub price: f64,
    pub author_id: i32,
}

impl Book {
    pub fn author_name(&self) -> Option<String> {
        match (&self.author_first_name, &self.author_last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        }
    }
}

impl From<Book> for BookReadOnlyDto {
    fn from(book: Book) -> Self {
        let author_name = book.author_name();
        Self {
            id: book.id,
            title: book.title,
            image: book.image,
            price: book.price,
            author_id: book.author_id,
            author_name,
        }
    }
}

impl From<Book> for BookDetailsDto {
    fn from(book: Book) -> Self {
        let author_name = book.author_name();
        Self {
            id: book.id,
            title: book.title,
            year: book.year,
            isbn: book.isbn,
            summary: book.summary,
            image: book.image,
            price: book.price,
            author_id: book.author_id,
            author_name,
        }
    }
}

impl BookChanges {
    /// Builds the stored fields from a create payload and the already persisted cover path.
    pub fn from_create(dto: BookCreateDto, image: Option<String>) -> Self {
        Self {
            title: dto.title,
            year: dto.year,
            isbn: dto.isbn,
            summary: dto.summary,
            image,
            price: dto.price,
            author_id: dto.author_id,
        }
    }

    pub fn from_update(dto: BookUpdateDto, image: Option<String>) -> Self {
        Self {
            title: dto.title,
            year: dto.year,
            isbn: dto.isbn,
            summary: dto.summary,
            image,
            price: dto.price,
            author_id: dto.author_id,
        }
    }
}
