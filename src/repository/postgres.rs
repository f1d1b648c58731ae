use async_trait::async_trait;
use sqlx::PgPool;

use super::{AuthorRepository, BookRepository, UserRepository};
use crate::error::AppError;
use crate::models::{
    Author, AuthorChanges, Book, BookChanges, NewUser, QueryParameters, User, VirtualizeResponse,
};

const AUTHOR_COLUMNS: &str = "id, first_name, last_name, bio";

// Every book query projects this shape so that `Book` can be decoded with its author name.
const BOOK_PROJECTION: &str = "b.id, b.title, b.year, b.isbn, b.summary, b.image, b.price, b.author_id, \
     a.first_name AS author_first_name, a.last_name AS author_last_name";

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, role, created_at";

pub struct PgAuthorRepository {
    pool: PgPool,
}

impl PgAuthorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn get_all(&self) -> Result<Vec<Author>, AppError> {
        let authors = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors ORDER BY id",
            AUTHOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    async fn get_page(&self, params: QueryParameters) -> Result<VirtualizeResponse<Author>, AppError> {
        let total_size = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        let items = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors ORDER BY id OFFSET $1 LIMIT $2",
            AUTHOR_COLUMNS
        ))
        .bind(params.start_index)
        .bind(params.page_size)
        .fetch_all(&self.pool)
        .await?;
        Ok(VirtualizeResponse { items, total_size })
    }

    async fn get(&self, id: i32) -> Result<Option<Author>, AppError> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE id = $1",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn add(&self, author: AuthorChanges) -> Result<Author, AppError> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "INSERT INTO authors (first_name, last_name, bio) VALUES ($1, $2, $3) RETURNING {}",
            AUTHOR_COLUMNS
        ))
        .bind(author.first_name)
        .bind(author.last_name)
        .bind(author.bio)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    async fn update(&self, id: i32, author: AuthorChanges) -> Result<Option<Author>, AppError> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "UPDATE authors SET first_name = $1, last_name = $2, bio = $3 WHERE id = $4 RETURNING {}",
            AUTHOR_COLUMNS
        ))
        .bind(author.first_name)
        .bind(author.last_name)
        .bind(author.bio)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn get_all(&self) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b LEFT JOIN authors a ON a.id = b.author_id ORDER BY b.id",
            BOOK_PROJECTION
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn get_page(&self, params: QueryParameters) -> Result<VirtualizeResponse<Book>, AppError> {
        let total_size = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        let items = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b LEFT JOIN authors a ON a.id = b.author_id \
             ORDER BY b.id OFFSET $1 LIMIT $2",
            BOOK_PROJECTION
        ))
        .bind(params.start_index)
        .bind(params.page_size)
        .fetch_all(&self.pool)
        .await?;
        Ok(VirtualizeResponse { items, total_size })
    }

    async fn get_by_author(&self, author_id: i32) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b LEFT JOIN authors a ON a.id = b.author_id \
             WHERE b.author_id = $1 ORDER BY b.id",
            BOOK_PROJECTION
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn get(&self, id: i32) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b LEFT JOIN authors a ON a.id = b.author_id WHERE b.id = $1",
            BOOK_PROJECTION
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn add(&self, book: BookChanges) -> Result<Book, AppError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "WITH b AS ( \
                 INSERT INTO books (title, year, isbn, summary, image, price, author_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING * \
             ) \
             SELECT {} FROM b LEFT JOIN authors a ON a.id = b.author_id",
            BOOK_PROJECTION
        ))
        .bind(book.title)
        .bind(book.year)
        .bind(book.isbn)
        .bind(book.summary)
        .bind(book.image)
        .bind(book.price)
        .bind(book.author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    async fn update(&self, id: i32, book: BookChanges) -> Result<Option<Book>, AppError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "WITH b AS ( \
                 UPDATE books SET title = $1, year = $2, isbn = $3, summary = $4, image = $5, \
                     price = $6, author_id = $7 \
                 WHERE id = $8 RETURNING * \
             ) \
             SELECT {} FROM b LEFT JOIN authors a ON a.id = b.author_id",
            BOOK_PROJECTION
        ))
        .bind(book.title)
        .bind(book.year)
        .bind(book.isbn)
        .bind(book.summary)
        .bind(book.image)
        .bind(book.price)
        .bind(book.author_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE lower(email) = lower($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn add(&self, user: NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
