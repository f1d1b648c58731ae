//! Data access behind trait objects.
//!
//! Handlers only see the traits in this module. `postgres` is the production store and
//! `memory` keeps everything in process, which is what the integration tests and the
//! `STORAGE_BACKEND=memory` demo mode use.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{
    Author, AuthorChanges, Book, BookChanges, NewUser, QueryParameters, User, VirtualizeResponse,
};

#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// All authors ordered by id.
    async fn get_all(&self) -> Result<Vec<Author>, AppError>;
    async fn get_page(&self, params: QueryParameters) -> Result<VirtualizeResponse<Author>, AppError>;
    async fn get(&self, id: i32) -> Result<Option<Author>, AppError>;
    async fn exists(&self, id: i32) -> Result<bool, AppError>;
    async fn add(&self, author: AuthorChanges) -> Result<Author, AppError>;
    /// Returns `None` when no author has the given id.
    async fn update(&self, id: i32, author: AuthorChanges) -> Result<Option<Author>, AppError>;
    /// Returns `false` when no author has the given id. Books of the author are kept
    /// with their author cleared.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books ordered by id, joined with their author.
    async fn get_all(&self) -> Result<Vec<Book>, AppError>;
    async fn get_page(&self, params: QueryParameters) -> Result<VirtualizeResponse<Book>, AppError>;
    async fn get_by_author(&self, author_id: i32) -> Result<Vec<Book>, AppError>;
    async fn get(&self, id: i32) -> Result<Option<Book>, AppError>;
    async fn exists(&self, id: i32) -> Result<bool, AppError>;
    async fn add(&self, book: BookChanges) -> Result<Book, AppError>;
    async fn update(&self, id: i32, book: BookChanges) -> Result<Option<Book>, AppError>;
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn add(&self, user: NewUser) -> Result<User, AppError>;
}

/// The repositories shared by all handlers, registered once as `web::Data`.
#[derive(Clone)]
pub struct Repositories {
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            authors: Arc::new(postgres::PgAuthorRepository::new(pool.clone())),
            books: Arc::new(postgres::PgBookRepository::new(pool.clone())),
            users: Arc::new(postgres::PgUserRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = memory::MemoryStore::default();
        Self {
            authors: Arc::new(memory::MemoryAuthorRepository::new(store.clone())),
            books: Arc::new(memory::MemoryBookRepository::new(store.clone())),
            users: Arc::new(memory::MemoryUserRepository::new(store)),
        }
    }
}
