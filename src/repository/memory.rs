use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AuthorRepository, BookRepository, UserRepository};
use crate::error::AppError;
use crate::models::{
    Author, AuthorChanges, Book, BookChanges, NewUser, QueryParameters, User, VirtualizeResponse,
};

#[derive(Debug, Clone)]
struct StoredBook {
    title: String,
    year: i32,
    isbn: String,
    summary: Option<String>,
    image: Option<String>,
    price: f64,
    author_id: Option<i32>,
}

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<i32, Author>,
    books: BTreeMap<i32, StoredBook>,
    users: BTreeMap<i32, User>,
    last_author_id: i32,
    last_book_id: i32,
    last_user_id: i32,
}

impl Tables {
    fn book(&self, id: i32, stored: &StoredBook) -> Book {
        let author = stored.author_id.and_then(|author_id| self.authors.get(&author_id));
        Book {
            id,
            title: stored.title.clone(),
            year: stored.year,
            isbn: stored.isbn.clone(),
            summary: stored.summary.clone(),
            image: stored.image.clone(),
            price: stored.price,
            author_id: stored.author_id,
            author_first_name: author.map(|a| a.first_name.clone()),
            author_last_name: author.map(|a| a.last_name.clone()),
        }
    }

    /// Mirrors the unique ISBN index and the author foreign key of the SQL schema.
    fn check_book(&self, id: Option<i32>, book: &BookChanges) -> Result<(), AppError> {
        if !self.authors.contains_key(&book.author_id) {
            return Err(AppError::BadRequest("Referenced record does not exist".into()));
        }
        let duplicate = self
            .books
            .iter()
            .any(|(other_id, other)| Some(*other_id) != id && other.isbn == book.isbn);
        if duplicate {
            return Err(AppError::BadRequest(
                "A record with the same unique value already exists".into(),
            ));
        }
        Ok(())
    }
}

fn page<T: Clone>(items: impl Iterator<Item = T>, params: QueryParameters) -> Vec<T> {
    items
        .skip(params.start_index.max(0) as usize)
        .take(params.page_size.max(0) as usize)
        .collect()
}

impl From<BookChanges> for StoredBook {
    fn from(book: BookChanges) -> Self {
        Self {
            title: book.title,
            year: book.year,
            isbn: book.isbn,
            summary: book.summary,
            image: book.image,
            price: book.price,
            author_id: Some(book.author_id),
        }
    }
}

/// Shared in-process tables. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

pub struct MemoryAuthorRepository {
    store: MemoryStore,
}

impl MemoryAuthorRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthorRepository for MemoryAuthorRepository {
    async fn get_all(&self) -> Result<Vec<Author>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.authors.values().cloned().collect())
    }

    async fn get_page(&self, params: QueryParameters) -> Result<VirtualizeResponse<Author>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(VirtualizeResponse {
            items: page(tables.authors.values().cloned(), params),
            total_size: tables.authors.len() as i64,
        })
    }

    async fn get(&self, id: i32) -> Result<Option<Author>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.authors.get(&id).cloned())
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.authors.contains_key(&id))
    }

    async fn add(&self, author: AuthorChanges) -> Result<Author, AppError> {
        let mut tables = self.store.tables.write().await;
        tables.last_author_id += 1;
        let author = Author {
            id: tables.last_author_id,
            first_name: author.first_name,
            last_name: author.last_name,
            bio: author.bio,
        };
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update(&self, id: i32, author: AuthorChanges) -> Result<Option<Author>, AppError> {
        let mut tables = self.store.tables.write().await;
        Ok(tables.authors.get_mut(&id).map(|existing| {
            existing.first_name = author.first_name;
            existing.last_name = author.last_name;
            existing.bio = author.bio;
            existing.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.store.tables.write().await;
        if tables.authors.remove(&id).is_none() {
            return Ok(false);
        }
        for book in tables.books.values_mut() {
            if book.author_id == Some(id) {
                book.author_id = None;
            }
        }
        Ok(true)
    }
}

pub struct MemoryBookRepository {
    store: MemoryStore,
}

impl MemoryBookRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn get_all(&self) -> Result<Vec<Book>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .books
            .iter()
            .map(|(id, stored)| tables.book(*id, stored))
            .collect())
    }

    async fn get_page(&self, params: QueryParameters) -> Result<VirtualizeResponse<Book>, AppError> {
        let tables = self.store.tables.read().await;
        let items = page(tables.books.iter(), params)
            .into_iter()
            .map(|(id, stored)| tables.book(*id, stored))
            .collect();
        Ok(VirtualizeResponse {
            items,
            total_size: tables.books.len() as i64,
        })
    }

    async fn get_by_author(&self, author_id: i32) -> Result<Vec<Book>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .books
            .iter()
            .filter(|(_, stored)| stored.author_id == Some(author_id))
            .map(|(id, stored)| tables.book(*id, stored))
            .collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Book>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.books.get(&id).map(|stored| tables.book(id, stored)))
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.books.contains_key(&id))
    }

    async fn add(&self, book: BookChanges) -> Result<Book, AppError> {
        let mut tables = self.store.tables.write().await;
        tables.check_book(None, &book)?;
        tables.last_book_id += 1;
        let id = tables.last_book_id;
        let stored = StoredBook::from(book);
        let book = tables.book(id, &stored);
        tables.books.insert(id, stored);
        Ok(book)
    }

    async fn update(&self, id: i32, book: BookChanges) -> Result<Option<Book>, AppError> {
        let mut tables = self.store.tables.write().await;
        if !tables.books.contains_key(&id) {
            return Ok(None);
        }
        tables.check_book(Some(id), &book)?;
        let stored = StoredBook::from(book);
        let book = tables.book(id, &stored);
        tables.books.insert(id, stored);
        Ok(Some(book))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.store.tables.write().await;
        Ok(tables.books.remove(&id).is_some())
    }
}

pub struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.store.tables.read().await;
        let email = email.to_lowercase();
        Ok(tables
            .users
            .values()
            .find(|user| user.email.to_lowercase() == email)
            .cloned())
    }

    async fn add(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.store.tables.write().await;
        // Same rule as the lower(email) unique index.
        let email = user.email.to_lowercase();
        if tables
            .users
            .values()
            .any(|existing| existing.email.to_lowercase() == email)
        {
            return Err(AppError::BadRequest(
                "A record with the same unique value already exists".into(),
            ));
        }
        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}
