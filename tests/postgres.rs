//! Repository checks against a real database. Run with
//! `DATABASE_URL=postgres://... cargo test --test postgres -- --ignored`.

use dotenv::dotenv;
use pretty_assertions::assert_eq;
use sqlx::PgPool;
use uuid::Uuid;

use bookstore::error::AppError;
use bookstore::models::{AuthorChanges, BookChanges, NewUser, QueryParameters, Role};
use bookstore::repository::Repositories;

async fn connect() -> PgPool {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

fn book(isbn: &str, author_id: i32) -> BookChanges {
    BookChanges {
        title: "Postgres Book".to_string(),
        year: 2001,
        isbn: isbn.to_string(),
        summary: Some("Stored in a real database.".to_string()),
        image: None,
        price: 19.5,
        author_id,
    }
}

#[actix_rt::test]
#[ignore]
async fn test_postgres_author_and_book_lifecycle() {
    let repos = Repositories::postgres(connect().await);

    let author = repos
        .authors
        .add(AuthorChanges {
            first_name: "Pg".to_string(),
            last_name: "Author".to_string(),
            bio: None,
        })
        .await
        .unwrap();

    let isbn = Uuid::new_v4().to_string();
    let created = repos.books.add(book(&isbn, author.id)).await.unwrap();
    assert_eq!(created.author_name().as_deref(), Some("Pg Author"));
    assert_eq!(repos.books.get_by_author(author.id).await.unwrap().len(), 1);

    // Duplicate ISBN and unknown author are client errors
    let duplicate = repos.books.add(book(&isbn, author.id)).await.unwrap_err();
    assert!(matches!(duplicate, AppError::BadRequest(_)));
    let orphan = repos
        .books
        .add(book(&Uuid::new_v4().to_string(), -1))
        .await
        .unwrap_err();
    assert!(matches!(orphan, AppError::BadRequest(_)));

    let page = repos
        .books
        .get_page(QueryParameters {
            start_index: 0,
            page_size: 1,
        })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert!(page.total_size >= 1);

    assert!(repos.authors.delete(author.id).await.unwrap());
    let kept = repos.books.get(created.id).await.unwrap().unwrap();
    assert_eq!(kept.author_id, None);

    assert!(repos.books.delete(created.id).await.unwrap());
    assert!(!repos.books.delete(created.id).await.unwrap());
    assert_eq!(repos.books.get(created.id).await.unwrap(), None);
}

#[actix_rt::test]
#[ignore]
async fn test_postgres_users_are_unique_by_email() {
    let pool = connect().await;
    let repos = Repositories::postgres(pool.clone());
    let email = format!("{}@postgres.test", Uuid::new_v4());

    let user = repos
        .users
        .add(NewUser {
            email: email.clone(),
            password_hash: "hash".to_string(),
            first_name: "Pg".to_string(),
            last_name: "User".to_string(),
            role: Role::Administrator,
        })
        .await
        .unwrap();
    assert_eq!(user.role, Role::Administrator);

    let found = repos
        .users
        .find_by_email(&email.to_uppercase())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);

    let duplicate = repos
        .users
        .add(NewUser {
            email: email.to_uppercase(),
            password_hash: "hash".to_string(),
            first_name: "Pg".to_string(),
            last_name: "User".to_string(),
            role: Role::User,
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AppError::BadRequest(_)));

    let _ = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await;
}
