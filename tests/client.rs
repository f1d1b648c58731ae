mod common;

use std::net::TcpListener;

use actix_web::{App, HttpServer};
use base64::{engine::general_purpose::STANDARD, Engine};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;

use bookstore::app::AppState;
use bookstore::auth::{LoginRequest, RegisterRequest};
use bookstore::client::{BookstoreClient, ClientError};
use bookstore::models::{AuthorCreateDto, AuthorUpdateDto, BookCreateDto, QueryParameters};

use common::{seed_admin, test_state, ADMIN_EMAIL, PASSWORD};

/// Serves `state` on a random local port and returns the base URL.
fn spawn_server(state: AppState) -> (String, actix_web::dev::ServerHandle) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(bookstore::app::cors(&[]))
            .configure(move |cfg| state.configure(cfg))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let handle = server.handle();
    actix_rt::spawn(server);

    (format!("http://127.0.0.1:{}", port), handle)
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        first_name: "Client".to_string(),
        last_name: "Tester".to_string(),
    }
}

fn login_request(email: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
    }
}

#[actix_rt::test]
async fn test_client_round_trip() {
    let (state, _images) = test_state();
    seed_admin(&state).await;
    let (base_url, server) = spawn_server(state);
    let mut client = BookstoreClient::new(base_url.clone());

    assert!(matches!(client.authors().await, Err(ClientError::NotAuthenticated)));

    let auth = client.login(&login_request(ADMIN_EMAIL)).await.unwrap();
    assert!(client.is_authenticated());
    assert!(!auth.token.is_empty());

    let author = client
        .create_author(&AuthorCreateDto {
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
            bio: None,
        })
        .await
        .unwrap();

    let book = client
        .create_book(&BookCreateDto {
            title: "The Dispossessed".to_string(),
            year: 1974,
            isbn: "978-0-06-051275-3".to_string(),
            summary: Some("An ambiguous utopia.".to_string()),
            image_data: Some(STANDARD.encode(b"GIF89a")),
            original_image_name: Some("cover.gif".to_string()),
            price: 14.0,
            author_id: author.id,
        })
        .await
        .unwrap();
    assert_eq!(book.author_name.as_deref(), Some("Ursula Le Guin"));

    let cover = reqwest::get(client.cover_url(book.image.as_deref().unwrap()))
        .await
        .unwrap();
    assert_eq!(cover.status(), StatusCode::OK);
    assert_eq!(cover.bytes().await.unwrap().as_ref(), b"GIF89a");

    client
        .update_author(
            author.id,
            &AuthorUpdateDto {
                id: author.id,
                first_name: "Ursula K.".to_string(),
                last_name: "Le Guin".to_string(),
                bio: Some("Wrote Earthsea.".to_string()),
            },
        )
        .await
        .unwrap();
    let details = client.author(author.id).await.unwrap();
    assert_eq!(details.first_name, "Ursula K.");
    assert_eq!(details.books.len(), 1);

    let page = client
        .book_page(QueryParameters {
            start_index: 0,
            page_size: 10,
        })
        .await
        .unwrap();
    assert_eq!(page.total_size, 1);
    assert_eq!(page.items[0].author_name.as_deref(), Some("Ursula K. Le Guin"));

    let missing = client.book(book.id + 1).await.unwrap_err();
    assert_eq!(missing.status(), Some(StatusCode::NOT_FOUND));

    client.delete_book(book.id).await.unwrap();
    assert!(client.books().await.unwrap().is_empty());
    client.delete_author(author.id).await.unwrap();
    assert!(client.authors().await.unwrap().is_empty());

    client.logout();
    assert!(!client.is_authenticated());

    server.stop(true).await;
}

#[actix_rt::test]
async fn test_client_surfaces_api_errors() {
    let (state, _images) = test_state();
    let (base_url, server) = spawn_server(state);
    let mut client = BookstoreClient::new(base_url);

    client
        .register(&register_request("reader@client.test"))
        .await
        .unwrap();

    let duplicate = client
        .register(&register_request("reader@client.test"))
        .await
        .unwrap_err();
    match duplicate {
        ClientError::Api { status, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Email already registered");
        }
        other => panic!("Expected an API error, got {:?}", other),
    }

    let bad_login = client
        .login(&LoginRequest {
            email: "reader@client.test".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    assert!(bad_login.is_unauthorized());
    assert!(!client.is_authenticated());

    client.login(&login_request("reader@client.test")).await.unwrap();
    assert!(client.authors().await.unwrap().is_empty());

    let forbidden = client
        .create_author(&AuthorCreateDto {
            first_name: "Not".to_string(),
            last_name: "Allowed".to_string(),
            bio: None,
        })
        .await
        .unwrap_err();
    assert_eq!(forbidden.status(), Some(StatusCode::FORBIDDEN));

    server.stop(true).await;
}
