//! Typed HTTP client for the bookstore API.
//!
//! This is the service layer a front end sits on: it logs in, keeps the bearer token
//! and exposes one method per endpoint, returning the same DTOs the server uses.

mod error;

pub use error::ClientError;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::{
    AuthorCreateDto, AuthorDetailsDto, AuthorReadOnlyDto, AuthorUpdateDto, BookCreateDto,
    BookDetailsDto, BookReadOnlyDto, BookUpdateDto, QueryParameters, UserResponse,
    VirtualizeResponse,
};

pub struct BookstoreClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BookstoreClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Full URL of a cover image path returned in `image` fields.
    pub fn cover_url(&self, image: &str) -> String {
        format!("{}{}", self.base_url, image)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserResponse, ClientError> {
        let builder = self.http.post(self.url("/api/auth/register")).json(request);
        self.send_json(builder).await
    }

    /// Logs in and keeps the token for subsequent calls.
    pub async fn login(&mut self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let builder = self.http.post(self.url("/api/auth/login")).json(request);
        let response: AuthResponse = self.send_json(builder).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub async fn authors(&self) -> Result<Vec<AuthorReadOnlyDto>, ClientError> {
        self.send_json(self.authorized(Method::GET, "/api/authors")?).await
    }

    pub async fn author_page(
        &self,
        params: QueryParameters,
    ) -> Result<VirtualizeResponse<AuthorReadOnlyDto>, ClientError> {
        let builder = self.authorized(Method::GET, "/api/authors/page")?.query(&params);
        self.send_json(builder).await
    }

    pub async fn author(&self, id: i32) -> Result<AuthorDetailsDto, ClientError> {
        let path = format!("/api/authors/{}", id);
        self.send_json(self.authorized(Method::GET, &path)?).await
    }

    pub async fn create_author(
        &self,
        author: &AuthorCreateDto,
    ) -> Result<AuthorReadOnlyDto, ClientError> {
        let builder = self.authorized(Method::POST, "/api/authors")?.json(author);
        self.send_json(builder).await
    }

    pub async fn update_author(&self, id: i32, author: &AuthorUpdateDto) -> Result<(), ClientError> {
        let path = format!("/api/authors/{}", id);
        let builder = self.authorized(Method::PUT, &path)?.json(author);
        self.send_empty(builder).await
    }

    pub async fn delete_author(&self, id: i32) -> Result<(), ClientError> {
        let path = format!("/api/authors/{}", id);
        self.send_empty(self.authorized(Method::DELETE, &path)?).await
    }

    pub async fn books(&self) -> Result<Vec<BookReadOnlyDto>, ClientError> {
        self.send_json(self.authorized(Method::GET, "/api/books")?).await
    }

    pub async fn book_page(
        &self,
        params: QueryParameters,
    ) -> Result<VirtualizeResponse<BookReadOnlyDto>, ClientError> {
        let builder = self.authorized(Method::GET, "/api/books/page")?.query(&params);
        self.send_json(builder).await
    }

    pub async fn book(&self, id: i32) -> Result<BookDetailsDto, ClientError> {
        let path = format!("/api/books/{}", id);
        self.send_json(self.authorized(Method::GET, &path)?).await
    }

    pub async fn create_book(&self, book: &BookCreateDto) -> Result<BookDetailsDto, ClientError> {
        let builder = self.authorized(Method::POST, "/api/books")?.json(book);
        self.send_json(builder).await
    }

    pub async fn update_book(&self, id: i32, book: &BookUpdateDto) -> Result<(), ClientError> {
        let path = format!("/api/books/{}", id);
        let builder = self.authorized(Method::PUT, &path)?.json(book);
        self.send_empty(builder).await
    }

    pub async fn delete_book(&self, id: i32) -> Result<(), ClientError> {
        let path = format!("/api/books/{}", id);
        self.send_empty(self.authorized(Method::DELETE, &path)?).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        check_status(builder.send().await?).await.map(|_| ())
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: String,
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    log::debug!("Bookstore API returned {}: {}", status, message);
    Err(ClientError::Api { status, message })
}
