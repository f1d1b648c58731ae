#![doc = "The `bookstore` library crate."]
#![doc = ""]
#![doc = "Domain models and DTOs, repositories over Postgres or memory, JWT authentication,"]
#![doc = "route handlers and a typed HTTP client for the bookstore API."]
#![doc = "The binary (`main.rs`) only reads the configuration and starts the server."]

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod storage;

pub use crate::error::AppError;
