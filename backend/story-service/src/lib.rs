/// Story Service Library
///
/// REST resource layer for stories, chapters and chapter comments on top of
/// a document store.
///
/// # Modules
///
/// - `routes`: route table with per-route access levels
/// - `handlers`: HTTP request handlers
/// - `services`: one store round-trip per operation, errors mapped to `AppError`
/// - `store`: `ResourceStore` trait with PostgreSQL and in-memory backends
/// - `auth`: `AuthVerifier` trait and the JWT implementation
/// - `middleware`: bearer authentication for protected resources
/// - `models`: story, chapter and comment documents
/// - `error`: error types and HTTP mapping
/// - `config`: configuration from the environment
/// - `metrics`: Prometheus collectors
/// - `openapi`: OpenAPI document
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
