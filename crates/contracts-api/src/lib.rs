//! # contracts-api — Contracts Validation Sidecar
//!
//! A small Axum service that validates JSON documents against the schemas
//! held by a [`contracts_schema::SchemaRegistry`].
//!
//! ## API Surface
//!
//! | Route               | Module                | Purpose                     |
//! |---------------------|-----------------------|-----------------------------|
//! | `GET /health`       | [`routes::health`]    | Liveness probe              |
//! | `POST /validate`    | [`routes::validate`]  | Validate a document         |
//! | `GET /openapi.json` | [`openapi`]           | Generated OpenAPI document  |
//!
//! ## Architecture
//!
//! The registry is loaded once by the binary and shared read-only through
//! [`AppState`]. Handlers hold no locks and keep no per-request state.
//! All errors map to structured HTTP responses via [`AppError`].

pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::{AppConfig, AppState};

use axum::Router;
use tower_http::trace::TraceLayer;

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::validate::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
