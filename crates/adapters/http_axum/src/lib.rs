//! # rulehub-adapter-http-axum
//!
//! HTTP adapter using [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Expose rule authoring CRUD under `/api/rules`
//! - Accept business events on `/api/events` (fire-and-forget intake)
//! - Serve execution history under `/api/rules/{id}/executions` and
//!   `/api/executions/{id}`
//! - Map domain errors to HTTP status codes
//!
//! ## Dependency rule
//! Depends on `rulehub-app` (services, ports) and `rulehub-domain`
//! (types). Never depends on other adapters; the binary wires them
//! together.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
