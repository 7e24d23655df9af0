//! # rulehub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `rulehub-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `rulehub-app` (for port traits) and `rulehub-domain` (for
//! domain types). The `app` and `domain` crates must never reference
//! this adapter.

pub mod error;
pub mod execution_repo;
pub mod pool;
pub mod rule_repo;

pub use error::StorageError;
pub use execution_repo::SqliteExecutionRepository;
pub use pool::{Config, Database};
pub use rule_repo::SqliteRuleRepository;
