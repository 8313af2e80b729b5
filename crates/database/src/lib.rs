//! # Marketpulse Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! SQLite database. It is the system's single source of persisted truth.
//!
//! ## Architectural Principles
//!
//! - **Adapter layer:** encapsulates all database-specific logic and exposes
//!   a clean, typed API to the rest of the application, hiding the underlying
//!   SQL and driver details.
//! - **Asynchronous & Pooled:** all operations are asynchronous and run
//!   against a shared connection pool (`SqlitePool`).
//! - **Scoped sessions:** each repository call borrows a pooled connection
//!   for exactly one operation. Multi-row cascades run inside a transaction
//!   that commits on success and rolls back on drop, so an aborted request
//!   can never leave a half-applied cascade behind.
//!
//! ## Public API
//!
//! - `connect` / `connect_with_url`: establish the database connection pool.
//! - `run_migrations`: apply the embedded schema migrations.
//! - `DbRepository`: the main struct that holds the connection pool and
//!   provides the per-entity CRUD methods.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_with_url, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
