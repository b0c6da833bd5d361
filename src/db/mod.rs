//! Database clients.
//!
//! - **Turso/SQLite** (libsql): relational store for users.
//!
//! Callers depend on the [`UserRepository`] trait; [`DatabaseProvider`]
//! picks the concrete backend from configuration.

#![allow(missing_docs)]

pub mod traits;
pub mod turso;

// Re-exports
pub use traits::{DatabaseProvider, NewUser, UserRepository};
pub use turso::{TursoClient, User};
