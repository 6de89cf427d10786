//! # rehab-store
//!
//! Local storage for rehab-grid, backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle with typed helpers for
//! the `projects` and `images` tables, and the async [`ProjectStore`] service
//! that callers hold on to. [`ProjectRepository`] is the trait other crates
//! depend on.

pub mod database;
pub mod images;
pub mod migrations;
pub mod models;
pub mod projects;
pub mod service;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
pub use service::{ProjectRepository, ProjectStore};
