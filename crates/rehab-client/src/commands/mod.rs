//! Command handlers.
//!
//! Each sub-module groups related commands by domain. Handlers take the
//! [`AppState`](crate::state::AppState), return [`crate::error::Result`] and
//! are driven by the `rehab-grid` binary.

pub mod export;
pub mod images;
pub mod import;
pub mod maintenance;
pub mod project;
pub mod templates;
