//! # rehab-client
//!
//! Application layer of rehab-grid: the editing session, the import
//! reconciler, the template catalog, and the command handlers the
//! `rehab-grid` binary drives.

pub mod commands;
pub mod config;
pub mod error;
pub mod messages;
pub mod reconciler;
pub mod state;
pub mod templates;

use tracing_subscriber::{fmt, EnvFilter};

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use state::{AppState, EditorSession};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("rehab_client=debug,rehab_store=info,rehab_archive=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
