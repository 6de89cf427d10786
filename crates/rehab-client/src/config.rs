//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the CLI runs with zero configuration.

use std::path::PathBuf;

use rehab_shared::constants::SAMPLE_IMAGE_BASE_PATH;
use rehab_store::Database;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Directory holding the SQLite store.
    /// Env: `REHAB_DATA_DIR`
    /// Default: the platform data directory, or `./rehab-grid-data` when none
    /// can be determined.
    pub data_dir: PathBuf,

    /// Directory of template assets that replaces the bundled set. Each
    /// template lives in `<dir>/<path>/project.json`.
    /// Env: `REHAB_TEMPLATE_DIR`
    /// Default: none (bundled templates).
    pub template_dir: Option<PathBuf>,

    /// Base path or URL under which sample images are served.
    /// Env: `REHAB_SAMPLE_BASE`
    /// Default: `/images/samples`
    pub sample_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let data_dir = Database::default_data_dir().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "no platform data directory, using ./rehab-grid-data");
            PathBuf::from("./rehab-grid-data")
        });
        Self {
            data_dir,
            template_dir: None,
            sample_base: SAMPLE_IMAGE_BASE_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("REHAB_DATA_DIR") {
            if dir.trim().is_empty() {
                tracing::warn!("Empty REHAB_DATA_DIR, using default");
            } else {
                config.data_dir = PathBuf::from(dir);
            }
        }

        if let Some(dir) = lookup("REHAB_TEMPLATE_DIR") {
            let path = PathBuf::from(&dir);
            if path.is_dir() {
                config.template_dir = Some(path);
            } else {
                tracing::warn!(value = %dir, "REHAB_TEMPLATE_DIR is not a directory, using bundled templates");
            }
        }

        if let Some(base) = lookup("REHAB_SAMPLE_BASE") {
            let base = base.trim().trim_end_matches('/');
            if base.is_empty() {
                tracing::warn!("Empty REHAB_SAMPLE_BASE, using default");
            } else {
                config.sample_base = base.to_string();
            }
        }

        config
    }

    /// Location of a bundled sample asset under the configured base.
    pub fn sample_location(&self, asset: &str) -> String {
        format!("{}/{asset}", self.sample_base)
    }
}
