//! Where template assets are read from.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use include_dir::{include_dir, Dir};

static BUNDLED_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets/templates");

/// Read access to template asset files. Missing files surface as
/// [`io::ErrorKind::NotFound`].
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn read_file(&self, template_path: &str, file: &str) -> io::Result<Vec<u8>>;
}

/// Templates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledTemplates;

#[async_trait]
impl TemplateSource for BundledTemplates {
    async fn read_file(&self, template_path: &str, file: &str) -> io::Result<Vec<u8>> {
        let path = relative_path(template_path, file)?;
        BUNDLED_TEMPLATES
            .get_file(&path)
            .map(|f| f.contents().to_vec())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("bundled template file {} not found", path.display()),
                )
            })
    }
}

/// Templates read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirTemplates {
    root: PathBuf,
}

impl DirTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TemplateSource for DirTemplates {
    async fn read_file(&self, template_path: &str, file: &str) -> io::Result<Vec<u8>> {
        let path = self.root.join(relative_path(template_path, file)?);
        tracing::debug!(path = %path.display(), "reading template file");
        tokio::fs::read(&path).await
    }
}

/// Join the two parts, refusing anything that could leave the template root.
fn relative_path(template_path: &str, file: &str) -> io::Result<PathBuf> {
    let joined = Path::new(template_path).join(file);
    if joined
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        Ok(joined)
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid template path {}", joined.display()),
        ))
    }
}
