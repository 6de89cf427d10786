//! Bundled exercise-sheet templates: the static catalog, where template
//! assets come from, and how a template becomes a project.

pub mod catalog;
pub mod resolver;
pub mod source;

pub use catalog::{find_template, TemplateMetadata, TEMPLATES};
pub use resolver::{TemplateError, TemplateResolver};
pub use source::{BundledTemplates, DirTemplates, TemplateSource};
