//! # rehab-shared
//!
//! Data model and trust-boundary helpers shared by every rehab-grid crate:
//! the project document, tagged image references, the bundled sample image
//! catalog, size and text limits, markup sanitization, document validation
//! and image type sniffing.

pub mod constants;
pub mod media;
pub mod samples;
pub mod sanitize;
pub mod types;
pub mod validation;

mod error;

pub use error::{MediaError, ValidationError, ValidationKind};
pub use media::{ImageBlob, ImageMime};
pub use sanitize::sanitize;
pub use types::*;
pub use validation::{validate, validate_slice, validate_str};
