/// Schema version written into every project produced by this build
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Fixed key of the single project record
pub const CURRENT_PROJECT_ID: &str = "current";

/// Title given to a freshly created project
pub const DEFAULT_PROJECT_TITLE: &str = "無題のプロジェクト";

/// Default accent colour of a new project
pub const DEFAULT_THEME_COLOR: &str = "#3b82f6";

/// Maximum number of exercise cards on one sheet
pub const MAX_ITEM_COUNT: usize = 10;

/// Maximum number of precautions per exercise card
pub const MAX_PRECAUTIONS_COUNT: usize = 5;

/// Maximum length of an item or precaution id in characters
pub const MAX_ITEM_ID_LEN: usize = 64;

/// Latest calendar year accepted in project timestamps
pub const MAX_TIMESTAMP_YEAR: i32 = 9999;

/// Maximum size of an uploaded image in bytes (20 MiB)
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// Maximum size of an imported bare JSON file in bytes (10 MiB)
pub const MAX_IMPORT_JSON_SIZE: usize = 10 * 1024 * 1024;

/// Maximum size of an imported archive in bytes (50 MiB)
pub const MAX_IMPORT_ZIP_SIZE: usize = 50 * 1024 * 1024;

/// Maximum number of image entries inside an archive
pub const MAX_ZIP_IMAGE_COUNT: usize = 15;

/// Maximum cumulative decompressed size of an archive in bytes (100 MiB)
pub const MAX_ZIP_EXTRACTED_SIZE: u64 = 100 * 1024 * 1024;

/// Name of the project document inside an archive
pub const ARCHIVE_PROJECT_ENTRY: &str = "project.json";

/// Directory prefix of image entries inside an archive
pub const ARCHIVE_IMAGE_DIR: &str = "images/";

/// Prefix shared by every bundled sample image id
pub const SAMPLE_IMAGE_ID_PREFIX: &str = "sample_";

/// Base path under which bundled sample images are served
pub const SAMPLE_IMAGE_BASE_PATH: &str = "/images/samples";

/// Per-field character limits applied after sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLimits {
    pub project_title: usize,
    pub title: usize,
    pub description: usize,
    pub precaution: usize,
    pub reps: usize,
    pub sets: usize,
    pub frequency: usize,
}

pub const TEXT_LIMITS: TextLimits = TextLimits {
    project_title: 20,
    title: 20,
    description: 200,
    precaution: 50,
    reps: 10,
    sets: 10,
    frequency: 10,
};
