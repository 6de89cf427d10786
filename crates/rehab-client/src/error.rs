use rehab_archive::{ExportError, ImportError};
use rehab_shared::MediaError;
use rehab_store::StoreError;
use thiserror::Error;

use crate::messages;
use crate::reconciler::ReconcileError;
use crate::templates::TemplateError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Image rejected: {0}")]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Card limit reached (max {max})")]
    ItemLimit { max: usize },

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Image not found: {0}")]
    ImageNotFound(String),
}

impl ClientError {
    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Store(_) => messages::STORE_ERROR_MESSAGE.to_string(),
            ClientError::Import(e) => e.user_message().to_string(),
            ClientError::Export(_) => messages::EXPORT_FAILED_MESSAGE.to_string(),
            ClientError::Template(e) => e.user_message().to_string(),
            ClientError::Reconcile(ReconcileError::ConfirmationRequired) => {
                messages::IMPORT_CONFIRM_DESCRIPTION.to_string()
            }
            ClientError::Reconcile(_) => messages::IMPORT_FAILED_MESSAGE.to_string(),
            ClientError::Media(_) => messages::IMAGE_PROCESSING_ERROR_MESSAGE.to_string(),
            ClientError::Io(_) => messages::FILE_ACCESS_ERROR_MESSAGE.to_string(),
            ClientError::ItemLimit { max } => messages::max_item_count_reached(*max),
            ClientError::CardNotFound(_) => messages::CARD_NOT_FOUND_MESSAGE.to_string(),
            ClientError::ImageNotFound(_) => messages::IMAGE_NOT_FOUND_MESSAGE.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
