//! Errors at the board's external boundaries.

use thiserror::Error;

/// Errors from loading documents and importing images.
///
/// Interactive editing never fails; these only come from parsing data
/// handed in from outside.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read image: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported image format")]
    UnsupportedImage,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FolioResult<T> = Result<T, FolioError>;
