//! Error types for the Ginkgo library.

use std::io;

use thiserror::Error;

/// The main error type for segmentation operations.
///
/// Segmentation itself is total and never fails; errors only arise while
/// loading dictionaries.
#[derive(Error, Debug)]
pub enum GinkgoError {
    /// I/O errors (dictionary file reading).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Dictionary-related errors (unreadable or unusable dictionary files).
    #[error("Dictionary error: {0}")]
    Dictionary(String),
}

/// Result type alias for operations that may fail with [`GinkgoError`].
pub type Result<T> = std::result::Result<T, GinkgoError>;

impl GinkgoError {
    /// Create a new dictionary error.
    pub fn dictionary<S: Into<String>>(msg: S) -> Self {
        GinkgoError::Dictionary(msg.into())
    }
}
