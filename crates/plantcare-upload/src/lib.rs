#![warn(missing_docs)]
//! # plantcare-upload
//!
//! ## Purpose
//! Validates a user-selected plant photo before it is submitted for
//! classification.
//!
//! ## Responsibilities
//! - Gate media types to the accepted image set.
//! - Infer media types from file extensions when no browser-provided type
//!   exists.
//! - Package the selection as the multipart `image` field.
//! - Fingerprint bytes with SHA-256 so logs can correlate uploads without
//!   carrying image content.
//!
//! ## Data flow
//! File picker / path -> [`ImageFile::from_path`] or [`ImageFile::new`] ->
//! media type gate -> [`ImageFile::into_part`] -> API submit.
//!
//! ## Error model
//! Every rejection here is a local validation failure ([`UploadError`]); none
//! of them ever reaches the network.

use std::fmt;
use std::path::{Path, PathBuf};

use plantcare_api::FilePart;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Media types the service accepts.
pub const ACCEPTED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/jpg"];

/// Multipart field name expected by the submit endpoint.
pub const UPLOAD_FIELD: &str = "image";

/// Message shown when a selected file has an unsupported type.
pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Only JPG, PNG and WEBP images are supported.";

/// Message shown when submit is triggered without a valid selection.
pub const NO_FILE_MESSAGE: &str = "Please select a valid JPG, PNG or WEBP image.";

/// Returns `true` when `media_type` is one of [`ACCEPTED_MEDIA_TYPES`].
pub fn is_accepted_media_type(media_type: &str) -> bool {
    ACCEPTED_MEDIA_TYPES.contains(&media_type)
}

/// Infers a media type from the file extension (case-insensitive).
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Validated image selection.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    file_name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    /// Creates a selection from a browser-style file handle.
    ///
    /// # Errors
    /// Returns [`UploadError::UnsupportedMediaType`] when `media_type` is not
    /// accepted.
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, UploadError> {
        let media_type = media_type.into();
        if !is_accepted_media_type(&media_type) {
            return Err(UploadError::UnsupportedMediaType(media_type));
        }

        Ok(Self {
            file_name: file_name.into(),
            media_type,
            bytes,
        })
    }

    /// Reads a selection from disk, inferring its media type from the
    /// extension. The type gate runs before the file is read.
    ///
    /// # Errors
    /// Returns [`UploadError::UnsupportedMediaType`] for unknown extensions and
    /// [`UploadError::Read`] when the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let media_type = media_type_for_path(path).ok_or_else(|| {
            UploadError::UnsupportedMediaType(
                path.extension()
                    .and_then(|extension| extension.to_str())
                    .map(|extension| format!(".{extension}"))
                    .unwrap_or_else(|| "no extension".to_string()),
            )
        })?;

        let bytes = std::fs::read(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Self::new(file_name, media_type, bytes)
    }

    /// Original file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Accepted media type.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for zero-byte files.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase hex SHA-256 of the file contents.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }

    /// Converts the selection into the multipart `image` field.
    pub fn into_part(self) -> FilePart {
        FilePart {
            field: UPLOAD_FIELD.to_string(),
            file_name: self.file_name,
            content_type: self.media_type,
            bytes: self.bytes,
        }
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Local validation failures of the upload flow.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Selected file type is not an accepted image type.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    /// Submit was triggered with nothing selected.
    #[error("no image selected")]
    NoFileSelected,
    /// Submit was triggered while a previous submission is in flight.
    #[error("an upload is already in progress")]
    InFlight,
    /// File could not be read from disk.
    #[error("unable to read {path}: {source}")]
    Read {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl UploadError {
    /// User-visible message for this failure.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::UnsupportedMediaType(_) => UNSUPPORTED_TYPE_MESSAGE.to_string(),
            UploadError::NoFileSelected => NO_FILE_MESSAGE.to_string(),
            UploadError::InFlight => "Upload already in progress.".to_string(),
            UploadError::Read { .. } => self.to_string(),
        }
    }
}
