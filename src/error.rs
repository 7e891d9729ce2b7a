//! Error types for pgen.
//!
//! The particle model and the simulation driver cannot fail. Errors only come
//! from the boundary: loading a parameter file, or writing an image, a
//! parameter file or a GIF.

use thiserror::Error;

/// Errors that can occur while saving or loading a parameter file.
#[derive(Error, Debug)]
pub enum ParamsError {
    /// A required key is absent from the parameter file.
    #[error("Missing required field `{0}` in parameter file")]
    MissingField(String),
    /// A key is present but its value has the wrong shape.
    #[error("Malformed value for `{field}`: {reason}")]
    MalformedValue { field: String, reason: String },
    /// The file could not be read or written.
    #[error("Failed to access parameter file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ParamsError {
    fn from(e: serde_json::Error) -> Self {
        ParamsError::MalformedValue {
            field: "<document>".into(),
            reason: e.to_string(),
        }
    }
}

/// Errors that can occur when exporting frames.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing has been rendered yet.
    #[error("No image to save: no frame has been rendered yet")]
    NoActiveFrame,
    /// A GIF recording is already in progress.
    #[error("Already recording a GIF")]
    AlreadyRecording,
    /// The image or GIF encoder failed.
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    /// The output file could not be written.
    #[error("Failed to write output file: {0}")]
    Io(#[from] std::io::Error),
}

/// Any error surfaced by a [`Session`](crate::Session).
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
