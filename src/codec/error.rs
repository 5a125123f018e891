//! Error types for encoding and decoding.

use std::io;

use crate::schema::ConfigError;

/// Errors produced while writing an animation set.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Invalid codec configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Frame {frame} of animation {animation:?} references an image missing from the image table")]
    UnindexedImage { animation: String, frame: usize },
}

/// Broad category of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The file could not be read.
    Io,
    /// Elements appear in an order the format does not allow.
    Structural,
    /// A value is missing or cannot be parsed.
    Format,
    /// A frame points at an image id that was never defined.
    Reference,
}

/// Errors produced while reading an animation set.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid codec configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document has no <animset> root element")]
    MissingRoot,
    #[error("Expected <animset> root element, found <{0}>")]
    UnexpectedRoot(String),
    #[error("<frame> outside of any <anim> element")]
    FrameOutsideAnimation,
    #[error("<anim id={inner:?}> opened inside <anim id={outer:?}>")]
    NestedAnimation { outer: String, inner: String },
    #[error("Document ended before </{0}> was closed")]
    Truncated(String),

    #[error("<{element}> is missing required attribute {attribute:?}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("<{element}> attribute {attribute:?} has invalid number {value:?}")]
    InvalidNumber {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    #[error("<{element}> attribute {attribute:?} must be two comma-separated numbers, got {value:?}")]
    InvalidPair {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    #[error("Image id {0} is defined more than once")]
    DuplicateImage(u32),
    #[error("Animation {0:?} is defined more than once")]
    DuplicateAnimation(String),

    #[error("<frame> references undefined image id {0}")]
    UnknownImage(u32),
}

impl DecodeError {
    /// The category this error belongs to.
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::Io(_) => DecodeErrorKind::Io,
            DecodeError::MissingRoot
            | DecodeError::UnexpectedRoot(_)
            | DecodeError::FrameOutsideAnimation
            | DecodeError::NestedAnimation { .. }
            | DecodeError::Truncated(_) => DecodeErrorKind::Structural,
            DecodeError::Config(_)
            | DecodeError::Xml(_)
            | DecodeError::MissingAttribute { .. }
            | DecodeError::InvalidNumber { .. }
            | DecodeError::InvalidPair { .. }
            | DecodeError::DuplicateImage(_)
            | DecodeError::DuplicateAnimation(_) => DecodeErrorKind::Format,
            DecodeError::UnknownImage(_) => DecodeErrorKind::Reference,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for DecodeError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        DecodeError::Xml(e.into())
    }
}
