//! Error types for `GalaxyDoc`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `GalaxyDoc` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing an output record failed. Nothing was committed at `path`.
    #[error("failed to write {}: {source}", path.display())]
    Emit {
        /// The target output path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    // ==================== Template Errors ====================
    /// The template text violates the template grammar.
    #[error("malformed template {origin}:{line}: {message}")]
    MalformedTemplate {
        /// File name (or other label) of the template.
        origin: String,
        /// 1-based line number.
        line: usize,
        /// Description of the syntax violation.
        message: String,
    },

    // ==================== Bundle Errors ====================
    /// The bundle locator is invalid or names a path that does not exist.
    #[error("cannot resolve bundle '{locator}': {reason}")]
    UnresolvableBundle {
        /// The locator as given.
        locator: String,
        /// Why it could not be resolved.
        reason: String,
    },

    // ==================== Model Errors ====================
    /// A field is missing or has a value that cannot be converted.
    #[error("invalid field {field}: {message}")]
    Validation {
        /// Qualified field name (`Section.field`).
        field: String,
        /// Description of what is invalid.
        message: String,
    },

    // ==================== Encoding Errors ====================
    /// A value does not fit the fixed record layout.
    #[error("field {field} is too large: {len} exceeds maximum {max}")]
    EncodingOverflow {
        /// Layout field name.
        field: String,
        /// The length that was requested.
        len: usize,
        /// The largest length the layout can express.
        max: usize,
    },

    // ==================== Decoding Errors ====================
    /// A magic field did not match the expected constant.
    #[error("invalid {field} magic: expected {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Layout field name.
        field: &'static str,
        /// The expected bytes.
        expected: &'static [u8],
        /// The bytes found in the input.
        found: Vec<u8>,
    },

    /// Unexpected end of file.
    #[error("unexpected end of file while reading {field}")]
    UnexpectedEof {
        /// Layout field being read.
        field: &'static str,
    },

    /// The record decoded cleanly but bytes remain after it.
    #[error("{count} trailing bytes after record")]
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

// Add conversion from quick_xml::events::attributes::AttrError
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] on `field`.
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for `GalaxyDoc` operations.
pub type Result<T> = std::result::Result<T, Error>;
