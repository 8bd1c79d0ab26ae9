//! Document record formats
//!
//! - [`header`] - binary `DocumentHeader` (layout in [`schema`])
//! - [`info`] - XML `DocumentInfo`
//! - [`cp437`] - string codec used by the header

pub mod cp437;
pub mod header;
pub mod info;
pub mod schema;

pub use header::{DocumentHeader, parse_document_header, read_document_header, serialize_document_header};
pub use info::{DocumentInfo, parse_document_info, read_document_info, serialize_document_info};

use std::fmt;

use serde::Serialize;

use crate::document::DocumentModel;
use crate::error::Result;

/// The two records generated for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    Header,
    Info,
}

impl RecordKind {
    /// Both kinds, in emission order
    pub const ALL: [RecordKind; 2] = [RecordKind::Header, RecordKind::Info];

    /// Output file name inside the document folder
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Header => "DocumentHeader",
            Self::Info => "DocumentInfo",
        }
    }

    /// Guess the record kind from a file's leading bytes
    #[must_use]
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(schema::HEADER_MAGIC) {
            Some(Self::Header)
        } else if data.trim_ascii_start().starts_with(b"<") {
            Some(Self::Info)
        } else {
            None
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Encoded bytes of one record. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    kind: RecordKind,
    bytes: Vec<u8>,
}

impl EncodedRecord {
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode one record of a document model
///
/// Output depends only on `model`: the same model always yields the same bytes.
///
/// # Errors
///
/// Returns [`Error::EncodingOverflow`] or [`Error::Validation`] when a field
/// does not fit the record layout.
///
/// [`Error::EncodingOverflow`]: crate::Error::EncodingOverflow
/// [`Error::Validation`]: crate::Error::Validation
pub fn encode(model: &DocumentModel, kind: RecordKind) -> Result<EncodedRecord> {
    let bytes = match kind {
        RecordKind::Header => serialize_document_header(&DocumentHeader::from_model(model))?,
        RecordKind::Info => serialize_document_info(&DocumentInfo::from_model(model))?.into_bytes(),
    };
    tracing::debug!("Encoded {} ({} bytes)", kind, bytes.len());
    Ok(EncodedRecord { kind, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff() {
        assert_eq!(RecordKind::sniff(b"H2CS\x08\0\0\0"), Some(RecordKind::Header));
        assert_eq!(RecordKind::sniff(b"<?xml version=\"1.0\"?>"), Some(RecordKind::Info));
        assert_eq!(RecordKind::sniff(b"\xEF\xBB\xBF<?xml"), None);
        assert_eq!(RecordKind::sniff(b""), None);
    }
}
