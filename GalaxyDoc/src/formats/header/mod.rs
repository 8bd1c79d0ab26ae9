//! `DocumentHeader` binary record
//!
//! ```text
//! "H2CS" | u32 format_version | "2S\0\0" | u32 game_format_version
//! [8] build_stamp | [20] reserved
//! u32 n | n x (cp437 string, NUL)                        dependencies
//! u32 m | m x (u16 len, key | [4] locale reversed | u16 len, value)
//! ```
//!
//! The authoritative layout is [`HEADER_LAYOUT`](super::schema::HEADER_LAYOUT).

mod reader;
mod writer;

pub use reader::{parse_document_header, read_document_header};
pub use writer::serialize_document_header;

use serde::{Serialize, Serializer};

use super::schema::{BUILD_STAMP_SIZE, RESERVED_SIZE};
use crate::document::{Attribute, DocumentModel};

/// Attribute key holding the document title
pub const NAME_KEY: &str = "DocInfo/Name";
/// Attribute key holding the author
pub const AUTHOR_KEY: &str = "DocInfo/Author";
/// Attribute key holding the long description
pub const DESC_LONG_KEY: &str = "DocInfo/DescLong";
/// Attribute key holding the short description
pub const DESC_SHORT_KEY: &str = "DocInfo/DescShort";
/// Attribute key holding the website
pub const WEBSITE_KEY: &str = "DocInfo/Website";

/// Field values of a `DocumentHeader` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentHeader {
    pub format_version: u32,
    pub game_format_version: u32,
    #[serde(serialize_with = "as_hex")]
    pub build_stamp: [u8; BUILD_STAMP_SIZE],
    #[serde(serialize_with = "as_hex")]
    pub reserved: [u8; RESERVED_SIZE],
    pub dependencies: Vec<String>,
    pub attributes: Vec<Attribute>,
}

impl DocumentHeader {
    /// Build the header record for a document model
    ///
    /// Well-known attributes come first, in a fixed order and only when set,
    /// followed by the template's extra attributes in template order.
    #[must_use]
    pub fn from_model(model: &DocumentModel) -> Self {
        let well_known = [
            (NAME_KEY, &model.title),
            (AUTHOR_KEY, &model.author),
            (DESC_LONG_KEY, &model.description),
            (DESC_SHORT_KEY, &model.short_description),
            (WEBSITE_KEY, &model.website),
        ];

        let attributes = well_known
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| Attribute {
                key: key.to_string(),
                locale: model.locale.clone(),
                value: value.clone(),
            })
            .chain(model.attributes.iter().cloned())
            .collect();

        Self {
            format_version: model.format_version,
            game_format_version: model.game_format_version,
            build_stamp: model.build_stamp,
            reserved: model.reserved,
            dependencies: model.dependencies.iter().map(|d| d.id.clone()).collect(),
            attributes,
        }
    }

    /// Value of the first attribute with `key`, in any locale
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.attribute(NAME_KEY)
    }

    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.attribute(AUTHOR_KEY)
    }
}

fn as_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&data_encoding::HEXLOWER.encode(bytes))
}
