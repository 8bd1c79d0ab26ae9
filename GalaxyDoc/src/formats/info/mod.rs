//! `DocumentInfo` record
//!
//! Unlike the header, `DocumentInfo` is an XML document. The editor writes it
//! with a fixed declaration, 4-space indentation and CRLF line endings, which
//! is reproduced exactly:
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <DocInfo>
//!     <ModType>
//!         <Value>Mod</Value>
//!     </ModType>
//!     <Dependencies>
//!         <Value>file:Mods/MyMod.SC2Mod</Value>
//!     </Dependencies>
//! </DocInfo>
//! ```

mod reader;
mod writer;

pub use reader::{parse_document_info, read_document_info};
pub use writer::serialize_document_info;

use serde::Serialize;

use crate::document::DocumentModel;

/// Field values of a `DocumentInfo` record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub mod_type: Option<String>,
    pub dependencies: Vec<String>,
}

impl DocumentInfo {
    #[must_use]
    pub fn from_model(model: &DocumentModel) -> Self {
        Self {
            mod_type: model.mod_type.clone(),
            dependencies: model.dependencies.iter().map(|d| d.id.clone()).collect(),
        }
    }
}
