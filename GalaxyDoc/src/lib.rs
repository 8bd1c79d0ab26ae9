//! # GalaxyDoc
//!
//! Generates the metadata records of a StarCraft II document bundle
//! (`.SC2Map` / `.SC2Mod` folder) from human-authored templates.
//!
//! ## Records
//!
//! - **DocumentHeader** - binary: magics, version words, dependency list and
//!   a table of localized attributes
//! - **DocumentInfo** - XML: mod type and dependency list
//!
//! ## Quick Start
//!
//! ```no_run
//! use galaxydoc::generator::{GenerateRequest, generate};
//!
//! // Standalone: templates only
//! let report = generate(&GenerateRequest::new("templates/", "out/"))?;
//! println!("Wrote {} records", report.records.len());
//!
//! // With a dependency on a local bundle
//! let request = GenerateRequest::new("templates/", "out/").with_locator("file:Mods/MyMod.SC2Mod");
//! generate(&request)?;
//! # Ok::<(), galaxydoc::Error>(())
//! ```
//!
//! ### Reading Records Back
//!
//! ```no_run
//! use galaxydoc::formats::read_document_header;
//!
//! let header = read_document_header("out/DocumentHeader")?;
//! println!("{} by {}", header.title().unwrap_or("?"), header.author().unwrap_or("?"));
//! # Ok::<(), galaxydoc::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `galaxydoc` command-line binary

pub mod bundle;
pub mod config;
pub mod document;
pub mod emit;
pub mod error;
pub mod formats;
pub mod generator;
pub mod template;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::bundle::{BundleReference, locate_bundle};
    pub use crate::config::GeneratorConfig;
    pub use crate::document::{Attribute, DocumentModel, GenerationMode, ModelOptions};
    pub use crate::emit::{emit_records, write_atomic};
    pub use crate::error::{Error, Result};
    pub use crate::formats::{
        DocumentHeader, DocumentInfo, EncodedRecord, RecordKind, encode, parse_document_header,
        parse_document_info, read_document_header, read_document_info,
    };
    pub use crate::generator::{
        GenerateRequest, GenerationReport, Mismatch, compare_bytes, compare_outputs, generate,
    };
    pub use crate::template::{Template, load_template, parse_template};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
