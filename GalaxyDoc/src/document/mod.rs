//! Document model
//!
//! The validated, normalized form of a template, ready for encoding. Built by
//! [`DocumentModel::from_template`]; see [`builder`] for the recognized
//! template fields.

pub mod builder;
mod dependency;

pub use dependency::{DependencyRef, dedup_dependencies};

use serde::Serialize;

use crate::bundle::BundleReference;
use crate::formats::schema::{BUILD_STAMP_SIZE, RESERVED_SIZE};

/// Locale used when neither the template nor the config names one
pub const DEFAULT_LOCALE: &str = "enUS";

/// Whether a bundle dependency is injected into the generated records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationMode {
    /// Templates only
    #[default]
    Standalone,
    /// Templates plus a dependency on the given bundle
    Bundle(BundleReference),
}

impl GenerationMode {
    #[must_use]
    pub fn bundle(&self) -> Option<&BundleReference> {
        match self {
            Self::Standalone => None,
            Self::Bundle(bundle) => Some(bundle),
        }
    }
}

/// A localized key/value attribute of the document header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub key: String,
    /// Four-character locale tag, e.g. `enUS`
    pub locale: String,
    pub value: String,
}

/// Options that steer model construction
#[derive(Debug, Clone)]
pub struct ModelOptions {
    /// Reject unrecognized sections and fields instead of ignoring them
    pub strict: bool,
    /// Locale for `[Document]` text and `[Attributes]` when the template has none
    pub default_locale: String,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            strict: true,
            default_locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// Normalized document metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentModel {
    pub mode: GenerationMode,
    pub format_version: u32,
    pub game_format_version: u32,
    pub build_stamp: [u8; BUILD_STAMP_SIZE],
    pub reserved: [u8; RESERVED_SIZE],
    pub title: String,
    pub author: String,
    pub description: String,
    pub short_description: String,
    pub website: String,
    pub locale: String,
    /// Extra header attributes, in template order
    pub attributes: Vec<Attribute>,
    pub mod_type: Option<String>,
    /// Deduplicated, in first-seen order
    pub dependencies: Vec<DependencyRef>,
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self {
            mode: GenerationMode::Standalone,
            format_version: 0,
            game_format_version: 0,
            build_stamp: [0; BUILD_STAMP_SIZE],
            reserved: [0; RESERVED_SIZE],
            title: String::new(),
            author: String::new(),
            description: String::new(),
            short_description: String::new(),
            website: String::new(),
            locale: DEFAULT_LOCALE.to_string(),
            attributes: Vec::new(),
            mod_type: None,
            dependencies: Vec::new(),
        }
    }
}
