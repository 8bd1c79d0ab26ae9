//! Document templates
//!
//! A template is a small INI-like text file describing document metadata.
//! Sections hold `key = value` fields; a key with an empty value followed by
//! `- item` lines holds a list:
//!
//! ```text
//! # DocumentHeader.tmpl
//! [Header]
//! format_version = 8
//!
//! [Document]
//! title = "My Map"
//! dependencies =
//! - bnet:Liberty (Mod)/0.0/999,file:Mods/Liberty.SC2Mod
//! ```
//!
//! Order of sections, fields and list items is preserved.

mod parser;

pub use parser::{load_template, parse_template};

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::{Error, Result};

/// A field value as written in the template. No type coercion happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    List(Vec<String>),
}

impl Value {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            Value::Text(_) => None,
        }
    }
}

/// A named group of fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub fields: IndexMap<String, Value>,
}

impl Section {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// A parsed template: an ordered sequence of sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    /// Where the template came from, used in error messages
    pub origin: String,
    pub sections: Vec<Section>,
}

impl Template {
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            sections: Vec::new(),
        }
    }

    /// Look up a section by name
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Look up a field by section and key
    #[must_use]
    pub fn field(&self, section: &str, key: &str) -> Option<&Value> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Fold `other` into this template.
    ///
    /// Sections only present in `other` are appended in order. Fields of a
    /// same-named section are appended to the existing one; a key defined in
    /// both is a duplicate and fails as a malformed template.
    pub fn merge(&mut self, other: Template) -> Result<()> {
        for section in other.sections {
            let Some(existing) = self.sections.iter_mut().find(|s| s.name == section.name) else {
                self.sections.push(section);
                continue;
            };

            for (key, value) in section.fields {
                match existing.fields.entry(key) {
                    Entry::Occupied(entry) => {
                        return Err(Error::MalformedTemplate {
                            origin: other.origin.clone(),
                            line: 0,
                            message: format!(
                                "duplicate key '{}' in section [{}] (already defined in {})",
                                entry.key(),
                                existing.name,
                                self.origin
                            ),
                        });
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(value);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_appends_new_sections() {
        let mut header = parse_template("[Header]\nformat_version = 8\n", "DocumentHeader.tmpl").unwrap();
        let info = parse_template("[Info]\nmod_type = Mod\n", "DocumentInfo.tmpl").unwrap();

        header.merge(info).unwrap();

        let names: Vec<&str> = header.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Header", "Info"]);
        assert_eq!(header.field("Info", "mod_type").and_then(Value::as_text), Some("Mod"));
    }

    #[test]
    fn test_merge_rejects_duplicate_key() {
        let mut header = parse_template("[Document]\ntitle = A\n", "a.tmpl").unwrap();
        let info = parse_template("[Document]\ntitle = B\n", "b.tmpl").unwrap();

        let err = header.merge(info).unwrap_err();
        assert!(matches!(err, Error::MalformedTemplate { ref origin, .. } if origin == "b.tmpl"));
    }

    #[test]
    fn test_merge_joins_same_section() {
        let mut header = parse_template("[Document]\ntitle = A\n", "a.tmpl").unwrap();
        let info = parse_template("[Document]\nauthor = B\n", "b.tmpl").unwrap();

        header.merge(info).unwrap();
        let doc = header.section("Document").unwrap();
        assert_eq!(doc.fields.keys().collect::<Vec<_>>(), ["title", "author"]);
    }
}
