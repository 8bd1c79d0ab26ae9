//! Template → document model normalization
//!
//! Recognized fields:
//!
//! | Section | Field | Type | Default |
//! |---|---|---|---|
//! | `Header` | `format_version`, `game_format_version` | decimal `u32` | `0` |
//! | `Header` | `build_stamp` | 8 hex bytes | zeros |
//! | `Header` | `reserved` | 20 hex bytes | zeros |
//! | `Document` | `title`, `author`, `description`, `short_description`, `website` | text | empty |
//! | `Document` | `locale` | 4-char tag | [`ModelOptions::default_locale`] |
//! | `Document` | `dependencies` | list | empty |
//! | `Attributes` / `Attributes.<locale>` | any key | text | - |
//! | `Info` | `mod_type` | text | absent |
//! | `Info` | `dependencies` | list | empty |

use data_encoding::HEXLOWER_PERMISSIVE;

use super::{
    Attribute, DependencyRef, DocumentModel, GenerationMode, ModelOptions, dedup_dependencies,
};
use crate::error::{Error, Result};
use crate::formats::header::{AUTHOR_KEY, DESC_LONG_KEY, DESC_SHORT_KEY, NAME_KEY, WEBSITE_KEY};
use crate::formats::schema::LOCALE_SIZE;
use crate::template::{Section, Template, Value};

const HEADER: &str = "Header";
const DOCUMENT: &str = "Document";
const INFO: &str = "Info";
const ATTRIBUTES: &str = "Attributes";

const HEADER_FIELDS: &[&str] = &["format_version", "game_format_version", "build_stamp", "reserved"];
const DOCUMENT_FIELDS: &[&str] = &[
    "title",
    "author",
    "description",
    "short_description",
    "website",
    "locale",
    "dependencies",
];
const INFO_FIELDS: &[&str] = &["mod_type", "dependencies"];

/// Attribute keys filled from `[Document]` fields in the document locale
const BUILT_IN_KEYS: &[&str] = &[NAME_KEY, AUTHOR_KEY, DESC_LONG_KEY, DESC_SHORT_KEY, WEBSITE_KEY];

impl DocumentModel {
    /// Build a model from a (merged) template
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming `Section.field` when a value
    /// fails conversion, or, in strict mode, when a section or field is not
    /// recognized.
    pub fn from_template(
        template: &Template,
        mode: GenerationMode,
        options: &ModelOptions,
    ) -> Result<Self> {
        check_known_fields(template, options.strict)?;

        let header = Fields::new(template.section(HEADER));
        let document = Fields::new(template.section(DOCUMENT));
        let info = Fields::new(template.section(INFO));

        let locale = match document.text("locale")? {
            Some(locale) => parse_locale(&document.qualified("locale"), locale)?,
            None => parse_locale("config.default_locale", &options.default_locale)?,
        };

        let mut dependencies = Vec::new();
        for fields in [&document, &info] {
            for (i, id) in fields.list("dependencies")?.iter().enumerate() {
                if id.trim().is_empty() {
                    return Err(Error::validation(
                        format!("{}[{i}]", fields.qualified("dependencies")),
                        "empty dependency",
                    ));
                }
                dependencies.push(DependencyRef::new(id.as_str()));
            }
        }
        if let Some(bundle) = mode.bundle() {
            dependencies.push(DependencyRef::from(bundle));
        }
        let dependencies = dedup_dependencies(dependencies);

        let model = Self {
            format_version: header.u32("format_version")?,
            game_format_version: header.u32("game_format_version")?,
            build_stamp: header.hex("build_stamp")?,
            reserved: header.hex("reserved")?,
            title: document.text_or_empty("title")?,
            author: document.text_or_empty("author")?,
            description: document.text_or_empty("description")?,
            short_description: document.text_or_empty("short_description")?,
            website: document.text_or_empty("website")?,
            attributes: extra_attributes(template, &locale, options.strict)?,
            mod_type: info.text("mod_type")?.map(str::to_string),
            locale,
            dependencies,
            mode,
        };

        tracing::debug!(
            "Built document model '{}' with {} dependencies, {} extra attributes",
            model.title,
            model.dependencies.len(),
            model.attributes.len()
        );
        Ok(model)
    }
}

/// Typed access to one section's fields
struct Fields<'a> {
    name: &'a str,
    section: Option<&'a Section>,
}

impl<'a> Fields<'a> {
    fn new(section: Option<&'a Section>) -> Self {
        Self {
            name: section.map_or("", |s| s.name.as_str()),
            section,
        }
    }

    fn qualified(&self, key: &str) -> String {
        format!("{}.{key}", self.name)
    }

    fn text(&self, key: &str) -> Result<Option<&'a str>> {
        match self.section.and_then(|s| s.get(key)) {
            None => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s)),
            Some(Value::List(_)) => Err(Error::validation(
                self.qualified(key),
                "expected a single value, found a list",
            )),
        }
    }

    fn text_or_empty(&self, key: &str) -> Result<String> {
        Ok(self.text(key)?.unwrap_or_default().to_string())
    }

    fn list(&self, key: &str) -> Result<&'a [String]> {
        match self.section.and_then(|s| s.get(key)) {
            None => Ok(&[]),
            Some(Value::List(items)) => Ok(items),
            Some(Value::Text(s)) if s.is_empty() => Ok(&[]),
            Some(Value::Text(_)) => Err(Error::validation(
                self.qualified(key),
                "expected a list of `- item` lines",
            )),
        }
    }

    /// Decimal `u32`; absent or empty means 0
    fn u32(&self, key: &str) -> Result<u32> {
        match self.text(key)?.map(str::trim) {
            None | Some("") => Ok(0),
            Some(raw) => raw.parse().map_err(|e| {
                Error::validation(self.qualified(key), format!("'{raw}' is not a valid u32: {e}"))
            }),
        }
    }

    /// Exactly `N` hex-encoded bytes (whitespace ignored); absent or empty means zeros
    fn hex<const N: usize>(&self, key: &str) -> Result<[u8; N]> {
        let raw: String = self
            .text(key)?
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if raw.is_empty() {
            return Ok([0; N]);
        }

        let bytes = HEXLOWER_PERMISSIVE.decode(raw.as_bytes()).map_err(|e| {
            Error::validation(self.qualified(key), format!("invalid hex: {e}"))
        })?;
        let len = bytes.len();
        bytes.try_into().map_err(|_| {
            Error::validation(self.qualified(key), format!("expected {N} bytes, got {len}"))
        })
    }
}

fn parse_locale(field: &str, raw: &str) -> Result<String> {
    let locale = raw.trim();
    if locale.len() == LOCALE_SIZE && locale.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(locale.to_string())
    } else {
        Err(Error::validation(
            field,
            format!("'{locale}' is not a {LOCALE_SIZE}-character locale tag (e.g. enUS)"),
        ))
    }
}

/// Attributes from `[Attributes]` (document locale) and `[Attributes.<locale>]`
///
/// A built-in key in the document locale would duplicate a `[Document]` row:
/// rejected in strict mode, dropped with a warning otherwise.
fn extra_attributes(template: &Template, document_locale: &str, strict: bool) -> Result<Vec<Attribute>> {
    let mut attributes = Vec::new();

    for section in &template.sections {
        let locale = if section.name == ATTRIBUTES {
            document_locale.to_string()
        } else if let Some(tag) = section.name.strip_prefix("Attributes.") {
            parse_locale(&section.name, tag)?
        } else {
            continue;
        };

        for (key, value) in &section.fields {
            let Value::Text(value) = value else {
                return Err(Error::validation(
                    format!("{}.{key}", section.name),
                    "attribute values cannot be lists",
                ));
            };
            if locale == document_locale && BUILT_IN_KEYS.contains(&key.as_str()) {
                let field = format!("{}.{key}", section.name);
                if strict {
                    return Err(Error::validation(
                        field,
                        "built-in attribute in the document locale; set it in [Document] instead",
                    ));
                }
                tracing::warn!("Ignoring {} (duplicates a [Document] attribute)", field);
                continue;
            }
            attributes.push(Attribute {
                key: key.clone(),
                locale: locale.clone(),
                value: value.clone(),
            });
        }
    }

    Ok(attributes)
}

/// Apply the unknown-field policy
fn check_known_fields(template: &Template, strict: bool) -> Result<()> {
    for section in &template.sections {
        let known: Option<&[&str]> = match section.name.as_str() {
            HEADER => Some(HEADER_FIELDS),
            DOCUMENT => Some(DOCUMENT_FIELDS),
            INFO => Some(INFO_FIELDS),
            name if name == ATTRIBUTES || name.starts_with("Attributes.") => continue,
            _ => None,
        };

        let unknown: Vec<String> = match known {
            None => vec![format!("[{}]", section.name)],
            Some(fields) => section
                .fields
                .keys()
                .filter(|k| !fields.contains(&k.as_str()))
                .map(|k| format!("{}.{k}", section.name))
                .collect(),
        };

        for field in unknown {
            if strict {
                return Err(Error::validation(field, "not a recognized template field"));
            }
            tracing::warn!("Ignoring unrecognized template field {}", field);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleReference;
    use crate::template::parse_template;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn build(text: &str) -> Result<DocumentModel> {
        let template = parse_template(text, "test.tmpl").unwrap();
        DocumentModel::from_template(&template, GenerationMode::Standalone, &ModelOptions::default())
    }

    fn invalid_field(result: Result<DocumentModel>) -> String {
        match result {
            Err(Error::Validation { field, .. }) => field,
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_template_defaults() {
        let model = build("").unwrap();
        assert_eq!(model, DocumentModel::default());
    }

    #[test]
    fn test_full_template() {
        let model = build(
            "[Header]
format_version = 8
game_format_version = 8
build_stamp = e1 38 01 00 e1 38 01 00

[Document]
title = My Map
author = Me
locale = deDE
dependencies =
- file:Mods/B.SC2Mod
- file:Mods/A.SC2Mod

[Attributes]
DocInfo/Custom = x

[Attributes.frFR]
DocInfo/Name = Ma Carte

[Info]
mod_type = Mod
dependencies =
- file:Mods\\B.SC2Mod
- file:Mods/C.SC2Mod
",
        )
        .unwrap();

        assert_eq!(model.format_version, 8);
        assert_eq!(model.build_stamp, [0xe1, 0x38, 0x01, 0x00, 0xe1, 0x38, 0x01, 0x00]);
        assert_eq!(model.reserved, [0; 20]);
        assert_eq!(model.title, "My Map");
        assert_eq!(model.locale, "deDE");
        assert_eq!(model.mod_type.as_deref(), Some("Mod"));
        assert_eq!(
            model.dependencies.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
            ["file:Mods/B.SC2Mod", "file:Mods/A.SC2Mod", "file:Mods/C.SC2Mod"]
        );
        assert_eq!(
            model.attributes,
            [
                Attribute { key: "DocInfo/Custom".into(), locale: "deDE".into(), value: "x".into() },
                Attribute { key: "DocInfo/Name".into(), locale: "frFR".into(), value: "Ma Carte".into() },
            ]
        );
    }

    #[test]
    fn test_non_numeric_version() {
        assert_eq!(invalid_field(build("[Header]\nformat_version = eight\n")), "Header.format_version");
        assert_eq!(invalid_field(build("[Header]\nformat_version = -1\n")), "Header.format_version");
        assert_eq!(invalid_field(build("[Header]\nformat_version = 4294967296\n")), "Header.format_version");
    }

    #[test]
    fn test_bad_hex() {
        assert_eq!(invalid_field(build("[Header]\nbuild_stamp = zz\n")), "Header.build_stamp");
        assert_eq!(invalid_field(build("[Header]\nbuild_stamp = e138\n")), "Header.build_stamp");
    }

    #[test]
    fn test_bad_locale() {
        assert_eq!(invalid_field(build("[Document]\nlocale = english\n")), "Document.locale");
        assert_eq!(invalid_field(build("[Attributes.en]\nk = v\n")), "Attributes.en");
    }

    #[test]
    fn test_list_where_text_expected() {
        assert_eq!(invalid_field(build("[Document]\ntitle =\n- a\n")), "Document.title");
    }

    #[test]
    fn test_text_where_list_expected() {
        assert_eq!(
            invalid_field(build("[Document]\ndependencies = file:Mods/A.SC2Mod\n")),
            "Document.dependencies"
        );
    }

    #[test]
    fn test_strict_rejects_unknown() {
        assert_eq!(invalid_field(build("[Document]\ntitel = typo\n")), "Document.titel");
        assert_eq!(invalid_field(build("[Extras]\nx = 1\n")), "[Extras]");
    }

    #[test]
    fn test_bundle_dependency_merges_with_equivalent_template_path() {
        let template = parse_template(
            "[Document]\ndependencies =\n- file:./Mods/MyMod.SC2Mod\n[Info]\ndependencies =\n- file:Mods/Sub/../MyMod.SC2Mod\n",
            "t",
        )
        .unwrap();
        let bundle = BundleReference {
            locator: "file:Mods\\MyMod.SC2Mod".into(),
            path: PathBuf::from("/sc2/Mods/MyMod.SC2Mod"),
            relative: "Mods/MyMod.SC2Mod".into(),
            name: "MyMod".into(),
        };

        let model = DocumentModel::from_template(
            &template,
            GenerationMode::Bundle(bundle),
            &ModelOptions::default(),
        )
        .unwrap();

        assert_eq!(
            model.dependencies.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(),
            ["file:./Mods/MyMod.SC2Mod"]
        );
    }

    #[test]
    fn test_built_in_attribute_collision() {
        let text = "[Document]\ntitle = A\n[Attributes]\nDocInfo/Name = B\n";
        assert_eq!(invalid_field(build(text)), "Attributes.DocInfo/Name");

        let template = parse_template(text, "t").unwrap();
        let options = ModelOptions {
            strict: false,
            ..ModelOptions::default()
        };
        let model = DocumentModel::from_template(&template, GenerationMode::Standalone, &options).unwrap();
        assert!(model.attributes.is_empty());
        assert_eq!(model.title, "A");
    }

    #[test]
    fn test_built_in_key_in_other_locale() {
        let model = build("[Document]\ntitle = A\n[Attributes.deDE]\nDocInfo/Name = B\n").unwrap();
        assert_eq!(
            model.attributes,
            [Attribute { key: "DocInfo/Name".into(), locale: "deDE".into(), value: "B".into() }]
        );
    }

    #[test]
    fn test_lenient_ignores_unknown() {
        let template = parse_template("[Document]\ntitel = typo\n[Extras]\nx = 1\n", "t").unwrap();
        let options = ModelOptions {
            strict: false,
            ..ModelOptions::default()
        };
        let model = DocumentModel::from_template(&template, GenerationMode::Standalone, &options).unwrap();
        assert_eq!(model.title, "");
    }
}
