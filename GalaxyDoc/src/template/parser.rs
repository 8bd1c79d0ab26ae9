//! Line-oriented template parser

use super::{Section, Template, Value};
use crate::error::{Error, Result};
use indexmap::map::Entry;
use std::fs;
use std::path::Path;

/// Read and parse a template file
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read.
/// Returns [`Error::MalformedTemplate`] on any syntax violation.
///
/// [`Error::Io`]: crate::Error::Io
/// [`Error::MalformedTemplate`]: crate::Error::MalformedTemplate
pub fn load_template<P: AsRef<Path>>(path: P) -> Result<Template> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let origin = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    tracing::debug!("Parsing template {}", path.display());
    parse_template(&text, &origin)
}

/// Parse template text
///
/// `origin` labels the template in error messages.
///
/// # Errors
///
/// Returns [`Error::MalformedTemplate`] for an unterminated or duplicate
/// section header, a duplicate key, a list item without an open list key,
/// an unterminated quoted value, or any unrecognized line.
pub fn parse_template(text: &str, origin: &str) -> Result<Template> {
    let mut parser = Parser {
        origin,
        template: Template::new(origin),
        open_list: None,
    };

    for (index, raw) in text.lines().enumerate() {
        parser.line(index + 1, raw)?;
    }

    Ok(parser.template)
}

struct Parser<'a> {
    origin: &'a str,
    template: Template,
    /// Key in the current section that accepts `- item` lines
    open_list: Option<String>,
}

fn malformed(origin: &str, line: usize, message: impl Into<String>) -> Error {
    Error::MalformedTemplate {
        origin: origin.to_string(),
        line,
        message: message.into(),
    }
}

impl Parser<'_> {
    fn error(&self, line: usize, message: impl Into<String>) -> Error {
        malformed(self.origin, line, message)
    }

    fn line(&mut self, line_no: usize, raw: &str) -> Result<()> {
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix('[') {
            return self.section_header(line_no, rest);
        }

        if let Some(item) = line.strip_prefix('-') {
            return self.list_item(line_no, item);
        }

        if let Some((key, value)) = line.split_once('=') {
            return self.field(line_no, key.trim(), value.trim());
        }

        Err(self.error(line_no, format!("expected `key = value`, found '{line}'")))
    }

    fn section_header(&mut self, line_no: usize, rest: &str) -> Result<()> {
        let Some(name) = rest.strip_suffix(']') else {
            return Err(self.error(line_no, "unterminated section header"));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(self.error(line_no, "empty section name"));
        }
        if name.contains(['[', ']']) {
            return Err(self.error(line_no, format!("invalid section name '{name}'")));
        }
        if self.template.section(name).is_some() {
            return Err(self.error(line_no, format!("duplicate section [{name}]")));
        }

        self.template.sections.push(Section::new(name));
        self.open_list = None;
        Ok(())
    }

    fn field(&mut self, line_no: usize, key: &str, raw_value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(self.error(line_no, "missing key before '='"));
        }

        let value = unquote(raw_value).map_err(|msg| self.error(line_no, msg))?;
        let opens_list = raw_value.is_empty();

        let origin = self.origin;
        let Some(section) = self.template.sections.last_mut() else {
            return Err(malformed(origin, line_no, format!("field '{key}' outside of a section")));
        };

        match section.fields.entry(key.to_string()) {
            Entry::Occupied(_) => {
                return Err(malformed(
                    origin,
                    line_no,
                    format!("duplicate key '{key}' in section [{}]", section.name),
                ));
            }
            Entry::Vacant(entry) => {
                entry.insert(Value::Text(value));
            }
        }

        self.open_list = opens_list.then(|| key.to_string());
        Ok(())
    }

    fn list_item(&mut self, line_no: usize, item: &str) -> Result<()> {
        let Some(key) = self.open_list.clone() else {
            return Err(self.error(line_no, "list item without a preceding `key =` line"));
        };
        let item = unquote(item.trim()).map_err(|msg| self.error(line_no, msg))?;

        let origin = self.origin;
        let slot = self
            .template
            .sections
            .last_mut()
            .and_then(|s| s.fields.get_mut(&key))
            .ok_or_else(|| malformed(origin, line_no, "list item without a preceding `key =` line"))?;

        match slot {
            Value::List(items) => items.push(item),
            Value::Text(_) => *slot = Value::List(vec![item]),
        }
        Ok(())
    }
}

/// Strip optional double quotes, resolving `\"`, `\\`, `\n` and `\t` inside them
fn unquote(raw: &str) -> std::result::Result<String, String> {
    let Some(inner) = raw.strip_prefix('"') else {
        return Ok(raw.to_string());
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                let rest = chars.as_str().trim();
                if !rest.is_empty() && !rest.starts_with('#') {
                    return Err(format!("unexpected text after closing quote: '{rest}'"));
                }
                return Ok(out);
            }
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => return Err(format!("unknown escape '\\{other}'")),
                None => break,
            },
            _ => out.push(c),
        }
    }

    Err("unterminated quoted value".to_string())
}
