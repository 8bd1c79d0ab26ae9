//! `DocumentInfo` reading

use super::DocumentInfo;
use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs;
use std::path::Path;

/// Read a `DocumentInfo` file from disk
///
/// # Errors
/// Returns an error if the file cannot be read or has invalid XML.
pub fn read_document_info<P: AsRef<Path>>(path: P) -> Result<DocumentInfo> {
    let content = fs::read_to_string(path)?;
    parse_document_info(&content)
}

/// Parse `DocumentInfo` XML
///
/// Elements other than `ModType` and `Dependencies` are skipped.
///
/// # Errors
/// Returns an error if the XML is malformed or the root is not `<DocInfo>`.
pub fn parse_document_info(content: &str) -> Result<DocumentInfo> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut info = DocumentInfo::default();
    let mut buf = Vec::new();
    // Element names from the root down to the current element
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();
                if path.is_empty() {
                    check_root(&name)?;
                    saw_root = true;
                }
                path.push(name);
            }
            Ok(Event::Empty(e)) => {
                if path.is_empty() {
                    check_root(e.name().as_ref())?;
                    saw_root = true;
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape()?.into_owned();
                match path.iter().map(Vec::as_slice).collect::<Vec<_>>().as_slice() {
                    [b"DocInfo", b"ModType", b"Value"] => info.mod_type = Some(text),
                    [b"DocInfo", b"Dependencies", b"Value"] => info.dependencies.push(text),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(Error::validation("DocInfo", "missing <DocInfo> root element"));
    }

    Ok(info)
}

fn check_root(name: &[u8]) -> Result<()> {
    if name == b"DocInfo" {
        Ok(())
    } else {
        Err(Error::validation(
            "DocInfo",
            format!("unexpected root element <{}>", String::from_utf8_lossy(name)),
        ))
    }
}
