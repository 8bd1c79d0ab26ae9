//! `DocumentHeader` reading and parsing

use super::DocumentHeader;
use crate::document::Attribute;
use crate::error::{Error, Result};
use crate::formats::cp437;
use crate::formats::schema::{FieldDescriptor, FieldKind, HEADER_LAYOUT};
use byteorder::{LittleEndian, ReadBytesExt};
use indexmap::IndexMap;
use std::io::{BufRead, Cursor, Read};
use std::path::Path;

/// Upper bound on pre-allocation for counts read from untrusted input
const MAX_PREALLOC: usize = 1024;

/// A decoded field, keyed by layout field name
#[derive(Debug)]
enum Decoded {
    Magic,
    U32(u32),
    Bytes(Vec<u8>),
    Text(String),
    TextList(Vec<String>),
    Rows(Vec<Fields>),
}

type Fields = IndexMap<&'static str, Decoded>;

/// Read a `DocumentHeader` file from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, otherwise see
/// [`parse_document_header`].
///
/// [`Error::Io`]: crate::Error::Io
pub fn read_document_header<P: AsRef<Path>>(path: P) -> Result<DocumentHeader> {
    let data = std::fs::read(path)?;
    parse_document_header(&data)
}

/// Parse `DocumentHeader` bytes
///
/// # Errors
///
/// Returns [`Error::InvalidMagic`] if either magic does not match,
/// [`Error::UnexpectedEof`] on truncated input and
/// [`Error::TrailingBytes`] if data remains after the attribute table.
pub fn parse_document_header(data: &[u8]) -> Result<DocumentHeader> {
    let mut cursor = Cursor::new(data);
    let mut fields = read_layout(&mut cursor, HEADER_LAYOUT)?;

    let consumed = cursor.position() as usize;
    if consumed < data.len() {
        return Err(Error::TrailingBytes {
            count: data.len() - consumed,
        });
    }

    let attributes = match fields.shift_remove("attributes") {
        Some(Decoded::Rows(rows)) => rows
            .into_iter()
            .map(|mut row| {
                Ok(Attribute {
                    key: take_text(&mut row, "key")?,
                    locale: take_text(&mut row, "locale")?,
                    value: take_text(&mut row, "value")?,
                })
            })
            .collect::<Result<Vec<_>>>()?,
        _ => return Err(missing("attributes")),
    };

    Ok(DocumentHeader {
        format_version: take_u32(&mut fields, "format_version")?,
        game_format_version: take_u32(&mut fields, "game_format_version")?,
        build_stamp: take_array(&mut fields, "build_stamp")?,
        reserved: take_array(&mut fields, "reserved")?,
        dependencies: match fields.shift_remove("dependencies") {
            Some(Decoded::TextList(items)) => items,
            _ => return Err(missing("dependencies")),
        },
        attributes,
    })
}

fn read_layout(cursor: &mut Cursor<&[u8]>, layout: &'static [FieldDescriptor]) -> Result<Fields> {
    let mut fields = Fields::with_capacity(layout.len());

    for desc in layout {
        let name = desc.name;
        let eof = |_| Error::UnexpectedEof { field: name };

        let value = match desc.kind {
            FieldKind::Magic(expected) => {
                let mut found = vec![0u8; expected.len()];
                cursor.read_exact(&mut found).map_err(eof)?;
                if found != expected {
                    return Err(Error::InvalidMagic {
                        field: name,
                        expected,
                        found,
                    });
                }
                Decoded::Magic
            }
            FieldKind::U32 => Decoded::U32(cursor.read_u32::<LittleEndian>().map_err(eof)?),
            FieldKind::Bytes(width) => {
                let mut bytes = vec![0u8; width];
                cursor.read_exact(&mut bytes).map_err(eof)?;
                Decoded::Bytes(bytes)
            }
            FieldKind::ZStringList => {
                let count = cursor.read_u32::<LittleEndian>().map_err(eof)? as usize;
                let mut items = Vec::with_capacity(count.min(MAX_PREALLOC));
                for _ in 0..count {
                    let mut bytes = Vec::new();
                    cursor.read_until(0, &mut bytes).map_err(eof)?;
                    if bytes.pop() != Some(0) {
                        return Err(Error::UnexpectedEof { field: name });
                    }
                    items.push(cp437::decode(&bytes));
                }
                Decoded::TextList(items)
            }
            FieldKind::PrefixedString => {
                let len = usize::from(cursor.read_u16::<LittleEndian>().map_err(eof)?);
                let mut bytes = vec![0u8; len];
                cursor.read_exact(&mut bytes).map_err(eof)?;
                Decoded::Text(cp437::decode(&bytes))
            }
            FieldKind::ReversedString(width) => {
                let mut bytes = vec![0u8; width];
                cursor.read_exact(&mut bytes).map_err(eof)?;
                Decoded::Text(cp437::decode(&bytes).chars().rev().collect())
            }
            FieldKind::Table(row_layout) => {
                let count = cursor.read_u32::<LittleEndian>().map_err(eof)? as usize;
                let mut rows = Vec::with_capacity(count.min(MAX_PREALLOC));
                for _ in 0..count {
                    rows.push(read_layout(cursor, row_layout)?);
                }
                Decoded::Rows(rows)
            }
        };

        fields.insert(name, value);
    }

    Ok(fields)
}

fn missing(field: &'static str) -> Error {
    Error::UnexpectedEof { field }
}

fn take_u32(fields: &mut Fields, name: &'static str) -> Result<u32> {
    match fields.shift_remove(name) {
        Some(Decoded::U32(v)) => Ok(v),
        _ => Err(missing(name)),
    }
}

fn take_text(fields: &mut Fields, name: &'static str) -> Result<String> {
    match fields.shift_remove(name) {
        Some(Decoded::Text(s)) => Ok(s),
        _ => Err(missing(name)),
    }
}

fn take_array<const N: usize>(fields: &mut Fields, name: &'static str) -> Result<[u8; N]> {
    match fields.shift_remove(name) {
        Some(Decoded::Bytes(bytes)) => bytes.try_into().map_err(|_| missing(name)),
        _ => Err(missing(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::header::serialize_document_header;
    use pretty_assertions::assert_eq;

    fn sample() -> DocumentHeader {
        DocumentHeader {
            format_version: 8,
            game_format_version: 8,
            build_stamp: [0xe1, 0x38, 0x01, 0x00, 0xe1, 0x38, 0x01, 0x00],
            reserved: [7; 20],
            dependencies: vec![
                "bnet:Liberty (Mod)/0.0/999,file:Mods/Liberty.SC2Mod".into(),
                "file:Mods/MyMod.SC2Mod".into(),
            ],
            attributes: vec![
                Attribute {
                    key: "DocInfo/Name".into(),
                    locale: "enUS".into(),
                    value: "Caf\u{00E9} Wars".into(),
                },
                Attribute {
                    key: "DocInfo/Name".into(),
                    locale: "deDE".into(),
                    value: String::new(),
                },
            ],
        }
    }

    #[test]
    fn test_parse_written_header() {
        let header = sample();
        let bytes = serialize_document_header(&header).unwrap();
        assert_eq!(parse_document_header(&bytes).unwrap(), header);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = serialize_document_header(&sample()).unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            parse_document_header(&bytes),
            Err(Error::InvalidMagic { field: "magic", .. })
        ));
    }

    #[test]
    fn test_bad_game_magic() {
        let mut bytes = serialize_document_header(&sample()).unwrap();
        bytes[8] = b'3';
        assert!(matches!(
            parse_document_header(&bytes),
            Err(Error::InvalidMagic { field: "game_magic", .. })
        ));
    }

    #[test]
    fn test_truncated() {
        let bytes = serialize_document_header(&sample()).unwrap();
        for cut in [0, 3, 20, 45, bytes.len() - 1] {
            assert!(
                matches!(parse_document_header(&bytes[..cut]), Err(Error::UnexpectedEof { .. })),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = serialize_document_header(&sample()).unwrap();
        bytes.extend_from_slice(b"xx");
        assert!(matches!(
            parse_document_header(&bytes),
            Err(Error::TrailingBytes { count: 2 })
        ));
    }
}
