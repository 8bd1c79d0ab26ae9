//! `DocumentHeader` writing

use super::DocumentHeader;
use crate::document::Attribute;
use crate::error::{Error, Result};
use crate::formats::cp437;
use crate::formats::schema::{FieldDescriptor, FieldKind, HEADER_LAYOUT};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// Values the writer pulls out of a record, keyed by layout field name
enum FieldValue<'a> {
    U32(u32),
    Bytes(&'a [u8]),
    Text(&'a str),
    TextList(&'a [String]),
    Rows(Vec<&'a dyn FieldSource>),
}

/// Something that supplies values for a layout
trait FieldSource {
    fn field_value(&self, name: &str) -> Option<FieldValue<'_>>;
}

impl FieldSource for DocumentHeader {
    fn field_value(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "format_version" => FieldValue::U32(self.format_version),
            "game_format_version" => FieldValue::U32(self.game_format_version),
            "build_stamp" => FieldValue::Bytes(&self.build_stamp),
            "reserved" => FieldValue::Bytes(&self.reserved),
            "dependencies" => FieldValue::TextList(&self.dependencies),
            "attributes" => FieldValue::Rows(
                self.attributes
                    .iter()
                    .map(|a| a as &dyn FieldSource)
                    .collect(),
            ),
            _ => return None,
        })
    }
}

impl FieldSource for Attribute {
    fn field_value(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "key" => FieldValue::Text(&self.key),
            "locale" => FieldValue::Text(&self.locale),
            "value" => FieldValue::Text(&self.value),
            _ => return None,
        })
    }
}

/// Serialize a `DocumentHeader` to bytes
///
/// # Errors
///
/// Returns [`Error::EncodingOverflow`] if a string or count does not fit its
/// length prefix, and [`Error::Validation`] if a string has no CP437
/// representation, a dependency contains NUL, or a locale is not 4 bytes.
pub fn serialize_document_header(header: &DocumentHeader) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_layout(&mut out, HEADER_LAYOUT, header, "")?;
    Ok(out)
}

fn write_layout<W: Write>(
    writer: &mut W,
    layout: &[FieldDescriptor],
    source: &dyn FieldSource,
    prefix: &str,
) -> Result<()> {
    for desc in layout {
        let name = format!("{prefix}{}", desc.name);

        if let FieldKind::Magic(bytes) = desc.kind {
            writer.write_all(bytes)?;
            continue;
        }

        let value = source
            .field_value(desc.name)
            .ok_or_else(|| Error::validation(&name, "no value supplied for layout field"))?;

        match (desc.kind, value) {
            (FieldKind::U32, FieldValue::U32(v)) => writer.write_u32::<LittleEndian>(v)?,
            (FieldKind::Bytes(width), FieldValue::Bytes(bytes)) => {
                if bytes.len() != width {
                    return Err(Error::validation(
                        &name,
                        format!("expected {width} bytes, got {}", bytes.len()),
                    ));
                }
                writer.write_all(bytes)?;
            }
            (FieldKind::ZStringList, FieldValue::TextList(items)) => {
                writer.write_u32::<LittleEndian>(count_u32(&name, items.len(), desc.kind)?)?;
                for (i, item) in items.iter().enumerate() {
                    let item_name = format!("{name}[{i}]");
                    let bytes = encode_text(&item_name, item)?;
                    if bytes.contains(&0) {
                        return Err(Error::validation(item_name, "contains a NUL character"));
                    }
                    writer.write_all(&bytes)?;
                    writer.write_u8(0)?;
                }
            }
            (FieldKind::PrefixedString, FieldValue::Text(text)) => {
                let bytes = encode_text(&name, text)?;
                let len = u16::try_from(bytes.len()).map_err(|_| Error::EncodingOverflow {
                    field: name.clone(),
                    len: bytes.len(),
                    max: desc.kind.max_len(),
                })?;
                writer.write_u16::<LittleEndian>(len)?;
                writer.write_all(&bytes)?;
            }
            (FieldKind::ReversedString(width), FieldValue::Text(text)) => {
                let reversed: String = text.chars().rev().collect();
                let bytes = encode_text(&name, &reversed)?;
                if bytes.len() > width {
                    return Err(Error::EncodingOverflow {
                        field: name,
                        len: bytes.len(),
                        max: width,
                    });
                }
                if bytes.len() < width {
                    return Err(Error::validation(
                        name,
                        format!("expected exactly {width} characters, got {}", bytes.len()),
                    ));
                }
                writer.write_all(&bytes)?;
            }
            (FieldKind::Table(row_layout), FieldValue::Rows(rows)) => {
                writer.write_u32::<LittleEndian>(count_u32(&name, rows.len(), desc.kind)?)?;
                for (i, row) in rows.into_iter().enumerate() {
                    write_layout(writer, row_layout, row, &format!("{name}[{i}]."))?;
                }
            }
            _ => {
                return Err(Error::validation(name, "value does not match layout field kind"));
            }
        }
    }
    Ok(())
}

fn encode_text(field: &str, text: &str) -> Result<Vec<u8>> {
    cp437::encode(text).map_err(|c| {
        Error::validation(field, format!("character {c:?} cannot be encoded as CP437"))
    })
}

fn count_u32(field: &str, len: usize, kind: FieldKind) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::EncodingOverflow {
        field: field.to_string(),
        len,
        max: kind.max_len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DocumentHeader {
        DocumentHeader {
            format_version: 8,
            game_format_version: 8,
            build_stamp: [0xe1, 0x38, 0x01, 0x00, 0xe1, 0x38, 0x01, 0x00],
            reserved: [0; 20],
            dependencies: vec!["file:Mods/A.SC2Mod".into()],
            attributes: vec![Attribute {
                key: "DocInfo/Name".into(),
                locale: "enUS".into(),
                value: "Hi".into(),
            }],
        }
    }

    #[test]
    fn test_exact_bytes() {
        let bytes = serialize_document_header(&sample()).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"H2CS");
        expected.extend_from_slice(&8u32.to_le_bytes());
        expected.extend_from_slice(b"2S\0\0");
        expected.extend_from_slice(&8u32.to_le_bytes());
        expected.extend_from_slice(&[0xe1, 0x38, 0x01, 0x00, 0xe1, 0x38, 0x01, 0x00]);
        expected.extend_from_slice(&[0; 20]);
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(b"file:Mods/A.SC2Mod\0");
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&12u16.to_le_bytes());
        expected.extend_from_slice(b"DocInfo/Name");
        expected.extend_from_slice(b"SUne");
        expected.extend_from_slice(&2u16.to_le_bytes());
        expected.extend_from_slice(b"Hi");

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_value_overflow() {
        let mut header = sample();
        header.attributes[0].value = "x".repeat(usize::from(u16::MAX) + 1);

        let err = serialize_document_header(&header).unwrap_err();
        assert!(matches!(
            err,
            Error::EncodingOverflow { ref field, len: 65536, max: 65535 } if field == "attributes[0].value"
        ));
    }

    #[test]
    fn test_value_at_limit_fits() {
        let mut header = sample();
        header.attributes[0].value = "x".repeat(usize::from(u16::MAX));
        assert!(serialize_document_header(&header).is_ok());
    }

    #[test]
    fn test_locale_too_long() {
        let mut header = sample();
        header.attributes[0].locale = "enUSX".into();
        let err = serialize_document_header(&header).unwrap_err();
        assert!(matches!(err, Error::EncodingOverflow { max: 4, .. }));
    }

    #[test]
    fn test_dependency_with_nul() {
        let mut header = sample();
        header.dependencies.push("bad\0dep".into());
        let err = serialize_document_header(&header).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "dependencies[1]"));
    }

    #[test]
    fn test_unencodable_text() {
        let mut header = sample();
        header.attributes[0].value = "\u{4E2D}".into();
        assert!(matches!(
            serialize_document_header(&header),
            Err(Error::Validation { .. })
        ));
    }
}
