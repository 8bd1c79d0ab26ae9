//! `DocumentInfo` writing

use super::DocumentInfo;
use crate::error::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// Serialize a `DocumentInfo` to its exact on-disk text
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_document_info(info: &DocumentInfo) -> Result<String> {
    let mut output = Vec::new();
    let mut writer = Writer::new_with_indent(&mut output, b' ', 4);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("DocInfo")))?;

    if let Some(ref mod_type) = info.mod_type {
        writer.write_event(Event::Start(BytesStart::new("ModType")))?;
        write_value(&mut writer, mod_type)?;
        writer.write_event(Event::End(BytesEnd::new("ModType")))?;
    }

    if info.dependencies.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("Dependencies")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("Dependencies")))?;
        for dependency in &info.dependencies {
            write_value(&mut writer, dependency)?;
        }
        writer.write_event(Event::End(BytesEnd::new("Dependencies")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("DocInfo")))?;
    output.push(b'\n');

    let xml = String::from_utf8(output)?;
    // The editor writes Windows line endings
    Ok(xml.replace('\n', "\r\n"))
}

fn write_value<W: std::io::Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("Value")))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("Value")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exact_text() {
        let info = DocumentInfo {
            mod_type: Some("Mod".into()),
            dependencies: vec![
                "bnet:Liberty (Mod)/0.0/999,file:Mods/Liberty.SC2Mod".into(),
                "file:Mods/MyMod.SC2Mod".into(),
            ],
        };

        let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n\
<DocInfo>\r\n\
\x20   <ModType>\r\n\
\x20       <Value>Mod</Value>\r\n\
\x20   </ModType>\r\n\
\x20   <Dependencies>\r\n\
\x20       <Value>bnet:Liberty (Mod)/0.0/999,file:Mods/Liberty.SC2Mod</Value>\r\n\
\x20       <Value>file:Mods/MyMod.SC2Mod</Value>\r\n\
\x20   </Dependencies>\r\n\
</DocInfo>\r\n";

        assert_eq!(serialize_document_info(&info).unwrap(), expected);
    }

    #[test]
    fn test_no_dependencies() {
        let xml = serialize_document_info(&DocumentInfo::default()).unwrap();
        assert!(xml.contains("<Dependencies/>"));
        assert!(!xml.contains("ModType"));
        assert!(!xml.contains("\r\r"));
    }

    #[test]
    fn test_escapes_markup() {
        let info = DocumentInfo {
            mod_type: Some("A&B".into()),
            dependencies: Vec::new(),
        };
        let xml = serialize_document_info(&info).unwrap();
        assert!(xml.contains("<Value>A&amp;B</Value>"));
    }
}
