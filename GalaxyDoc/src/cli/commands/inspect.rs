//! CLI command for decoding record files

use std::path::Path;

use crate::formats::{DocumentHeader, DocumentInfo, RecordKind, parse_document_header, parse_document_info};

pub fn execute(path: &Path, json: bool) -> anyhow::Result<()> {
    let data = std::fs::read(path)?;

    match RecordKind::sniff(&data) {
        Some(RecordKind::Header) => {
            let header = parse_document_header(&data)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&header)?);
            } else {
                print_header(&header);
            }
        }
        Some(RecordKind::Info) => {
            let info = parse_document_info(&String::from_utf8(data)?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_info(&info);
            }
        }
        None => anyhow::bail!(
            "{} is neither a DocumentHeader nor a DocumentInfo record",
            path.display()
        ),
    }

    Ok(())
}

fn print_header(header: &DocumentHeader) {
    println!("DocumentHeader");
    println!("  Format version:      {}", header.format_version);
    println!("  Game format version: {}", header.game_format_version);
    println!("  Build stamp:         {}", data_encoding::HEXLOWER.encode(&header.build_stamp));
    if header.reserved.iter().any(|&b| b != 0) {
        println!("  Reserved:            {}", data_encoding::HEXLOWER.encode(&header.reserved));
    }

    println!("\nDependencies ({}):", header.dependencies.len());
    for dep in &header.dependencies {
        println!("  {dep}");
    }

    println!("\nAttributes ({}):", header.attributes.len());
    for attr in &header.attributes {
        println!("  [{}] {} = {}", attr.locale, attr.key, attr.value);
    }
}

fn print_info(info: &DocumentInfo) {
    println!("DocumentInfo");
    if let Some(mod_type) = &info.mod_type {
        println!("  Mod type: {mod_type}");
    }

    println!("\nDependencies ({}):", info.dependencies.len());
    for dep in &info.dependencies {
        println!("  {dep}");
    }
}
