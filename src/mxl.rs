//! MXL file handler — reads compressed MusicXML (.mxl) archives.
//!
//! An .mxl file is a ZIP archive containing:
//!   - META-INF/container.xml  — declares the root MusicXML file path
//!   - <rootfile>.xml          — the actual MusicXML content (e.g., score.xml)
//!   - (optional) other files  — images, sounds, etc.

use std::io::{Cursor, Read};

use log::debug;
use zip::ZipArchive;

use crate::error::ScoreError;
use crate::model::{Score, ScoreInfo};
use crate::parser;

/// Read and parse a .mxl file from raw bytes.
pub fn parse_mxl(data: &[u8]) -> Result<(Score, ScoreInfo), ScoreError> {
    let xml = extract_musicxml_from_mxl(data)?;
    parser::parse_musicxml(&xml)
}

/// Extract the MusicXML content string from .mxl bytes.
pub fn extract_musicxml_from_mxl(data: &[u8]) -> Result<String, ScoreError> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| ScoreError::Archive(format!("failed to open archive: {e}")))?;

    let root_file_path = find_root_file(&mut archive)?;
    debug!("mxl root file: {}", root_file_path);

    let mut root_file = archive
        .by_name(&root_file_path)
        .map_err(|e| ScoreError::Archive(format!("root file '{root_file_path}' not found: {e}")))?;

    let mut bytes = Vec::new();
    root_file
        .read_to_end(&mut bytes)
        .map_err(|e| ScoreError::Archive(format!("failed to read '{root_file_path}': {e}")))?;

    Ok(std::str::from_utf8(&bytes)?.to_string())
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Option<String> {
    let mut file = archive.by_name(name).ok()?;
    let mut xml = String::new();
    file.read_to_string(&mut xml).ok()?;
    Some(xml)
}

/// Root file named by META-INF/container.xml, or the first MusicXML entry
/// outside META-INF when the container is missing.
fn find_root_file(archive: &mut ZipArchive<Cursor<&[u8]>>) -> Result<String, ScoreError> {
    if let Some(xml) = read_entry(archive, "META-INF/container.xml") {
        let doc = roxmltree::Document::parse(&xml)
            .map_err(|e| ScoreError::Archive(format!("bad container.xml: {e}")))?;

        return doc
            .descendants()
            .filter(|n| n.tag_name().name() == "rootfile")
            .find_map(|n| n.attribute("full-path"))
            .map(str::to_string)
            .ok_or_else(|| ScoreError::Archive("no rootfile in container.xml".to_string()));
    }

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names
        .iter()
        .find(|name| {
            !name.starts_with("META-INF/") && (name.ends_with(".xml") || name.ends_with(".musicxml"))
        })
        .cloned()
        .ok_or_else(|| ScoreError::Archive(format!("no MusicXML file in archive: {names:?}")))
}
