//! Integration tests — parse the sample files in the sheetmusic/ directory.

use pretty_assertions::assert_eq;
use snlayout::{parse_bytes, parse_file, KeySignature, Note, Score, ScoreError, ScoreInfo, Tie, TimeSignature};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Get the path to the sheetmusic directory.
fn sheetmusic_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("sheetmusic")
}

fn etude_path() -> PathBuf {
    sheetmusic_dir().join("little-etude.musicxml")
}

// ─── Uncompressed MusicXML (.musicxml) ──────────────────────────────

#[test]
fn parse_little_etude_musicxml() {
    let (score, info) = parse_file(etude_path()).expect("Failed to parse little-etude.musicxml");
    assert_info(&info);
    assert_score(&score);
}

fn assert_info(info: &ScoreInfo) {
    // work-title wins over movement-title
    assert_eq!(info.title, "Little Etude");
    assert_eq!(info.author, "Anna Example Composer");
    assert_eq!(info.tempo_bpm, Some(72.0));
}

fn assert_score(score: &Score) {
    assert_eq!(score.tracks.len(), 2);
    assert_eq!(score.measure_count(), 5);

    let flute = &score.tracks[0];
    assert_eq!(flute.name, "Flute");
    assert_eq!(
        flute.time_signatures,
        vec![
            TimeSignature { beats: 4, measure: 0 },
            TimeSignature { beats: 3, measure: 3 },
        ]
    );
    assert_eq!(
        flute.key_signatures,
        vec![
            KeySignature { fifths: 0, measure: 0 },
            KeySignature { fifths: -1, measure: 1 },
        ]
    );

    assert_eq!(
        flute.measures[1],
        vec![
            Note::new(64, 0.0, 1.0),
            Note::new(70, 1.0, 1.0),
            Note::new(65, 2.0, 2.0).with_ties(&[Tie::Start]),
        ]
    );
    // The rest advances time without producing a note.
    assert_eq!(
        flute.measures[2],
        vec![
            Note::new(65, 0.0, 2.0).with_ties(&[Tie::Stop]),
            Note::new(67, 3.0, 1.0),
        ]
    );
    assert_eq!(flute.measures[4], vec![Note::new(72, 0.0, 3.0)]);

    let cello = &score.tracks[1];
    assert_eq!(cello.name, "Cello");
    assert_eq!(cello.measures.len(), 2);
    assert_eq!(
        cello.measures[0],
        vec![Note::new(48, 0.0, 4.0), Note::new(55, 0.0, 4.0)]
    );
}

// ─── Compressed MusicXML (.mxl) ─────────────────────────────────────

fn zip_etude() -> Vec<u8> {
    let xml = std::fs::read(etude_path()).expect("Failed to read fixture");
    let container = r#"<?xml version="1.0" encoding="UTF-8"?>
<container><rootfiles><rootfile full-path="etude.musicxml" media-type="application/vnd.recordare.musicxml+xml"/></rootfiles></container>"#;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    zip.start_file("META-INF/container.xml", options).unwrap();
    zip.write_all(container.as_bytes()).unwrap();
    zip.start_file("etude.musicxml", options).unwrap();
    zip.write_all(&xml).unwrap();
    zip.finish().unwrap().into_inner()
}

#[test]
fn parse_little_etude_mxl() {
    let data = zip_etude();
    let (score, info) = parse_bytes(&data, Some("mxl")).expect("Failed to parse mxl");
    assert_info(&info);
    assert_score(&score);
}

#[test]
fn mxl_and_xml_produce_same_score() {
    let (from_xml, _) = parse_file(etude_path()).unwrap();
    let (from_mxl, _) = parse_bytes(&zip_etude(), None).unwrap();
    assert_eq!(from_xml, from_mxl);
}

// ─── Failures ───────────────────────────────────────────────────────

#[test]
fn missing_file_is_an_io_error() {
    let err = parse_file(sheetmusic_dir().join("does-not-exist.musicxml")).unwrap_err();
    assert!(matches!(err, ScoreError::Io { .. }), "{err}");
}

#[test]
fn invalid_utf8_is_an_encoding_error() {
    let err = parse_bytes(&[0x3c, 0xff, 0xfe], Some("musicxml")).unwrap_err();
    assert!(matches!(err, ScoreError::Encoding(_)));
}

#[test]
fn score_json_round_trips() {
    let (score, _) = parse_file(etude_path()).unwrap();
    let json = snlayout::score_to_json(&score).unwrap();
    let back: Score = serde_json::from_str(&json).unwrap();
    assert_eq!(back, score);
}
