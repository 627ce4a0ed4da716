//! MusicXML parser — converts MusicXML XML into the Score data model.
//!
//! Only what the staff-less notation draws is kept: pitched notes with
//! their onset, duration and ties, plus time and key signatures. Onsets
//! and durations are converted from divisions into beats of the time
//! signature in effect.

use log::{debug, warn};
use roxmltree::{Document, Node};

use crate::error::ScoreError;
use crate::model::*;

/// Parse a MusicXML XML string into a Score and its caption text.
pub fn parse_musicxml(xml: &str) -> Result<(Score, ScoreInfo), ScoreError> {
    // MusicXML files include a DOCTYPE declaration, so we must allow DTDs
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(xml, options).map_err(|e| ScoreError::Xml(e.to_string()))?;
    let root = doc.root_element();

    if root.tag_name().name() != "score-partwise" {
        return Err(ScoreError::UnsupportedFormat(format!(
            "root element '{}'; only 'score-partwise' is supported",
            root.tag_name().name()
        )));
    }

    let mut score = Score::new();
    let mut info = ScoreInfo::default();
    let mut part_names: Vec<(String, String)> = Vec::new();
    let mut movement_title = None;
    let mut work_title = None;
    let mut credit_words = Vec::new();

    for child in root.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "movement-title" => movement_title = text_of(&child),
            "work" => work_title = parse_work(&child),
            "credit" => credit_words.extend(parse_credit(&child)),
            "part-list" => part_names = parse_part_list(&child),
            "part" => {
                let id = child.attribute("id").unwrap_or("");
                let name = part_names
                    .iter()
                    .find(|(pid, _)| pid == id)
                    .map(|(_, name)| name.clone())
                    .unwrap_or_default();
                score.tracks.push(parse_part(&child, name));
            }
            _ => {}
        }
    }

    info.title = work_title.or(movement_title).unwrap_or_default();
    info.author = pick_author(&credit_words);
    info.tempo_bpm = find_tempo(&root);

    debug!(
        "parsed '{}': {} tracks, {} measures",
        info.title,
        score.tracks.len(),
        score.measure_count()
    );

    Ok((score, info))
}

// ─── Work and credits ────────────────────────────────────────────────

fn parse_work(node: &Node) -> Option<String> {
    node.children()
        .filter(|n| n.is_element())
        .find(|n| n.tag_name().name() == "work-title")
        .and_then(|n| text_of(&n))
}

fn parse_credit(node: &Node) -> Vec<String> {
    node.children()
        .filter(|n| n.is_element() && n.tag_name().name() == "credit-words")
        .filter_map(|n| text_of(&n))
        .collect()
}

/// The credit line whose length is closest to 20 characters.
///
/// Credits carry no reliable role, so the author is guessed by length: a
/// name is usually longer than a page number and shorter than a copyright
/// notice.
fn pick_author(credits: &[String]) -> String {
    const TARGET: i64 = 20;
    let distance = |s: &str| (s.chars().count() as i64 - TARGET).abs();

    let mut best = "";
    for credit in credits {
        if distance(credit) < distance(best) {
            best = credit;
        }
    }
    best.to_string()
}

/// First tempo marking in document order.
fn find_tempo(root: &Node) -> Option<f64> {
    root.descendants().find_map(|n| match n.tag_name().name() {
        "sound" => n.attribute("tempo").and_then(|t| t.trim().parse::<f64>().ok()),
        "per-minute" => parse_f64(&n),
        _ => None,
    })
}

// ─── Part List ───────────────────────────────────────────────────────

fn parse_part_list(node: &Node) -> Vec<(String, String)> {
    node.children()
        .filter(|n| n.is_element() && n.tag_name().name() == "score-part")
        .map(|sp| {
            let id = sp.attribute("id").unwrap_or("").to_string();
            let name = sp
                .children()
                .find(|n| n.is_element() && n.tag_name().name() == "part-name")
                .and_then(|n| text_of(&n))
                .unwrap_or_default();
            (id, name)
        })
        .collect()
}

// ─── Part (measures) ─────────────────────────────────────────────────

/// Running state carried from one measure of a part to the next.
struct PartCursor {
    divisions: f64,
    beat_type: f64,
}

impl PartCursor {
    fn to_beats(&self, divisions: f64) -> f64 {
        divisions / self.divisions * self.beat_type / 4.0
    }
}

fn parse_part(node: &Node, name: String) -> Track {
    let mut track = Track::new(name);
    track.time_signatures.clear();
    track.key_signatures.clear();

    let mut cursor = PartCursor {
        divisions: 1.0,
        beat_type: 4.0,
    };

    let measures = node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "measure");
    for (index, measure) in measures.enumerate() {
        let notes = parse_measure(&measure, index, &mut cursor, &mut track);
        track.measures.push(notes);
    }

    if track.time_signatures.is_empty() {
        track.time_signatures.push(TimeSignature { beats: 4, measure: 0 });
    }
    if track.key_signatures.is_empty() {
        track.key_signatures.push(KeySignature { fifths: 0, measure: 0 });
    }
    track
}

// ─── Measure ─────────────────────────────────────────────────────────

fn parse_measure(node: &Node, index: usize, cursor: &mut PartCursor, track: &mut Track) -> Vec<Note> {
    let mut notes = Vec::new();
    // Positions are in divisions from the start of the measure.
    let mut position = 0.0_f64;
    let mut last_onset = 0.0_f64;

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "attributes" => parse_attributes(&child, index, cursor, track),
            "note" => {
                let event = parse_note(&child);
                if event.grace {
                    continue;
                }
                let onset = if event.chord { last_onset } else { position };
                if !event.chord {
                    last_onset = position;
                    position += event.duration;
                }
                match event.pitch {
                    Some(pitch) if event.duration > 0.0 => notes.push(
                        Note::new(pitch, cursor.to_beats(onset), cursor.to_beats(event.duration))
                            .with_ties(&event.ties),
                    ),
                    Some(_) => warn!("measure {}: skipping pitched note without duration", index + 1),
                    None => {}
                }
            }
            "backup" => {
                let amount = duration_of(&child);
                position = (position - amount).max(0.0);
            }
            "forward" => position += duration_of(&child),
            _ => {}
        }
    }

    notes
}

// ─── Attributes ──────────────────────────────────────────────────────

fn parse_attributes(node: &Node, measure: usize, cursor: &mut PartCursor, track: &mut Track) {
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "divisions" => match parse_f64(&child) {
                Some(d) if d > 0.0 => cursor.divisions = d,
                _ => warn!("measure {}: ignoring invalid divisions", measure + 1),
            },
            "key" => {
                let fifths = child
                    .children()
                    .find(|n| n.is_element() && n.tag_name().name() == "fifths")
                    .and_then(|n| parse_i32(&n));
                if let Some(fifths) = fifths {
                    track.key_signatures.push(KeySignature { fifths, measure });
                }
            }
            "time" => parse_time(&child, measure, cursor, track),
            _ => {}
        }
    }
}

fn parse_time(node: &Node, measure: usize, cursor: &mut PartCursor, track: &mut Track) {
    let mut beats = None;
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "beats" => beats = child.text().and_then(parse_beats),
            "beat-type" => {
                if let Some(bt) = parse_f64(&child).filter(|bt| *bt > 0.0) {
                    cursor.beat_type = bt;
                }
            }
            _ => {}
        }
    }
    match beats {
        Some(beats) if beats > 0 => track.time_signatures.push(TimeSignature { beats, measure }),
        _ => warn!("measure {}: ignoring unreadable time signature", measure + 1),
    }
}

/// Beat count, summing compound numerators like `3+2`.
fn parse_beats(text: &str) -> Option<u32> {
    text.split('+')
        .try_fold(0u32, |total, part| total.checked_add(part.trim().parse().ok()?))
}

// ─── Note ────────────────────────────────────────────────────────────

struct NoteEvent {
    pitch: Option<i32>,
    duration: f64,
    chord: bool,
    grace: bool,
    ties: Vec<Tie>,
}

fn parse_note(node: &Node) -> NoteEvent {
    let mut event = NoteEvent {
        pitch: None,
        duration: 0.0,
        chord: false,
        grace: false,
        ties: Vec::new(),
    };

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "pitch" => event.pitch = parse_pitch(&child),
            "rest" => event.pitch = None,
            "duration" => event.duration = parse_f64(&child).unwrap_or(0.0),
            "chord" => event.chord = true,
            "grace" => event.grace = true,
            "tie" => push_tie(&mut event.ties, child.attribute("type")),
            "notations" => {
                for nc in child.children().filter(|n| n.is_element()) {
                    if nc.tag_name().name() == "tied" {
                        push_tie(&mut event.ties, nc.attribute("type"));
                    }
                }
            }
            _ => {}
        }
    }

    event
}

fn push_tie(ties: &mut Vec<Tie>, kind: Option<&str>) {
    let tie = match kind {
        Some("start") => Tie::Start,
        Some("stop") => Tie::Stop,
        _ => return,
    };
    if !ties.contains(&tie) {
        ties.push(tie);
    }
}

/// MIDI pitch of a `<pitch>` element (middle C = 60).
fn parse_pitch(node: &Node) -> Option<i32> {
    let mut step = None;
    let mut octave = None;
    let mut alter = 0.0;
    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "step" => step = child.text().map(|t| t.trim().to_string()),
            "octave" => octave = parse_i32(&child),
            "alter" => alter = parse_f64(&child).unwrap_or(0.0),
            _ => {}
        }
    }

    let semitone = match step.as_deref()? {
        "C" => 0,
        "D" => 2,
        "E" => 4,
        "F" => 5,
        "G" => 7,
        "A" => 9,
        "B" => 11,
        other => {
            warn!("unknown pitch step '{}'", other);
            return None;
        }
    };
    let pitch = octave?
        .checked_add(1)
        .and_then(|o| o.checked_mul(12))
        .and_then(|base| base.checked_add(semitone))
        .and_then(|p| p.checked_add(alter.round() as i32));
    if pitch.is_none() {
        warn!("pitch out of range (octave {:?}, alter {}), treating the note as a rest", octave, alter);
    }
    pitch
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn text_of(node: &Node) -> Option<String> {
    node.text()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn duration_of(node: &Node) -> f64 {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == "duration")
        .and_then(|n| parse_f64(&n))
        .unwrap_or(0.0)
}

fn parse_i32(node: &Node) -> Option<i32> {
    node.text()?.trim().parse().ok()
}

fn parse_f64(node: &Node) -> Option<f64> {
    node.text()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(parts: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<score-partwise version="3.1">
  <part-list><score-part id="P1"><part-name>Flute</part-name></score-part></part-list>
  <part id="P1">{parts}</part>
</score-partwise>"#
        )
    }

    #[test]
    fn chords_share_onsets_and_rests_advance_time() {
        let xml = wrap(
            r#"<measure number="1">
              <attributes><divisions>2</divisions></attributes>
              <note><rest/><duration>2</duration></note>
              <note><pitch><step>C</step><octave>4</octave></pitch><duration>4</duration></note>
              <note><chord/><pitch><step>E</step><octave>4</octave></pitch><duration>4</duration></note>
              <note><pitch><step>F</step><alter>1</alter><octave>4</octave></pitch><duration>2</duration></note>
            </measure>"#,
        );
        let (score, _) = parse_musicxml(&xml).unwrap();
        let notes = &score.tracks[0].measures[0];
        assert_eq!(score.tracks[0].name, "Flute");
        assert_eq!(notes.len(), 3);
        assert_eq!((notes[0].pitch, notes[0].time, notes[0].duration), (60, 1.0, 2.0));
        assert_eq!((notes[1].pitch, notes[1].time), (64, 1.0));
        assert_eq!((notes[2].pitch, notes[2].time, notes[2].duration), (66, 3.0, 1.0));
    }

    #[test]
    fn backup_rewinds_for_a_second_voice() {
        let xml = wrap(
            r#"<measure number="1">
              <attributes><divisions>1</divisions></attributes>
              <note><pitch><step>G</step><octave>4</octave></pitch><duration>4</duration></note>
              <backup><duration>4</duration></backup>
              <note><pitch><step>C</step><octave>3</octave></pitch><duration>2</duration></note>
              <forward><duration>1</duration></forward>
              <note><pitch><step>D</step><octave>3</octave></pitch><duration>1</duration></note>
            </measure>"#,
        );
        let (score, _) = parse_musicxml(&xml).unwrap();
        let times: Vec<f64> = score.tracks[0].measures[0].iter().map(|n| n.time).collect();
        assert_eq!(times, vec![0.0, 0.0, 3.0]);
    }

    #[test]
    fn eighth_note_beats_scale_with_beat_type() {
        let xml = wrap(
            r#"<measure number="1">
              <attributes><divisions>2</divisions><time><beats>3+3</beats><beat-type>8</beat-type></time></attributes>
              <note><pitch><step>A</step><octave>4</octave></pitch><duration>1</duration></note>
              <note><pitch><step>B</step><octave>4</octave></pitch><duration>1</duration></note>
            </measure>"#,
        );
        let (score, _) = parse_musicxml(&xml).unwrap();
        let track = &score.tracks[0];
        assert_eq!(track.time_signatures, vec![TimeSignature { beats: 6, measure: 0 }]);
        assert_eq!(track.measures[0][1].time, 1.0);
        assert_eq!(track.measures[0][1].duration, 1.0);
    }

    #[test]
    fn ties_are_merged_from_both_sources() {
        let xml = wrap(
            r#"<measure number="1">
              <note><pitch><step>C</step><octave>5</octave></pitch><duration>1</duration>
                <tie type="stop"/><tie type="start"/>
                <notations><tied type="start"/><tied type="stop"/></notations></note>
            </measure>"#,
        );
        let (score, _) = parse_musicxml(&xml).unwrap();
        let note = &score.tracks[0].measures[0][0];
        assert_eq!(note.ties, vec![Tie::Stop, Tie::Start]);
    }

    #[test]
    fn grace_notes_are_skipped() {
        let xml = wrap(
            r#"<measure number="1">
              <note><grace/><pitch><step>D</step><octave>4</octave></pitch></note>
              <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
            </measure>"#,
        );
        let (score, _) = parse_musicxml(&xml).unwrap();
        let notes = &score.tracks[0].measures[0];
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].time, 0.0);
    }

    #[test]
    fn missing_signatures_get_defaults() {
        let (score, _) = parse_musicxml(&wrap(r#"<measure number="1"/>"#)).unwrap();
        let track = &score.tracks[0];
        assert_eq!(track.time_signatures, vec![TimeSignature { beats: 4, measure: 0 }]);
        assert_eq!(track.key_signatures, vec![KeySignature { fifths: 0, measure: 0 }]);
        assert_eq!(track.measures.len(), 1);
    }

    #[test]
    fn work_title_overrides_movement_title() {
        let xml = r#"<score-partwise>
          <work><work-title>Suite</work-title></work>
          <movement-title>Prelude</movement-title>
          <credit><credit-words>1</credit-words></credit>
          <credit><credit-words>Johann Sebastian Bach</credit-words></credit>
          <credit><credit-words>Copyright 2020 by nobody in particular at all</credit-words></credit>
          <part-list/>
        </score-partwise>"#;
        let (_, info) = parse_musicxml(xml).unwrap();
        assert_eq!(info.title, "Suite");
        assert_eq!(info.author, "Johann Sebastian Bach");
        assert_eq!(info.tempo_bpm, None);
    }

    #[test]
    fn author_ties_keep_the_first_credit() {
        let credits = vec!["abcdefghijklmnopqrstuv".to_string(), "abcdefghijklmnopqr".to_string()];
        assert_eq!(pick_author(&credits), "abcdefghijklmnopqrstuv");
    }

    #[test]
    fn tempo_comes_from_sound_or_metronome() {
        let xml = wrap(
            r#"<measure number="1">
              <direction><direction-type><metronome><beat-unit>quarter</beat-unit><per-minute>96</per-minute></metronome></direction-type>
              <sound tempo="96"/></direction>
            </measure>"#,
        );
        let (_, info) = parse_musicxml(&xml).unwrap();
        assert_eq!(info.tempo_bpm, Some(96.0));
    }

    #[test]
    fn oversized_numbers_are_skipped_not_overflowed() {
        let xml = wrap(
            r#"<measure number="1">
              <attributes><time><beats>4294967295+1</beats><beat-type>4</beat-type></time></attributes>
              <note><pitch><step>C</step><octave>999999999</octave></pitch><duration>1</duration></note>
              <note><pitch><step>D</step><alter>3000000000</alter><octave>4</octave></pitch><duration>1</duration></note>
              <note><pitch><step>E</step><octave>4</octave></pitch><duration>1</duration></note>
            </measure>"#,
        );
        let (score, _) = parse_musicxml(&xml).unwrap();
        let track = &score.tracks[0];
        assert_eq!(track.time_signatures, vec![TimeSignature { beats: 4, measure: 0 }]);
        // The unreadable pitches still take up their time.
        assert_eq!(track.measures[0], vec![Note::new(64, 2.0, 1.0)]);
        assert_eq!(parse_beats("3+2"), Some(5));
    }

    #[test]
    fn timewise_scores_are_rejected() {
        let err = parse_musicxml("<score-timewise/>").unwrap_err();
        assert!(matches!(err, ScoreError::UnsupportedFormat(_)));
        assert!(matches!(parse_musicxml("<unclosed"), Err(ScoreError::Xml(_))));
    }
}
