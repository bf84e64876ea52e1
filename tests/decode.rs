use pretty_assertions::assert_eq;
use smfread::prelude::*;

/// Build an `MThd` chunk with the given header fields
fn header(format: u16, ntracks: u16, tickdiv: u16) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&ntracks.to_be_bytes());
    bytes.extend_from_slice(&tickdiv.to_be_bytes());
    bytes
}

/// Wrap raw event bytes in an `MTrk` chunk
fn track_chunk(events: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(events.len() as u32).to_be_bytes());
    bytes.extend_from_slice(events);
    bytes
}

/// A name meta event (`FF 03`) with zero delta time
fn name_meta(name: &str) -> Vec<u8> {
    let mut bytes = vec![0x00, 0xFF, 0x03, name.len() as u8];
    bytes.extend_from_slice(name.as_bytes());
    bytes
}

#[test]
fn end_to_end_single_note() {
    let mut bytes = header(1, 1, 96);
    bytes.extend_from_slice(&track_chunk(&[
        0x00, 0x90, 0x40, 0x64, // Note On
        0x00, 0x80, 0x40, 0x00, // Note Off, not retained
    ]));

    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.format(), Format::Simultaneous);
    assert_eq!(file.ntracks(), 1);
    assert_eq!(file.tickdiv(), 96);
    assert_eq!(file.tracks().len(), 1);
    assert_eq!(
        file.tracks()[0].events(),
        &[NoteEvent {
            channel: 0,
            note: 0x40,
            velocity: 0x64,
            start_ticks: 0,
        }]
    );
}

#[test]
fn name_in_track_zero_becomes_sequence_name() {
    let mut events = name_meta("Opening");
    events.extend_from_slice(&[0x00, 0x90, 0x40, 0x64]);

    let mut bytes = header(1, 2, 96);
    bytes.extend_from_slice(&track_chunk(&events));
    bytes.extend_from_slice(&track_chunk(&[0x00, 0x91, 0x30, 0x20]));

    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.sequence_name(), Some("Opening"));
    assert_eq!(file.tracks()[0].name(), None);
    assert_eq!(file.tracks()[1].name(), None);
}

#[test]
fn name_in_a_later_track_stays_on_the_track() {
    let mut bytes = header(1, 2, 96);
    bytes.extend_from_slice(&track_chunk(&[0x00, 0x90, 0x40, 0x64]));
    bytes.extend_from_slice(&track_chunk(&name_meta("Bass")));

    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.sequence_name(), None);
    assert_eq!(file.tracks()[0].name(), None);
    assert_eq!(file.tracks()[1].name(), Some("Bass"));
}

#[test]
fn format_two_keeps_the_name_on_track_zero() {
    let mut bytes = header(2, 1, 96);
    bytes.extend_from_slice(&track_chunk(&name_meta("Pattern A")));

    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.format(), Format::SequentiallyIndependent);
    assert_eq!(file.sequence_name(), None);
    assert_eq!(file.tracks()[0].name(), Some("Pattern A"));
}

#[test]
fn unknown_format_code_is_recorded_not_rejected() {
    let mut bytes = header(5, 1, 96);
    bytes.extend_from_slice(&track_chunk(&name_meta("kept on track")));

    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.format(), Format::Unknown(5));
    // name routing only applies to formats 0 and 1
    assert_eq!(file.sequence_name(), None);
    assert_eq!(file.tracks()[0].name(), Some("kept on track"));
}

#[test]
fn decoding_is_deterministic() {
    let mut bytes = header(1, 2, 480);
    bytes.extend_from_slice(&track_chunk(&[
        0x00, 0x90, 0x3C, 0x64, 0x60, 0x80, 0x3C, 0x00,
    ]));
    bytes.extend_from_slice(&track_chunk(&name_meta("B")));

    let first = MidiFile::parse(&bytes).unwrap();
    let second = MidiFile::parse(&bytes).unwrap();

    assert_eq!(first, second);
}

#[test]
fn fewer_track_chunks_than_declared() {
    let mut bytes = header(1, 4, 96);
    bytes.extend_from_slice(&track_chunk(&[0x00, 0x90, 0x40, 0x64]));

    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.ntracks(), 4);
    assert_eq!(file.tracks().len(), 1);
}

#[test]
fn header_only_file_decodes_to_zero_tracks() {
    let bytes = header(0, 3, 96);

    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.ntracks(), 3);
    assert!(file.tracks().is_empty());
    assert_eq!(file.duration_ticks(), 0);
    assert_eq!(file.note_events().count(), 0);
}

#[test]
fn bytes_after_the_declared_tracks_are_ignored() {
    let mut bytes = header(0, 1, 96);
    bytes.extend_from_slice(&track_chunk(&[0x00, 0x90, 0x40, 0x64]));
    bytes.extend_from_slice(b"garbage that is never read");

    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.tracks().len(), 1);
}

#[test]
fn wrong_track_tag_is_a_bad_identifier() {
    let mut bytes = header(1, 1, 96);
    bytes.extend_from_slice(b"XTrk");
    bytes.extend_from_slice(&4u32.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0x90, 0x40, 0x64]);

    let err = MidiFile::parse(&bytes).unwrap_err();

    assert_eq!(
        *err.error_kind(),
        ReaderErrorKind::BadIdentifier {
            expected: "MTrk",
            found: *b"XTrk",
        }
    );
    assert_eq!(err.position(), 14);
}

#[test]
fn header_extension_bytes_are_tolerated() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&9u32.to_be_bytes()); // 6 fields + 3 extension
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x01, 0x00, 0x60]);
    bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
    bytes.extend_from_slice(&track_chunk(&[0x00, 0x90, 0x40, 0x64]));

    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.format(), Format::SingleMultiChannel);
    assert_eq!(file.tracks().len(), 1);
}

#[test]
fn duration_spans_the_longest_track() {
    let mut bytes = header(1, 2, 96);
    // 96 ticks of notes, then End of Track 24 ticks later
    bytes.extend_from_slice(&track_chunk(&[
        0x00, 0x90, 0x3C, 0x64, 0x60, 0x80, 0x3C, 0x00, 0x18, 0xFF, 0x2F, 0x00,
    ]));
    bytes.extend_from_slice(&track_chunk(&[0x00, 0x90, 0x30, 0x40]));

    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.tracks()[0].length_ticks(), 120);
    assert_eq!(file.tracks()[1].length_ticks(), 0);
    assert_eq!(file.duration_ticks(), 120);
}

#[test]
fn truncation_never_yields_a_partial_document() {
    let mut bytes = header(1, 2, 96);
    bytes.extend_from_slice(&track_chunk(&[
        0x00, 0xFF, 0x03, 0x03, b'o', b'n', b'e', // name meta
        0x00, 0x90, 0x3C, 0x64, // Note On
        0x60, 0x80, 0x3C, 0x00, // Note Off
    ]));
    let first_track_end = bytes.len();
    bytes.extend_from_slice(&track_chunk(&[0x00, 0x91, 0x30, 0x20]));

    // the only clean stopping points are the chunk boundaries
    let header_end = 14;
    for cut in 0..bytes.len() {
        let result = MidiFile::parse(&bytes[..cut]);
        if cut == header_end || cut == first_track_end {
            assert!(result.is_ok(), "cut at {cut} should decode cleanly");
        } else {
            assert!(result.is_err(), "cut at {cut} should fail");
        }
    }

    assert!(MidiFile::parse(&bytes).is_ok());
}
