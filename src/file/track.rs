use crate::{
    file::chunk::RawTrackChunk,
    reader::{ReadResult, Reader},
};
use alloc::{string::String, vec::Vec};

/// Lowest note number a Note-On data byte can carry.
pub const NOTE_MIN: u8 = 0;
/// Highest note number a Note-On data byte can carry.
pub const NOTE_MAX: u8 = 127;
/// Middle of the note range, a neutral reference for callers that map
/// notes onto a coordinate axis.
pub const NOTE_CENTER: u8 = 64;

#[doc = r#"
One decoded Note-On message.

`start_ticks` is absolute within its track: the running sum of every
delta-time since the track began, so events decode in non-decreasing
tick order. A Note-On with velocity 0 conventionally means Note-Off
elsewhere in the MIDI ecosystem; this decoder emits it unchanged and
leaves that reading to the caller.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// Channel nibble of the status byte (0–15).
    pub channel: u8,
    /// Note number. MIDI keeps this within 0–127; the decoder records
    /// whatever the data byte holds.
    pub note: u8,
    /// Key velocity.
    pub velocity: u8,
    /// Absolute tick position within the track.
    pub start_ticks: u32,
}

#[doc = r#"
One decoded track: its Note-On events in file order, the track's name
when a Sequence/Track Name meta event carried one, and the cumulative
tick count at the end of its event stream.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    name: Option<String>,
    events: Vec<NoteEvent>,
    length_ticks: u32,
}

impl Track {
    /// The track's name, if a name meta event set one.
    ///
    /// If a malformed file carries several, the last one wins.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The decoded Note-On events, in file order.
    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    /// The cumulative tick count at the end of the track's event stream.
    ///
    /// This covers every event's delta-time, not just the Note-Ons, so an
    /// End of Track meta event after the last note still extends it.
    pub const fn length_ticks(&self) -> u32 {
        self.length_ticks
    }

    pub(crate) fn take_name(&mut self) -> Option<String> {
        self.name.take()
    }

    /// Decode a captured track chunk into a [`Track`].
    ///
    /// A short read inside the chunk means an event's declared payload
    /// crossed the chunk's declared end, and surfaces as
    /// [`MalformedEvent`](crate::reader::ReaderErrorKind::MalformedEvent)
    /// positioned in the file buffer.
    pub(crate) fn decode(chunk: RawTrackChunk<'_>) -> ReadResult<Self> {
        Self::decode_events(chunk.data())
            .map_err(|e| e.into_malformed_event().offset_by(chunk.offset()))
    }

    fn decode_events(data: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(data);
        let mut track = Self::default();
        let mut ticks: u32 = 0;
        let mut current_status: Option<u8> = None;

        while reader.remaining() > 0 {
            let delta = reader.read_vlq()?;
            ticks = ticks.saturating_add(delta);

            let candidate = reader.peek_u8()?;
            let status = if candidate >= 0x80 {
                reader.read_u8()?;
                current_status = Some(candidate);
                candidate
            } else if let Some(status) = current_status {
                // running status: the peeked byte is this event's first
                // data byte and stays in the stream
                status
            } else {
                // stray data byte before any status; skip it
                reader.read_u8()?;
                continue;
            };

            match status {
                0xFF => {
                    // meta event: type byte, VLQ length, payload
                    let meta_type = reader.read_u8()?;
                    let length = reader.read_vlq()? as usize;
                    let payload = reader.read_bytes(length)?;
                    if meta_type == 0x03 {
                        // Sequence/Track Name
                        track.name = Some(String::from_utf8_lossy(payload).into_owned());
                    }
                }
                0xF0 | 0xF7 => {
                    // SysEx packet: VLQ length, payload skipped byte-exactly
                    let length = reader.read_vlq()? as usize;
                    reader.read_bytes(length)?;
                }
                status if status >= 0x80 && status < 0xF0 => match status & 0xF0 {
                    0x90 => {
                        // Note On
                        let note = reader.read_u8()?;
                        let velocity = reader.read_u8()?;
                        track.events.push(NoteEvent {
                            channel: status & 0x0F,
                            note,
                            velocity,
                            start_ticks: ticks,
                        });
                    }
                    // Program Change and Channel Pressure carry one data byte
                    0xC0 | 0xD0 => {
                        reader.read_bytes(1)?;
                    }
                    // Note Off, Poly Pressure, Controller, Pitch Bend carry two
                    _ => {
                        reader.read_bytes(2)?;
                    }
                },
                // remaining system statuses carry no payload in this stream
                _ => {}
            }
        }

        track.length_ticks = ticks;
        Ok(track)
    }
}

#[cfg(test)]
fn decode_stream(data: &[u8]) -> ReadResult<Track> {
    Track::decode_events(data)
}

#[test]
fn running_status_reuses_the_channel() {
    use pretty_assertions::assert_eq;
    // one explicit Note-On status on channel 3, then two bare data pairs
    let track = decode_stream(&[
        0x00, 0x93, 0x40, 0x64, //
        0x10, 0x42, 0x60, //
        0x10, 0x45, 0x5C, //
    ])
    .unwrap();

    assert_eq!(track.events().len(), 3);
    for event in track.events() {
        assert_eq!(event.channel, 3);
    }
    assert_eq!(track.events()[1].note, 0x42);
    assert_eq!(track.events()[2].start_ticks, 0x20);
}

#[test]
fn ticks_accumulate_across_all_events() {
    use pretty_assertions::assert_eq;
    // deltas 0, 10, 0, 5 over four Note-Ons
    let track = decode_stream(&[
        0x00, 0x90, 0x40, 0x64, //
        0x0A, 0x90, 0x41, 0x64, //
        0x00, 0x90, 0x42, 0x64, //
        0x05, 0x90, 0x43, 0x64, //
    ])
    .unwrap();

    let ticks: Vec<u32> = track.events().iter().map(|e| e.start_ticks).collect();
    assert_eq!(ticks, alloc::vec![0, 10, 10, 15]);
    assert_eq!(track.length_ticks(), 15);
}

#[test]
fn only_note_on_is_emitted() {
    use pretty_assertions::assert_eq;
    let track = decode_stream(&[
        0x00, 0x90, 0x40, 0x64, // Note On
        0x08, 0x80, 0x40, 0x00, // Note Off, skipped
        0x08, 0xB0, 0x07, 0x7F, // Controller, skipped
        0x08, 0xC0, 0x05, // Program Change, one data byte
        0x08, 0xD0, 0x30, // Channel Pressure, one data byte
        0x08, 0xE0, 0x00, 0x40, // Pitch Bend, skipped
        0x08, 0x91, 0x30, 0x20, // Note On again
    ])
    .unwrap();

    assert_eq!(track.events().len(), 2);
    assert_eq!(track.events()[0].start_ticks, 0);
    let last = track.events()[1];
    assert_eq!(last.channel, 1);
    assert_eq!(last.start_ticks, 48);
    assert_eq!(track.length_ticks(), 48);
}

#[test]
fn velocity_zero_note_on_is_kept() {
    use pretty_assertions::assert_eq;
    let track = decode_stream(&[0x00, 0x90, 0x40, 0x00]).unwrap();

    assert_eq!(
        track.events(),
        &[NoteEvent {
            channel: 0,
            note: 0x40,
            velocity: 0,
            start_ticks: 0,
        }]
    );
}

#[test]
fn name_meta_is_captured_and_last_wins() {
    use pretty_assertions::assert_eq;
    let track = decode_stream(&[
        0x00, 0xFF, 0x03, 0x05, b'f', b'i', b'r', b's', b't', //
        0x00, 0xFF, 0x03, 0x06, b's', b'e', b'c', b'o', b'n', b'd', //
    ])
    .unwrap();

    assert_eq!(track.name(), Some("second"));
}

#[test]
fn other_meta_payloads_are_discarded() {
    use pretty_assertions::assert_eq;
    let track = decode_stream(&[
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo, skipped
        0x00, 0x90, 0x40, 0x64, //
        0x10, 0xFF, 0x2F, 0x00, // End of Track
    ])
    .unwrap();

    assert_eq!(track.events().len(), 1);
    assert_eq!(track.name(), None);
    // the trailing meta event still advances the track length
    assert_eq!(track.length_ticks(), 16);
}

#[test]
fn sysex_packets_are_skipped() {
    use pretty_assertions::assert_eq;
    let track = decode_stream(&[
        0x00, 0xF0, 0x04, 0x43, 0x12, 0x00, 0xF7, // SysEx start packet
        0x00, 0xF7, 0x02, 0x01, 0xF7, // continuation packet
        0x00, 0x90, 0x40, 0x64, //
    ])
    .unwrap();

    assert_eq!(track.events().len(), 1);
    assert_eq!(track.events()[0].note, 0x40);
}

#[test]
fn stray_data_byte_without_status_is_skipped() {
    use pretty_assertions::assert_eq;
    let track = decode_stream(&[
        0x00, 0x40, // data byte with no status established
        0x00, 0x90, 0x41, 0x64, //
    ])
    .unwrap();

    assert_eq!(track.events().len(), 1);
    assert_eq!(track.events()[0].note, 0x41);
}

#[test]
fn payload_crossing_chunk_end_is_malformed() {
    use crate::reader::ReaderErrorKind;

    // meta event declares 9 payload bytes, chunk holds 2
    let err = decode_stream(&[0x00, 0xFF, 0x06, 0x09, 0x01, 0x02]).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::TruncatedData { needed: 9, .. }
    ));

    // through a captured chunk the same failure reports MalformedEvent
    // with a file-absolute position
    let mut bytes = alloc::vec::Vec::new();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0xFF, 0x06, 0x09, 0x01, 0x02]);

    let mut reader = Reader::from_byte_slice(&bytes);
    let chunk = RawTrackChunk::read(&mut reader).unwrap();
    let err = Track::decode(chunk).unwrap_err();

    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::MalformedEvent {
            needed: 9,
            available: 2
        }
    ));
    assert_eq!(err.position(), 12);
}
