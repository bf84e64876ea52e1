#![doc = r#"
The two top-level SMF chunk kinds.

A chunk is a 4-byte ASCII tag, a big-endian u32 payload length, and that
many payload bytes. The header chunk (`MThd`) describes the file; each
track chunk (`MTrk`) carries one delta-time/status/data event stream.
Anything else is a malformed file as far as this crate is concerned.
"#]

use crate::{
    file::Format,
    reader::{ReadResult, Reader, ReaderError},
};

const HEADER_TAG: &str = "MThd";
const TRACK_TAG: &str = "MTrk";

fn expect_tag(reader: &mut Reader<'_>, expected: &'static str) -> ReadResult<()> {
    let position = reader.buffer_position();
    let found = reader.read_exact::<4>()?;
    if &found[..] != expected.as_bytes() {
        return Err(ReaderError::bad_identifier(position, expected, found));
    }
    Ok(())
}

/// The decoded `MThd` chunk.
///
/// The declared payload length is nominally 6, but whatever it declares
/// is consumed in full: the three header fields come from the first six
/// bytes and any extension bytes after them are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHeaderChunk {
    format: Format,
    ntracks: u16,
    tickdiv: u16,
}

impl RawHeaderChunk {
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        expect_tag(reader, HEADER_TAG)?;
        let length = reader.read_u32_be()? as usize;
        let payload_start = reader.buffer_position();
        let payload = reader.read_bytes(length)?;

        let mut fields = Reader::from_byte_slice(payload);
        let format = Format::from(
            fields
                .read_u16_be()
                .map_err(|e| e.offset_by(payload_start))?,
        );
        let ntracks = fields
            .read_u16_be()
            .map_err(|e| e.offset_by(payload_start))?;
        let tickdiv = fields
            .read_u16_be()
            .map_err(|e| e.offset_by(payload_start))?;

        Ok(Self {
            format,
            ntracks,
            tickdiv,
        })
    }

    /// The SMF format code.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// The number of track chunks the header declares.
    pub const fn ntracks(&self) -> u16 {
        self.ntracks
    }

    /// The raw time division word.
    ///
    /// With the top bit clear this is ticks per quarter note; with it set
    /// the word encodes an SMPTE rate, which this crate passes through
    /// uninterpreted.
    pub const fn tickdiv(&self) -> u16 {
        self.tickdiv
    }
}

/// A captured `MTrk` chunk: the event-stream bytes plus their absolute
/// offset in the file, kept so event-level diagnostics can point into
/// the original buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTrackChunk<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> RawTrackChunk<'a> {
    pub(crate) fn read(reader: &mut Reader<'a>) -> ReadResult<Self> {
        expect_tag(reader, TRACK_TAG)?;
        let length = reader.read_u32_be()? as usize;
        let offset = reader.buffer_position();
        let data = reader.read_bytes(length)?;
        Ok(Self { data, offset })
    }

    /// The event-stream byte range, exactly as long as the chunk declared.
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Absolute offset of the event stream within the file buffer.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the event stream in bytes.
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// True for a track chunk with no event bytes at all.
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[test]
fn header_chunk_reads_declared_fields() {
    use pretty_assertions::assert_eq;
    let bytes = [
        b'M', b'T', b'h', b'd', 0x00, 0x00, 0x00, 0x06, // tag + length
        0x00, 0x01, // format 1
        0x00, 0x02, // 2 tracks
        0x00, 0x60, // 96 ticks per quarter note
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let header = RawHeaderChunk::read(&mut reader).unwrap();

    assert_eq!(header.format(), Format::Simultaneous);
    assert_eq!(header.ntracks(), 2);
    assert_eq!(header.tickdiv(), 96);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn header_chunk_skips_extension_bytes() {
    use pretty_assertions::assert_eq;
    // declared length 8: six field bytes plus two from a future revision
    let bytes = [
        b'M', b'T', b'h', b'd', 0x00, 0x00, 0x00, 0x08, //
        0x00, 0x00, 0x00, 0x01, 0x01, 0xE0, //
        0xDE, 0xAD, // extension, skipped
        b'M', b'T', b'r', b'k', // next chunk starts right here
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let header = RawHeaderChunk::read(&mut reader).unwrap();

    assert_eq!(header.format(), Format::SingleMultiChannel);
    assert_eq!(header.tickdiv(), 480);
    assert_eq!(reader.read_bytes(4).unwrap(), b"MTrk");
}

#[test]
fn header_chunk_rejects_wrong_tag() {
    let bytes = *b"RIFF\x00\x00\x00\x06\x00\x00\x00\x01\x00\x60";
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = RawHeaderChunk::read(&mut reader).unwrap_err();

    assert_eq!(
        *err.error_kind(),
        crate::reader::ReaderErrorKind::BadIdentifier {
            expected: "MThd",
            found: *b"RIFF",
        }
    );
    assert_eq!(err.position(), 0);
}

#[test]
fn header_chunk_too_short_for_fields() {
    // declares 4 payload bytes, which cannot hold the three u16 fields
    let bytes = [
        b'M', b'T', b'h', b'd', 0x00, 0x00, 0x00, 0x04, 0x00, 0x01, 0x00, 0x02,
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = RawHeaderChunk::read(&mut reader).unwrap_err();

    assert!(err.is_truncation());
    // rebased into the file buffer, pointing at where tickdiv would sit
    assert_eq!(err.position(), 12);
}

#[test]
fn track_chunk_captures_its_range() {
    use pretty_assertions::assert_eq;
    let bytes = [
        b'M', b'T', b'r', b'k', 0x00, 0x00, 0x00, 0x04, //
        0x00, 0x90, 0x40, 0x64, //
        0xFF, // trailing byte, not part of the chunk
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let track = RawTrackChunk::read(&mut reader).unwrap();

    assert_eq!(track.data(), &[0x00, 0x90, 0x40, 0x64]);
    assert_eq!(track.offset(), 8);
    assert_eq!(track.len(), 4);
    assert_eq!(reader.remaining(), 1);
}

#[test]
fn track_chunk_shorter_than_declared_is_truncation() {
    let bytes = [
        b'M', b'T', b'r', b'k', 0x00, 0x00, 0x00, 0x10, // claims 16 bytes
        0x00, 0x90, 0x40, 0x64, // only 4 present
    ];
    let mut reader = Reader::from_byte_slice(&bytes);
    let err = RawTrackChunk::read(&mut reader).unwrap_err();

    assert!(err.is_truncation());
    assert_eq!(err.position(), 8);
}
