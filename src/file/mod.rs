#![doc = r#"
Rusty representation of a decoded [`MidiFile`]
"#]

pub mod chunk;

mod format;
pub use format::*;

mod track;
pub use track::*;

use crate::{
    file::chunk::{RawHeaderChunk, RawTrackChunk},
    reader::{ReadResult, Reader},
};
use alloc::{string::String, vec::Vec};

#[doc = r#"
A fully decoded Standard MIDI File.

Holds the header fields as declared (`format`, `ntracks`, `tickdiv`)
and the decoded tracks. The decoder tolerates two header lies rather
than failing: a file may contain fewer track chunks than `ntracks`
declares, and a `tickdiv` with its top bit set (SMPTE timing) passes
through uninterpreted.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    format: Format,
    ntracks: u16,
    tickdiv: u16,
    sequence_name: Option<String>,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// Decode a byte buffer holding the exact contents of a `.mid` file.
    ///
    /// Pure and fail-fast: the buffer is never mutated, and on error no
    /// partial document escapes. Decoding stops after `ntracks` track
    /// chunks or on clean buffer exhaustion, whichever comes first.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let header = RawHeaderChunk::read(&mut reader)?;

        let mut tracks = Vec::with_capacity(usize::from(header.ntracks()));
        for _ in 0..header.ntracks() {
            if reader.remaining() == 0 {
                // fewer track chunks than declared; keep what is there
                break;
            }
            let chunk = RawTrackChunk::read(&mut reader)?;
            tracks.push(Track::decode(chunk)?);
        }

        #[cfg(feature = "tracing")]
        if tracks.len() != usize::from(header.ntracks()) {
            tracing::warn!(
                declared = header.ntracks(),
                present = tracks.len(),
                "header track count does not match the file"
            );
        }

        let mut sequence_name = None;
        if header.format().is_single_sequence()
            && let Some(first) = tracks.first_mut()
        {
            sequence_name = first.take_name();
        }

        Ok(Self {
            format: header.format(),
            ntracks: header.ntracks(),
            tickdiv: header.tickdiv(),
            sequence_name,
            tracks,
        })
    }

    /// The SMF format code from the header.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// The track count the header declared.
    ///
    /// May exceed [`tracks()`](Self::tracks)`.len()` for a file that ends
    /// early; the decoder records the declaration rather than failing.
    pub const fn ntracks(&self) -> u16 {
        self.ntracks
    }

    /// The raw time division word from the header.
    ///
    /// Top bit clear: ticks per quarter note. Top bit set: SMPTE frame
    /// timing, passed through without interpretation.
    pub const fn tickdiv(&self) -> u16 {
        self.tickdiv
    }

    /// The sequence name, when the file's first track carried a name meta
    /// event and the format makes the file a single sequence (0 or 1).
    pub fn sequence_name(&self) -> Option<&str> {
        self.sequence_name.as_deref()
    }

    /// The decoded tracks, in file order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The cumulative tick length of the longest track.
    pub fn duration_ticks(&self) -> u32 {
        self.tracks
            .iter()
            .map(Track::length_ticks)
            .max()
            .unwrap_or(0)
    }

    /// Every Note-On event in the file, walked track by track.
    pub fn note_events(&self) -> impl Iterator<Item = &NoteEvent> {
        self.tracks.iter().flat_map(|track| track.events().iter())
    }
}
