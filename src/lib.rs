#![doc = r#"
Decode Standard MIDI Files into a plain note timeline.

`smfread` turns the raw bytes of a `.mid` file into a [`MidiFile`]:
the header fields, the tracks, and every Note-On event with its
absolute tick position. It is a pure function over an in-memory
buffer, with no I/O and no shared state, so decoding several files
concurrently needs no coordination.

Everything the document model does not retain (non-note channel
events, sysex payloads, meta events other than Sequence/Track Name)
is still consumed byte-exactly, so a well-formed file always decodes
end to end and a malformed one fails with a typed, position-carrying
[`ReaderError`](reader::ReaderError).

# Example

```rust
use smfread::prelude::*;

let bytes: &[u8] = &[
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0, 96, // header
    b'M', b'T', b'r', b'k', 0, 0, 0, 8, // one track, 8 bytes
    0x00, 0x90, 0x40, 0x64, // Note On
    0x00, 0x80, 0x40, 0x00, // Note Off
];

let file = MidiFile::parse(bytes)?;
assert_eq!(file.tickdiv(), 96);
assert_eq!(file.note_events().count(), 1);
# Ok::<(), smfread::reader::ReaderError>(())
```

Tempo, SMPTE time division, and General-MIDI semantics are all outside
this crate's scope; callers that need wall-clock time divide
`start_ticks` by [`MidiFile::tickdiv`] and apply their own tempo.
"#]
#![no_std]
#![warn(missing_docs)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod file;
pub mod reader;

pub use file::{MidiFile, NoteEvent, Track};

/// Everything most users want in scope.
pub mod prelude {
    pub use crate::file::{
        Format, MidiFile, NOTE_CENTER, NOTE_MAX, NOTE_MIN, NoteEvent, Track,
        chunk::{RawHeaderChunk, RawTrackChunk},
    };
    pub use crate::reader::{ReadResult, Reader, ReaderError, ReaderErrorKind};
}
